#![warn(missing_docs)]
//! Headless test surfaces: a recording drawing backend, a manually driven
//! asset loader and a JSONL frame log.

mod backend;
mod loader;

use anyhow::Result;
use canvasui_core::FrameTick;
use canvasui_panel::{FrameReport, PanelEvent, RenderOutcome};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub use backend::{DrawCommand, RecordingBackend, HALF_EM};
pub use loader::ManualAssetLoader;

/// One observed panel event, flattened for logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    /// Pointer slot that produced the event.
    pub pointer: usize,
    /// `hover_enter`, `hover_leave` or `click`.
    pub kind: &'static str,
    /// Element the event concerns.
    pub element: String,
}

impl From<&PanelEvent> for EventRecord {
    fn from(event: &PanelEvent) -> Self {
        let (pointer, kind) = match event {
            PanelEvent::HoverChanged {
                pointer, hovered, ..
            } => (*pointer, if *hovered { "hover_enter" } else { "hover_leave" }),
            PanelEvent::Clicked { pointer, .. } => (*pointer, "click"),
        };
        Self {
            pointer: pointer.get(),
            kind,
            element: event.element().to_string(),
        }
    }
}

/// Per-frame record written by headless runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    /// Frame index.
    pub frame: FrameTick,
    /// Events dispatched during the tick.
    pub events: Vec<EventRecord>,
    /// Whether a render pass ran.
    pub painted: bool,
    /// Content entries painted by the pass (0 when skipped).
    pub elements: usize,
    /// Draw calls the backend received this frame.
    pub draw_commands: usize,
}

impl FrameRecord {
    /// Summarize `report` for frame `frame`.
    pub fn new(frame: FrameTick, report: &FrameReport, draw_commands: usize) -> Self {
        let (painted, elements) = match report.outcome {
            RenderOutcome::Skipped => (false, 0),
            RenderOutcome::Painted { elements } => (true, elements),
        };
        Self {
            frame,
            events: report.events.iter().map(EventRecord::from).collect(),
            painted,
            elements,
            draw_commands,
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    writer: BufWriter<File>,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Append one record as a single JSON line.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
