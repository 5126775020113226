//! A drawing backend that records primitives instead of rasterizing them.

use canvasui_assets::ImageAsset;
use canvasui_core::{Point, Rect};
use canvasui_panel::{DrawingBackend, FontSpec, PathCommand, TextAnchor, TextMeasurer};
use serde::Serialize;

/// Advance width per character as a fraction of the font size.
pub const HALF_EM: f32 = 0.5;

/// One recorded paint call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Clip changed (`None` = whole surface).
    Clip {
        /// New clip rectangle.
        rect: Option<Rect>,
    },
    /// Surface area cleared.
    Clear {
        /// Cleared area.
        rect: Rect,
    },
    /// Solid rectangle.
    FillRect {
        /// Filled area.
        rect: Rect,
        /// Fill colour.
        color: String,
    },
    /// Rectangle outline.
    StrokeRect {
        /// Outlined area.
        rect: Rect,
        /// Stroke colour.
        color: String,
        /// Stroke width in pixels.
        width: f32,
    },
    /// Closed path fill (rounded rects, polygons).
    FillPath {
        /// Number of path commands.
        commands: usize,
        /// Number of arc segments among them.
        arcs: usize,
        /// Fill colour.
        color: String,
    },
    /// One line of text.
    Text {
        /// Line contents.
        text: String,
        /// Anchor x.
        x: f32,
        /// Baseline y.
        y: f32,
        /// How `x` is interpreted.
        anchor: TextAnchor,
        /// CSS font shorthand.
        font: String,
        /// Text colour.
        color: String,
    },
    /// Decoded image blit.
    Image {
        /// Source the image was loaded from.
        source: String,
        /// Destination rectangle.
        rect: Rect,
    },
    /// SVG path data fill.
    SvgPath {
        /// Path data.
        data: String,
        /// Translation applied to the path.
        origin: Point,
        /// Fill colour.
        color: String,
    },
}

/// Records every call in order. Text is measured as `chars * size * HALF_EM`.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    ready: bool,
    commands: Vec<DrawCommand>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    /// Backend with a ready surface.
    pub fn new() -> Self {
        Self {
            ready: true,
            commands: Vec::new(),
        }
    }

    /// Backend whose surface has not been created yet.
    pub fn without_surface() -> Self {
        Self {
            ready: false,
            commands: Vec::new(),
        }
    }

    /// Toggle surface availability.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Everything recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recording (e.g. between frames).
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded text lines, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Recorded text command for the first line equal to `line`.
    pub fn text(&self, line: &str) -> Option<&DrawCommand> {
        self.commands
            .iter()
            .find(|command| matches!(command, DrawCommand::Text { text, .. } if text == line))
    }
}

impl TextMeasurer for RecordingBackend {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size * HALF_EM
    }
}

impl DrawingBackend for RecordingBackend {
    fn surface_ready(&self) -> bool {
        self.ready
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.commands.push(DrawCommand::Clip { rect: clip });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clear { rect });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: color.to_string(),
            width: line_width,
        });
    }

    fn fill_path(&mut self, path: &[PathCommand], color: &str) {
        let arcs = path
            .iter()
            .filter(|command| matches!(command, PathCommand::Arc { .. }))
            .count();
        self.commands.push(DrawCommand::FillPath {
            commands: path.len(),
            arcs,
            color: color.to_string(),
        });
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        anchor: TextAnchor,
        font: &FontSpec,
        color: &str,
    ) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            anchor,
            font: font.css(),
            color: color.to_string(),
        });
    }

    fn draw_image(&mut self, image: &ImageAsset, rect: Rect) {
        self.commands.push(DrawCommand::Image {
            source: image.source.clone(),
            rect,
        });
    }

    fn fill_svg_path(&mut self, data: &str, origin: Point, color: &str) {
        self.commands.push(DrawCommand::SvgPath {
            data: data.to_string(),
            origin,
            color: color.to_string(),
        });
    }
}
