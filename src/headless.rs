use crate::config::RunnerConfig;
use crate::scripted_input::{PointerScriptPlayer, ScriptedPointer};
use anyhow::{Context, Result};
use canvasui_assets::ThreadedImageLoader;
use canvasui_core::{FrameTick, PointerIndex, MAX_POINTERS};
use canvasui_panel::{content_from_json_str, Panel, PanelConfig, PointerInput};
use canvasui_testkit::{FrameRecord, JsonlSink, RecordingBackend};
use canvasui_ui3d::PlaneRaycaster;
use std::fs;

/// Totals over a headless run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub passes: u64,
    pub events: u64,
}

pub fn run(cfg: &RunnerConfig) -> Result<RunSummary> {
    let config = PanelConfig::load_file(&cfg.panel_path)
        .with_context(|| format!("failed to load panel {}", cfg.panel_path.display()))?;
    let loader = ThreadedImageLoader::new(cfg.asset_root.clone());
    let mut panel = Panel::with_loader(config, Box::new(loader))
        .with_context(|| format!("invalid panel {}", cfg.panel_path.display()))?;

    if let Some(path) = &cfg.content_path {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read content {}", path.display()))?;
        let content = content_from_json_str(&contents)
            .with_context(|| format!("failed to parse content {}", path.display()))?;
        for (name, payload) in content {
            panel.set_content(&name, payload);
        }
    }

    let mut script = match &cfg.script_path {
        Some(path) => Some(
            PointerScriptPlayer::from_path(path)
                .with_context(|| format!("failed to load pointer script {}", path.display()))?,
        ),
        None => None,
    };

    panel.on_any(|event, _| {
        tracing::info!(?event, "panel event");
        Ok(())
    });

    let mut sink = match &cfg.frame_log {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("failed to create frame log {}", path.display()))?,
        ),
        None => None,
    };

    run_frames(&mut panel, script.as_mut(), cfg.max_frames, sink.as_mut())
}

/// Drive `panel` for `max_frames` frames against a recording backend.
pub fn run_frames(
    panel: &mut Panel,
    mut script: Option<&mut PointerScriptPlayer>,
    max_frames: u64,
    mut sink: Option<&mut JsonlSink>,
) -> Result<RunSummary> {
    let mut backend = RecordingBackend::new();
    let mut raycaster = PlaneRaycaster::new(
        script
            .as_ref()
            .map(|player| player.plane())
            .unwrap_or_else(|| crate::scripted_input::PlaneSpec::default().to_plane()),
    );
    let mut summary = RunSummary::default();
    let mut tick = FrameTick::ZERO;

    while tick.0 < max_frames {
        let frame = script
            .as_deref_mut()
            .map(PointerScriptPlayer::advance)
            .unwrap_or_default();

        for (name, text) in &frame.set_content {
            panel.set_content(name, text.as_str());
        }

        let mut pressed = [false; MAX_POINTERS];
        for pointer in PointerIndex::all() {
            let scripted = frame.pointers[pointer.get()];
            pressed[pointer.get()] = scripted.pressed();
            raycaster.set_pose(pointer, scripted.pose());
        }
        let mut inputs = panel.pointer_inputs(&mut raycaster, pressed);
        for (input, scripted) in inputs.iter_mut().zip(frame.pointers.iter()) {
            if let ScriptedPointer::Surface { x, y, pressed } = *scripted {
                *input = PointerInput::at(x, y, pressed);
            }
        }

        let report = panel.frame(&inputs, &mut backend)?;
        let draw_commands = backend.take_commands().len();
        if panel.take_texture_upload() {
            summary.passes += 1;
        }
        summary.events += report.events.len() as u64;

        if let Some(sink) = sink.as_deref_mut() {
            sink.write(&FrameRecord::new(tick, &report, draw_commands))?;
        }
        tracing::debug!(frame = tick.0, draw_commands, "frame complete");

        tick = tick.advance(1);
        summary.frames = tick.0;
    }

    if let Some(sink) = sink {
        sink.flush()?;
    }
    let script_finished = script.as_deref().map(PointerScriptPlayer::finished);
    tracing::info!(
        frames = summary.frames,
        ?script_finished,
        passes = summary.passes,
        events = summary.events,
        "headless run finished"
    );
    Ok(summary)
}
