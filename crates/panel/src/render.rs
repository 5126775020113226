//! Render Driver: one paint pass over the document when the panel is dirty.

use canvasui_assets::AssetLoader;
use canvasui_core::Rect;

use crate::backend::DrawingBackend;
use crate::document::{Document, ImageSlot};
use crate::error::{PanelError, PreconditionError};
use crate::layout::{layout_element, ElementLayout, LayoutBody};
use crate::model::{Content, ElementKind};
use crate::resolve::DEFAULT_BACKGROUND;
use crate::state::PanelState;

/// Colour of the fallback focus outline.
pub const FOCUS_OUTLINE_COLOR: &str = "#fff";
/// Width of the fallback focus outline in pixels.
pub const FOCUS_OUTLINE_WIDTH: f32 = 2.0;

/// What a render call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing was owed; the surface was left untouched.
    Skipped,
    /// A full pass ran and painted `elements` content entries.
    Painted { elements: usize },
}

/// Run one pass if `state` is dirty.
///
/// All layouts are computed before anything is painted, so a configuration
/// error leaves the surface and the layout cache untouched.
pub(crate) fn render_pass(
    doc: &mut Document,
    state: &mut PanelState,
    loader: &mut dyn AssetLoader,
    backend: &mut dyn DrawingBackend,
) -> Result<RenderOutcome, PanelError> {
    if !backend.surface_ready() {
        tracing::error!("render rejected: drawing surface is not initialized");
        return Err(PreconditionError::SurfaceMissing.into());
    }
    if !state.dirty.is_dirty() {
        return Ok(RenderOutcome::Skipped);
    }

    let mut staged = doc.layout.clone();
    let mut layouts = Vec::with_capacity(doc.content.len());
    for (name, content) in &doc.content {
        if !doc.config.config_for(name).is_displayed() {
            continue;
        }
        layouts.push(layout_element(name, &doc.config, content, &mut staged, &*backend)?);
    }
    doc.layout = staged;

    let surface = doc.config.surface_size().bounds();
    tracing::debug!(
        width = surface.width,
        height = surface.height,
        elements = layouts.len(),
        "render pass"
    );

    backend.set_clip(None);
    backend.clear_rect(surface);
    let background = doc
        .config
        .body
        .background_color
        .as_deref()
        .unwrap_or(DEFAULT_BACKGROUND);
    backend.fill_rect(surface, background);

    for layout in &layouts {
        let selected = state.is_selected(&layout.name);
        backend.set_clip(layout.clip);
        paint_background(layout, selected, backend);
        paint_body(layout, doc, loader, backend);
        if selected && layout.style.hover_color.is_none() {
            backend.stroke_rect(layout.bounds, FOCUS_OUTLINE_COLOR, FOCUS_OUTLINE_WIDTH);
        }
        backend.set_clip(None);
    }

    state.dirty.clear();
    state.texture_needs_upload = true;
    Ok(RenderOutcome::Painted {
        elements: layouts.len(),
    })
}

fn paint_background(layout: &ElementLayout, selected: bool, backend: &mut dyn DrawingBackend) {
    let style = &layout.style;
    let hover = style
        .hover_color
        .as_deref()
        .filter(|_| selected && style.kind == Some(ElementKind::Button));
    let Some(color) = hover.or(style.background_color.as_deref()) else {
        return;
    };
    if style.border_radius > 0.0 {
        backend.fill_rounded_rect(layout.bounds, style.border_radius, color);
    } else {
        backend.fill_rect(layout.bounds, color);
    }
}

fn paint_body(
    layout: &ElementLayout,
    doc: &mut Document,
    loader: &mut dyn AssetLoader,
    backend: &mut dyn DrawingBackend,
) {
    match &layout.body {
        LayoutBody::Text(text) => {
            for line in &text.lines {
                backend.fill_text(&line.text, line.x, line.y, text.anchor, &text.font, &text.color);
            }
        }
        LayoutBody::VectorPath {
            data,
            origin,
            color,
        } => backend.fill_svg_path(data, *origin, color),
        LayoutBody::Shape { points, fill } => backend.fill_polygon(points, fill),
        LayoutBody::Image { source } => paint_image(layout, source, doc, loader, backend),
        LayoutBody::Empty => {}
    }
}

fn paint_image(
    layout: &ElementLayout,
    source: &str,
    doc: &mut Document,
    loader: &mut dyn AssetLoader,
    backend: &mut dyn DrawingBackend,
) {
    match doc.images.get(&layout.name) {
        Some(ImageSlot::Ready(image)) => {
            let Some(aspect) = image.aspect_ratio() else {
                return;
            };
            let rect: Rect = layout.image_rect(aspect);
            backend.draw_image(image, rect);
        }
        Some(ImageSlot::Pending) | Some(ImageSlot::Failed) => {}
        None => {
            loader.request(&layout.name, source);
            doc.images.insert(layout.name.clone(), ImageSlot::Pending);
        }
    }
}

/// Fold completed asset loads into the document. Returns whether anything changed.
pub(crate) fn absorb_loaded_assets(doc: &mut Document, loader: &mut dyn AssetLoader) -> bool {
    let mut changed = false;
    for loaded in loader.poll() {
        let current = doc.content.get(&loaded.key).and_then(Content::as_text);
        if current != Some(loaded.source.as_str()) {
            tracing::debug!(element = %loaded.key, source = %loaded.source, "discarding stale image load");
            continue;
        }
        match loaded.result {
            Ok(image) => {
                tracing::info!(
                    element = %loaded.key,
                    width = image.width,
                    height = image.height,
                    "image loaded"
                );
                doc.images.insert(loaded.key, ImageSlot::Ready(image));
                changed = true;
            }
            Err(err) => {
                tracing::warn!(element = %loaded.key, "image load failed: {err}");
                doc.images.insert(loaded.key, ImageSlot::Failed);
            }
        }
    }
    changed
}
