//! Declarative 2D panels for 3D scenes
//!
//! A panel is a flat map of named elements (text, buttons, images, shapes)
//! painted onto one raster surface. The surface is shown on a plane in the
//! scene; controller rays hit the plane and arrive here as surface pixels.
//!
//! # Features
//!
//! - **Layout**: absolute positions, newline-wrapped text, heights frozen on first layout
//! - **Hit testing**: declaration-order, first match wins
//! - **Interaction**: per-pointer hover/press/drag-to-scroll state machines
//! - **Rendering**: dirty-gated full repaints through a [`DrawingBackend`]
//!
//! # Example
//!
//! ```rust,no_run
//! use canvasui_panel::{Panel, PanelConfig, PointerInput};
//!
//! # fn run(backend: &mut dyn canvasui_panel::DrawingBackend) -> anyhow::Result<()> {
//! let config = PanelConfig::load_file("menu.json")?;
//! let mut panel = Panel::new(config)?;
//! panel.set_content("title", "Welcome!");
//! panel.on_click("start", |_, edit| {
//!     edit.set_content("title", "Starting...");
//!     Ok(())
//! });
//!
//! // Once per frame:
//! panel.frame(&[PointerInput::at(120.0, 80.0, true)], backend)?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod document;
pub mod error;
pub mod events;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod panel;
pub mod render;
pub mod resolve;
pub mod state;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use backend::{DrawingBackend, TextAnchor, TextMeasurer};
pub use document::{Document, ImageSlot, PanelEdit};
pub use error::{ConfigError, PanelError, PreconditionError};
pub use events::{Handler, Handlers, PanelEvent};
pub use hit_test::hit_test;
pub use interaction::PointerInput;
pub use layout::{
    effective_max_scroll, element_box, layout_element, polygon_path, rounded_rect_path,
    ElementLayout, LayoutBody, LayoutCache, PathCommand, TextLayout, TextLine,
};
pub use model::{
    content_from_json_str, Content, ContentMap, Display, ElementConfig, ElementKind, Overflow,
    PanelConfig, Shape, TextAlign,
};
pub use panel::{FrameReport, Panel};
pub use render::{RenderOutcome, FOCUS_OUTLINE_COLOR, FOCUS_OUTLINE_WIDTH};
pub use resolve::{FontSpec, ResolvedStyle};
pub use state::{DirtyFlag, PanelState, PointerState, ScrollAnchor};

pub use canvasui_core::{Point, PointerIndex, Rect, SurfaceSize, SurfaceUv};
