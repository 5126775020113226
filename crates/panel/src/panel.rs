//! The `Panel` facade: owns the document, per-pointer state, handlers and the
//! asset loader, and exposes the per-frame `tick`/`render` entry points.

use canvasui_assets::{AssetLoader, ThreadedImageLoader};
use canvasui_core::{Point, PointerIndex, RaycastAdapter, MAX_POINTERS};

use crate::backend::DrawingBackend;
use crate::document::{Document, PanelEdit};
use crate::error::{ConfigError, PanelError};
use crate::events::{Handlers, PanelEvent};
use crate::hit_test::hit_test;
use crate::interaction::{step_pointer, PointerInput};
use crate::layout::LayoutCache;
use crate::model::{Content, ContentMap, ElementConfig, PanelConfig};
use crate::render::{absorb_loaded_assets, render_pass, RenderOutcome};
use crate::resolve::ResolvedStyle;
use crate::state::PanelState;

/// Result of one [`Panel::frame`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Events observed during the tick, in dispatch order.
    pub events: Vec<PanelEvent>,
    pub outcome: RenderOutcome,
}

/// A declarative 2D panel painted onto a surface that is displayed in a 3D scene.
pub struct Panel {
    doc: Document,
    state: PanelState,
    handlers: Handlers,
    loader: Box<dyn AssetLoader>,
}

impl Panel {
    /// Validate `config` and build a panel that loads images from the working directory.
    pub fn new(config: PanelConfig) -> Result<Self, ConfigError> {
        Self::with_loader(config, Box::new(ThreadedImageLoader::default()))
    }

    /// Like [`Panel::new`] with a caller-supplied asset loader.
    pub fn with_loader(config: PanelConfig, loader: Box<dyn AssetLoader>) -> Result<Self, ConfigError> {
        validate(&config)?;
        tracing::info!(
            elements = config.elements.len(),
            width = config.surface_size().width,
            height = config.surface_size().height,
            "panel created"
        );
        Ok(Self {
            doc: Document::new(config),
            state: PanelState::default(),
            handlers: Handlers::default(),
            loader,
        })
    }

    pub fn config(&self) -> &PanelConfig {
        self.doc.config()
    }

    pub fn content(&self) -> &ContentMap {
        self.doc.content()
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn layout_cache(&self) -> &LayoutCache {
        self.doc.layout_cache()
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// Request a re-render on the next frame.
    pub fn mark_dirty(&mut self) {
        self.state.dirty.mark();
    }

    /// Element currently selected by `pointer`.
    pub fn selected(&self, pointer: PointerIndex) -> Option<&str> {
        self.state.selected(pointer)
    }

    /// First declared element containing `point`.
    pub fn hit_test(&self, point: Point) -> Option<&str> {
        hit_test(&self.doc.config, &self.doc.content, &self.doc.layout, point)
    }

    /// Replace the payload of `name` (dropping any cached image for it).
    pub fn set_content(&mut self, name: &str, content: impl Into<Content>) {
        self.doc.set_content(name, content.into());
        self.state.dirty.mark();
    }

    pub fn remove_content(&mut self, name: &str) -> Option<Content> {
        let removed = self.doc.remove_content(name);
        if removed.is_some() {
            self.state.dirty.mark();
        }
        removed
    }

    /// Mutable access to one element's config. Marks the panel dirty.
    pub fn element_mut(&mut self, name: &str) -> Option<&mut ElementConfig> {
        let element = self.doc.config.elements.get_mut(name)?;
        self.state.dirty.mark();
        Some(element)
    }

    /// Mutable access to the body defaults. Marks the panel dirty.
    pub fn body_mut(&mut self) -> &mut ElementConfig {
        self.state.dirty.mark();
        &mut self.doc.config.body
    }

    /// Insert or replace an element, forgetting any height frozen for it.
    pub fn set_element(&mut self, name: &str, element: ElementConfig) -> Result<(), ConfigError> {
        self.doc.set_element(name, element)?;
        self.state.dirty.mark();
        Ok(())
    }

    pub fn remove_element(&mut self, name: &str) -> Option<ElementConfig> {
        let removed = self.doc.remove_element(name);
        if removed.is_some() {
            self.state.dirty.mark();
        }
        removed
    }

    pub fn on_click<F>(&mut self, element: &str, handler: F)
    where
        F: FnMut(&PanelEvent, &mut PanelEdit<'_>) -> anyhow::Result<()> + 'static,
    {
        self.handlers.on_click(element, handler);
    }

    pub fn on_hover<F>(&mut self, element: &str, handler: F)
    where
        F: FnMut(&PanelEvent, &mut PanelEdit<'_>) -> anyhow::Result<()> + 'static,
    {
        self.handlers.on_hover(element, handler);
    }

    pub fn on_any<F>(&mut self, handler: F)
    where
        F: FnMut(&PanelEvent, &mut PanelEdit<'_>) -> anyhow::Result<()> + 'static,
    {
        self.handlers.on_any(handler);
    }

    /// Sample both pointers from the scene. `pressed[i]` is pointer `i`'s trigger state.
    pub fn pointer_inputs(
        &self,
        adapter: &mut dyn RaycastAdapter,
        pressed: [bool; MAX_POINTERS],
    ) -> [PointerInput; MAX_POINTERS] {
        let surface = self.doc.config.surface_size();
        let mut inputs = [PointerInput::away(); MAX_POINTERS];
        for pointer in PointerIndex::all() {
            let uv = adapter.surface_uv(pointer);
            inputs[pointer.get()] = PointerInput::from_uv(uv, surface, pressed[pointer.get()]);
        }
        inputs
    }

    /// Fold in finished asset loads, advance each pointer's state machine and
    /// dispatch what it observed. Inputs beyond the pointer count are ignored.
    pub fn tick(&mut self, inputs: &[PointerInput]) -> Vec<PanelEvent> {
        if absorb_loaded_assets(&mut self.doc, self.loader.as_mut()) {
            self.state.dirty.mark();
        }

        let mut events = Vec::new();
        for (pointer, input) in PointerIndex::all().zip(inputs.iter().copied()) {
            let mut observed = Vec::new();
            step_pointer(
                pointer,
                input,
                &mut self.state.pointers[pointer.get()],
                &mut self.doc,
                &mut self.state.dirty,
                &mut observed,
            );
            if observed.is_empty() {
                continue;
            }
            let mut edit = PanelEdit::new(&mut self.doc, &mut self.state.dirty);
            for event in &observed {
                self.handlers.dispatch(event, &mut edit);
            }
            events.extend(observed);
        }
        events
    }

    /// Paint a full pass if one is owed.
    pub fn render(&mut self, backend: &mut dyn DrawingBackend) -> Result<RenderOutcome, PanelError> {
        render_pass(&mut self.doc, &mut self.state, self.loader.as_mut(), backend)
    }

    /// One frame: tick, then render.
    pub fn frame(
        &mut self,
        inputs: &[PointerInput],
        backend: &mut dyn DrawingBackend,
    ) -> Result<FrameReport, PanelError> {
        let events = self.tick(inputs);
        let outcome = self.render(backend)?;
        Ok(FrameReport { events, outcome })
    }

    /// Whether the texture was repainted since the last call; clears the signal.
    pub fn take_texture_upload(&mut self) -> bool {
        self.state.take_texture_upload()
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("doc", &self.doc)
            .field("state", &self.state)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

fn validate(config: &PanelConfig) -> Result<(), ConfigError> {
    let surface = config.surface_size();
    let usable = |v: f32| v.is_finite() && v > 0.0;
    if !usable(surface.width) || !usable(surface.height) {
        return Err(ConfigError::InvalidSurface {
            width: surface.width,
            height: surface.height,
        });
    }
    ResolvedStyle::resolve("body", &config.body, &config.body, surface, None)?;
    for (name, element) in &config.elements {
        ResolvedStyle::resolve(name, element, &config.body, surface, None)?;
    }
    Ok(())
}
