//! Interaction events and the handler registry they are dispatched to.

use std::collections::HashMap;

use canvasui_core::PointerIndex;

use crate::document::PanelEdit;

/// Something the interaction state machine observed.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// `pointer` started (`hovered = true`) or stopped hovering `element`.
    HoverChanged {
        pointer: PointerIndex,
        element: String,
        hovered: bool,
    },
    /// Press-down edge of `pointer` over `element`.
    Clicked { pointer: PointerIndex, element: String },
}

impl PanelEvent {
    /// Element the event concerns.
    pub fn element(&self) -> &str {
        match self {
            PanelEvent::HoverChanged { element, .. } | PanelEvent::Clicked { element, .. } => element,
        }
    }
}

/// Caller-supplied reaction to an event. Runs synchronously inside the tick.
pub type Handler = Box<dyn FnMut(&PanelEvent, &mut PanelEdit<'_>) -> anyhow::Result<()>>;

/// Handlers keyed by element name, plus catch-all handlers.
#[derive(Default)]
pub struct Handlers {
    click: HashMap<String, Vec<Handler>>,
    hover: HashMap<String, Vec<Handler>>,
    any: Vec<Handler>,
}

impl Handlers {
    pub fn on_click<F>(&mut self, element: &str, handler: F)
    where
        F: FnMut(&PanelEvent, &mut PanelEdit<'_>) -> anyhow::Result<()> + 'static,
    {
        self.click
            .entry(element.to_string())
            .or_default()
            .push(Box::new(handler));
    }

    pub fn on_hover<F>(&mut self, element: &str, handler: F)
    where
        F: FnMut(&PanelEvent, &mut PanelEdit<'_>) -> anyhow::Result<()> + 'static,
    {
        self.hover
            .entry(element.to_string())
            .or_default()
            .push(Box::new(handler));
    }

    pub fn on_any<F>(&mut self, handler: F)
    where
        F: FnMut(&PanelEvent, &mut PanelEdit<'_>) -> anyhow::Result<()> + 'static,
    {
        self.any.push(Box::new(handler));
    }

    /// Run every handler interested in `event`.
    ///
    /// A handler error is logged and isolated: the remaining handlers still run.
    pub fn dispatch(&mut self, event: &PanelEvent, edit: &mut PanelEdit<'_>) {
        let keyed = match event {
            PanelEvent::Clicked { .. } => self.click.get_mut(event.element()),
            PanelEvent::HoverChanged { .. } => self.hover.get_mut(event.element()),
        };
        let keyed = keyed.into_iter().flat_map(|handlers| handlers.iter_mut());
        for handler in keyed.chain(self.any.iter_mut()) {
            if let Err(err) = handler(event, &mut *edit) {
                tracing::warn!(element = %event.element(), ?event, "event handler failed: {err:#}");
            }
        }
    }
}

impl std::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("click", &self.click.keys().collect::<Vec<_>>())
            .field("hover", &self.hover.keys().collect::<Vec<_>>())
            .field("any", &self.any.len())
            .finish()
    }
}
