//! Per-panel mutable state: the dirty flag, per-pointer interaction slots and
//! the texture upload signal.

use canvasui_core::{PointerIndex, MAX_POINTERS};

/// Whether a re-render is owed.
///
/// Set by any config/content mutation and by hover/press/scroll changes;
/// cleared only by the render driver at the end of a pass that observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyFlag(bool);

impl DirtyFlag {
    /// Request a re-render.
    pub fn mark(&mut self) {
        self.0 = true;
    }

    /// Whether a re-render is owed.
    pub fn is_dirty(&self) -> bool {
        self.0
    }

    pub(crate) fn clear(&mut self) {
        self.0 = false;
    }
}

impl Default for DirtyFlag {
    /// A new panel has never been painted.
    fn default() -> Self {
        Self(true)
    }
}

/// Snapshot taken when a press lands on a scrolling element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnchor {
    /// Element scroll offset at press time.
    pub scroll_y: f32,
    /// Surface y of the pointer at press time.
    pub ray_y: f32,
}

/// Interaction slot for one pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerState {
    /// Hovered/pressed element, if any.
    pub selected: Option<String>,
    pub pressed: bool,
    pub scroll_anchor: Option<ScrollAnchor>,
}

/// All mutable per-panel state.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub(crate) dirty: DirtyFlag,
    pub(crate) pointers: [PointerState; MAX_POINTERS],
    pub(crate) texture_needs_upload: bool,
}

impl PanelState {
    /// Whether a re-render is owed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Slot for `pointer`.
    pub fn pointer(&self, pointer: PointerIndex) -> &PointerState {
        &self.pointers[pointer.get()]
    }

    #[cfg(test)]
    pub(crate) fn pointer_mut(&mut self, pointer: PointerIndex) -> &mut PointerState {
        &mut self.pointers[pointer.get()]
    }

    /// Element currently selected by `pointer`.
    pub fn selected(&self, pointer: PointerIndex) -> Option<&str> {
        self.pointer(pointer).selected.as_deref()
    }

    /// Whether any pointer currently selects `name`.
    pub fn is_selected(&self, name: &str) -> bool {
        self.pointers
            .iter()
            .any(|slot| slot.selected.as_deref() == Some(name))
    }

    /// Whether the surface texture was repainted since the host last uploaded it.
    pub fn texture_needs_upload(&self) -> bool {
        self.texture_needs_upload
    }

    /// Consume the upload signal; returns `true` at most once per pass.
    pub fn take_texture_upload(&mut self) -> bool {
        std::mem::take(&mut self.texture_needs_upload)
    }
}
