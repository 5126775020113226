//! Pointer identities and the raycast seam between the 3D scene and the panel.

use crate::geometry::SurfaceUv;

/// Number of pointers tracked concurrently (one per hand controller).
pub const MAX_POINTERS: usize = 2;

/// Index of a pointer slot, always `< MAX_POINTERS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerIndex(usize);

impl PointerIndex {
    /// Primary pointer (mouse or right controller).
    pub const PRIMARY: Self = Self(0);
    /// Secondary pointer (left controller).
    pub const SECONDARY: Self = Self(1);

    /// Checked constructor.
    pub fn new(index: usize) -> Option<Self> {
        (index < MAX_POINTERS).then_some(Self(index))
    }

    /// Raw slot index.
    pub fn get(self) -> usize {
        self.0
    }

    /// Iterate every pointer slot in order.
    pub fn all() -> impl Iterator<Item = PointerIndex> {
        (0..MAX_POINTERS).map(PointerIndex)
    }
}

/// Scene-side collaborator that intersects controller rays with the panel plane.
///
/// Implementations own all 3D math; the panel only consumes the resulting UV.
pub trait RaycastAdapter {
    /// UV where `pointer`'s ray meets the panel, or `None` when it misses.
    fn surface_uv(&mut self, pointer: PointerIndex) -> Option<SurfaceUv>;
}
