#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod geometry;
pub mod pointer;

use serde::{Deserialize, Serialize};

pub use geometry::{Point, Rect, SurfaceSize, SurfaceUv};
pub use pointer::{PointerIndex, RaycastAdapter, MAX_POINTERS};

/// Monotonic frame counter driven by the external frame clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameTick(pub u64);

impl FrameTick {
    /// First frame of any panel lifetime.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` frames.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}
