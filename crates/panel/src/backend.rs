//! Drawing Backend seam. The panel never touches pixels itself; it drives an
//! implementation of [`DrawingBackend`] with surface-space primitives.

use canvasui_assets::ImageAsset;
use canvasui_core::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::layout::{polygon_path, rounded_rect_path, PathCommand};
use crate::resolve::FontSpec;

/// How `fill_text` interprets its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    /// `x` is the left edge of the run.
    Start,
    /// `x` is the horizontal centre of the run.
    Center,
}

/// Backend-specific text measurement used by layout.
pub trait TextMeasurer {
    /// Advance width of `text` in surface pixels.
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32;
}

/// Raster target the render driver paints into.
///
/// Every paint call is constrained to the clip most recently set with
/// [`DrawingBackend::set_clip`] (`None` means the whole surface).
pub trait DrawingBackend: TextMeasurer {
    /// Whether the backing surface (and the mesh displaying it) exists.
    fn surface_ready(&self) -> bool {
        true
    }

    fn set_clip(&mut self, clip: Option<Rect>);

    fn clear_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, color: &str);

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32);

    /// Fill a closed path built from [`PathCommand`]s.
    fn fill_path(&mut self, path: &[PathCommand], color: &str);

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: &str) {
        self.fill_path(&rounded_rect_path(rect, radius), color);
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        anchor: TextAnchor,
        font: &FontSpec,
        color: &str,
    );

    fn draw_image(&mut self, image: &ImageAsset, rect: Rect);

    fn fill_polygon(&mut self, points: &[Point], color: &str) {
        self.fill_path(&polygon_path(points), color);
    }

    /// Fill SVG path data translated so its origin sits at `origin`.
    fn fill_svg_path(&mut self, data: &str, origin: Point, color: &str);
}
