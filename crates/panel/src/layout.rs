//! Layout Resolver: turns element configs into absolute pixel geometry.
//!
//! Text wraps on explicit newlines only. A text element without a configured
//! height has its height computed from the line count on first layout and
//! frozen in [`LayoutCache`]; later layouts reuse the frozen value so scroll
//! and overflow never feed back into the box size.

use std::collections::HashMap;

use canvasui_core::{Point, Rect, SurfaceSize};

use crate::backend::{TextAnchor, TextMeasurer};
use crate::error::ConfigError;
use crate::model::{Content, ElementConfig, ElementKind, Overflow, PanelConfig, TextAlign};
use crate::resolve::{FontSpec, ResolvedStyle};

/// Per-panel memory of derived geometry.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    frozen_heights: HashMap<String, f32>,
    derived_max_scroll: HashMap<String, f32>,
}

impl LayoutCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Height frozen for `name` on its first text layout.
    pub fn frozen_height(&self, name: &str) -> Option<f32> {
        self.frozen_heights.get(name).copied()
    }

    /// Scroll limit derived from content overflow on the last layout.
    pub fn derived_max_scroll(&self, name: &str) -> Option<f32> {
        self.derived_max_scroll.get(name).copied()
    }

    /// Drop everything derived for `name` (its config was replaced).
    pub fn forget(&mut self, name: &str) {
        self.frozen_heights.remove(name);
        self.derived_max_scroll.remove(name);
    }
}

/// Box of a positioned element as used by hit testing, without measuring text.
///
/// Elements that declare no position are background and have no box. A text
/// element that has neither a configured nor a frozen height spans the lines
/// of its current content, the same height its first layout will freeze.
pub fn element_box(
    name: &str,
    element: &ElementConfig,
    body: &ElementConfig,
    content: Option<&Content>,
    surface: SurfaceSize,
    cache: &LayoutCache,
) -> Option<Rect> {
    let position = element.position?;
    let width = element.width.unwrap_or(surface.width);
    let height = element
        .height
        .or_else(|| cache.frozen_height(name))
        .or_else(|| unfrozen_text_height(name, element, body, content, surface))
        .unwrap_or(surface.height);
    Some(Rect::new(position.x, position.y, width, height))
}

fn unfrozen_text_height(
    name: &str,
    element: &ElementConfig,
    body: &ElementConfig,
    content: Option<&Content>,
    surface: SurfaceSize,
) -> Option<f32> {
    if !element.kind.is_some_and(ElementKind::is_textual) {
        return None;
    }
    let text = match content {
        Some(content) if content.vector_path().is_some() => return None,
        Some(content) => content.as_text()?,
        None => "",
    };
    let style = ResolvedStyle::resolve(name, element, body, surface, content).ok()?;
    Some(text_content_height(text, &style))
}

/// Full height of `text` wrapped on newlines, padding included.
fn text_content_height(text: &str, style: &ResolvedStyle) -> f32 {
    text.split('\n').count() as f32 * style.line_height() + style.padding * 2.0
}

/// Scroll limit for `element`: the explicit `maxScroll` when set, else the
/// overflow measured on the last layout. Never negative.
pub fn effective_max_scroll(name: &str, element: &ElementConfig, cache: &LayoutCache) -> f32 {
    element
        .max_scroll
        .or_else(|| cache.derived_max_scroll(name))
        .unwrap_or(0.0)
        .max(0.0)
}

/// One painted line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Line contents (no newline).
    pub text: String,
    /// Anchor x, interpreted per [`TextLayout::anchor`].
    pub x: f32,
    /// Baseline y.
    pub y: f32,
    /// Measured width.
    pub width: f32,
}

/// Wrapped text ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<TextLine>,
    pub line_height: f32,
    pub font: FontSpec,
    pub color: String,
    pub anchor: TextAnchor,
}

/// Type-specific payload of a laid-out element.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutBody {
    /// Wrapped text lines.
    Text(TextLayout),
    /// Vector path translated to `origin`.
    VectorPath {
        data: String,
        origin: Point,
        color: String,
    },
    /// Image to fetch/paint; the box height is derived from the aspect ratio at paint time.
    Image { source: String },
    /// Filled polygon in absolute surface coordinates.
    Shape { points: Vec<Point>, fill: String },
    /// Nothing beyond background/outline.
    Empty,
}

/// Absolute geometry for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementLayout {
    pub name: String,
    pub style: ResolvedStyle,
    pub bounds: Rect,
    /// Rectangle every paint of this element is constrained to.
    pub clip: Option<Rect>,
    /// Effective scroll limit (0 for non-scrolling elements).
    pub max_scroll: f32,
    pub body: LayoutBody,
}

impl ElementLayout {
    /// Box an image of `aspect` (width / height) occupies: configured width, derived height.
    pub fn image_rect(&self, aspect: f32) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.y,
            self.bounds.width,
            self.bounds.width / aspect,
        )
    }
}

/// Lay out `name` (its own config, or the body record when it has none).
pub fn layout_element<M: TextMeasurer + ?Sized>(
    name: &str,
    config: &PanelConfig,
    content: &Content,
    cache: &mut LayoutCache,
    measurer: &M,
) -> Result<ElementLayout, ConfigError> {
    let surface = config.surface_size();
    let element = config.config_for(name);
    let style = ResolvedStyle::resolve(name, element, &config.body, surface, Some(content))?;
    let position = style.position;
    let textual = style.kind.is_some_and(ElementKind::is_textual);

    let mut max_scroll = 0.0;
    let (height, body) = match content {
        Content::Shape(shape) => (
            fixed_height(name, &style, cache, surface),
            LayoutBody::Shape {
                points: shape.points.iter().map(|p| p.offset(position)).collect(),
                fill: shape.fill.clone(),
            },
        ),
        Content::Text(_) if textual => {
            if let Some(data) = content.vector_path() {
                (
                    fixed_height(name, &style, cache, surface),
                    LayoutBody::VectorPath {
                        data,
                        origin: position,
                        color: style.font_color.clone(),
                    },
                )
            } else {
                let text = content.as_text().unwrap_or_default();
                let (height, layout, limit) = wrap_text(name, text, &style, cache, measurer);
                max_scroll = limit;
                (height, LayoutBody::Text(layout))
            }
        }
        Content::Text(source) if style.kind == Some(ElementKind::Image) => (
            fixed_height(name, &style, cache, surface),
            LayoutBody::Image {
                source: source.clone(),
            },
        ),
        Content::Text(_) => (fixed_height(name, &style, cache, surface), LayoutBody::Empty),
    };

    if style.overflow == Overflow::Scroll && !matches!(body, LayoutBody::Text(_)) {
        max_scroll = effective_max_scroll(name, element, cache);
    }

    let bounds = Rect::new(position.x, position.y, style.width, height);
    Ok(ElementLayout {
        name: name.to_string(),
        clip: style.clip.then_some(bounds),
        max_scroll,
        bounds,
        body,
        style,
    })
}

fn fixed_height(name: &str, style: &ResolvedStyle, cache: &LayoutCache, surface: SurfaceSize) -> f32 {
    style
        .explicit_height
        .or_else(|| cache.frozen_height(name))
        .unwrap_or(surface.height)
}

/// Wrap on newlines, freeze the height if unconfigured, and apply scroll.
/// Returns the box height, the text layout and the effective scroll limit.
fn wrap_text<M: TextMeasurer + ?Sized>(
    name: &str,
    text: &str,
    style: &ResolvedStyle,
    cache: &mut LayoutCache,
    measurer: &M,
) -> (f32, TextLayout, f32) {
    let font = style.font();
    let line_height = style.line_height();
    let padding = style.padding;
    let raw_lines: Vec<&str> = text.split('\n').collect();
    let content_height = text_content_height(text, style);

    let height = match style.explicit_height {
        Some(height) => height,
        None => *cache
            .frozen_heights
            .entry(name.to_string())
            .or_insert(content_height),
    };

    let max_scroll = if style.overflow == Overflow::Scroll {
        let derived = (content_height - height).max(0.0);
        cache
            .derived_max_scroll
            .insert(name.to_string(), derived);
        style.max_scroll.unwrap_or(derived).max(0.0)
    } else {
        0.0
    };
    let scroll = style.scroll_y.clamp(0.0, max_scroll);

    let Point { x, y } = style.position;
    let mut cursor = y + padding - scroll;
    let mut lines = Vec::with_capacity(raw_lines.len());
    for raw in raw_lines {
        let width = measurer.measure_text(raw, &font);
        let anchor_x = match style.text_align {
            TextAlign::Center => x + style.width / 2.0,
            TextAlign::Right => x + style.width - width - padding,
            TextAlign::Left => x + padding,
        };
        lines.push(TextLine {
            text: raw.to_string(),
            x: anchor_x,
            y: cursor,
            width,
        });
        cursor += line_height;
    }

    let anchor = match style.text_align {
        TextAlign::Center => TextAnchor::Center,
        TextAlign::Left | TextAlign::Right => TextAnchor::Start,
    };
    let layout = TextLayout {
        lines,
        line_height,
        font,
        color: style.font_color.clone(),
        anchor,
    };
    (height, layout, max_scroll)
}

/// Segment of a closed fill path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Circular arc from `start` to `end` radians (clockwise on screen, y down).
    Arc {
        center: Point,
        radius: f32,
        start: f32,
        end: f32,
    },
    Close,
}

/// Closed rounded-rectangle outline: four edges joined by quarter arcs.
///
/// The radius is clamped to half the shorter side; at radius 0 the path is a
/// plain rectangle with no arcs.
pub fn rounded_rect_path(rect: Rect, radius: f32) -> Vec<PathCommand> {
    use std::f32::consts::{FRAC_PI_2, PI};

    let r = radius
        .max(0.0)
        .min(rect.width / 2.0)
        .min(rect.height / 2.0);
    let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());

    if r <= 0.0 {
        return vec![
            PathCommand::MoveTo(Point::new(left, top)),
            PathCommand::LineTo(Point::new(right, top)),
            PathCommand::LineTo(Point::new(right, bottom)),
            PathCommand::LineTo(Point::new(left, bottom)),
            PathCommand::Close,
        ];
    }

    let arc = |cx: f32, cy: f32, start: f32| PathCommand::Arc {
        center: Point::new(cx, cy),
        radius: r,
        start,
        end: start + FRAC_PI_2,
    };
    vec![
        PathCommand::MoveTo(Point::new(left + r, top)),
        PathCommand::LineTo(Point::new(right - r, top)),
        arc(right - r, top + r, -FRAC_PI_2),
        PathCommand::LineTo(Point::new(right, bottom - r)),
        arc(right - r, bottom - r, 0.0),
        PathCommand::LineTo(Point::new(left + r, bottom)),
        arc(left + r, bottom - r, FRAC_PI_2),
        PathCommand::LineTo(Point::new(left, top + r)),
        arc(left + r, top + r, PI),
        PathCommand::Close,
    ]
}

/// Closed polygon path through `points`.
pub fn polygon_path(points: &[Point]) -> Vec<PathCommand> {
    let mut path = Vec::with_capacity(points.len() + 1);
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.push(PathCommand::MoveTo(*first));
        path.extend(iter.map(|p| PathCommand::LineTo(*p)));
        path.push(PathCommand::Close);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Shape;
    use crate::test_support::HalfEm;

    fn body() -> ElementConfig {
        ElementConfig {
            padding: Some(20.0),
            ..Default::default()
        }
    }

    fn text_panel(element: ElementConfig) -> PanelConfig {
        PanelConfig::new(body()).with_element("logo", element)
    }

    #[test]
    fn single_line_text_freezes_height() {
        let config = text_panel(ElementConfig::new(ElementKind::Text, 50.0, 50.0).with_width(400.0));
        let mut cache = LayoutCache::new();
        let layout = layout_element("logo", &config, &"Welcome to MMU".into(), &mut cache, &HalfEm)
            .expect("layout");

        let LayoutBody::Text(text) = &layout.body else {
            panic!("expected text body");
        };
        assert_eq!(text.lines.len(), 1);
        assert_eq!(text.lines[0].y, 70.0);
        assert_eq!(text.lines[0].x, 50.0 + 200.0);
        let expected = 1.2 * 30.0 + 40.0;
        assert!((layout.bounds.height - expected).abs() < 1e-4);
        assert_eq!(cache.frozen_height("logo"), Some(layout.bounds.height));
    }

    #[test]
    fn frozen_height_survives_content_growth() {
        let config = text_panel(ElementConfig::new(ElementKind::Text, 0.0, 0.0));
        let mut cache = LayoutCache::new();
        let first = layout_element("logo", &config, &"one".into(), &mut cache, &HalfEm).expect("layout");
        let second = layout_element("logo", &config, &"one\ntwo\nthree".into(), &mut cache, &HalfEm)
            .expect("layout");
        assert_eq!(first.bounds.height, second.bounds.height);
    }

    #[test]
    fn explicit_height_is_never_frozen() {
        let config = text_panel(ElementConfig::new(ElementKind::Text, 0.0, 0.0).with_size(100.0, 50.0));
        let mut cache = LayoutCache::new();
        let layout = layout_element("logo", &config, &"a\nb".into(), &mut cache, &HalfEm).expect("layout");
        assert_eq!(layout.bounds.height, 50.0);
        assert_eq!(cache.frozen_height("logo"), None);
    }

    #[test]
    fn alignment_anchors() {
        let mut element = ElementConfig::new(ElementKind::Text, 10.0, 0.0).with_width(200.0);
        let mut cache = LayoutCache::new();

        element.text_align = Some(TextAlign::Left);
        let layout = layout_element("logo", &text_panel(element.clone()), &"abcd".into(), &mut cache, &HalfEm)
            .expect("layout");
        let LayoutBody::Text(text) = layout.body else { panic!() };
        assert_eq!(text.lines[0].x, 30.0);
        assert_eq!(text.anchor, TextAnchor::Start);

        element.text_align = Some(TextAlign::Right);
        let layout = layout_element("logo", &text_panel(element), &"abcd".into(), &mut cache, &HalfEm)
            .expect("layout");
        let LayoutBody::Text(text) = layout.body else { panic!() };
        // 4 glyphs * 15px = 60px wide.
        assert_eq!(text.lines[0].x, 10.0 + 200.0 - 60.0 - 20.0);
    }

    #[test]
    fn lines_advance_by_line_height() {
        let config = text_panel(ElementConfig::new(ElementKind::Text, 0.0, 0.0));
        let mut cache = LayoutCache::new();
        let layout = layout_element("logo", &config, &"a\nb\nc".into(), &mut cache, &HalfEm).expect("layout");
        let LayoutBody::Text(text) = layout.body else { panic!() };
        let ys: Vec<f32> = text.lines.iter().map(|l| l.y).collect();
        assert_eq!(ys[0], 20.0);
        assert!((ys[1] - 56.0).abs() < 1e-4);
        assert!((ys[2] - 92.0).abs() < 1e-4);
    }

    #[test]
    fn scroll_offsets_lines_and_derives_limit() {
        let mut element = ElementConfig::new(ElementKind::Text, 0.0, 0.0)
            .with_size(100.0, 80.0)
            .with_overflow(Overflow::Scroll);
        element.scroll_y = Some(1000.0);
        let config = text_panel(element);
        let mut cache = LayoutCache::new();
        let text = "1\n2\n3\n4\n5";
        let layout = layout_element("logo", &config, &text.into(), &mut cache, &HalfEm).expect("layout");
        // 5 lines * 36 + 40 padding = 220 content, 80 box.
        assert!((layout.max_scroll - 140.0).abs() < 1e-3);
        let LayoutBody::Text(text) = layout.body else { panic!() };
        assert!((text.lines[0].y - (20.0 - 140.0)).abs() < 1e-3);
    }

    #[test]
    fn clip_equals_own_box() {
        let mut element = ElementConfig::new(ElementKind::Text, 5.0, 6.0).with_size(10.0, 20.0);
        element.clip = Some(true);
        let mut cache = LayoutCache::new();
        let layout = layout_element("logo", &text_panel(element), &"x".into(), &mut cache, &HalfEm)
            .expect("layout");
        assert_eq!(layout.clip, Some(Rect::new(5.0, 6.0, 10.0, 20.0)));
    }

    #[test]
    fn unconfigured_geometry_fills_surface() {
        let config = PanelConfig::new(body()).with_surface(320.0, 200.0);
        let mut cache = LayoutCache::new();
        let layout = layout_element("orphan", &config, &"hi".into(), &mut cache, &HalfEm).expect("layout");
        assert_eq!(layout.bounds, Rect::new(0.0, 0.0, 320.0, 200.0));
        assert_eq!(layout.body, LayoutBody::Empty);
    }

    #[test]
    fn shape_points_are_relative_to_position() {
        let config = text_panel(ElementConfig::new(ElementKind::Shape, 10.0, 20.0));
        let shape = Shape {
            points: vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(0.0, 5.0)],
            fill: "#0f0".into(),
        };
        let mut cache = LayoutCache::new();
        let layout = layout_element("logo", &config, &shape.into(), &mut cache, &HalfEm).expect("layout");
        let LayoutBody::Shape { points, fill } = layout.body else { panic!() };
        assert_eq!(points[1], Point::new(15.0, 20.0));
        assert_eq!(fill, "#0f0");
    }

    #[test]
    fn invalid_width_is_rejected() {
        let config = text_panel(ElementConfig::new(ElementKind::Text, 0.0, 0.0).with_width(-1.0));
        let mut cache = LayoutCache::new();
        let err = layout_element("logo", &config, &"x".into(), &mut cache, &HalfEm).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAttribute { attribute: "width", .. }));
    }

    #[test]
    fn square_corners_make_plain_rectangle() {
        let path = rounded_rect_path(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0);
        assert_eq!(path.len(), 5);
        assert!(!path.iter().any(|c| matches!(c, PathCommand::Arc { .. })));
        assert_eq!(path.last(), Some(&PathCommand::Close));
    }

    #[test]
    fn rounded_corners_are_closed_quarter_arcs() {
        let path = rounded_rect_path(Rect::new(0.0, 0.0, 100.0, 40.0), 50.0);
        let arcs: Vec<_> = path
            .iter()
            .filter_map(|c| match c {
                PathCommand::Arc { radius, start, end, .. } => Some((*radius, end - start)),
                _ => None,
            })
            .collect();
        assert_eq!(arcs.len(), 4);
        for (radius, sweep) in arcs {
            assert_eq!(radius, 20.0);
            assert!((sweep - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        }
        assert_eq!(path.first(), Some(&PathCommand::MoveTo(Point::new(20.0, 0.0))));
        assert_eq!(path.last(), Some(&PathCommand::Close));
    }

    #[test]
    fn polygon_path_closes() {
        let path = polygon_path(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)]);
        assert_eq!(path.len(), 4);
        assert!(polygon_path(&[]).is_empty());
    }
}
