//! Layered default resolution: element value, then body value, then a
//! built-in literal.
//!
//! Geometry (`position`, `width`, `height`) and per-element identity
//! (`type`, `display`, `overflow`, `clip`, colours of the element box) are not
//! inherited from the body; the body's values for those describe the panel
//! itself. Text styling and padding are inherited.

use canvasui_core::{Point, SurfaceSize};

use crate::error::ConfigError;
use crate::model::{Content, ElementConfig, ElementKind, Overflow, TextAlign};

/// Built-in panel background colour.
pub const DEFAULT_BACKGROUND: &str = "#000";
/// Built-in font family.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
/// Built-in text colour.
pub const DEFAULT_FONT_COLOR: &str = "#fff";
/// Built-in font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 30.0;
/// Corner radius buttons get unless configured.
pub const BUTTON_BORDER_RADIUS: f32 = 6.0;

/// First present value of `element`, then `body`, else `builtin`.
pub fn resolve<T: Clone>(element: Option<&T>, body: Option<&T>, builtin: T) -> T {
    element.or(body).cloned().unwrap_or(builtin)
}

/// Fully-defaulted attributes for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub kind: Option<ElementKind>,
    pub position: Point,
    pub width: f32,
    /// Height the author configured; `None` means derive (text) or fill the surface.
    pub explicit_height: Option<f32>,
    pub padding: f32,
    pub font_size: f32,
    pub font_family: String,
    pub font_color: String,
    pub background_color: Option<String>,
    pub hover_color: Option<String>,
    pub border_radius: f32,
    pub text_align: TextAlign,
    pub overflow: Overflow,
    pub clip: bool,
    pub scroll_y: f32,
    pub max_scroll: Option<f32>,
}

impl ResolvedStyle {
    /// Resolve `element` against `body` for a surface of `surface` pixels.
    ///
    /// `content` is consulted only for the button defaults, which apply to
    /// text buttons and not to vector-path buttons.
    pub fn resolve(
        name: &str,
        element: &ElementConfig,
        body: &ElementConfig,
        surface: SurfaceSize,
        content: Option<&Content>,
    ) -> Result<Self, ConfigError> {
        let text_button = element.kind == Some(ElementKind::Button)
            && content.map_or(true, |c| c.vector_path().is_none());

        // Buttons put their own defaults in front of the body layer.
        let button_radius = BUTTON_BORDER_RADIUS;
        let button_align = TextAlign::Center;
        let (radius_layer, align_layer) = if text_button {
            (Some(&button_radius), Some(&button_align))
        } else {
            (body.border_radius.as_ref(), body.text_align.as_ref())
        };

        let style = Self {
            kind: element.kind,
            position: element.position.unwrap_or_default(),
            width: element.width.unwrap_or(surface.width),
            explicit_height: element.height,
            padding: resolve(element.padding.as_ref(), body.padding.as_ref(), 0.0),
            font_size: resolve(
                element.font_size.as_ref(),
                body.font_size.as_ref(),
                DEFAULT_FONT_SIZE,
            ),
            font_family: resolve(
                element.font_family.as_ref(),
                body.font_family.as_ref(),
                DEFAULT_FONT_FAMILY.to_string(),
            ),
            font_color: resolve(
                element.font_color.as_ref(),
                body.font_color.as_ref(),
                DEFAULT_FONT_COLOR.to_string(),
            ),
            background_color: element.background_color.clone(),
            hover_color: element.hover_color.clone(),
            border_radius: resolve(element.border_radius.as_ref(), radius_layer, 0.0),
            text_align: resolve(element.text_align.as_ref(), align_layer, TextAlign::Center),
            overflow: element.overflow.unwrap_or_default(),
            clip: element.clip.unwrap_or(false),
            scroll_y: element.scroll_y.unwrap_or(0.0),
            max_scroll: element.max_scroll,
        };
        style.validate(name)?;
        Ok(style)
    }

    /// Font description for the drawing backend.
    pub fn font(&self) -> FontSpec {
        FontSpec {
            size: self.font_size,
            family: self.font_family.clone(),
        }
    }

    /// Line advance for wrapped text.
    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let invalid = |attribute: &'static str, value: f32| ConfigError::InvalidAttribute {
            element: name.to_string(),
            attribute,
            value,
        };
        if !self.position.x.is_finite() {
            return Err(invalid("position.x", self.position.x));
        }
        if !self.position.y.is_finite() {
            return Err(invalid("position.y", self.position.y));
        }
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(invalid("width", self.width));
        }
        if let Some(height) = self.explicit_height {
            if !height.is_finite() || height < 0.0 {
                return Err(invalid("height", height));
            }
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(invalid("padding", self.padding));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(invalid("fontSize", self.font_size));
        }
        if !self.border_radius.is_finite() || self.border_radius < 0.0 {
            return Err(invalid("borderRadius", self.border_radius));
        }
        if !self.scroll_y.is_finite() {
            return Err(invalid("scrollY", self.scroll_y));
        }
        if let Some(max) = self.max_scroll {
            if !max.is_finite() {
                return Err(invalid("maxScroll", max));
            }
        }
        Ok(())
    }
}

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Font handed to text measurement and painting.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Size in pixels.
    pub size: f32,
    /// Family name.
    pub family: String,
}

impl FontSpec {
    /// CSS shorthand, e.g. `30px Arial`.
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> SurfaceSize {
        SurfaceSize::new(800.0, 600.0)
    }

    #[test]
    fn precedence_is_element_then_body_then_builtin() {
        assert_eq!(resolve(Some(&1), Some(&2), 3), 1);
        assert_eq!(resolve(None, Some(&2), 3), 2);
        assert_eq!(resolve::<i32>(None, None, 3), 3);
    }

    #[test]
    fn inherits_text_style_from_body() {
        let body = ElementConfig {
            padding: Some(20.0),
            font_size: Some(24.0),
            font_family: Some("Mono".into()),
            ..Default::default()
        };
        let element = ElementConfig {
            font_size: Some(40.0),
            ..Default::default()
        };
        let style = ResolvedStyle::resolve("e", &element, &body, surface(), None).expect("ok");
        assert_eq!(style.padding, 20.0);
        assert_eq!(style.font_size, 40.0);
        assert_eq!(style.font_family, "Mono");
        assert_eq!(style.font_color, DEFAULT_FONT_COLOR);
        assert_eq!(style.font().css(), "40px Mono");
    }

    #[test]
    fn geometry_defaults_to_surface_not_body() {
        let body = ElementConfig {
            width: Some(10.0),
            position: Some(Point::new(5.0, 5.0)),
            ..Default::default()
        };
        let style =
            ResolvedStyle::resolve("e", &ElementConfig::default(), &body, surface(), None)
                .expect("ok");
        assert_eq!(style.width, 800.0);
        assert_eq!(style.position, Point::ZERO);
        assert_eq!(style.explicit_height, None);
    }

    #[test]
    fn text_buttons_get_rounded_centered_defaults() {
        let body = ElementConfig {
            text_align: Some(TextAlign::Left),
            ..Default::default()
        };
        let button = ElementConfig::new(ElementKind::Button, 0.0, 0.0);
        let text = Content::from("Go");
        let style = ResolvedStyle::resolve("b", &button, &body, surface(), Some(&text)).expect("ok");
        assert_eq!(style.border_radius, BUTTON_BORDER_RADIUS);
        assert_eq!(style.text_align, TextAlign::Center);

        let path = Content::from("<path>M0 0 L1 1</path>");
        let style = ResolvedStyle::resolve("b", &button, &body, surface(), Some(&path)).expect("ok");
        assert_eq!(style.border_radius, 0.0);
        assert_eq!(style.text_align, TextAlign::Left);
    }

    #[test]
    fn rejects_non_positive_font_size() {
        let element = ElementConfig {
            font_size: Some(0.0),
            ..Default::default()
        };
        let err = ResolvedStyle::resolve("title", &element, &ElementConfig::default(), surface(), None)
            .unwrap_err();
        assert!(err.to_string().contains("title"));
        assert!(err.to_string().contains("fontSize"));
    }
}
