//! Declarative panel description: element configs, the body defaults record,
//! and the content payloads joined to them by name.
//!
//! The JSON form is a flat object: optional `width`/`height` for the surface,
//! a required `body` entry, and one entry per named element. Attribute
//! presence is meaningful (an absent `height` on a text element means "freeze
//! from content"), so absent attributes stay absent on serialization.
//!
//! Two legacy spellings are accepted on input and written back in canonical
//! form: `"hover"` becomes `"hoverColor"` and the kind `"img"` becomes
//! `"image"`. Attributes the model does not know are kept verbatim in
//! [`ElementConfig::extra`] and written back unchanged.

use canvasui_core::{Point, SurfaceSize};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::ConfigError;

/// Surface width used when the panel config omits one.
pub const DEFAULT_SURFACE_WIDTH: f32 = 800.0;
/// Surface height used when the panel config omits one.
pub const DEFAULT_SURFACE_HEIGHT: f32 = 600.0;

/// What an element paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    /// Wrapped text block.
    Text,
    /// Text block with hover colour and click affordance.
    Button,
    /// Decoded image scaled to the element width.
    #[serde(alias = "img")]
    Image,
    /// Filled polygon.
    Shape,
    /// Text entry field (painted like text).
    InputText,
}

impl ElementKind {
    /// Whether this kind paints its content as wrapped text.
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::Button | Self::InputText)
    }
}

/// Horizontal text alignment inside an element box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Anchor at `x + padding`.
    Left,
    /// Anchor at the box centre.
    #[default]
    Center,
    /// Right edge at `x + width - padding`.
    Right,
}

/// Whether an element takes part in rendering and hit testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    /// Rendered and hit-testable.
    #[default]
    Block,
    /// Skipped by render and hit test.
    None,
}

/// Overflow behaviour for content taller than the box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Content is painted as-is.
    #[default]
    None,
    /// Content is offset by `scrollY`, which pointer drags adjust.
    Scroll,
}

/// Attributes for one named element (or the `body` defaults record).
///
/// Every attribute is optional; see [`crate::resolve`] for the precedence rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ElementKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, alias = "hover", skip_serializing_if = "Option::is_none")]
    pub hover_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<bool>,
    /// Current scroll offset, written by pointer drags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_y: Option<f32>,
    /// Explicit scroll limit; derived from content height when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_scroll: Option<f32>,
    /// Authored attributes with no meaning to layout, kept for round trips.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl ElementConfig {
    /// Shorthand for a positioned element of `kind`.
    pub fn new(kind: ElementKind, x: f32, y: f32) -> Self {
        Self {
            kind: Some(kind),
            position: Some(Point::new(x, y)),
            ..Default::default()
        }
    }

    /// Builder: set the box size.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Builder: set only the width, leaving height to be derived.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Builder: set the scroll behaviour.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = Some(overflow);
        self
    }

    /// Whether display is anything other than `none`.
    pub fn is_displayed(&self) -> bool {
        self.display.unwrap_or_default() != Display::None
    }

    /// Whether pointer drags scroll this element.
    pub fn scrolls(&self) -> bool {
        self.overflow.unwrap_or_default() == Overflow::Scroll
    }
}

/// The whole authoring-facing panel description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Surface width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Surface height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Defaults record every element inherits from.
    pub body: ElementConfig,
    /// Named elements in declaration order.
    #[serde(flatten)]
    pub elements: IndexMap<String, ElementConfig>,
}

impl PanelConfig {
    /// Empty panel with the given body record.
    pub fn new(body: ElementConfig) -> Self {
        Self {
            body,
            ..Default::default()
        }
    }

    /// Builder: fix the surface size.
    pub fn with_surface(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Builder: append a named element.
    pub fn with_element(mut self, name: impl Into<String>, element: ElementConfig) -> Self {
        self.elements.insert(name.into(), element);
        self
    }

    /// Effective surface size (800x600 unless configured).
    pub fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::new(
            self.width.unwrap_or(DEFAULT_SURFACE_WIDTH),
            self.height.unwrap_or(DEFAULT_SURFACE_HEIGHT),
        )
    }

    /// Config used to lay out `name`: its own entry, else the body record.
    pub fn config_for(&self, name: &str) -> &ElementConfig {
        self.elements.get(name).unwrap_or(&self.body)
    }

    /// Parse from the JSON authoring format.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serialize to pretty JSON, keeping declaration order.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a panel file from disk.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

/// Polygon payload for shape elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Vertices relative to the element position, in paint order.
    pub points: Vec<Point>,
    /// Fill colour.
    pub fill: String,
}

/// Displayable payload joined to an element by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Text for text/button elements, or the image source for image elements.
    Text(String),
    /// Polygon for shape elements.
    Shape(Shape),
}

impl Content {
    /// Text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Shape(_) => None,
        }
    }

    /// Path data when the text payload is wrapped in `<path>...</path>`.
    ///
    /// The tag is matched case-insensitively and the data is upper-cased.
    pub fn vector_path(&self) -> Option<String> {
        let text = self.as_text()?;
        let head = text.get(..6)?;
        if !head.eq_ignore_ascii_case("<path>") {
            return None;
        }
        let body = &text[6..];
        let body = match body.len().checked_sub(7) {
            Some(cut)
                if body
                    .get(cut..)
                    .is_some_and(|tail| tail.eq_ignore_ascii_case("</path>")) =>
            {
                &body[..cut]
            }
            _ => body,
        };
        Some(body.to_ascii_uppercase())
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<Shape> for Content {
    fn from(shape: Shape) -> Self {
        Content::Shape(shape)
    }
}

/// Content payloads in paint order.
pub type ContentMap = IndexMap<String, Content>;

/// Parse a content file (`{ "name": payload, ... }`).
pub fn content_from_json_str(input: &str) -> Result<ContentMap, ConfigError> {
    Ok(serde_json::from_str(input)?)
}
