//! Local fakes for unit tests. Integration tests use `canvasui-testkit` instead.

use std::collections::VecDeque;
use std::sync::Arc;

use canvasui_assets::{AssetLoadError, AssetLoader, ImageAsset, LoadedAsset};
use canvasui_core::{Point, Rect};

use crate::backend::{DrawingBackend, TextAnchor, TextMeasurer};
use crate::layout::PathCommand;
use crate::resolve::FontSpec;

/// Width = chars * size / 2.
pub(crate) struct HalfEm;

impl TextMeasurer for HalfEm {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size * 0.5
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    Clip(Option<Rect>),
    Clear(Rect),
    Fill(Rect, String),
    Stroke(Rect, String),
    Path(usize, String),
    Text(String, f32, f32, TextAnchor),
    Image(String, Rect),
    Svg(String, Point),
}

/// Records every primitive it is asked to paint.
pub(crate) struct Recorder {
    pub ready: bool,
    pub ops: Vec<Op>,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            ready: true,
            ops: Vec::new(),
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(text, ..) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasurer for Recorder {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        HalfEm.measure_text(text, font)
    }
}

impl DrawingBackend for Recorder {
    fn surface_ready(&self) -> bool {
        self.ready
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.ops.push(Op::Clip(clip));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(Op::Clear(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ops.push(Op::Fill(rect, color.to_string()));
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, _line_width: f32) {
        self.ops.push(Op::Stroke(rect, color.to_string()));
    }

    fn fill_path(&mut self, path: &[PathCommand], color: &str) {
        self.ops.push(Op::Path(path.len(), color.to_string()));
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        anchor: TextAnchor,
        _font: &FontSpec,
        _color: &str,
    ) {
        self.ops.push(Op::Text(text.to_string(), x, y, anchor));
    }

    fn draw_image(&mut self, image: &ImageAsset, rect: Rect) {
        self.ops.push(Op::Image(image.source.clone(), rect));
    }

    fn fill_svg_path(&mut self, data: &str, origin: Point, _color: &str) {
        self.ops.push(Op::Svg(data.to_string(), origin));
    }
}

/// Loader whose completions are queued by the test.
#[derive(Default)]
pub(crate) struct QueueLoader {
    pub requested: Vec<(String, String)>,
    pub ready: VecDeque<LoadedAsset>,
}

impl QueueLoader {
    pub fn complete(&mut self, key: &str, source: &str, width: u32, height: u32) {
        self.ready.push_back(LoadedAsset {
            key: key.to_string(),
            source: source.to_string(),
            result: Ok(Arc::new(ImageAsset {
                source: source.to_string(),
                width,
                height,
                rgba: vec![0; (width * height * 4) as usize],
            })),
        });
    }

    pub fn fail(&mut self, key: &str, source: &str) {
        self.ready.push_back(LoadedAsset {
            key: key.to_string(),
            source: source.to_string(),
            result: Err(AssetLoadError::Empty(source.to_string())),
        });
    }
}

impl AssetLoader for QueueLoader {
    fn request(&mut self, key: &str, source: &str) {
        self.requested.push((key.to_string(), source.to_string()));
    }

    fn poll(&mut self) -> Vec<LoadedAsset> {
        self.ready.drain(..).collect()
    }
}

/// Handle the test keeps while the panel owns the loader.
#[derive(Clone, Default)]
pub(crate) struct SharedLoader(pub std::rc::Rc<std::cell::RefCell<QueueLoader>>);

impl AssetLoader for SharedLoader {
    fn request(&mut self, key: &str, source: &str) {
        self.0.borrow_mut().request(key, source);
    }

    fn poll(&mut self) -> Vec<LoadedAsset> {
        self.0.borrow_mut().poll()
    }
}
