//! Asset loader whose completions are driven by the test.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use canvasui_assets::{AssetLoadError, AssetLoader, ImageAsset, LoadedAsset};

#[derive(Debug, Default)]
struct Queue {
    requested: Vec<(String, String)>,
    completed: VecDeque<LoadedAsset>,
}

/// Records requests and hands back only what the test completes.
///
/// Clones share one queue, so a test can keep a handle after boxing the
/// loader into a panel.
#[derive(Debug, Clone, Default)]
pub struct ManualAssetLoader {
    queue: Rc<RefCell<Queue>>,
}

impl ManualAssetLoader {
    /// Empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(key, source)` requested so far.
    pub fn requested(&self) -> Vec<(String, String)> {
        self.queue.borrow().requested.clone()
    }

    /// Finish a load with a blank `width` x `height` image.
    pub fn complete(&self, key: &str, source: &str, width: u32, height: u32) {
        let image = ImageAsset {
            source: source.to_string(),
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
        };
        self.push(key, source, Ok(Arc::new(image)));
    }

    /// Finish a load with a decode failure.
    pub fn fail(&self, key: &str, source: &str) {
        self.push(key, source, Err(AssetLoadError::Empty(source.to_string())));
    }

    fn push(&self, key: &str, source: &str, result: Result<Arc<ImageAsset>, AssetLoadError>) {
        self.queue.borrow_mut().completed.push_back(LoadedAsset {
            key: key.to_string(),
            source: source.to_string(),
            result,
        });
    }
}

impl AssetLoader for ManualAssetLoader {
    fn request(&mut self, key: &str, source: &str) {
        tracing::debug!(key, source, "manual load requested");
        self.queue
            .borrow_mut()
            .requested
            .push((key.to_string(), source.to_string()));
    }

    fn poll(&mut self) -> Vec<LoadedAsset> {
        self.queue.borrow_mut().completed.drain(..).collect()
    }
}
