use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::{decode_image_bytes, AssetLoadError, AssetLoader, ImageHandle, LoadedAsset};

/// Loads images from disk on short-lived worker threads.
///
/// Completions are delivered over a channel. When the loader is dropped
/// before a worker finishes, the worker's send fails and the result is
/// discarded, so a torn-down panel is never mutated.
pub struct ThreadedImageLoader {
    root: PathBuf,
    tx: Sender<LoadedAsset>,
    rx: Receiver<LoadedAsset>,
    in_flight: usize,
}

impl ThreadedImageLoader {
    /// Resolve relative sources against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            root: root.into(),
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Number of requests that have not completed yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Block until every outstanding request has completed or `timeout`
    /// elapses, and return what arrived.
    ///
    /// A worker that panicked never reports, so its request stays in flight
    /// and the wait ends at the deadline.
    pub fn wait_all(&mut self, timeout: Duration) -> Vec<LoadedAsset> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::with_capacity(self.in_flight);
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(loaded) => {
                    self.in_flight -= 1;
                    done.push(loaded);
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        in_flight = self.in_flight,
                        "image loads still pending at deadline"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        done
    }
}

impl Default for ThreadedImageLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetLoader for ThreadedImageLoader {
    fn request(&mut self, key: &str, source: &str) {
        self.in_flight += 1;
        tracing::debug!(element = %key, source = %source, "image load requested");
        spawn_load(self.tx.clone(), self.root.join(source), key, source);
    }

    fn poll(&mut self) -> Vec<LoadedAsset> {
        let done: Vec<LoadedAsset> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }
}

/// Decode `path` on a worker thread. The handle yields whether the result
/// was delivered; it is not when the receiving loader has been dropped.
fn spawn_load(
    tx: Sender<LoadedAsset>,
    path: PathBuf,
    key: &str,
    source: &str,
) -> JoinHandle<bool> {
    let key = key.to_string();
    let source = source.to_string();
    thread::spawn(move || {
        let result = load_image_file(&path, &source);
        let delivered = tx
            .send(LoadedAsset {
                key,
                source,
                result,
            })
            .is_ok();
        if !delivered {
            tracing::debug!(path = %path.display(), "loader dropped; discarding image");
        }
        delivered
    })
}

fn load_image_file(path: &Path, source: &str) -> Result<ImageHandle, AssetLoadError> {
    let bytes = fs::read(path).map_err(|error| AssetLoadError::Io {
        source_path: source.to_string(),
        error,
    })?;
    let asset = decode_image_bytes(source, &bytes)?;
    Ok(ImageHandle::new(asset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::encoded_png;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "canvasui-loader-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn loads_image_from_root() {
        let dir = scratch_dir();
        fs::write(dir.join("logo.png"), encoded_png(8, 4)).expect("write png");

        let mut loader = ThreadedImageLoader::new(&dir);
        loader.request("logo", "logo.png");
        let done = loader.wait_all(Duration::from_secs(10));

        assert_eq!(done.len(), 1);
        assert_eq!(done[0].key, "logo");
        let image = done[0].result.as_ref().expect("decoded");
        assert_eq!((image.width, image.height), (8, 4));
        assert_eq!(loader.in_flight(), 0);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let mut loader = ThreadedImageLoader::new(scratch_dir());
        loader.request("hero", "missing.png");
        let done = loader.wait_all(Duration::from_secs(10));
        assert!(matches!(done[0].result, Err(AssetLoadError::Io { .. })));
    }

    #[test]
    fn result_is_discarded_once_the_loader_is_gone() {
        let dir = scratch_dir();
        fs::write(dir.join("late.png"), encoded_png(2, 2)).expect("write png");

        let (tx, rx) = mpsc::channel();
        drop(rx);
        let worker = spawn_load(tx, dir.join("late.png"), "late", "late.png");
        assert!(!worker.join().expect("worker finished"));
    }

    #[test]
    fn wait_gives_up_at_the_deadline() {
        let mut loader = ThreadedImageLoader::new(scratch_dir());
        // Simulate a worker that never reports back.
        loader.in_flight = 1;
        let done = loader.wait_all(Duration::from_millis(20));
        assert!(done.is_empty());
        assert_eq!(loader.in_flight(), 1);
    }
}
