use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use image::{Rgb, RgbImage};

use photoresizer_core::config::ResizerConfig;
use photoresizer_core::error::{ResizerError, Result};
use photoresizer_core::io::gallery::DirectoryStore;
use photoresizer_core::io::probe::HeaderProber;
use photoresizer_core::session::Services;
use photoresizer_core::transcode::{CancelToken, TranscodeRequest, Transcoder};

/// Write a small gradient image; the format follows the file extension.
pub fn write_test_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path).unwrap();
}

/// Stands in for ffmpeg by drawing an image of the requested size.
#[derive(Default)]
pub struct RenderingTranscoder {
    pub requests: Mutex<Vec<TranscodeRequest>>,
}

impl RenderingTranscoder {
    pub fn requests(&self) -> Vec<TranscodeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transcoder for RenderingTranscoder {
    fn transcode(&self, request: &TranscodeRequest, cancel: &CancelToken) -> Result<PathBuf> {
        if cancel.is_cancelled() {
            return Err(ResizerError::Cancelled);
        }
        self.requests.lock().unwrap().push(request.clone());
        write_test_image(&request.output, request.width, request.height);
        Ok(request.output.clone())
    }
}

/// Always exits with a failure status.
pub struct FailingTranscoder {
    pub diagnostics: String,
}

impl Transcoder for FailingTranscoder {
    fn transcode(&self, _request: &TranscodeRequest, _cancel: &CancelToken) -> Result<PathBuf> {
        Err(ResizerError::Transcode {
            code: Some(1),
            diagnostics: self.diagnostics.clone(),
        })
    }
}

/// Holds every transcode until `release` is called or the job is cancelled.
#[derive(Default)]
pub struct GatedTranscoder {
    pub inner: RenderingTranscoder,
    released: AtomicBool,
    pub cancelled: AtomicBool,
}

impl GatedTranscoder {
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

impl Transcoder for GatedTranscoder {
    fn transcode(&self, request: &TranscodeRequest, cancel: &CancelToken) -> Result<PathBuf> {
        while !self.released.load(Ordering::SeqCst) {
            if cancel.is_cancelled() {
                self.cancelled.store(true, Ordering::SeqCst);
                return Err(ResizerError::Cancelled);
            }
            thread::sleep(Duration::from_millis(5));
        }
        self.inner.transcode(request, cancel)
    }
}

pub fn test_config(dir: &Path) -> ResizerConfig {
    ResizerConfig {
        scratch_dir: dir.join("scratch"),
        gallery_dir: dir.join("gallery"),
        ..ResizerConfig::default()
    }
}

/// Real prober and gallery rooted in `dir`, with the given transcoder.
pub fn services(dir: &Path, transcoder: Arc<dyn Transcoder>) -> Services {
    let config = test_config(dir);
    Services {
        prober: Arc::new(HeaderProber),
        transcoder,
        store: Arc::new(DirectoryStore::new(config.album_dir())),
        config,
    }
}
