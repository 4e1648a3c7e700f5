use std::path::{Path, PathBuf};

use crate::consts::{
    DEFAULT_QUALITY, DEFAULT_TARGET_HEIGHT, DEFAULT_TARGET_WIDTH, FALLBACK_STEM,
};
use crate::format::OutputFormat;

/// Opaque reference to image bytes on the local file system.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageSource(PathBuf);

impl ImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File stem used to derive output names, `image` when there is none.
    pub fn stem(&self) -> String {
        self.0
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_STEM)
            .to_string()
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self(path.to_path_buf())
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Complete snapshot of one editing screen.
///
/// Never mutated in place by the session: every transition builds a new
/// value and swaps it in whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditState {
    pub image_source: Option<ImageSource>,
    pub original_width: Option<u32>,
    pub original_height: Option<u32>,
    pub original_size: Option<u64>,

    /// Requested output size. Never larger than the original once known.
    pub target_width: u32,
    pub target_height: u32,
    /// 1-100, ignored for lossless formats.
    pub quality: u8,
    pub format: OutputFormat,

    pub is_processing: bool,

    pub compressed_source: Option<ImageSource>,
    pub compressed_width: Option<u32>,
    pub compressed_height: Option<u32>,
    pub compressed_size: Option<u64>,

    /// `original_size - compressed_size`; negative when the output grew.
    pub reduced_size: Option<i64>,
    /// Heuristic output size for the current settings.
    pub estimated_size: Option<u64>,

    pub error_message: Option<String>,
}

impl Default for EditState {
    fn default() -> Self {
        Self {
            image_source: None,
            original_width: None,
            original_height: None,
            original_size: None,
            target_width: DEFAULT_TARGET_WIDTH,
            target_height: DEFAULT_TARGET_HEIGHT,
            quality: DEFAULT_QUALITY,
            format: OutputFormat::default(),
            is_processing: false,
            compressed_source: None,
            compressed_width: None,
            compressed_height: None,
            compressed_size: None,
            reduced_size: None,
            estimated_size: None,
            error_message: None,
        }
    }
}
