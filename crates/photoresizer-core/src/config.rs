use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_NAME_SUFFIX, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PREVIEW_QUALITY, DEFAULT_TOOL,
};

/// Runtime settings for a resize session. Every field has a default, so a
/// config file only needs the keys it wants to change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizerConfig {
    /// Transcoder executable, either a path or a name looked up in `PATH`.
    pub tool: PathBuf,
    /// User-scale quality used for preview renders.
    pub preview_quality: u8,
    /// Where previews and not-yet-saved final renders are written.
    pub scratch_dir: PathBuf,
    /// Root of the shared picture store.
    pub gallery_dir: PathBuf,
    /// Album inside the gallery; empty means the gallery root.
    pub album: String,
    /// Appended to the source stem when naming saved pictures.
    pub name_suffix: String,
    pub poll_interval_ms: u64,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            tool: PathBuf::from(DEFAULT_TOOL),
            preview_quality: DEFAULT_PREVIEW_QUALITY,
            scratch_dir: std::env::temp_dir().join("photoresizer"),
            gallery_dir: PathBuf::from("Pictures"),
            album: String::new(),
            name_suffix: DEFAULT_NAME_SUFFIX.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ResizerConfig {
    /// Directory saved pictures land in.
    pub fn album_dir(&self) -> PathBuf {
        if self.album.is_empty() {
            self.gallery_dir.clone()
        } else {
            self.gallery_dir.join(&self.album)
        }
    }
}
