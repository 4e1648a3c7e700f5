//! Adapter around the external command-line transcoder.

mod cancel;
mod ffmpeg;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::consts::{EXTERNAL_QUALITY_BEST, EXTERNAL_QUALITY_WORST};
use crate::error::Result;
use crate::format::OutputFormat;

pub use cancel::CancelToken;
pub use ffmpeg::FfmpegTranscoder;

/// Runs one scale/re-encode of an image.
pub trait Transcoder: Send + Sync {
    /// Produce `request.output` and return its path.
    ///
    /// A non-zero exit is a `Transcode` error carrying the tool's
    /// diagnostics. Partial output is not cleaned up.
    fn transcode(&self, request: &TranscodeRequest, cancel: &CancelToken) -> Result<PathBuf>;
}

/// Everything needed to build one transcoder invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// User-facing 1-100 quality.
    pub quality: u8,
    pub format: OutputFormat,
}

impl TranscodeRequest {
    /// Fast low-quality render into `scratch_dir/<stem>_<w>x<h>.<ext>`.
    pub fn preview(
        input: &Path,
        scratch_dir: &Path,
        width: u32,
        height: u32,
        format: OutputFormat,
        preview_quality: u8,
    ) -> Self {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(crate::consts::FALLBACK_STEM);
        let output = scratch_dir.join(format!(
            "{stem}_{width}x{height}.{}",
            format.extension()
        ));
        Self {
            input: input.to_path_buf(),
            output,
            width,
            height,
            quality: preview_quality,
            format,
        }
    }

    /// Render at the caller's quality into an explicit destination.
    pub fn final_render(
        input: &Path,
        output: &Path,
        width: u32,
        height: u32,
        quality: u8,
        format: OutputFormat,
    ) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            width,
            height,
            quality,
            format,
        }
    }

    /// Arguments after the program name:
    /// `-y -i <input> -vf scale=<w>:<h> [-q:v <q>] <output>`.
    ///
    /// The quality flag is left out for lossless formats.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-i".into(),
            self.input.clone().into_os_string(),
            "-vf".into(),
            format!("scale={}:{}", self.width, self.height).into(),
        ];
        if !self.format.is_lossless() {
            args.push("-q:v".into());
            args.push(external_quality(self.quality as i32).to_string().into());
        }
        args.push(self.output.clone().into_os_string());
        args
    }
}

/// Map user quality (1-100, higher is better) onto the tool's inverted
/// 2-31 scale (lower is better).
pub fn external_quality(quality: i32) -> u8 {
    let raw = (31.0 - (quality as f64 / 100.0) * 29.0).round();
    raw.clamp(EXTERNAL_QUALITY_BEST as f64, EXTERNAL_QUALITY_WORST as f64) as u8
}
