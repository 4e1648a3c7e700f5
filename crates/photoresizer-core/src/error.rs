use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to start {}: {source}", program.display())]
    ToolLaunch {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Transcoder exited with status {code:?}: {diagnostics}")]
    Transcode {
        code: Option<i32>,
        diagnostics: String,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Gallery error: {0}")]
    Gallery(String),

    #[error("No image selected")]
    NoImageSelected,

    #[error("Nothing to save yet")]
    NoCompressedImage,

    #[error("Another transcode is already running")]
    Busy,

    #[error("Unsupported output format: {0}")]
    InvalidFormat(String),
}

impl ResizerError {
    /// Message shown to the user when this error ends a background operation.
    ///
    /// Transcoder failures keep the tool's own diagnostics; persistence
    /// failures collapse into a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transcode { diagnostics, .. } => {
                let diagnostics = diagnostics.trim();
                if diagnostics.is_empty() {
                    "FFmpeg failed".to_string()
                } else {
                    format!("FFmpeg failed: {diagnostics}")
                }
            }
            Self::Gallery(_) => "Failed to save image to gallery".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ResizerError>;
