use crate::format::OutputFormat;
use crate::state::ImageSource;

/// User-triggered commands accepted by the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Select a new source image and probe its metadata in the background.
    PickImage(ImageSource),
    SetWidth(u32),
    SetHeight(u32),
    /// Clamped to 1-100.
    SetQuality(u8),
    SetFormat(OutputFormat),
    /// Render a low-quality preview of `source` with the current settings.
    Compress(ImageSource),
    /// Render at full quality and persist the result to the gallery.
    SaveToPhoto,
    ClearError,
    /// Drop everything and return to the default snapshot.
    Reset,
}

impl Intent {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PickImage(_) => "pick_image",
            Self::SetWidth(_) => "set_width",
            Self::SetHeight(_) => "set_height",
            Self::SetQuality(_) => "set_quality",
            Self::SetFormat(_) => "set_format",
            Self::Compress(_) => "compress",
            Self::SaveToPhoto => "save_to_photo",
            Self::ClearError => "clear_error",
            Self::Reset => "reset",
        }
    }
}
