use std::fs::File;
use std::io;
use std::path::Path;

use image::ImageReader;
use tracing::debug;

use crate::error::Result;
use crate::state::ImageSource;

/// Header-level metadata of an image. Zero means "unknown", never "empty".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub byte_size: u64,
}

impl ImageInfo {
    pub fn known_width(&self) -> Option<u32> {
        (self.width > 0).then_some(self.width)
    }

    pub fn known_height(&self) -> Option<u32> {
        (self.height > 0).then_some(self.height)
    }

    pub fn known_size(&self) -> Option<u64> {
        (self.byte_size > 0).then_some(self.byte_size)
    }
}

/// Reads image metadata without decoding pixel data.
pub trait Prober: Send + Sync {
    /// Never fails: anything that cannot be read comes back as zero.
    fn probe(&self, source: &ImageSource) -> ImageInfo;
}

/// Prober backed by the `image` crate's header decoders.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeaderProber;

impl Prober for HeaderProber {
    fn probe(&self, source: &ImageSource) -> ImageInfo {
        probe_image(source.path())
    }
}

/// Read dimensions from the image header and the byte length of `path`.
pub fn probe_image(path: &Path) -> ImageInfo {
    let byte_size = match byte_length(path) {
        Ok(len) => len,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Could not measure image size");
            0
        }
    };
    let (width, height) = match read_dimensions(path) {
        Ok(dims) => dims,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Could not read image header");
            (0, 0)
        }
    };
    ImageInfo {
        width,
        height,
        byte_size,
    }
}

fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    let dims = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(dims)
}

/// Declared length for regular files, otherwise count the bytes.
fn byte_length(path: &Path) -> io::Result<u64> {
    let meta = std::fs::metadata(path)?;
    if meta.is_file() {
        return Ok(meta.len());
    }
    let mut file = File::open(path)?;
    io::copy(&mut file, &mut io::sink())
}
