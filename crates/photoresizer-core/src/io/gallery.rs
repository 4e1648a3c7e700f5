//! Persisting finished renders into the shared picture store.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{ResizerError, Result};
use crate::format::OutputFormat;
use crate::state::ImageSource;

/// A picture written to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryEntry {
    pub source: ImageSource,
    pub display_name: String,
    pub mime_type: &'static str,
}

/// Shared picture storage addressed by display name.
pub trait MediaStore: Send + Sync {
    /// Whether an entry with exactly this display name already exists.
    fn contains(&self, display_name: &str) -> bool;

    /// Create a new, empty entry and return its handle plus a writer for its
    /// bytes. Fails if the name is already taken.
    fn insert(
        &self,
        display_name: &str,
        mime_type: &str,
    ) -> Result<(ImageSource, Box<dyn Write + Send>)>;
}

/// Media store backed by a plain directory (one album).
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaStore for DirectoryStore {
    fn contains(&self, display_name: &str) -> bool {
        self.root.join(display_name).exists()
    }

    fn insert(
        &self,
        display_name: &str,
        mime_type: &str,
    ) -> Result<(ImageSource, Box<dyn Write + Send>)> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(display_name);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => {
                    ResizerError::Gallery(format!("{display_name} already exists"))
                }
                _ => ResizerError::Io(e),
            })?;
        info!(path = %path.display(), mime_type, "Gallery entry created");
        Ok((ImageSource::new(path), Box::new(BufWriter::new(file))))
    }
}

/// First free name among `base.ext`, `base_1.ext`, `base_2.ext`, ...
pub fn unique_name(base: &str, extension: &str, mut exists: impl FnMut(&str) -> bool) -> String {
    let mut name = format!("{base}.{extension}");
    let mut index = 1u32;
    while exists(&name) {
        name = format!("{base}_{index}.{extension}");
        index += 1;
    }
    name
}

/// Copy `temp_output` into a new store entry named after `base_name`.
///
/// The temporary file is removed only once the copy has succeeded; on
/// failure it is left where it is.
pub fn persist(
    store: &dyn MediaStore,
    temp_output: &Path,
    base_name: &str,
    format: OutputFormat,
) -> Result<GalleryEntry> {
    let display_name = unique_name(base_name, format.extension(), |name| store.contains(name));
    let mut reader = File::open(temp_output)?;
    let (source, mut writer) = store.insert(&display_name, format.mime_type())?;

    let copied = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    drop(writer);
    drop(reader);

    if let Err(e) = fs::remove_file(temp_output) {
        warn!(path = %temp_output.display(), error = %e, "Could not remove temporary output");
    }
    info!(name = %display_name, bytes = copied, "Image saved to gallery");

    Ok(GalleryEntry {
        source,
        display_name,
        mime_type: format.mime_type(),
    })
}
