use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::capture::camera::EncodedImage;
use crate::foundation::error::{BoothError, BoothResult};

/// Destination for exported rasters.
pub trait FileSave {
    /// Persist `data_uri` under `file_name`.
    fn save(&mut self, data_uri: &str, file_name: &str) -> BoothResult<()>;
}

impl<S: FileSave + ?Sized> FileSave for &mut S {
    fn save(&mut self, data_uri: &str, file_name: &str) -> BoothResult<()> {
        (**self).save(data_uri, file_name)
    }
}

/// Writes decoded data URIs into a directory, overwriting same-named files.
#[derive(Clone, Debug)]
pub struct DirSave {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirSave {
    /// Save into `dir`, creating it on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FileSave for DirSave {
    fn save(&mut self, data_uri: &str, file_name: &str) -> BoothResult<()> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(BoothError::export(format!(
                "refusing to save to '{file_name}': not a plain file name"
            )));
        }
        let payload = EncodedImage::from_data_uri(data_uri)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create export dir '{}'", self.dir.display()))?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, payload.bytes.as_slice())
            .with_context(|| format!("write export '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = payload.bytes.len(), "export saved");
        self.written.push(path);
        Ok(())
    }
}

/// One save recorded by [`MemorySave`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedFile {
    /// Requested file name.
    pub file_name: String,
    /// Full data URI.
    pub data_uri: String,
}

/// In-memory save target for tests and debugging.
#[derive(Debug, Default)]
pub struct MemorySave {
    saved: Vec<SavedFile>,
}

impl MemorySave {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves in call order.
    pub fn saved(&self) -> &[SavedFile] {
        &self.saved
    }
}

impl FileSave for MemorySave {
    fn save(&mut self, data_uri: &str, file_name: &str) -> BoothResult<()> {
        self.saved.push(SavedFile {
            file_name: file_name.to_string(),
            data_uri: data_uri.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/save.rs"]
mod tests;
