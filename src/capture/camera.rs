use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::foundation::error::{BoothError, BoothResult};

/// An encoded still (JPEG/PNG bytes) as produced by a camera source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// MIME type, e.g. `image/jpeg`.
    pub media_type: String,
    /// Encoded bytes.
    pub bytes: Arc<Vec<u8>>,
}

impl EncodedImage {
    /// Wrap encoded bytes.
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Read a still from disk, guessing the media type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> BoothResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read still '{}'", path.display()))?;
        Ok(Self::new(media_type_for(path), bytes))
    }

    /// `true` when the still carries no data.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Render as a `data:<type>;base64,<payload>` URI.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            BASE64_STANDARD.encode(self.bytes.as_slice())
        )
    }

    /// Parse a base64 `data:` URI.
    pub fn from_data_uri(uri: &str) -> BoothResult<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| BoothError::validation("data URI must start with 'data:'"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| BoothError::validation("data URI is missing ','"))?;
        let media_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| BoothError::validation("only base64 data URIs are supported"))?;
        let bytes = BASE64_STANDARD
            .decode(payload.trim())
            .context("decode data URI payload")?;
        Ok(Self::new(media_type, bytes))
    }
}

fn media_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Source of stills. Only one capture is ever in flight per source.
pub trait CameraSource {
    /// Grab the current frame. `None` means the device is not ready or not available.
    fn snapshot(&mut self) -> Option<EncodedImage>;
}

impl<C: CameraSource + ?Sized> CameraSource for Box<C> {
    fn snapshot(&mut self) -> Option<EncodedImage> {
        (**self).snapshot()
    }
}

/// Camera that returns the same still every time.
#[derive(Clone, Debug)]
pub struct StillCamera {
    still: EncodedImage,
    shots: usize,
}

impl StillCamera {
    /// Serve `still` for every snapshot.
    pub fn new(still: EncodedImage) -> Self {
        Self { still, shots: 0 }
    }

    /// Number of snapshots served so far.
    pub fn shots(&self) -> usize {
        self.shots
    }
}

impl CameraSource for StillCamera {
    fn snapshot(&mut self) -> Option<EncodedImage> {
        self.shots += 1;
        Some(self.still.clone())
    }
}

/// Camera that replays stills from a directory in file-name order, cycling when exhausted.
#[derive(Debug)]
pub struct DirectoryCamera {
    files: Vec<PathBuf>,
    next: usize,
}

impl DirectoryCamera {
    /// Index the image files in `dir`.
    pub fn open(dir: impl AsRef<Path>) -> BoothResult<Self> {
        let dir = dir.as_ref();
        let mut files = Vec::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("open camera directory '{}'", dir.display()))?;
        for entry in entries {
            let path = entry.context("read camera directory entry")?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| {
                    matches!(
                        e.to_ascii_lowercase().as_str(),
                        "jpg" | "jpeg" | "png" | "webp"
                    )
                });
            if is_image {
                files.push(path);
            }
        }
        files.sort();
        Ok(Self { files, next: 0 })
    }

    /// Number of stills available.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// `true` when the directory holds no stills.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl CameraSource for DirectoryCamera {
    fn snapshot(&mut self) -> Option<EncodedImage> {
        if self.files.is_empty() {
            return None;
        }
        let path = &self.files[self.next % self.files.len()];
        self.next += 1;
        match EncodedImage::from_path(path) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "camera still unreadable");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/camera.rs"]
mod tests;
