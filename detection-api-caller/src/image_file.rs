use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ImageFileError {
    #[error("Could not read file `{0}`: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("File `{0}` is not a supported image")]
    NotAnImage(PathBuf),
}

/// An image selected for upload, held in memory
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: bytes::Bytes,
    pub mime_type: &'static str,
}

impl ImageFile {
    /// Accepts only content the `image` crate recognizes; the file extension is ignored
    pub fn from_bytes(
        file_name: impl Into<String>,
        bytes: impl Into<bytes::Bytes>,
    ) -> Option<Self> {
        let bytes = bytes.into();
        let format = image::guess_format(&bytes).ok()?;
        Some(Self {
            file_name: file_name.into(),
            bytes,
            mime_type: format.to_mime_type(),
        })
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ImageFileError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ImageFileError::Read(path.to_path_buf(), e))?;

        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

        let result = Self::from_bytes(file_name, data)
            .ok_or_else(|| ImageFileError::NotAnImage(path.to_path_buf()))?;

        tracing::debug!(
            "Loaded image `{}` ({}, {} bytes)",
            path.display(),
            result.mime_type,
            result.bytes.len()
        );

        Ok(result)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
