use std::fmt::{Debug, Formatter, Result as FmtResult};

use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Where an upload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Generic file picker / drag and drop
    FilePicker,
    /// Device camera capture
    Camera,
}

/// Raw input handed to image acquisition, before validation
#[derive(Clone)]
pub struct ImageUpload {
    pub source: ImageSource,
    pub filename: String,
    /// Media type declared by the source, if any
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ImageUpload {
    pub fn new(
        source: ImageSource,
        filename: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            source,
            filename: filename.into(),
            content_type,
            data: data.into(),
        }
    }
}

impl Debug for ImageUpload {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ImageUpload")
            .field("source", &self.source)
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// An accepted user photo.
///
/// The preview is derived from the bytes when the image is accepted and never
/// changes independently of them.
#[derive(Clone, PartialEq, Eq)]
pub struct UserImage {
    filename: String,
    content_type: String,
    data: Bytes,
    preview: String,
}

impl UserImage {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        let content_type = content_type.into();
        let preview = data_uri(&content_type, &data);
        Self {
            filename: filename.into(),
            content_type,
            data,
            preview,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Displayable `data:` URI of the image
    pub fn preview(&self) -> &str {
        &self.preview
    }
}

impl Debug for UserImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UserImage")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Encode bytes as a `data:` URI
pub fn data_uri(content_type: &str, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}
