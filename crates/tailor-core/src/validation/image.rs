use std::path::Path;

/// Validation errors for uploaded images
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please upload an image file.")]
    InvalidFileType { content_type: String },

    #[error("The selected file is empty.")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },
}

/// Image upload validator
///
/// Both the file picker and the camera capture path go through the same checks.
#[derive(Debug, Clone)]
pub struct ImageValidator {
    max_file_size: usize,
}

impl ImageValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate that the media type is an image type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.trim().to_lowercase();

        if !normalized.starts_with("image/") {
            return Err(ValidationError::InvalidFileType {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Resolve the media type of an upload and validate it.
    ///
    /// A declared type wins; otherwise the type is sniffed from the bytes.
    /// Returns the normalized media type.
    pub fn validate_all(
        &self,
        declared_content_type: Option<&str>,
        data: &[u8],
    ) -> Result<String, ValidationError> {
        let content_type = match declared_content_type.map(str::trim) {
            Some(ct) if !ct.is_empty() => ct.to_lowercase(),
            _ => detect_media_type(data)
                .map(str::to_string)
                .ok_or_else(|| ValidationError::InvalidFileType {
                    content_type: "unknown".to_string(),
                })?,
        };

        self.validate_content_type(&content_type)?;
        self.validate_file_size(data.len())?;

        Ok(content_type)
    }
}

/// Detect an image media type from magic numbers
pub fn detect_media_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47
    if data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47 {
        return Some("image/png");
    }

    // GIF: 47 49 46
    if data[0] == 0x47 && data[1] == 0x49 && data[2] == 0x46 {
        return Some("image/gif");
    }

    // WebP: RIFF ... WEBP
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    None
}

/// Guess a media type from a file extension
pub fn media_type_from_extension(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())?;

    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        "mp4" => Some("video/mp4"),
        _ => None,
    }
}
