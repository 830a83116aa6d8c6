//! Preview image naming and content types.

use prompt_primitives::PromptIndex;

use crate::{StoreError, StoreResult};

/// Accepted preview image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// `.jpg` / `.jpeg`
    Jpeg,
    /// `.png`
    Png,
    /// `.webp`
    Webp,
}

impl ImageKind {
    /// Resolves a (case-insensitive) file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// MIME type served for this format.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

/// Content type for a stored filename; unknown extensions are served as JPEG.
#[must_use]
pub fn content_type_for(filename: &str) -> &'static str {
    extension(filename)
        .and_then(ImageKind::from_extension)
        .map_or(ImageKind::Jpeg.content_type(), ImageKind::content_type)
}

/// Derives the stored filename `prompt_{index}.{ext}` for an upload.
///
/// # Errors
///
/// Returns [`StoreError::InvalidImage`] when the uploaded name has no
/// supported extension.
pub fn stored_name(index: PromptIndex, uploaded_name: &str) -> StoreResult<String> {
    let ext = extension(uploaded_name)
        .filter(|ext| ImageKind::from_extension(ext).is_some())
        .ok_or_else(|| StoreError::invalid_image("Invalid file type"))?;
    Ok(format!("prompt_{index}.{}", ext.to_ascii_lowercase()))
}

/// Accepts only plain `[A-Za-z0-9._-]` names that stay inside the image
/// directory and are safe both in a URL path and in a prompt line.
///
/// # Errors
///
/// Returns [`StoreError::InvalidImage`] for empty names, parent-directory
/// components, or any other character.
pub fn validate_filename(filename: &str) -> StoreResult<&str> {
    let name = filename.trim();
    if name.is_empty() {
        return Err(StoreError::invalid_image("Filename required"));
    }
    let plain = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !plain || name.starts_with('.') || name.contains("..") {
        return Err(StoreError::invalid_image(format!(
            "illegal image filename `{}`",
            name.escape_debug()
        )));
    }
    Ok(name)
}

fn extension(filename: &str) -> Option<&str> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}
