//! Paths of the prompt manager REST contract.

/// Lists every prompt record.
pub const PROMPTS: &str = "/prompt_manager/prompts";
/// Lists every known category.
pub const CATEGORIES: &str = "/prompt_manager/categories";
/// Creates a prompt record.
pub const ADD: &str = "/prompt_manager/add";
/// Replaces a prompt record.
pub const UPDATE: &str = "/prompt_manager/update";
/// Deletes a prompt record.
pub const DELETE: &str = "/prompt_manager/delete";
/// Replaces the whole prompt list.
pub const SAVE: &str = "/prompt_manager/save";
/// Registers a category.
pub const CATEGORY_ADD: &str = "/prompt_manager/categories/add";
/// Removes a category.
pub const CATEGORY_DELETE: &str = "/prompt_manager/categories/delete";
/// Multipart preview image upload.
pub const UPLOAD_IMAGE: &str = "/prompt_manager/upload_image";
/// Deletes a preview image.
pub const IMAGE_DELETE: &str = "/prompt_manager/image/delete";
/// Prefix under which preview images are served.
pub const IMAGE_PREFIX: &str = "/prompt_manager/image/";

/// Returns the URL path serving the named preview image.
#[must_use]
pub fn image_path(filename: &str) -> String {
    format!("{IMAGE_PREFIX}{filename}")
}
