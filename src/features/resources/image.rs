//! Images travel inline as base64 text and are stored inside the document.
//!
//! Content type, filename and size are taken from the client as-is; nothing
//! here decodes the payload or checks that the metadata matches it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

/// Image embedded in a stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// Base64 (or data-URL) encoded image bytes
    pub data: String,
    pub content_type: String,
    pub filename: String,
    #[serde(default)]
    pub size: i64,
}

impl StoredImage {
    /// For nested image objects (e.g. a payment screenshot)
    pub fn validated(self, label: &str) -> Result<Self> {
        if self.data.trim().is_empty()
            || self.content_type.trim().is_empty()
            || self.filename.trim().is_empty()
        {
            return Err(AppError::Validation(format!(
                "{} must include image data, content type and filename",
                label
            )));
        }
        Ok(Self {
            content_type: self.content_type.trim().to_string(),
            filename: self.filename.trim().to_string(),
            ..self
        })
    }
}

/// Flat image fields as they appear on create/update bodies:
/// `imageData`, `contentType`, `filename`, `size`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageFields {
    pub image_data: Option<String>,
    pub content_type: Option<String>,
    pub filename: Option<String>,
    pub size: Option<i64>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl ImageFields {
    /// Data, content type and filename come together or not at all
    pub fn into_image(self) -> Result<Option<StoredImage>> {
        let parts = [
            present(&self.image_data),
            present(&self.content_type),
            present(&self.filename),
        ];

        if parts.iter().all(|p| !p) {
            return Ok(None);
        }
        if !parts.iter().all(|p| *p) {
            return Err(AppError::Validation(
                "Image data, content type and filename must be provided together".to_string(),
            ));
        }

        Ok(Some(StoredImage {
            data: self.image_data.unwrap_or_default(),
            content_type: self.content_type.unwrap_or_default().trim().to_string(),
            filename: self.filename.unwrap_or_default().trim().to_string(),
            size: self.size.unwrap_or(0),
        }))
    }

    /// Same as [`into_image`](Self::into_image) but an image must be present
    pub fn into_required_image(self, label: &str) -> Result<StoredImage> {
        self.into_image()?
            .ok_or_else(|| AppError::Validation(format!("{} image is required", label)))
    }
}
