use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::storage::StoredDocument;

/// A typed document together with its store metadata, as returned over HTTP.
///
/// `isActive` is omitted for kinds that are never hidden from public reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource<D> {
    pub id: Uuid,
    #[serde(flatten)]
    pub data: D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<D: serde::de::DeserializeOwned> Resource<D> {
    pub fn from_stored(
        stored: StoredDocument,
        collection: &str,
        soft_delete: bool,
    ) -> Result<Self> {
        let data = serde_json::from_value(stored.body).map_err(|e| {
            AppError::Internal(format!(
                "Stored {} document {} is unreadable: {}",
                collection, stored.id, e
            ))
        })?;

        Ok(Self {
            id: stored.id,
            data,
            is_active: soft_delete.then_some(stored.is_active),
            created_by: stored.created_by,
            updated_by: stored.updated_by,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }
}

impl<D> Resource<D> {
    /// Swap the payload while keeping the metadata
    pub fn map<T>(self, f: impl FnOnce(D) -> T) -> Resource<T> {
        Resource {
            id: self.id,
            data: f(self.data),
            is_active: self.is_active,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
