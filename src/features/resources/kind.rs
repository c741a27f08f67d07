use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::core::error::Result;
use crate::modules::storage::FieldFilter;

/// Who is changing a document, and when
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext {
    pub actor: Uuid,
    pub now: DateTime<Utc>,
}

/// A validated document ready to be inserted
#[derive(Debug, Clone)]
pub struct Draft<D> {
    pub document: D,
    pub is_active: bool,
}

impl<D> Draft<D> {
    /// New documents are published unless the payload says otherwise
    pub fn new(document: D, is_active: Option<bool>) -> Self {
        Self {
            document,
            is_active: is_active.unwrap_or(true),
        }
    }
}

/// Describes one content collection.
///
/// Every resource (announcements, awards, members...) is one implementation of
/// this trait plugged into the generic [`ResourceService`](super::ResourceService)
/// and handlers.
pub trait ResourceKind: Send + Sync + 'static {
    /// Storage collection name
    const COLLECTION: &'static str;
    /// Human-readable singular, used in messages ("Award not found")
    const LABEL: &'static str;
    /// Whether `isActive` hides documents from public reads
    const SOFT_DELETE: bool = true;

    type Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;
    type Create: DeserializeOwned + Send + 'static;
    type Update: DeserializeOwned + Send + 'static;
    type Filter: DeserializeOwned + Default + Send + Sync + 'static;

    /// Validate and normalise a create payload
    fn create(dto: Self::Create) -> Result<Draft<Self::Document>>;

    /// Apply a partial update in place. Runs under the store's document lock.
    fn apply_update(
        document: &mut Self::Document,
        is_active: &mut bool,
        dto: Self::Update,
        ctx: &UpdateContext,
    ) -> Result<()>;

    fn filters(_filter: &Self::Filter) -> Vec<FieldFilter> {
        Vec::new()
    }

    /// Ordering key when it differs from the creation time
    fn sort_key(_document: &Self::Document) -> Option<DateTime<Utc>> {
        None
    }

    fn created_message() -> String {
        format!("{} created successfully", Self::LABEL)
    }

    fn updated_message() -> String {
        format!("{} updated successfully", Self::LABEL)
    }

    fn deleted_message() -> String {
        format!("{} permanently deleted", Self::LABEL)
    }

    fn not_found_message() -> String {
        format!("{} not found", Self::LABEL)
    }
}

/// Query filter for kinds that have none
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NoFilter {}
