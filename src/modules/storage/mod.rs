//! Document and administrator persistence.
//!
//! Every resource collection has the same physical shape: an id, a JSON body,
//! the `is_active` publish flag, audit references and timestamps. The
//! [`DocumentStore`] trait works on that shape only; typed documents are
//! (de)serialised one layer up in `features::resources`.
//!
//! Two backends implement both traits:
//! - [`PostgresStorage`]: JSONB table per collection, row locks for updates
//! - [`MemoryStorage`]: process-local maps behind async locks

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::admin::models::Admin;

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;

/// A persisted document with store-managed metadata
#[derive(Debug, Clone, FromRow)]
pub struct StoredDocument {
    pub id: Uuid,
    pub body: Value,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    /// Domain ordering key (e.g. award date); falls back to `created_at`
    pub sort_key: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Effective ordering timestamp used by listings
    pub fn ordering_key(&self) -> DateTime<Utc> {
        self.sort_key.unwrap_or(self.created_at)
    }
}

/// Input for inserting a document
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub body: Value,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub sort_key: Option<DateTime<Utc>>,
}

/// Simple predicate on a top-level string field of the JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    /// Case-insensitive substring match
    Contains { field: &'static str, value: String },
    /// Exact match
    Equals { field: &'static str, value: String },
}

impl FieldFilter {
    pub fn matches(&self, body: &Value) -> bool {
        match self {
            FieldFilter::Contains { field, value } => body
                .get(*field)
                .and_then(Value::as_str)
                .map(|s| s.to_lowercase().contains(&value.to_lowercase()))
                .unwrap_or(false),
            FieldFilter::Equals { field, value } => body
                .get(*field)
                .and_then(Value::as_str)
                .map(|s| s == value)
                .unwrap_or(false),
        }
    }
}

/// Listing parameters; results are ordered by ordering key, newest first
#[derive(Debug, Clone)]
pub struct DocumentQuery {
    pub active_only: bool,
    pub filters: Vec<FieldFilter>,
    pub offset: i64,
    pub limit: i64,
}

/// Mutation applied to a locked document before it is written back.
///
/// Returning an error aborts the write and leaves the stored document untouched.
pub type DocumentMutator = Box<dyn FnOnce(&mut StoredDocument) -> Result<()> + Send>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &'static str, new: NewDocument) -> Result<StoredDocument>;

    async fn find(&self, collection: &'static str, id: Uuid) -> Result<Option<StoredDocument>>;

    /// Returns the requested page and the total number of matches
    async fn list(
        &self,
        collection: &'static str,
        query: &DocumentQuery,
    ) -> Result<(Vec<StoredDocument>, i64)>;

    /// Atomic read-modify-write of one document; `None` when the id is unknown.
    /// `updated_at` is stamped by the store.
    async fn modify(
        &self,
        collection: &'static str,
        id: Uuid,
        mutator: DocumentMutator,
    ) -> Result<Option<StoredDocument>>;

    /// Hard delete; `false` when the id is unknown
    async fn delete(&self, collection: &'static str, id: Uuid) -> Result<bool>;
}

/// Input for the one-time administrator insert
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn count_admins(&self) -> Result<i64>;

    /// Insert the singleton administrator.
    ///
    /// Check and insert happen atomically: `Ok(None)` means an administrator
    /// already exists and nothing was written.
    async fn create_singleton(&self, new: NewAdmin) -> Result<Option<Admin>>;

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<Admin>>;

    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>>;

    /// Persist username, email, password hash and last login.
    /// Fails with `DuplicateKey` when the username belongs to another admin.
    async fn save_admin(&self, admin: &Admin) -> Result<Admin>;
}
