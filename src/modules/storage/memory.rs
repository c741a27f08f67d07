use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{
    AdminStore, DocumentMutator, DocumentQuery, DocumentStore, NewAdmin, NewDocument,
    StoredDocument,
};
use crate::core::error::{AppError, Result};
use crate::features::admin::models::Admin;

type Collection = HashMap<Uuid, StoredDocument>;

/// Process-local storage backend.
///
/// State lives for the lifetime of the process. Each collection map sits
/// behind one lock, so read-modify-write of a document is serialised.
#[derive(Default)]
pub struct MemoryStorage {
    collections: RwLock<HashMap<&'static str, Collection>>,
    admins: Mutex<Vec<Admin>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorage").finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentStore for MemoryStorage {
    async fn insert(&self, collection: &'static str, new: NewDocument) -> Result<StoredDocument> {
        let now = Utc::now();
        let document = StoredDocument {
            id: Uuid::now_v7(),
            body: new.body,
            is_active: new.is_active,
            created_by: new.created_by,
            updated_by: None,
            sort_key: new.sort_key,
            created_at: now,
            updated_at: now,
        };

        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .insert(document.id, document.clone());

        Ok(document)
    }

    async fn find(&self, collection: &'static str, id: Uuid) -> Result<Option<StoredDocument>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned())
    }

    async fn list(
        &self,
        collection: &'static str,
        query: &DocumentQuery,
    ) -> Result<(Vec<StoredDocument>, i64)> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok((Vec::new(), 0));
        };

        let mut matches: Vec<&StoredDocument> = docs
            .values()
            .filter(|doc| !query.active_only || doc.is_active)
            .filter(|doc| query.filters.iter().all(|f| f.matches(&doc.body)))
            .collect();

        matches.sort_by(|a, b| {
            b.ordering_key()
                .cmp(&a.ordering_key())
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matches.len() as i64;
        let items = matches
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }

    async fn modify(
        &self,
        collection: &'static str,
        id: Uuid,
        mutator: DocumentMutator,
    ) -> Result<Option<StoredDocument>> {
        let mut collections = self.collections.write().await;
        let Some(slot) = collections.get_mut(collection).and_then(|docs| docs.get_mut(&id))
        else {
            return Ok(None);
        };

        // Mutate a copy so a rejected update leaves the stored document as it was
        let mut draft = slot.clone();
        mutator(&mut draft)?;
        draft.id = slot.id;
        draft.created_at = slot.created_at;
        draft.updated_at = Utc::now();
        *slot = draft;

        Ok(Some(slot.clone()))
    }

    async fn delete(&self, collection: &'static str, id: Uuid) -> Result<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .map(|docs| docs.remove(&id).is_some())
            .unwrap_or(false))
    }
}

#[async_trait]
impl AdminStore for MemoryStorage {
    async fn count_admins(&self) -> Result<i64> {
        Ok(self.admins.lock().await.len() as i64)
    }

    async fn create_singleton(&self, new: NewAdmin) -> Result<Option<Admin>> {
        let mut admins = self.admins.lock().await;
        if !admins.is_empty() {
            return Ok(None);
        }

        let now = Utc::now();
        let admin = Admin {
            id: Uuid::now_v7(),
            username: new.username,
            password_hash: new.password_hash,
            email: new.email,
            is_setup: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        admins.push(admin.clone());

        Ok(Some(admin))
    }

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<Admin>> {
        let admins = self.admins.lock().await;
        Ok(admins.iter().find(|a| a.id == id).cloned())
    }

    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let admins = self.admins.lock().await;
        Ok(admins.iter().find(|a| a.username == username).cloned())
    }

    async fn save_admin(&self, admin: &Admin) -> Result<Admin> {
        let mut admins = self.admins.lock().await;

        if admins
            .iter()
            .any(|a| a.id != admin.id && a.username == admin.username)
        {
            return Err(AppError::DuplicateKey("Username already exists".to_string()));
        }

        let slot = admins
            .iter_mut()
            .find(|a| a.id == admin.id)
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

        slot.username = admin.username.clone();
        slot.email = admin.email.clone();
        slot.password_hash = admin.password_hash.clone();
        slot.last_login = admin.last_login;
        slot.updated_at = Utc::now();

        Ok(slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::FieldFilter;
    use serde_json::json;
    use std::sync::Arc;

    fn new_doc(body: serde_json::Value, is_active: bool) -> NewDocument {
        NewDocument {
            body,
            is_active,
            created_by: None,
            sort_key: None,
        }
    }

    fn query(active_only: bool, offset: i64, limit: i64) -> DocumentQuery {
        DocumentQuery {
            active_only,
            filters: Vec::new(),
            offset,
            limit,
        }
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_paginates() {
        let store = MemoryStorage::new();
        for i in 0..25 {
            store
                .insert("announcements", new_doc(json!({ "message": i }), true))
                .await
                .unwrap();
        }

        let (page, total) = store.list("announcements", &query(true, 10, 10)).await.unwrap();
        assert_eq!(total, 25);
        assert_eq!(page.len(), 10);
        // Second page of a newest-first listing starts at the 15th insert
        assert_eq!(page[0].body["message"], 14);
    }

    #[tokio::test]
    async fn test_sort_key_overrides_creation_order() {
        let store = MemoryStorage::new();
        let older = Utc::now() - chrono::Duration::days(30);

        store
            .insert(
                "awards",
                NewDocument {
                    sort_key: Some(older),
                    ..new_doc(json!({ "name": "old" }), true)
                },
            )
            .await
            .unwrap();
        store
            .insert("awards", new_doc(json!({ "name": "new" }), true))
            .await
            .unwrap();
        store
            .insert(
                "awards",
                NewDocument {
                    sort_key: Some(older - chrono::Duration::days(1)),
                    ..new_doc(json!({ "name": "oldest" }), true)
                },
            )
            .await
            .unwrap();

        let (items, _) = store.list("awards", &query(false, 0, 10)).await.unwrap();
        let names: Vec<_> = items.iter().map(|d| d.body["name"].clone()).collect();
        assert_eq!(names, vec![json!("new"), json!("old"), json!("oldest")]);
    }

    #[tokio::test]
    async fn test_active_only_and_filters() {
        let store = MemoryStorage::new();
        store
            .insert("members", new_doc(json!({ "department": "Health" }), true))
            .await
            .unwrap();
        store
            .insert("members", new_doc(json!({ "department": "Water Supply" }), true))
            .await
            .unwrap();
        store
            .insert("members", new_doc(json!({ "department": "Health" }), false))
            .await
            .unwrap();

        let (_, all) = store.list("members", &query(false, 0, 10)).await.unwrap();
        assert_eq!(all, 3);

        let (_, active) = store.list("members", &query(true, 0, 10)).await.unwrap();
        assert_eq!(active, 2);

        let filtered = DocumentQuery {
            filters: vec![FieldFilter::Contains {
                field: "department",
                value: "health".to_string(),
            }],
            ..query(true, 0, 10)
        };
        let (items, total) = store.list("members", &filtered).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].body["department"], "Health");
    }

    #[tokio::test]
    async fn test_failed_mutator_leaves_document_untouched() {
        let store = MemoryStorage::new();
        let doc = store
            .insert("programs", new_doc(json!({ "name": "Before" }), true))
            .await
            .unwrap();

        let result = store
            .modify(
                "programs",
                doc.id,
                Box::new(|d| {
                    d.body["name"] = json!("After");
                    Err(AppError::Validation("nope".to_string()))
                }),
            )
            .await;
        assert!(result.is_err());

        let stored = store.find("programs", doc.id).await.unwrap().unwrap();
        assert_eq!(stored.body["name"], "Before");
    }

    #[tokio::test]
    async fn test_modify_and_delete_unknown_id() {
        let store = MemoryStorage::new();
        let missing = Uuid::now_v7();

        let modified = store
            .modify("programs", missing, Box::new(|_| Ok(())))
            .await
            .unwrap();
        assert!(modified.is_none());
        assert!(!store.delete("programs", missing).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_singleton_inserts_yield_one_admin() {
        let store = Arc::new(MemoryStorage::new());

        let attempts: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create_singleton(NewAdmin {
                            username: format!("admin{}", i),
                            password_hash: "hash".to_string(),
                            email: None,
                        })
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut created = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_some() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.count_admins().await.unwrap(), 1);
    }
}
