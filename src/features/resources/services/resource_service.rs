use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::resources::kind::{ResourceKind, UpdateContext};
use crate::features::resources::models::Resource;
use crate::modules::storage::{DocumentQuery, DocumentStore, NewDocument, StoredDocument};
use crate::shared::types::{Page, PaginationQuery};

/// Who is reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Anonymous callers: unpublished documents do not exist
    Public,
    /// Signed-in administrator: everything is visible
    Admin,
}

impl Visibility {
    pub fn for_caller(admin: Option<Uuid>) -> Self {
        if admin.is_some() {
            Visibility::Admin
        } else {
            Visibility::Public
        }
    }
}

/// CRUD over one resource kind
pub struct ResourceService<K: ResourceKind> {
    store: Arc<dyn DocumentStore>,
    upsert_lock: Mutex<()>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> ResourceService<K> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            upsert_lock: Mutex::new(()),
            _kind: PhantomData,
        }
    }

    fn hides_inactive(visibility: Visibility) -> bool {
        K::SOFT_DELETE && visibility == Visibility::Public
    }

    fn to_resource(stored: StoredDocument) -> Result<Resource<K::Document>> {
        Resource::from_stored(stored, K::COLLECTION, K::SOFT_DELETE)
    }

    pub async fn list(
        &self,
        visibility: Visibility,
        filter: &K::Filter,
        pagination: &PaginationQuery,
    ) -> Result<Page<Resource<K::Document>>> {
        let query = DocumentQuery {
            active_only: Self::hides_inactive(visibility),
            filters: K::filters(filter),
            offset: pagination.offset(),
            limit: pagination.limit(),
        };

        let (documents, total) = self.store.list(K::COLLECTION, &query).await?;
        let items = documents
            .into_iter()
            .map(Self::to_resource)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page { items, total })
    }

    pub async fn get(&self, id: Uuid, visibility: Visibility) -> Result<Resource<K::Document>> {
        let stored = self
            .store
            .find(K::COLLECTION, id)
            .await?
            .filter(|doc| doc.is_active || !Self::hides_inactive(visibility))
            .ok_or_else(|| AppError::NotFound(K::not_found_message()))?;

        Self::to_resource(stored)
    }

    /// Most recently created document, if any
    pub async fn latest(&self, visibility: Visibility) -> Result<Option<Resource<K::Document>>> {
        let page = self
            .list(visibility, &K::Filter::default(), &PaginationQuery::new(1, 1))
            .await?;
        Ok(page.items.into_iter().next())
    }

    pub async fn create(
        &self,
        dto: K::Create,
        creator: Option<Uuid>,
    ) -> Result<Resource<K::Document>> {
        let draft = K::create(dto)?;
        let sort_key = K::sort_key(&draft.document);
        let body = serde_json::to_value(&draft.document).map_err(|e| {
            AppError::Internal(format!("Failed to encode {} document: {}", K::COLLECTION, e))
        })?;

        let stored = self
            .store
            .insert(
                K::COLLECTION,
                NewDocument {
                    body,
                    is_active: draft.is_active || !K::SOFT_DELETE,
                    created_by: creator,
                    sort_key,
                },
            )
            .await?;

        tracing::info!("{} created: {}", K::LABEL, stored.id);

        Self::to_resource(stored)
    }

    /// Partial update; fields absent from the payload keep their stored value
    pub async fn update(
        &self,
        id: Uuid,
        dto: K::Update,
        actor: Uuid,
    ) -> Result<Resource<K::Document>> {
        let ctx = UpdateContext {
            actor,
            now: Utc::now(),
        };

        let stored = self
            .store
            .modify(
                K::COLLECTION,
                id,
                Box::new(move |stored: &mut StoredDocument| {
                    let mut document: K::Document =
                        serde_json::from_value(stored.body.clone()).map_err(|e| {
                            AppError::Internal(format!(
                                "Stored {} document {} is unreadable: {}",
                                K::COLLECTION,
                                stored.id,
                                e
                            ))
                        })?;

                    let mut is_active = stored.is_active;
                    K::apply_update(&mut document, &mut is_active, dto, &ctx)?;

                    stored.body = serde_json::to_value(&document).map_err(|e| {
                        AppError::Internal(format!(
                            "Failed to encode {} document: {}",
                            K::COLLECTION,
                            e
                        ))
                    })?;
                    stored.is_active = is_active || !K::SOFT_DELETE;
                    stored.sort_key = K::sort_key(&document);
                    stored.updated_by = Some(ctx.actor);
                    Ok(())
                }),
            )
            .await?
            .ok_or_else(|| AppError::NotFound(K::not_found_message()))?;

        tracing::info!("{} updated: {}", K::LABEL, stored.id);

        Self::to_resource(stored)
    }

    /// Updates the newest document, or creates the first one.
    ///
    /// Upserts are serialised so concurrent first writes leave a single document.
    pub async fn upsert_latest(
        &self,
        create: K::Create,
        update: K::Update,
        actor: Uuid,
    ) -> Result<Resource<K::Document>> {
        let _guard = self.upsert_lock.lock().await;

        match self.latest(Visibility::Admin).await? {
            Some(current) => self.update(current.id, update, actor).await,
            None => self.create(create, Some(actor)).await,
        }
    }

    /// Hard delete
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(K::COLLECTION, id).await? {
            return Err(AppError::NotFound(K::not_found_message()));
        }

        tracing::info!("{} deleted: {}", K::LABEL, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::resources::kind::{Draft, NoFilter};
    use crate::modules::storage::{FieldFilter, MemoryStorage};
    use crate::shared::patch::Patch;
    use crate::shared::validation::required_text;
    use chrono::{DateTime, Duration};
    use serde::{Deserialize, Serialize};

    /// Minimal kind exercising every hook of the trait
    struct Notice;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct NoticeDoc {
        title: String,
        ward: Option<String>,
        posted_on: DateTime<Utc>,
    }

    #[derive(Deserialize)]
    struct NewNotice {
        title: Option<String>,
        ward: Option<String>,
        posted_on: Option<DateTime<Utc>>,
        is_active: Option<bool>,
    }

    #[derive(Deserialize, Default)]
    struct NoticeUpdate {
        #[serde(default)]
        title: Patch<String>,
        #[serde(default)]
        ward: Patch<String>,
        #[serde(default)]
        is_active: Patch<bool>,
    }

    #[derive(Deserialize, Default)]
    struct WardFilter {
        ward: Option<String>,
    }

    impl ResourceKind for Notice {
        const COLLECTION: &'static str = "notices";
        const LABEL: &'static str = "Notice";

        type Document = NoticeDoc;
        type Create = NewNotice;
        type Update = NoticeUpdate;
        type Filter = WardFilter;

        fn create(dto: NewNotice) -> Result<Draft<NoticeDoc>> {
            Ok(Draft::new(
                NoticeDoc {
                    title: required_text(dto.title, "Title")?,
                    ward: dto.ward,
                    posted_on: dto.posted_on.unwrap_or_else(Utc::now),
                },
                dto.is_active,
            ))
        }

        fn apply_update(
            doc: &mut NoticeDoc,
            is_active: &mut bool,
            dto: NoticeUpdate,
            _ctx: &UpdateContext,
        ) -> Result<()> {
            if let Some(title) = dto.title.into_required_text("Title")? {
                doc.title = title;
            }
            if let Some(ward) = dto.ward.into_optional_text() {
                doc.ward = ward;
            }
            if let Some(active) = dto.is_active.into_required("isActive")? {
                *is_active = active;
            }
            Ok(())
        }

        fn filters(filter: &WardFilter) -> Vec<FieldFilter> {
            filter
                .ward
                .iter()
                .map(|w| FieldFilter::Equals {
                    field: "ward",
                    value: w.clone(),
                })
                .collect()
        }

        fn sort_key(doc: &NoticeDoc) -> Option<DateTime<Utc>> {
            Some(doc.posted_on)
        }
    }

    /// Same document shape, but never hidden
    struct Letter;

    impl ResourceKind for Letter {
        const COLLECTION: &'static str = "letters";
        const LABEL: &'static str = "Letter";
        const SOFT_DELETE: bool = false;

        type Document = NoticeDoc;
        type Create = NewNotice;
        type Update = NoticeUpdate;
        type Filter = NoFilter;

        fn create(dto: NewNotice) -> Result<Draft<NoticeDoc>> {
            Notice::create(dto)
        }

        fn apply_update(
            doc: &mut NoticeDoc,
            is_active: &mut bool,
            dto: NoticeUpdate,
            ctx: &UpdateContext,
        ) -> Result<()> {
            Notice::apply_update(doc, is_active, dto, ctx)
        }
    }

    fn notice(title: &str) -> NewNotice {
        NewNotice {
            title: Some(title.to_string()),
            ward: None,
            posted_on: None,
            is_active: None,
        }
    }

    fn service<K: ResourceKind>() -> ResourceService<K> {
        ResourceService::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_inactive_documents_hidden_from_public() {
        let service = service::<Notice>();
        let admin = Uuid::now_v7();
        let created = service.create(notice("Water cut"), Some(admin)).await.unwrap();
        assert_eq!(created.is_active, Some(true));
        assert_eq!(created.created_by, Some(admin));

        service
            .update(
                created.id,
                NoticeUpdate {
                    is_active: Patch::Value(false),
                    ..Default::default()
                },
                admin,
            )
            .await
            .unwrap();

        let public = service
            .list(Visibility::Public, &WardFilter::default(), &PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(public.total, 0);

        let err = service.get(created.id, Visibility::Public).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Notice not found"));

        let as_admin = service.get(created.id, Visibility::Admin).await.unwrap();
        assert_eq!(as_admin.is_active, Some(false));
        assert_eq!(as_admin.updated_by, Some(admin));
    }

    #[tokio::test]
    async fn test_kinds_without_soft_delete_ignore_is_active() {
        let service = service::<Letter>();
        let created = service
            .create(
                NewNotice {
                    is_active: Some(false),
                    ..notice("Reply")
                },
                None,
            )
            .await
            .unwrap();
        assert!(created.is_active.is_none());

        assert!(service.get(created.id, Visibility::Public).await.is_ok());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let service = service::<Notice>();
        let created = service
            .create(
                NewNotice {
                    ward: Some("Ward 3".to_string()),
                    ..notice("Gram Sabha")
                },
                None,
            )
            .await
            .unwrap();

        let updated = service
            .update(
                created.id,
                NoticeUpdate {
                    title: Patch::Value("Gram Sabha on Monday".to_string()),
                    ..Default::default()
                },
                Uuid::now_v7(),
            )
            .await
            .unwrap();
        assert_eq!(updated.data.title, "Gram Sabha on Monday");
        assert_eq!(updated.data.ward.as_deref(), Some("Ward 3"));
        assert_eq!(updated.is_active, Some(true));

        let cleared = service
            .update(
                created.id,
                NoticeUpdate {
                    ward: Patch::Null,
                    ..Default::default()
                },
                Uuid::now_v7(),
            )
            .await
            .unwrap();
        assert!(cleared.data.ward.is_none());
        assert_eq!(cleared.data.title, "Gram Sabha on Monday");
    }

    #[tokio::test]
    async fn test_rejected_update_changes_nothing() {
        let service = service::<Notice>();
        let created = service.create(notice("Original"), None).await.unwrap();

        let err = service
            .update(
                created.id,
                NoticeUpdate {
                    title: Patch::Null,
                    is_active: Patch::Value(false),
                    ..Default::default()
                },
                Uuid::now_v7(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let stored = service.get(created.id, Visibility::Public).await.unwrap();
        assert_eq!(stored.data.title, "Original");
        assert!(stored.updated_by.is_none());
    }

    #[tokio::test]
    async fn test_pagination_over_25_items() {
        let service = service::<Notice>();
        for i in 0..25 {
            service
                .create(notice(&format!("Notice {}", i)), None)
                .await
                .unwrap();
        }

        let page = service
            .list(
                Visibility::Public,
                &WardFilter::default(),
                &PaginationQuery::new(2, 10),
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total, 25);
    }

    #[tokio::test]
    async fn test_sort_key_and_filters() {
        let service = service::<Notice>();
        let now = Utc::now();
        service
            .create(
                NewNotice {
                    ward: Some("1".to_string()),
                    posted_on: Some(now - Duration::days(10)),
                    ..notice("Old")
                },
                None,
            )
            .await
            .unwrap();
        service
            .create(
                NewNotice {
                    ward: Some("2".to_string()),
                    posted_on: Some(now - Duration::days(20)),
                    ..notice("Older, created later")
                },
                None,
            )
            .await
            .unwrap();
        service
            .create(
                NewNotice {
                    ward: Some("1".to_string()),
                    posted_on: Some(now),
                    ..notice("New")
                },
                None,
            )
            .await
            .unwrap();

        let all = service
            .list(Visibility::Public, &WardFilter::default(), &PaginationQuery::default())
            .await
            .unwrap();
        let titles: Vec<_> = all.items.iter().map(|r| r.data.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old", "Older, created later"]);

        let ward_one = service
            .list(
                Visibility::Public,
                &WardFilter {
                    ward: Some("1".to_string()),
                },
                &PaginationQuery::default(),
            )
            .await
            .unwrap();
        assert_eq!(ward_one.total, 2);

        let latest = service.latest(Visibility::Public).await.unwrap().unwrap();
        assert_eq!(latest.data.title, "New");
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let service = service::<Notice>();
        let missing = Uuid::now_v7();

        assert!(matches!(
            service.get(missing, Visibility::Admin).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service
                .update(missing, NoticeUpdate::default(), Uuid::now_v7())
                .await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(missing).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let service = service::<Notice>();
        let created = service.create(notice("Temporary"), None).await.unwrap();

        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.get(created.id, Visibility::Admin).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_upsert_latest_keeps_a_single_document() {
        let service = Arc::new(service::<Letter>());
        let admin = Uuid::now_v7();

        let tasks = (0..8)
            .map(|n| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    let update = NoticeUpdate {
                        title: Patch::Value(format!("Banner {}", n)),
                        ..Default::default()
                    };
                    service
                        .upsert_latest(notice(&format!("Banner {}", n)), update, admin)
                        .await
                })
            })
            .collect::<Vec<_>>();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let page = service
            .list(Visibility::Admin, &NoFilter {}, &PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].updated_by, Some(admin));
    }
}
