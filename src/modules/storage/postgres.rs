use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{
    AdminStore, DocumentMutator, DocumentQuery, DocumentStore, FieldFilter, NewAdmin,
    NewDocument, StoredDocument,
};
use crate::core::error::{AppError, Result};
use crate::features::admin::models::Admin;

const DOCUMENT_COLUMNS: &str =
    "id, body, is_active, created_by, updated_by, sort_key, created_at, updated_at";

const ADMIN_COLUMNS: &str =
    "id, username, password_hash, email, is_setup, last_login, created_at, updated_at";

/// Convert database error to a more specific AppError
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation (PostgreSQL error code 23505)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            if let Some(constraint) = db_err.constraint() {
                if constraint.contains("username") {
                    return AppError::DuplicateKey("Username already exists".to_string());
                }
            }
            return AppError::DuplicateKey("Duplicate value".to_string());
        }
    }

    tracing::error!("Database operation failed: {:?}", e);
    AppError::Database(e)
}

/// Escape LIKE wildcards so user input only ever matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append the WHERE clause shared by the count and page queries
fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, query: &DocumentQuery) {
    builder.push(" WHERE TRUE");

    if query.active_only {
        builder.push(" AND is_active = TRUE");
    }

    for filter in &query.filters {
        match filter {
            FieldFilter::Contains { field, value } => {
                builder
                    .push(" AND body->>")
                    .push_bind(field.to_string())
                    .push(" ILIKE '%' || ")
                    .push_bind(escape_like(value))
                    .push(" || '%'");
            }
            FieldFilter::Equals { field, value } => {
                builder
                    .push(" AND body->>")
                    .push_bind(field.to_string())
                    .push(" = ")
                    .push_bind(value.clone());
            }
        }
    }
}

/// Postgres backend: one JSONB document table per collection.
///
/// Collection names are compile-time constants from the resource kinds and are
/// interpolated as table names; all values go through bind parameters.
#[derive(Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for PostgresStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("pool", &"<PgPool>")
            .finish()
    }
}

#[async_trait]
impl DocumentStore for PostgresStorage {
    async fn insert(&self, collection: &'static str, new: NewDocument) -> Result<StoredDocument> {
        let sql = format!(
            "INSERT INTO {collection} (id, body, is_active, created_by, sort_key) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {DOCUMENT_COLUMNS}"
        );

        sqlx::query_as::<_, StoredDocument>(&sql)
            .bind(Uuid::now_v7())
            .bind(&new.body)
            .bind(new.is_active)
            .bind(new.created_by)
            .bind(new.sort_key)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn find(&self, collection: &'static str, id: Uuid) -> Result<Option<StoredDocument>> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM {collection} WHERE id = $1");

        sqlx::query_as::<_, StoredDocument>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn list(
        &self,
        collection: &'static str,
        query: &DocumentQuery,
    ) -> Result<(Vec<StoredDocument>, i64)> {
        let mut count_builder =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {collection}"));
        push_conditions(&mut count_builder, query);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {DOCUMENT_COLUMNS} FROM {collection}"));
        push_conditions(&mut builder, query);
        builder
            .push(" ORDER BY COALESCE(sort_key, created_at) DESC, created_at DESC, id DESC")
            .push(" LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        let items = builder
            .build_query_as::<StoredDocument>()
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok((items, total))
    }

    async fn modify(
        &self,
        collection: &'static str,
        id: Uuid,
        mutator: DocumentMutator,
    ) -> Result<Option<StoredDocument>> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        let select = format!("SELECT {DOCUMENT_COLUMNS} FROM {collection} WHERE id = $1 FOR UPDATE");
        let Some(mut document) = sqlx::query_as::<_, StoredDocument>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(handle_db_error)?
        else {
            return Ok(None);
        };

        // Dropping the transaction on error releases the row lock untouched
        mutator(&mut document)?;

        let update = format!(
            "UPDATE {collection} \
             SET body = $2, is_active = $3, updated_by = $4, sort_key = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {DOCUMENT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, StoredDocument>(&update)
            .bind(id)
            .bind(&document.body)
            .bind(document.is_active)
            .bind(document.updated_by)
            .bind(document.sort_key)
            .fetch_one(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        tx.commit().await.map_err(handle_db_error)?;

        Ok(Some(updated))
    }

    async fn delete(&self, collection: &'static str, id: Uuid) -> Result<bool> {
        let sql = format!("DELETE FROM {collection} WHERE id = $1");

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AdminStore for PostgresStorage {
    async fn count_admins(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn create_singleton(&self, new: NewAdmin) -> Result<Option<Admin>> {
        let sql = format!(
            "INSERT INTO admins (id, username, password_hash, email, is_setup) \
             VALUES ($1, $2, $3, $4, TRUE) \
             ON CONFLICT (singleton) DO NOTHING \
             RETURNING {ADMIN_COLUMNS}"
        );

        sqlx::query_as::<_, Admin>(&sql)
            .bind(Uuid::now_v7())
            .bind(&new.username)
            .bind(&new.password_hash)
            .bind(&new.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<Admin>> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1");

        sqlx::query_as::<_, Admin>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE username = $1");

        sqlx::query_as::<_, Admin>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn save_admin(&self, admin: &Admin) -> Result<Admin> {
        let sql = format!(
            "UPDATE admins \
             SET username = $2, email = $3, password_hash = $4, last_login = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ADMIN_COLUMNS}"
        );

        sqlx::query_as::<_, Admin>(&sql)
            .bind(admin.id)
            .bind(&admin.username)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(admin.last_login)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))
    }
}
