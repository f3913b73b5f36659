//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{AuthorDeletePolicy, BlogStore, author_has_posts};
use crate::config::DatabaseConfig;
use crate::domain::{
    AUTHOR_SCHEMA, Author, AuthorDraft, EntityKind, ListOrder, POST_SCHEMA, Post, PostDraft,
    RecordId,
};
use crate::error::BlogError;

/// Storage column of the `author` field of [`POST_SCHEMA`].
const POST_AUTHOR_COLUMN: &str = "author_id";

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// Tables are created by the embedded migrations in `migrations/`; every
/// statement takes its table and column names from the entity schemas.
/// `blog_post.author_id` is a foreign key to `blog_author(id)`, so the
/// database itself rejects dangling references; such rejections surface as
/// [`BlogError::ReferentialConstraint`].
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    delete_policy: AuthorDeletePolicy,
}

impl PostgresStore {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool, delete_policy: AuthorDeletePolicy) -> Self {
        Self {
            pool,
            delete_policy,
        }
    }

    /// Opens a connection pool according to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] if the database is unreachable.
    pub async fn connect(
        config: &DatabaseConfig,
        delete_policy: AuthorDeletePolicy,
    ) -> Result<Self, BlogError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool, delete_policy))
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), BlogError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| BlogError::Persistence(e.to_string()))
    }
}

#[async_trait]
impl BlogStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn delete_policy(&self) -> AuthorDeletePolicy {
        self.delete_policy
    }

    async fn ping(&self) -> Result<(), BlogError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn exists(&self, kind: EntityKind, id: RecordId) -> Result<bool, BlogError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)",
            kind.schema().table
        );
        let found = sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found)
    }

    async fn list_authors(&self, order: ListOrder) -> Result<Vec<Author>, BlogError> {
        let sql = format!(
            "{} {}",
            AUTHOR_SCHEMA.select_sql(),
            order.to_sql(&AUTHOR_SCHEMA)
        );
        let rows = sqlx::query_as::<_, Author>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_author(&self, id: RecordId) -> Result<Option<Author>, BlogError> {
        let sql = format!("{} WHERE id = $1", AUTHOR_SCHEMA.select_sql());
        let row = sqlx::query_as::<_, Author>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_author(&self, draft: &AuthorDraft) -> Result<Author, BlogError> {
        let sql = AUTHOR_SCHEMA.insert_sql();
        let row = sqlx::query_as::<_, Author>(&sql)
            .bind(&draft.first_name)
            .bind(&draft.last_name)
            .bind(&draft.email)
            .bind(&draft.phone_number)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_author(
        &self,
        id: RecordId,
        draft: &AuthorDraft,
    ) -> Result<Option<Author>, BlogError> {
        let sql = AUTHOR_SCHEMA.update_sql();
        let row = sqlx::query_as::<_, Author>(&sql)
            .bind(&draft.first_name)
            .bind(&draft.last_name)
            .bind(&draft.email)
            .bind(&draft.phone_number)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_author(&self, id: RecordId) -> Result<bool, BlogError> {
        let mut tx = self.pool.begin().await?;

        let dependants = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE {POST_AUTHOR_COLUMN} = $1",
            POST_SCHEMA.table
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if dependants > 0 {
            match self.delete_policy {
                AuthorDeletePolicy::Restrict => {
                    let count = usize::try_from(dependants).unwrap_or(usize::MAX);
                    return Err(author_has_posts(id, count));
                }
                AuthorDeletePolicy::Cascade => {
                    sqlx::query(&format!(
                        "DELETE FROM {} WHERE {POST_AUTHOR_COLUMN} = $1",
                        POST_SCHEMA.table
                    ))
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                    tracing::debug!(author = %id, posts = dependants, "cascaded post delete");
                }
            }
        }

        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", AUTHOR_SCHEMA.table))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, order: ListOrder) -> Result<Vec<Post>, BlogError> {
        let sql = format!("{} {}", POST_SCHEMA.select_sql(), order.to_sql(&POST_SCHEMA));
        let rows = sqlx::query_as::<_, Post>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_posts_by_author(
        &self,
        author: RecordId,
        order: ListOrder,
    ) -> Result<Vec<Post>, BlogError> {
        let sql = format!(
            "{} WHERE {POST_AUTHOR_COLUMN} = $1 {}",
            POST_SCHEMA.select_sql(),
            order.to_sql(&POST_SCHEMA)
        );
        let rows = sqlx::query_as::<_, Post>(&sql)
            .bind(author)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_post(&self, id: RecordId) -> Result<Option<Post>, BlogError> {
        let sql = format!("{} WHERE id = $1", POST_SCHEMA.select_sql());
        let row = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_post(&self, draft: &PostDraft) -> Result<Post, BlogError> {
        let sql = POST_SCHEMA.insert_sql();
        let row = sqlx::query_as::<_, Post>(&sql)
            .bind(&draft.title)
            .bind(&draft.content)
            .bind(draft.author)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_post(
        &self,
        id: RecordId,
        draft: &PostDraft,
    ) -> Result<Option<Post>, BlogError> {
        let sql = POST_SCHEMA.update_sql();
        let row = sqlx::query_as::<_, Post>(&sql)
            .bind(&draft.title)
            .bind(&draft.content)
            .bind(draft.author)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_post(&self, id: RecordId) -> Result<bool, BlogError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", POST_SCHEMA.table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_column_matches_post_schema() {
        assert_eq!(POST_SCHEMA.column("author"), Some(POST_AUTHOR_COLUMN));
    }
}
