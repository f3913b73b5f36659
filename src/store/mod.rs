//! Persistence layer: the [`BlogStore`] trait and its implementations.
//!
//! [`MemoryStore`] keeps both tables in process memory and backs the test
//! suite and database-less runs. [`PostgresStore`] uses `sqlx::PgPool`;
//! each write runs in its own transaction and isolation between concurrent
//! writers is left to PostgreSQL.

pub mod memory;
pub mod postgres;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::domain::{Author, AuthorDraft, EntityKind, ListOrder, Post, PostDraft, RecordId};
use crate::error::BlogError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// What happens to an author's posts when the author is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorDeletePolicy {
    /// Delete the author's posts in the same transaction.
    #[default]
    Cascade,
    /// Refuse to delete an author that still has posts.
    Restrict,
}

impl FromStr for AuthorDeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cascade" => Ok(Self::Cascade),
            "restrict" | "protect" => Ok(Self::Restrict),
            other => Err(format!("unknown author delete policy: {other}")),
        }
    }
}

impl fmt::Display for AuthorDeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cascade => "cascade",
            Self::Restrict => "restrict",
        })
    }
}

/// Error returned when [`AuthorDeletePolicy::Restrict`] blocks a delete.
pub(crate) fn author_has_posts(id: RecordId, count: usize) -> BlogError {
    BlogError::ReferentialConstraint(format!("author {id} is referenced by {count} post(s)"))
}

/// Error returned when a post names an author that does not exist.
pub(crate) fn missing_author(id: RecordId) -> BlogError {
    BlogError::ReferentialConstraint(format!("author {id} does not exist"))
}

/// Storage backend for authors and posts.
///
/// Implementations enforce the post→author reference on every write and
/// apply their configured [`AuthorDeletePolicy`] on author deletes.
#[async_trait]
pub trait BlogStore: Send + Sync + fmt::Debug {
    /// Short backend name, reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// Policy applied by [`BlogStore::delete_author`].
    fn delete_policy(&self) -> AuthorDeletePolicy;

    /// Checks that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] if it is not.
    async fn ping(&self) -> Result<(), BlogError>;

    /// Returns whether a record of `kind` with `id` exists.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn exists(&self, kind: EntityKind, id: RecordId) -> Result<bool, BlogError>;

    /// Lists all authors in `order`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn list_authors(&self, order: ListOrder) -> Result<Vec<Author>, BlogError>;

    /// Fetches one author.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn get_author(&self, id: RecordId) -> Result<Option<Author>, BlogError>;

    /// Inserts an author and returns it with its new id.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn insert_author(&self, draft: &AuthorDraft) -> Result<Author, BlogError>;

    /// Replaces an author's fields; `None` if no such author.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn update_author(
        &self,
        id: RecordId,
        draft: &AuthorDraft,
    ) -> Result<Option<Author>, BlogError>;

    /// Deletes an author, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::ReferentialConstraint`] when the policy is
    /// [`AuthorDeletePolicy::Restrict`] and posts reference the author.
    async fn delete_author(&self, id: RecordId) -> Result<bool, BlogError>;

    /// Lists all posts in `order`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn list_posts(&self, order: ListOrder) -> Result<Vec<Post>, BlogError>;

    /// Lists the posts written by `author` in `order`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn list_posts_by_author(
        &self,
        author: RecordId,
        order: ListOrder,
    ) -> Result<Vec<Post>, BlogError>;

    /// Fetches one post.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn get_post(&self, id: RecordId) -> Result<Option<Post>, BlogError>;

    /// Inserts a post and returns it with its new id.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::ReferentialConstraint`] if the author does not
    /// exist.
    async fn insert_post(&self, draft: &PostDraft) -> Result<Post, BlogError>;

    /// Replaces a post's fields; `None` if no such post.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::ReferentialConstraint`] if the author does not
    /// exist.
    async fn update_post(&self, id: RecordId, draft: &PostDraft)
    -> Result<Option<Post>, BlogError>;

    /// Deletes a post, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn delete_post(&self, id: RecordId) -> Result<bool, BlogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_policy_parses_case_insensitively() {
        assert_eq!(
            "CASCADE".parse::<AuthorDeletePolicy>(),
            Ok(AuthorDeletePolicy::Cascade)
        );
        assert_eq!(
            "restrict".parse::<AuthorDeletePolicy>(),
            Ok(AuthorDeletePolicy::Restrict)
        );
        assert_eq!(
            "protect".parse::<AuthorDeletePolicy>(),
            Ok(AuthorDeletePolicy::Restrict)
        );
        assert!("set_null".parse::<AuthorDeletePolicy>().is_err());
    }

    #[test]
    fn default_policy_cascades() {
        assert_eq!(AuthorDeletePolicy::default(), AuthorDeletePolicy::Cascade);
        assert_eq!(AuthorDeletePolicy::Restrict.to_string(), "restrict");
    }
}
