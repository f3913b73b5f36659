//! In-process store for authors and posts.
//!
//! [`MemoryStore`] keeps both tables behind a single
//! [`tokio::sync::RwLock`], so every operation sees a consistent view of
//! authors and posts together: a post insert and an author delete cannot
//! interleave and leave a dangling reference.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AuthorDeletePolicy, BlogStore, author_has_posts, missing_author};
use crate::domain::{Author, AuthorDraft, EntityKind, ListOrder, Post, PostDraft, RecordId};
use crate::error::BlogError;

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<RecordId, Author>,
    posts: BTreeMap<RecordId, Post>,
    last_author_id: i64,
    last_post_id: i64,
}

impl Tables {
    fn next_author_id(&mut self) -> RecordId {
        self.last_author_id = self.last_author_id.saturating_add(1);
        RecordId::new(self.last_author_id)
    }

    fn next_post_id(&mut self) -> RecordId {
        self.last_post_id = self.last_post_id.saturating_add(1);
        RecordId::new(self.last_post_id)
    }
}

/// Store holding every record in memory.
///
/// Ids are allocated per table from 1 upward and never reused, like a SQL
/// serial column.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    delete_policy: AuthorDeletePolicy,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(delete_policy: AuthorDeletePolicy) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            delete_policy,
        }
    }

    /// Returns the number of stored authors and posts.
    pub async fn counts(&self) -> (usize, usize) {
        let tables = self.tables.read().await;
        (tables.authors.len(), tables.posts.len())
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn delete_policy(&self) -> AuthorDeletePolicy {
        self.delete_policy
    }

    async fn ping(&self) -> Result<(), BlogError> {
        Ok(())
    }

    async fn exists(&self, kind: EntityKind, id: RecordId) -> Result<bool, BlogError> {
        let tables = self.tables.read().await;
        Ok(match kind {
            EntityKind::Author => tables.authors.contains_key(&id),
            EntityKind::Post => tables.posts.contains_key(&id),
        })
    }

    async fn list_authors(&self, order: ListOrder) -> Result<Vec<Author>, BlogError> {
        let tables = self.tables.read().await;
        let mut authors: Vec<Author> = tables.authors.values().cloned().collect();
        order.sort(&mut authors);
        Ok(authors)
    }

    async fn get_author(&self, id: RecordId) -> Result<Option<Author>, BlogError> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn insert_author(&self, draft: &AuthorDraft) -> Result<Author, BlogError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_author_id();
        let author = Author::from_draft(id, draft);
        tables.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn update_author(
        &self,
        id: RecordId,
        draft: &AuthorDraft,
    ) -> Result<Option<Author>, BlogError> {
        let mut tables = self.tables.write().await;
        let Some(slot) = tables.authors.get_mut(&id) else {
            return Ok(None);
        };
        *slot = Author::from_draft(id, draft);
        Ok(Some(slot.clone()))
    }

    async fn delete_author(&self, id: RecordId) -> Result<bool, BlogError> {
        let mut tables = self.tables.write().await;
        if !tables.authors.contains_key(&id) {
            return Ok(false);
        }
        let dependants: Vec<RecordId> = tables
            .posts
            .values()
            .filter(|p| p.author == id)
            .map(|p| p.id)
            .collect();
        if !dependants.is_empty() {
            match self.delete_policy {
                AuthorDeletePolicy::Restrict => {
                    return Err(author_has_posts(id, dependants.len()));
                }
                AuthorDeletePolicy::Cascade => {
                    for post_id in &dependants {
                        tables.posts.remove(post_id);
                    }
                    tracing::debug!(author = %id, posts = dependants.len(), "cascaded post delete");
                }
            }
        }
        Ok(tables.authors.remove(&id).is_some())
    }

    async fn list_posts(&self, order: ListOrder) -> Result<Vec<Post>, BlogError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.values().cloned().collect();
        order.sort(&mut posts);
        Ok(posts)
    }

    async fn list_posts_by_author(
        &self,
        author: RecordId,
        order: ListOrder,
    ) -> Result<Vec<Post>, BlogError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.author == author)
            .cloned()
            .collect();
        order.sort(&mut posts);
        Ok(posts)
    }

    async fn get_post(&self, id: RecordId) -> Result<Option<Post>, BlogError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert_post(&self, draft: &PostDraft) -> Result<Post, BlogError> {
        let mut tables = self.tables.write().await;
        if !tables.authors.contains_key(&draft.author) {
            return Err(missing_author(draft.author));
        }
        let id = tables.next_post_id();
        let post = Post::from_draft(id, draft);
        tables.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        id: RecordId,
        draft: &PostDraft,
    ) -> Result<Option<Post>, BlogError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Ok(None);
        }
        if !tables.authors.contains_key(&draft.author) {
            return Err(missing_author(draft.author));
        }
        let post = Post::from_draft(id, draft);
        tables.posts.insert(id, post.clone());
        Ok(Some(post))
    }

    async fn delete_post(&self, id: RecordId) -> Result<bool, BlogError> {
        Ok(self.tables.write().await.posts.remove(&id).is_some())
    }
}
