//! Per-entity page configuration: routes, list order, templates and the
//! context each page needs beyond the record itself.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use super::renderer::{
    AUTHOR_DETAIL_TEMPLATE, AUTHOR_LIST_TEMPLATE, POST_DETAIL_TEMPLATE, POST_LIST_TEMPLATE,
};
use crate::domain::{Author, ListOrder, Post, RecordId, Resource, SortKey};
use crate::error::BlogError;
use crate::routing::{
    AUTHOR_CREATE, AUTHOR_DELETE, AUTHOR_DETAIL, AUTHOR_LIST, AUTHOR_UPDATE, POST_CREATE,
    POST_DELETE, POST_DETAIL, POST_LIST, POST_UPDATE, Route,
};
use crate::service::BlogService;
use crate::store::AuthorDeletePolicy;

/// Characters of post content shown in lists.
pub const EXCERPT_CHARS: usize = 200;

/// Shown in place of a name when a post's author cannot be resolved.
const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Newest posts first.
pub const POST_PAGE_ORDER: ListOrder = ListOrder::new(&[SortKey::desc("id")]);

/// Authors alphabetically by first then last name.
pub const AUTHOR_PAGE_ORDER: ListOrder =
    ListOrder::new(&[SortKey::asc("first_name"), SortKey::asc("last_name")]);

/// An entity served by the generic page controllers.
#[async_trait]
pub trait PageResource: Resource {
    /// Body of the list page.
    type ListPage: Serialize + Send;
    /// Body of the detail page.
    type DetailPage: Serialize + Send;

    /// List page route; also the target after create and delete.
    const LIST: Route;
    /// Detail page route; also the target after update.
    const DETAIL: Route;
    /// Create form route.
    const CREATE: Route;
    /// Edit form route.
    const UPDATE: Route;
    /// Delete confirmation route.
    const DELETE: Route;
    /// Order of the list page.
    const LIST_ORDER: ListOrder;
    /// Heading of the list page.
    const LIST_TITLE: &'static str;
    /// List template name.
    const LIST_TEMPLATE: &'static str;
    /// Detail template name.
    const DETAIL_TEMPLATE: &'static str;

    /// Builds the list page body from records already in list order.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn list_page(service: &BlogService, records: Vec<Self>)
    -> Result<Self::ListPage, BlogError>;

    /// Builds the detail page body.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn detail_page(service: &BlogService, record: Self)
    -> Result<Self::DetailPage, BlogError>;

    /// Extra notice on the delete confirmation page.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn delete_warning(
        _service: &BlogService,
        _record: &Self,
    ) -> Result<Option<String>, BlogError> {
        Ok(None)
    }
}

/// Truncates `content` to [`EXCERPT_CHARS`] characters, marking the cut.
#[must_use]
pub fn excerpt(content: &str) -> String {
    if content.chars().nth(EXCERPT_CHARS).is_none() {
        return content.to_string();
    }
    let mut cut: String = content.chars().take(EXCERPT_CHARS).collect();
    cut.push_str("...");
    cut
}

/// One post as shown in a list.
#[derive(Debug, Clone, Serialize)]
pub struct PostRow {
    /// Post id.
    pub id: RecordId,
    /// Headline.
    pub title: String,
    /// Shortened content.
    pub excerpt: String,
    /// Author display name.
    pub author_name: String,
    /// Author detail page, if the author resolves.
    pub author_url: Option<String>,
    /// Post detail page.
    pub detail_url: String,
    /// Post edit form.
    pub edit_url: String,
    /// Post delete confirmation.
    pub delete_url: String,
}

impl PostRow {
    fn new(post: &Post, author_name: Option<&str>) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            excerpt: excerpt(&post.content),
            author_name: author_name.unwrap_or(UNKNOWN_AUTHOR).to_string(),
            author_url: author_name.map(|_| AUTHOR_DETAIL.path_for(post.author)),
            detail_url: POST_DETAIL.path_for(post.id),
            edit_url: POST_UPDATE.path_for(post.id),
            delete_url: POST_DELETE.path_for(post.id),
        }
    }
}

/// Body of the post list page.
#[derive(Debug, Clone, Serialize)]
pub struct PostListPage {
    /// Posts, newest first.
    pub posts: Vec<PostRow>,
    /// Create form.
    pub create_url: &'static str,
}

/// Body of the post detail page.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailPage {
    /// The post.
    pub post: Post,
    /// Author display name.
    pub author_name: String,
    /// Author detail page, if the author resolves.
    pub author_url: Option<String>,
    /// Edit form.
    pub edit_url: String,
    /// Delete confirmation.
    pub delete_url: String,
    /// Post list.
    pub list_url: &'static str,
}

#[async_trait]
impl PageResource for Post {
    type ListPage = PostListPage;
    type DetailPage = PostDetailPage;

    const LIST: Route = POST_LIST;
    const DETAIL: Route = POST_DETAIL;
    const CREATE: Route = POST_CREATE;
    const UPDATE: Route = POST_UPDATE;
    const DELETE: Route = POST_DELETE;
    const LIST_ORDER: ListOrder = POST_PAGE_ORDER;
    const LIST_TITLE: &'static str = "All Blog Posts";
    const LIST_TEMPLATE: &'static str = POST_LIST_TEMPLATE;
    const DETAIL_TEMPLATE: &'static str = POST_DETAIL_TEMPLATE;

    async fn list_page(
        service: &BlogService,
        records: Vec<Self>,
    ) -> Result<PostListPage, BlogError> {
        let names: HashMap<RecordId, String> = service
            .list::<Author>(ListOrder::INSERTION)
            .await?
            .into_iter()
            .map(|a| (a.id, a.full_name()))
            .collect();
        let posts = records
            .iter()
            .map(|p| PostRow::new(p, names.get(&p.author).map(String::as_str)))
            .collect();
        Ok(PostListPage {
            posts,
            create_url: POST_CREATE.path(),
        })
    }

    async fn detail_page(
        service: &BlogService,
        record: Self,
    ) -> Result<PostDetailPage, BlogError> {
        let author = service.store().get_author(record.author).await?;
        Ok(PostDetailPage {
            author_name: author
                .as_ref()
                .map_or_else(|| UNKNOWN_AUTHOR.to_string(), Author::full_name),
            author_url: author.map(|a| AUTHOR_DETAIL.path_for(a.id)),
            edit_url: POST_UPDATE.path_for(record.id),
            delete_url: POST_DELETE.path_for(record.id),
            list_url: POST_LIST.path(),
            post: record,
        })
    }
}

/// One author as shown in a list.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorRow {
    /// The author.
    pub author: Author,
    /// `first_name last_name`.
    pub full_name: String,
    /// Author detail page.
    pub detail_url: String,
    /// Author edit form.
    pub edit_url: String,
    /// Author delete confirmation.
    pub delete_url: String,
}

/// Body of the author list page.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorListPage {
    /// Authors by name.
    pub authors: Vec<AuthorRow>,
    /// Create form.
    pub create_url: &'static str,
}

/// Body of the author detail page.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorDetailPage {
    /// The author.
    pub author: Author,
    /// `first_name last_name`.
    pub full_name: String,
    /// The author's posts, newest first.
    pub posts: Vec<PostRow>,
    /// Edit form.
    pub edit_url: String,
    /// Delete confirmation.
    pub delete_url: String,
    /// Author list.
    pub list_url: &'static str,
}

#[async_trait]
impl PageResource for Author {
    type ListPage = AuthorListPage;
    type DetailPage = AuthorDetailPage;

    const LIST: Route = AUTHOR_LIST;
    const DETAIL: Route = AUTHOR_DETAIL;
    const CREATE: Route = AUTHOR_CREATE;
    const UPDATE: Route = AUTHOR_UPDATE;
    const DELETE: Route = AUTHOR_DELETE;
    const LIST_ORDER: ListOrder = AUTHOR_PAGE_ORDER;
    const LIST_TITLE: &'static str = "Authors";
    const LIST_TEMPLATE: &'static str = AUTHOR_LIST_TEMPLATE;
    const DETAIL_TEMPLATE: &'static str = AUTHOR_DETAIL_TEMPLATE;

    async fn list_page(
        _service: &BlogService,
        records: Vec<Self>,
    ) -> Result<AuthorListPage, BlogError> {
        let authors = records
            .into_iter()
            .map(|author| AuthorRow {
                full_name: author.full_name(),
                detail_url: AUTHOR_DETAIL.path_for(author.id),
                edit_url: AUTHOR_UPDATE.path_for(author.id),
                delete_url: AUTHOR_DELETE.path_for(author.id),
                author,
            })
            .collect();
        Ok(AuthorListPage {
            authors,
            create_url: AUTHOR_CREATE.path(),
        })
    }

    async fn detail_page(
        service: &BlogService,
        record: Self,
    ) -> Result<AuthorDetailPage, BlogError> {
        let full_name = record.full_name();
        let posts = service
            .posts_by_author(record.id, POST_PAGE_ORDER)
            .await?
            .iter()
            .map(|p| PostRow::new(p, Some(&full_name)))
            .collect();
        Ok(AuthorDetailPage {
            posts,
            edit_url: AUTHOR_UPDATE.path_for(record.id),
            delete_url: AUTHOR_DELETE.path_for(record.id),
            list_url: AUTHOR_LIST.path(),
            full_name,
            author: record,
        })
    }

    async fn delete_warning(
        service: &BlogService,
        record: &Self,
    ) -> Result<Option<String>, BlogError> {
        let count = service
            .posts_by_author(record.id, ListOrder::INSERTION)
            .await?
            .len();
        if count == 0 {
            return Ok(None);
        }
        let warning = match service.store().delete_policy() {
            AuthorDeletePolicy::Cascade => {
                format!("This will also delete all their posts ({count}).")
            }
            AuthorDeletePolicy::Restrict => {
                format!(
                    "This author still has {count} post(s) and cannot be deleted until they are removed."
                )
            }
        };
        Ok(Some(warning))
    }
}
