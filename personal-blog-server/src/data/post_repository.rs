use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) theme: Option<String>,
    pub(crate) creator: Option<String>,
    pub(crate) photo: Option<String>,
}

/// Replacement values for every mutable field of post `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostReplacement {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) theme: Option<String>,
    pub(crate) creator: Option<String>,
    pub(crate) photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PostFilter {
    pub(crate) title: Option<String>,
    pub(crate) theme: Option<String>,
    pub(crate) creator: Option<String>,
}

/// Persistence collaborator for posts.
///
/// Listing and search return posts ordered by id ascending. Search matches each
/// present filter as a case-insensitive substring; absent filters match anything.
/// `update_post` fails with `DomainError::NotFound` when the id does not exist,
/// while `delete_post` succeeds whether or not the id existed.
#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn list_posts(&self) -> Result<Vec<Post>, DomainError>;
    async fn search_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError>;
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn update_post(&self, input: PostReplacement) -> Result<Post, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<(), DomainError>;
}
