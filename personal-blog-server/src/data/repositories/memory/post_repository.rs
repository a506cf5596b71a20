use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::data::post_repository::{NewPost, PostFilter, PostReplacement, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

/// Process-local post store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub(crate) struct InMemoryPostRepository {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    posts: BTreeMap<i64, Post>,
}

impl InMemoryPostRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, DomainError> {
        self.state
            .read()
            .map_err(|_| DomainError::Unexpected("post store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, DomainError> {
        self.state
            .write()
            .map_err(|_| DomainError::Unexpected("post store lock poisoned".to_string()))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.read()?.posts.get(&id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.read()?.posts.values().cloned().collect())
    }

    async fn search_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        let state = self.read()?;
        Ok(state
            .posts
            .values()
            .filter(|post| {
                matches_field(Some(post.title.as_str()), filter.title.as_deref())
                    && matches_field(post.theme.as_deref(), filter.theme.as_deref())
                    && matches_field(post.creator.as_deref(), filter.creator.as_deref())
            })
            .cloned()
            .collect())
    }

    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.write()?;
        let id = state.last_id + 1;
        let post = Post::new(
            id,
            input.title,
            input.description,
            input.theme,
            input.creator,
            input.photo,
        )?;
        state.last_id = id;
        state.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, input: PostReplacement) -> Result<Post, DomainError> {
        let mut state = self.write()?;
        let slot = state
            .posts
            .get_mut(&input.id)
            .ok_or_else(|| DomainError::NotFound(format!("post id: {}", input.id)))?;

        let post = Post::new(
            input.id,
            input.title,
            input.description,
            input.theme,
            input.creator,
            input.photo,
        )?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        self.write()?.posts.remove(&id);
        Ok(())
    }
}

fn matches_field(value: Option<&str>, needle: Option<&str>) -> bool {
    match (value, needle) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(value), Some(needle)) => value.to_lowercase().contains(&needle.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryPostRepository;
    use crate::data::post_repository::{NewPost, PostFilter, PostReplacement, PostRepository};
    use crate::domain::error::DomainError;

    fn new_post(title: &str, theme: Option<&str>, creator: Option<&str>) -> NewPost {
        NewPost {
            title: title.to_string(),
            description: String::new(),
            theme: theme.map(str::to_string),
            creator: creator.map(str::to_string),
            photo: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_that_are_not_reused() {
        let repo = InMemoryPostRepository::new();

        let first = repo
            .create_post(new_post("a", None, None))
            .await
            .expect("create must succeed");
        let second = repo
            .create_post(new_post("b", None, None))
            .await
            .expect("create must succeed");
        assert_eq!((first.id, second.id), (1, 2));

        repo.delete_post(second.id).await.expect("delete must succeed");
        let third = repo
            .create_post(new_post("c", None, None))
            .await
            .expect("create must succeed");
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn search_matches_case_insensitive_substrings_and_ands_filters() {
        let repo = InMemoryPostRepository::new();
        for post in [
            new_post("Intro to Rust", Some("Programming"), Some("ana")),
            new_post("Rust async", Some("Concurrency"), Some("bruno")),
            new_post("Gardening", Some("Hobbies"), None),
        ] {
            repo.create_post(post).await.expect("create must succeed");
        }

        let by_title = repo
            .search_posts(PostFilter {
                title: Some("rust".to_string()),
                ..PostFilter::default()
            })
            .await
            .expect("search must succeed");
        assert_eq!(
            by_title.iter().map(|post| post.id).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let combined = repo
            .search_posts(PostFilter {
                title: Some("RUST".to_string()),
                theme: None,
                creator: Some("BRU".to_string()),
            })
            .await
            .expect("search must succeed");
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].id, 2);

        let by_missing_creator = repo
            .search_posts(PostFilter {
                creator: Some("a".to_string()),
                ..PostFilter::default()
            })
            .await
            .expect("search must succeed");
        assert!(by_missing_creator.iter().all(|post| post.creator.is_some()));

        let everything = repo
            .search_posts(PostFilter::default())
            .await
            .expect("search must succeed");
        assert_eq!(
            everything,
            repo.list_posts().await.expect("list must succeed")
        );
    }

    #[tokio::test]
    async fn update_of_missing_post_is_not_found_and_delete_is_idempotent() {
        let repo = InMemoryPostRepository::new();

        let err = repo
            .update_post(PostReplacement {
                id: 5,
                title: "Java".to_string(),
                description: String::new(),
                theme: None,
                creator: None,
                photo: None,
            })
            .await
            .expect_err("missing post must not be updated");
        assert!(matches!(err, DomainError::NotFound(_)));

        repo.delete_post(5).await.expect("delete must succeed");
        repo.delete_post(5).await.expect("delete must succeed");
        assert!(repo.list_posts().await.expect("list must succeed").is_empty());
    }
}
