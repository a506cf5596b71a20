use std::sync::Arc;

use crate::data::post_repository::{NewPost, PostFilter, PostReplacement, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post, SearchPostsRequest, UpdatePostRequest};

pub(crate) struct BlogService {
    repo: Arc<dyn PostRepository>,
}

impl BlogService {
    pub(crate) fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .get_post(id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {id}")))
    }

    pub(crate) async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.list_posts().await
    }

    pub(crate) async fn search_posts(
        &self,
        req: SearchPostsRequest,
    ) -> Result<Vec<Post>, DomainError> {
        let req = req.normalize();
        if req.is_unconstrained() {
            return self.repo.list_posts().await;
        }

        let filter = PostFilter {
            title: req.title,
            theme: req.theme,
            creator: req.creator,
        };
        self.repo.search_posts(filter).await
    }

    /// Creates a post; a missing creator defaults to `caller`.
    pub(crate) async fn create_post(
        &self,
        caller: &str,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            description: req.description.unwrap_or_default(),
            theme: req.theme,
            creator: req.creator.or_else(|| Some(caller.to_string())),
            photo: req.photo,
        };
        self.repo.create_post(new_post).await
    }

    pub(crate) async fn update_post(&self, req: UpdatePostRequest) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let replacement = PostReplacement {
            id: req.id,
            title: req.title,
            description: req.description.unwrap_or_default(),
            theme: req.theme,
            creator: req.creator,
            photo: req.photo,
        };
        self.repo.update_post(replacement).await
    }

    pub(crate) async fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        self.repo.delete_post(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::BlogService;
    use crate::data::post_repository::{NewPost, PostFilter, PostReplacement, PostRepository};
    use crate::domain::error::DomainError;
    use crate::domain::post::{CreatePostRequest, Post, SearchPostsRequest, UpdatePostRequest};

    #[derive(Clone, Default)]
    struct FakePostRepo {
        created_input: Arc<Mutex<Option<NewPost>>>,
        post_for_get: Arc<Mutex<Option<Post>>>,
        update_call: Arc<Mutex<Option<PostReplacement>>>,
        search_call: Arc<Mutex<Option<PostFilter>>>,
        list_result: Arc<Mutex<Vec<Post>>>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl FakePostRepo {
        fn record(&self, call: &'static str) {
            self.calls.lock().expect("calls mutex poisoned").push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().expect("calls mutex poisoned").clone()
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn get_post(&self, _id: i64) -> Result<Option<Post>, DomainError> {
            self.record("get_post");
            Ok(self
                .post_for_get
                .lock()
                .expect("post_for_get mutex poisoned")
                .clone())
        }

        async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
            self.record("list_posts");
            Ok(self
                .list_result
                .lock()
                .expect("list_result mutex poisoned")
                .clone())
        }

        async fn search_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
            self.record("search_posts");
            *self.search_call.lock().expect("search_call mutex poisoned") = Some(filter);
            Ok(Vec::new())
        }

        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            self.record("create_post");
            *self
                .created_input
                .lock()
                .expect("created_input mutex poisoned") = Some(input.clone());
            Post::new(
                1,
                input.title,
                input.description,
                input.theme,
                input.creator,
                input.photo,
            )
        }

        async fn update_post(&self, input: PostReplacement) -> Result<Post, DomainError> {
            self.record("update_post");
            *self.update_call.lock().expect("update_call mutex poisoned") = Some(input.clone());
            Post::new(
                input.id,
                input.title,
                input.description,
                input.theme,
                input.creator,
                input.photo,
            )
        }

        async fn delete_post(&self, _id: i64) -> Result<(), DomainError> {
            self.record("delete_post");
            Ok(())
        }
    }

    fn service(repo: &FakePostRepo) -> BlogService {
        BlogService::new(Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn create_post_normalizes_request_and_defaults_creator_to_caller() {
        let repo = FakePostRepo::default();

        let req = CreatePostRequest {
            title: "  C#  ".to_string(),
            description: Some("Introdução ao C#".to_string()),
            theme: None,
            creator: Some("   ".to_string()),
            photo: Some("URLFOTO".to_string()),
        };

        let created = service(&repo)
            .create_post("maria", req)
            .await
            .expect("create_post must succeed");
        assert_eq!(created.title, "C#");

        let input = repo
            .created_input
            .lock()
            .expect("created_input mutex poisoned")
            .clone()
            .expect("repo input must be captured");
        assert_eq!(input.title, "C#");
        assert_eq!(input.description, "Introdução ao C#");
        assert_eq!(input.creator.as_deref(), Some("maria"));
        assert_eq!(input.photo.as_deref(), Some("URLFOTO"));
    }

    #[tokio::test]
    async fn create_post_keeps_explicit_creator() {
        let repo = FakePostRepo::default();
        let req = CreatePostRequest {
            title: "title".to_string(),
            description: None,
            theme: None,
            creator: Some("guest author".to_string()),
            photo: None,
        };

        service(&repo)
            .create_post("maria", req)
            .await
            .expect("create_post must succeed");

        let input = repo
            .created_input
            .lock()
            .expect("created_input mutex poisoned")
            .clone()
            .expect("repo input must be captured");
        assert_eq!(input.creator.as_deref(), Some("guest author"));
        assert_eq!(input.description, "");
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_repository() {
        let repo = FakePostRepo::default();
        let req = CreatePostRequest {
            title: " ".to_string(),
            description: None,
            theme: None,
            creator: None,
            photo: None,
        };

        let err = service(&repo)
            .create_post("maria", req)
            .await
            .expect_err("blank title must be rejected");
        assert!(matches!(err, DomainError::Validation { field: "title", .. }));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn get_post_returns_not_found_when_missing() {
        let repo = FakePostRepo::default();

        let err = service(&repo)
            .get_post(42)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_post_replaces_every_field() {
        let repo = FakePostRepo::default();
        let req = UpdatePostRequest {
            id: 5,
            title: " Java ".to_string(),
            description: None,
            theme: Some("Languages".to_string()),
            creator: None,
            photo: None,
        };

        let updated = service(&repo)
            .update_post(req)
            .await
            .expect("update must succeed");
        assert_eq!(updated.id, 5);

        let call = repo
            .update_call
            .lock()
            .expect("update_call mutex poisoned")
            .clone()
            .expect("update call must be captured");
        assert_eq!(call.id, 5);
        assert_eq!(call.title, "Java");
        assert_eq!(call.description, "");
        assert_eq!(call.theme.as_deref(), Some("Languages"));
    }

    #[tokio::test]
    async fn search_without_filters_lists_everything() {
        let repo = FakePostRepo::default();
        let req = SearchPostsRequest {
            title: Some(String::new()),
            theme: None,
            creator: Some("  ".to_string()),
        };

        service(&repo)
            .search_posts(req)
            .await
            .expect("search must succeed");
        assert_eq!(repo.calls(), vec!["list_posts"]);
    }

    #[tokio::test]
    async fn search_passes_present_filters_through() {
        let repo = FakePostRepo::default();
        let req = SearchPostsRequest {
            title: Some("Rust".to_string()),
            theme: None,
            creator: Some("Ana".to_string()),
        };

        service(&repo)
            .search_posts(req)
            .await
            .expect("search must succeed");

        let filter = repo
            .search_call
            .lock()
            .expect("search_call mutex poisoned")
            .clone()
            .expect("search call must be captured");
        assert_eq!(filter.title.as_deref(), Some("Rust"));
        assert_eq!(filter.theme, None);
        assert_eq!(filter.creator.as_deref(), Some("Ana"));
    }
}
