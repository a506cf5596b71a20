use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::domain::post::{CreatePostRequest, Post, SearchPostsRequest, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

/// Create payload. Any `id` sent by the client is ignored.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CreatePostDto {
    #[validate(required, length(min = 1, max = 255))]
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    #[validate(length(max = 255))]
    pub(crate) theme: Option<String>,
    #[validate(length(max = 255))]
    pub(crate) creator: Option<String>,
    #[validate(length(max = 2048))]
    pub(crate) photo: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UpdatePostDto {
    #[validate(required, range(min = 1))]
    pub(crate) id: Option<i64>,
    #[validate(required, length(min = 1, max = 255))]
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    #[validate(length(max = 255))]
    pub(crate) theme: Option<String>,
    #[validate(length(max = 255))]
    pub(crate) creator: Option<String>,
    #[validate(length(max = 2048))]
    pub(crate) photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    pub(crate) title: Option<String>,
    pub(crate) theme: Option<String>,
    pub(crate) creator: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) theme: Option<String>,
    pub(crate) creator: Option<String>,
    pub(crate) photo: Option<String>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            theme: post.theme,
            creator: post.creator,
            photo: post.photo,
        }
    }
}

/// 200 with the posts, or 204 when there are none.
fn posts_or_no_content(posts: Vec<Post>) -> Response {
    if posts.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    let posts: Vec<PostDto> = posts.into_iter().map(PostDto::from).collect();
    (StatusCode::OK, Json(posts)).into_response()
}

pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let post = state.blog_service.get_post(id).await?;

    Ok((StatusCode::OK, Json(PostDto::from(post))))
}

pub(crate) async fn list_posts(State(state): State<AppState>) -> AppResult<Response> {
    let posts = state.blog_service.list_posts().await?;

    Ok(posts_or_no_content(posts))
}

pub(crate) async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let req = SearchPostsRequest {
        title: query.title,
        theme: query.theme,
        creator: query.creator,
    };

    let posts = state.blog_service.search_posts(req).await?;
    Ok(posts_or_no_content(posts))
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    payload: Result<Json<CreatePostDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let Json(dto) = payload?;
    dto.validate()?;

    let req = CreatePostRequest {
        title: dto.title.unwrap_or_default(),
        description: dto.description,
        theme: dto.theme,
        creator: dto.creator,
        photo: dto.photo,
    };

    let post = state.blog_service.create_post(&auth.username, req).await?;
    info!(user_id = auth.user_id, post_id = post.id, "post created");
    Ok((StatusCode::CREATED, Json(PostDto::from(post))))
}

pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    payload: Result<Json<UpdatePostDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let Json(dto) = payload?;
    dto.validate()?;

    let req = UpdatePostRequest {
        id: dto.id.unwrap_or_default(),
        title: dto.title.unwrap_or_default(),
        description: dto.description,
        theme: dto.theme,
        creator: dto.creator,
        photo: dto.photo,
    };

    let post = state.blog_service.update_post(req).await?;
    info!(user_id = auth.user_id, post_id = post.id, "post updated");
    Ok((StatusCode::OK, Json(PostDto::from(post))))
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.blog_service.delete_post(id).await?;
    info!(user_id = auth.user_id, post_id = id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}
