use axum::Router;

use crate::presentation::AppState;

pub(crate) mod posts;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/posts", posts::router(state))
}
