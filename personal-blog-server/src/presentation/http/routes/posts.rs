use axum::Router;
use axum::middleware;
use axum::routing::{delete, get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::posts::{
    create_post, delete_post, get_post, list_posts, search_posts, update_post,
};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

/// Every posts route requires an authenticated caller.
pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post).put(update_post))
        .route("/id/{id}", get(get_post))
        .route("/search", get(search_posts))
        .route("/{id}", delete(delete_post))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
