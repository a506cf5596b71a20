use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::infrastructure::settings::Settings;

/// Body size, request timeout and in-flight request caps from settings.
///
/// `Router::layer` clones the layer into every route, so the concurrency cap
/// uses one semaphore shared by all of them.
pub(crate) fn apply_limits(router: Router, settings: &Settings) -> Router {
    router
        .layer(DefaultBodyLimit::max(settings.http_request_body_limit_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(settings.http_request_timeout_secs),
        ))
        .layer(GlobalConcurrencyLimitLayer::new(
            settings.http_concurrency_limit,
        ))
}
