use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::blog_service::BlogService;
use data::post_repository::PostRepository;
use data::repositories::memory::post_repository::InMemoryPostRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::{PostStoreSettings, Settings};
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level, settings.log_format)?;

    let repo = build_post_store(&settings.post_store).await?;
    let blog_service = Arc::new(BlogService::new(repo));
    let jwt = Arc::new(JwtService::new(&settings.jwt_secret));

    let state = AppState::new(blog_service, jwt);
    server::run_http(&settings, state).await
}

async fn build_post_store(settings: &PostStoreSettings) -> Result<Arc<dyn PostRepository>> {
    match settings {
        PostStoreSettings::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = create_pool(database_url, *max_connections).await?;
            run_migrations(&pool).await?;
            info!("using PostgreSQL post store");
            Ok(Arc::new(PostgresPostRepository::new(pool)))
        }
        PostStoreSettings::Memory => {
            info!("using in-memory post store");
            Ok(Arc::new(InMemoryPostRepository::new()))
        }
    }
}
