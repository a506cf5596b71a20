use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PostStoreSettings {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) post_store: PostStoreSettings,
    pub(crate) jwt_secret: String,
    pub(crate) http_addr: String,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) log_level: String,
    pub(crate) log_format: LogFormat,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_concurrency_limit: usize,
    pub(crate) http_request_timeout_secs: u64,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env { lookup };

        let post_store = match env.get_or("POST_STORE", "postgres").to_lowercase().as_str() {
            "postgres" => PostStoreSettings::Postgres {
                database_url: env
                    .required("DATABASE_URL")
                    .context("DATABASE_URL is required when POST_STORE=postgres")?,
                max_connections: env.positive("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            "memory" => PostStoreSettings::Memory,
            other => {
                return Err(anyhow!(
                    "unknown POST_STORE '{other}', expecting 'postgres' or 'memory'"
                ));
            }
        };

        let jwt_secret = env.required("JWT_SECRET").context("JWT_SECRET is required")?;
        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let http_addr = env.get_or("HTTP_ADDR", "0.0.0.0:8080");
        let cors_origins = parse_cors_origins(
            &env.get_or("CORS_ORIGINS", "http://localhost:8000,http://127.0.0.1:8000"),
        );
        let log_level = env
            .get("LOG_LEVEL")
            .or_else(|| env.get("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());
        let log_format = match env.get_or("LOG_FORMAT", "compact").to_lowercase().as_str() {
            "compact" => LogFormat::Compact,
            "json" => LogFormat::Json,
            other => {
                return Err(anyhow!(
                    "unknown LOG_FORMAT '{other}', expecting 'compact' or 'json'"
                ));
            }
        };

        Ok(Self {
            post_store,
            jwt_secret,
            http_addr,
            cors_origins,
            log_level,
            log_format,
            http_request_body_limit_bytes: env
                .positive("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?,
            http_concurrency_limit: env.positive("HTTP_CONCURRENCY_LIMIT", 256)?,
            http_request_timeout_secs: env.positive("HTTP_REQUEST_TIMEOUT_SECS", 10)?,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &str) -> Result<String> {
        let value = self.get(key).ok_or_else(|| anyhow!("{key} is not set"))?;
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(anyhow!("{key} must not be empty"));
        }
        Ok(value)
    }

    fn positive<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Default + PartialEq + ToString,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let value = self
            .get_or(key, &default.to_string())
            .parse::<T>()
            .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

        if value == T::default() {
            return Err(anyhow!("{key} must be > 0"));
        }
        Ok(value)
    }
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
