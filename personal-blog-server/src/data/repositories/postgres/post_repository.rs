use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::data::post_repository::{NewPost, PostFilter, PostReplacement, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    title: String,
    description: String,
    theme: Option<String>,
    creator: Option<String>,
    photo: Option<String>,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, description, theme, creator, photo
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, description, theme, creator, photo
            FROM posts
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn search_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, description, theme, creator, photo
            FROM posts
            WHERE ($1::TEXT IS NULL OR title ILIKE $1 ESCAPE '\')
              AND ($2::TEXT IS NULL OR theme ILIKE $2 ESCAPE '\')
              AND ($3::TEXT IS NULL OR creator ILIKE $3 ESCAPE '\')
            ORDER BY id ASC
            "#,
        )
        .bind(filter.title.as_deref().map(contains_pattern))
        .bind(filter.theme.as_deref().map(contains_pattern))
        .bind(filter.creator.as_deref().map(contains_pattern))
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, description, theme, creator, photo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, theme, creator, photo
            "#,
        )
        .bind(input.title)
        .bind(input.description)
        .bind(input.theme)
        .bind(input.creator)
        .bind(input.photo)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn update_post(&self, input: PostReplacement) -> Result<Post, DomainError> {
        let id = input.id;
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = $2,
                description = $3,
                theme = $4,
                creator = $5,
                photo = $6
            WHERE id = $1
            RETURNING id, title, description, theme, creator, photo
            "#,
        )
        .bind(id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.theme)
        .bind(input.creator)
        .bind(input.photo)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post)
            .transpose()?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))
    }

    async fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(())
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.title,
        row.description,
        row.theme,
        row.creator,
        row.photo,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    DomainError::Unexpected(err.to_string())
}

/// Wraps `value` in `%` for ILIKE, escaping the pattern metacharacters it contains.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
