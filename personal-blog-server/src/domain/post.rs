use serde::{Deserialize, Serialize};

use super::error::DomainError;

const TITLE_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) theme: Option<String>,
    pub(crate) creator: Option<String>,
    pub(crate) photo: Option<String>,
}

impl Post {
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        theme: Option<String>,
        creator: Option<String>,
        photo: Option<String>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        let title = normalize_title(&title.into())?;

        Ok(Self {
            id,
            title,
            description: description.into(),
            theme,
            creator,
            photo,
        })
    }
}

/// Fields of a post before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) theme: Option<String>,
    pub(crate) creator: Option<String>,
    pub(crate) photo: Option<String>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            description: normalize_optional(self.description),
            theme: normalize_optional(self.theme),
            creator: normalize_optional(self.creator),
            photo: normalize_optional(self.photo),
        })
    }
}

/// Full replacement of the mutable fields of the post identified by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) theme: Option<String>,
    pub(crate) creator: Option<String>,
    pub(crate) photo: Option<String>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        validate_positive_i64("id", self.id)?;
        Ok(Self {
            id: self.id,
            title: normalize_title(&self.title)?,
            description: normalize_optional(self.description),
            theme: normalize_optional(self.theme),
            creator: normalize_optional(self.creator),
            photo: normalize_optional(self.photo),
        })
    }
}

/// Search criteria. A `None` field places no constraint on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SearchPostsRequest {
    pub(crate) title: Option<String>,
    pub(crate) theme: Option<String>,
    pub(crate) creator: Option<String>,
}

impl SearchPostsRequest {
    /// Blank filter values count as absent.
    pub(crate) fn normalize(self) -> Self {
        Self {
            title: normalize_optional(self.title),
            theme: normalize_optional(self.theme),
            creator: normalize_optional(self.creator),
        }
    }

    pub(crate) fn is_unconstrained(&self) -> bool {
        self.title.is_none() && self.theme.is_none() && self.creator.is_none()
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
