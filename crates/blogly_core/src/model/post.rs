//! Post entity and its operation inputs.
//!
//! # Invariants
//! - `title` is required, non-empty and bounded to [`MAX_TITLE_CHARS`].
//! - `content` is required, non-empty and unbounded.
//! - `created_at` is assigned once at creation and never mutated.
//! - `user_id` must reference an existing user.

use crate::model::{require_non_empty, EntityKind, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for post titles, matching the persisted column contract.
pub const MAX_TITLE_CHARS: usize = 100;

const FRIENDLY_DATE_FORMAT: &str = "%a %b %-d %Y, %-I:%M %p";

/// A blog post owned by exactly one user and carrying zero or more tags
/// through the `posts_tags` association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// System-assigned auto-increment id.
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Creation instant in epoch milliseconds (UTC). Immutable.
    pub created_at: i64,
    /// Owning user (one-directional foreign key).
    pub user_id: i64,
}

impl Post {
    /// Display-only rendering of `created_at`, e.g. `Sun Aug 3 2025, 4:05 PM`.
    ///
    /// Not a stored invariant; callers must not parse it back.
    pub fn friendly_date(&self) -> String {
        match DateTime::<Utc>::from_timestamp_millis(self.created_at) {
            Some(instant) => instant.format(FRIENDLY_DATE_FORMAT).to_string(),
            None => format!("epoch_ms={}", self.created_at),
        }
    }
}

fn validate_title_and_content(title: &str, content: &str) -> Result<(), ValidationError> {
    require_non_empty(EntityKind::Post, "title", title)?;
    let title_chars = title.chars().count();
    if title_chars > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong {
            actual: title_chars,
        });
    }
    require_non_empty(EntityKind::Post, "content", content)?;
    Ok(())
}

/// Input for post creation. The submitted tag ids are attached in the
/// same transaction as the insert; ids that resolve to no tag are
/// silently skipped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub tag_ids: Vec<i64>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title_and_content(&self.title, &self.content)
    }
}

/// Input for post update: title/content replacement plus a full tag-set
/// replace. `created_at` and `user_id` are never touched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub tag_ids: Vec<i64>,
}

impl PostUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title_and_content(&self.title, &self.content)
    }
}
