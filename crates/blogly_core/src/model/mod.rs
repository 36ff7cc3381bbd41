//! Relational domain model for the blogging core.
//!
//! # Responsibility
//! - Define the entity shapes persisted by the repository layer.
//! - Define typed, per-operation input structs validated at the boundary.
//!
//! # Invariants
//! - Every entity is identified by a system-assigned integer id.
//! - A post belongs to exactly one user; posts and tags share a pure
//!   many-to-many association with no extra attributes.
//! - Required string fields are non-empty after trimming.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod post;
pub mod tag;
pub mod user;

/// Entity discriminator used by not-found and validation reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Post,
    Tag,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Post => write!(f, "post"),
            Self::Tag => write!(f, "tag"),
        }
    }
}

/// Field-level validation failure raised before any SQL mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required string field is missing or blank.
    EmptyField {
        entity: EntityKind,
        field: &'static str,
    },
    /// Post title exceeds the persisted column bound.
    TitleTooLong { actual: usize },
    /// Tag name collides with an existing tag.
    DuplicateTagName(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "{entity} {field} must not be empty")
            }
            Self::TitleTooLong { actual } => write!(
                f,
                "post title exceeds {} characters (got {actual})",
                post::MAX_TITLE_CHARS
            ),
            Self::DuplicateTagName(name) => write!(f, "tag name `{name}` already exists"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_non_empty(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{require_non_empty, EntityKind, ValidationError};

    #[test]
    fn require_non_empty_rejects_blank_values() {
        let err = require_non_empty(EntityKind::User, "first_name", "   ")
            .expect_err("blank value must be rejected");
        assert_eq!(
            err,
            ValidationError::EmptyField {
                entity: EntityKind::User,
                field: "first_name",
            }
        );
        assert_eq!(err.to_string(), "user first_name must not be empty");
    }

    #[test]
    fn require_non_empty_accepts_real_values() {
        assert!(require_non_empty(EntityKind::Tag, "name", "rust").is_ok());
    }
}
