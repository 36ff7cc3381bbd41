//! Tag entity and its operation inputs.
//!
//! # Invariants
//! - `name` is required and unique across all tags.
//! - Deleting a tag removes its association rows, never its posts.

use crate::model::{require_non_empty, EntityKind, ValidationError};
use serde::{Deserialize, Serialize};

/// Label shared by zero or more posts through the `posts_tags` association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// System-assigned auto-increment id.
    pub id: i64,
    pub name: String,
}

/// Input for tag creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTag {
    pub name: String,
}

impl NewTag {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(EntityKind::Tag, "name", &self.name)
    }
}

/// Input for tag rename. Uniqueness is re-checked at persistence time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagUpdate {
    pub name: String,
}

impl TagUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(EntityKind::Tag, "name", &self.name)
    }
}
