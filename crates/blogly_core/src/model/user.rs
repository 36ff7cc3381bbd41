//! User entity and its operation inputs.
//!
//! # Invariants
//! - `first_name` and `last_name` are required, non-empty strings.
//! - `image_url` is always present after persistence; creation without an
//!   explicit value stores the fixed placeholder URL.

use crate::model::{require_non_empty, EntityKind, ValidationError};
use serde::{Deserialize, Serialize};

/// Placeholder avatar stored when no image URL is supplied at creation.
pub const DEFAULT_IMAGE_URL: &str = "https://tinyurl.com/nhex22ry";

/// Author of posts. Owns its posts exclusively; deleting a user cascades
/// to every post it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// System-assigned auto-increment id.
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

impl User {
    /// Display name: first and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for user creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    /// Absent value falls back to [`DEFAULT_IMAGE_URL`].
    pub image_url: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(EntityKind::User, "first_name", &self.first_name)?;
        require_non_empty(EntityKind::User, "last_name", &self.last_name)?;
        Ok(())
    }

    /// Image URL to persist, with the placeholder applied when absent.
    pub fn image_url_or_default(&self) -> &str {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => DEFAULT_IMAGE_URL,
        }
    }
}

/// Input for user update. All three fields are always re-written; the
/// edit form resubmits the complete field set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub image_url: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(EntityKind::User, "first_name", &self.first_name)?;
        require_non_empty(EntityKind::User, "last_name", &self.last_name)?;
        Ok(())
    }

    pub fn image_url_or_default(&self) -> &str {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => DEFAULT_IMAGE_URL,
        }
    }
}
