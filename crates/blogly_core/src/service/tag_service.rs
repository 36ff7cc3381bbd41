//! Tag use-case service.
//!
//! # Responsibility
//! - Provide tag create/list/get/rename/delete entry points.
//! - Read back written rows so callers always receive persisted state.
//!
//! # Invariants
//! - Name collisions surface as validation failures from the repository;
//!   the existing tag is never modified by a rejected write.

use crate::model::tag::{NewTag, Tag, TagUpdate};
use crate::model::EntityKind;
use crate::repo::tag_repo::TagRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for tag use-cases.
#[derive(Debug)]
pub enum TagServiceError {
    /// Target tag does not exist.
    TagNotFound(i64),
    /// Persistence-layer failure, including duplicate-name validation.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TagServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent tag state: {details}"),
        }
    }
}

impl Error for TagServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TagServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(EntityKind::Tag, id) => Self::TagNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Tag service facade over repository implementations.
pub struct TagService<R: TagRepository> {
    repo: R,
}

impl<R: TagRepository> TagService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all tags ordered by name.
    pub fn list_tags(&self) -> Result<Vec<Tag>, TagServiceError> {
        Ok(self.repo.list_tags()?)
    }

    /// Gets one tag by id, signaling not-found for absent rows.
    pub fn get_tag(&self, id: i64) -> Result<Tag, TagServiceError> {
        self.repo
            .get_tag(id)?
            .ok_or(TagServiceError::TagNotFound(id))
    }

    /// Creates one tag with a unique name.
    pub fn create_tag(&self, input: &NewTag) -> Result<Tag, TagServiceError> {
        let id = self.repo.create_tag(input)?;
        info!("event=tag_create module=service status=ok tag_id={id}");
        self.repo
            .get_tag(id)?
            .ok_or(TagServiceError::InconsistentState(
                "created tag not found in read-back",
            ))
    }

    /// Renames one tag, re-checking uniqueness, and returns the
    /// persisted row.
    pub fn update_tag(&self, id: i64, input: &TagUpdate) -> Result<Tag, TagServiceError> {
        self.repo.update_tag(id, input)?;
        self.repo
            .get_tag(id)?
            .ok_or(TagServiceError::InconsistentState(
                "updated tag not found in read-back",
            ))
    }

    /// Deletes one tag; posts it was attached to survive.
    pub fn delete_tag(&self, id: i64) -> Result<(), TagServiceError> {
        self.repo.delete_tag(id)?;
        info!("event=tag_delete module=service status=ok tag_id={id}");
        Ok(())
    }

    /// Lists the tags attached to one post, ordered by name.
    pub fn tags_for_post(&self, post_id: i64) -> Result<Vec<Tag>, TagServiceError> {
        Ok(self.repo.list_tags_for_post(post_id)?)
    }
}
