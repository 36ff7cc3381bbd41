//! Post use-case service.
//!
//! # Responsibility
//! - Provide post create/get/list/update/delete APIs plus the homepage
//!   recent-posts and by-user/by-tag listings.
//! - Read back written rows so callers always receive persisted state,
//!   tags included.
//!
//! # Invariants
//! - `update_post` uses full replacement semantics for title, content
//!   and the tag set, in one repository transaction.
//! - Unresolved tag ids submitted with a write are skipped, not errors.

use crate::model::post::{NewPost, PostUpdate};
use crate::model::EntityKind;
use crate::repo::post_repo::{PostRecord, PostRepository};
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for post use-cases.
#[derive(Debug)]
pub enum PostServiceError {
    /// Target post does not exist.
    PostNotFound(i64),
    /// A tag-scoped listing was requested for an absent tag.
    TagNotFound(i64),
    /// Creation referenced a user that does not exist.
    OwnerMissing(i64),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for PostServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::OwnerMissing(id) => write!(f, "post references missing user: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent post state: {details}"),
        }
    }
}

impl Error for PostServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PostServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(EntityKind::Post, id) => Self::PostNotFound(id),
            RepoError::NotFound(EntityKind::Tag, id) => Self::TagNotFound(id),
            RepoError::MissingUser(id) => Self::OwnerMissing(id),
            other => Self::Repo(other),
        }
    }
}

/// Post service facade over repository implementations.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one post with its initial tag set; the owning user must
    /// exist.
    pub fn create_post(&mut self, input: &NewPost) -> Result<PostRecord, PostServiceError> {
        let id = self.repo.create_post(input)?;
        info!(
            "event=post_create module=service status=ok post_id={id} user_id={}",
            input.user_id
        );
        self.repo
            .get_post(id)?
            .ok_or(PostServiceError::InconsistentState(
                "created post not found in read-back",
            ))
    }

    /// Gets one post with its tags, signaling not-found for absent rows.
    pub fn get_post(&self, id: i64) -> Result<PostRecord, PostServiceError> {
        self.repo
            .get_post(id)?
            .ok_or(PostServiceError::PostNotFound(id))
    }

    /// Homepage listing: the newest posts, newest first, capped at five.
    pub fn recent_posts(&self) -> Result<Vec<PostRecord>, PostServiceError> {
        Ok(self.repo.list_recent_posts()?)
    }

    /// Lists all posts owned by one user, newest first.
    pub fn posts_by_user(&self, user_id: i64) -> Result<Vec<PostRecord>, PostServiceError> {
        Ok(self.repo.list_posts_by_user(user_id)?)
    }

    /// Lists all posts attached to one tag; absent tags signal not-found.
    pub fn posts_by_tag(&self, tag_id: i64) -> Result<Vec<PostRecord>, PostServiceError> {
        Ok(self.repo.list_posts_by_tag(tag_id)?)
    }

    /// Replaces title, content and the full tag set, then returns the
    /// persisted record.
    pub fn update_post(
        &mut self,
        id: i64,
        input: &PostUpdate,
    ) -> Result<PostRecord, PostServiceError> {
        self.repo.update_post(id, input)?;
        self.repo
            .get_post(id)?
            .ok_or(PostServiceError::InconsistentState(
                "updated post not found in read-back",
            ))
    }

    /// Replaces the full tag set for one post and returns the persisted
    /// record.
    pub fn set_post_tags(
        &mut self,
        id: i64,
        tag_ids: &[i64],
    ) -> Result<PostRecord, PostServiceError> {
        self.repo.set_post_tags(id, tag_ids)?;
        self.repo
            .get_post(id)?
            .ok_or(PostServiceError::InconsistentState(
                "post missing after tag replacement",
            ))
    }

    /// Deletes one post; its tags survive.
    pub fn delete_post(&self, id: i64) -> Result<(), PostServiceError> {
        self.repo.delete_post(id)?;
        info!("event=post_delete module=service status=ok post_id={id}");
        Ok(())
    }
}
