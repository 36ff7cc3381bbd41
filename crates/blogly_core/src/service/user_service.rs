//! User use-case service.
//!
//! # Responsibility
//! - Provide user create/list/get/update/delete entry points.
//! - Read back written rows so callers always receive persisted state.
//!
//! # Invariants
//! - `update_user` re-writes all three fields (full replace).
//! - `delete_user` cascade semantics live in the repository; the service
//!   only reports the outcome.

use crate::model::user::{NewUser, User, UserUpdate};
use crate::model::EntityKind;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for user use-cases.
#[derive(Debug)]
pub enum UserServiceError {
    /// Target user does not exist.
    UserNotFound(i64),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent user state: {details}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(EntityKind::User, id) => Self::UserNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all users ordered by last name, then first name.
    pub fn list_users(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repo.list_users()?)
    }

    /// Gets one user by id, signaling not-found for absent rows.
    pub fn get_user(&self, id: i64) -> Result<User, UserServiceError> {
        self.repo
            .get_user(id)?
            .ok_or(UserServiceError::UserNotFound(id))
    }

    /// Creates one user; the placeholder image URL is applied when the
    /// input carries none.
    pub fn create_user(&self, input: &NewUser) -> Result<User, UserServiceError> {
        let id = self.repo.create_user(input)?;
        info!("event=user_create module=service status=ok user_id={id}");
        self.repo
            .get_user(id)?
            .ok_or(UserServiceError::InconsistentState(
                "created user not found in read-back",
            ))
    }

    /// Re-writes all three user fields and returns the persisted row.
    pub fn update_user(&self, id: i64, input: &UserUpdate) -> Result<User, UserServiceError> {
        self.repo.update_user(id, input)?;
        self.repo
            .get_user(id)?
            .ok_or(UserServiceError::InconsistentState(
                "updated user not found in read-back",
            ))
    }

    /// Deletes one user; the cascade removes its posts and their
    /// association rows.
    pub fn delete_user(&self, id: i64) -> Result<(), UserServiceError> {
        self.repo.delete_user(id)?;
        info!("event=user_delete module=service status=ok user_id={id}");
        Ok(())
    }
}
