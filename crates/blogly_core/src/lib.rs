//! Core domain logic for the Blogly blogging application.
//! This crate is the single source of truth for the relational data
//! model and its consistency rules; HTTP routing and templating live in
//! boundary crates that consume the service layer.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::post::{NewPost, Post, PostUpdate, MAX_TITLE_CHARS};
pub use model::tag::{NewTag, Tag, TagUpdate};
pub use model::user::{NewUser, User, UserUpdate, DEFAULT_IMAGE_URL};
pub use model::{EntityKind, ValidationError};
pub use repo::post_repo::{
    PostRecord, PostRepository, SqlitePostRepository, RECENT_POSTS_LIMIT,
};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::post_service::{PostService, PostServiceError};
pub use service::tag_service::{TagService, TagServiceError};
pub use service::user_service::{UserService, UserServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
