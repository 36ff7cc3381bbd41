//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs for the
//!   request-handler boundary.
//! - Translate absent rows into entity-specific not-found errors and
//!   return fully populated records templates can render directly.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Services stay storage-agnostic; they only see repository traits.

pub mod post_service;
pub mod tag_service;
pub mod user_service;
