//! The `services` module provides a high-level API for interacting with the database.
//! It encapsulates the query logic and data access patterns so the HTTP handlers can
//! work with domain models without knowing about the underlying schema.
//!
//! One sub-module per domain entity; all public items are re-exported here for
//! convenient access under the `crate::db::services::` path.

pub mod message_service;
pub mod post_service;
pub mod tag_service;

pub use message_service::*;
pub use post_service::*;
pub use tag_service::*;
