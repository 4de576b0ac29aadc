//! Client-side counterpart of the forum API: a reqwest transport and a page
//! controller that caches the loaded window, filters and sorts it, and
//! applies optimistic like toggles.

pub mod controller;
pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::web::models::{ActionResponse, ForumAction, ForumPageResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Transport seam between the controller and the forum endpoint. The real
/// implementation is [`http::HttpForumApi`]; tests script an in-memory one.
#[async_trait]
pub trait ForumApi: Send + Sync {
    async fn fetch_page(&self, page: u64, limit: u64) -> Result<ForumPageResponse, ClientError>;
    async fn submit(&self, action: &ForumAction) -> Result<ActionResponse, ClientError>;
}

pub use controller::{ForumController, PostView};
pub use http::HttpForumApi;
