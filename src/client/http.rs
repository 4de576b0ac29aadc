use async_trait::async_trait;
use serde::Deserialize;

use crate::web::models::{ActionResponse, ForumAction, ForumPageResponse};

use super::{ClientError, ForumApi};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to a forum server over HTTP. `base_url` is the server root, without
/// a trailing slash (e.g. `http://127.0.0.1:8080`).
pub struct HttpForumApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpForumApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_default();
        Err(ClientError::Server { status, message })
    }
}

#[async_trait]
impl ForumApi for HttpForumApi {
    async fn fetch_page(&self, page: u64, limit: u64) -> Result<ForumPageResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/forums", self.base_url))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn submit(&self, action: &ForumAction) -> Result<ActionResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/forums", self.base_url))
            .json(action)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
