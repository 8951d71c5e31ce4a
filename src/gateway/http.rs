//! JSON-over-HTTP gateway for the content API.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use super::wire::{decode_page, decode_pages};
use super::{Gateway, GatewayError, Result};
use crate::pages::{Page, PageDraft, PageId, PageUpdate};

/// Base address used when nothing is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Gateway backed by the REST content API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("folio/", env!("CARGO_PKG_VERSION"))),
        );
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| GatewayError::Network(err.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/content", self.base_url)
    }

    fn page_url(&self, id: &PageId) -> String {
        format!("{}/content/{}", self.base_url, id)
    }

    /// Turn a non-success status into an error, keeping the body as context.
    async fn check(response: Response, id: Option<&PageId>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            return Err(GatewayError::NotFound(id.clone()));
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!(status = status.as_u16(), %message, "content API request failed");
        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn body(response: Response) -> Result<Vec<u8>> {
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(network)
    }
}

fn network(err: reqwest::Error) -> GatewayError {
    GatewayError::Network(err.to_string())
}

impl Gateway for HttpGateway {
    async fn list_pages(&self) -> Result<Vec<Page>> {
        let url = self.collection_url();
        debug!(%url, "GET pages");
        let response = self.client.get(&url).send().await.map_err(network)?;
        let response = Self::check(response, None).await?;
        decode_pages(&Self::body(response).await?)
    }

    async fn create_page(&self, draft: &PageDraft) -> Result<Page> {
        let url = self.collection_url();
        debug!(%url, "POST page");
        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(network)?;
        let response = Self::check(response, None).await?;
        decode_page(&Self::body(response).await?)
    }

    async fn update_page(&self, id: &PageId, update: &PageUpdate) -> Result<Page> {
        let url = self.page_url(id);
        debug!(%url, "PUT page");
        let response = self
            .client
            .put(&url)
            .json(update)
            .send()
            .await
            .map_err(network)?;
        let response = Self::check(response, Some(id)).await?;
        decode_page(&Self::body(response).await?)
    }

    async fn delete_page(&self, id: &PageId) -> Result<()> {
        let url = self.page_url(id);
        debug!(%url, "DELETE page");
        let response = self.client.delete(&url).send().await.map_err(network)?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_strip_trailing_slash() {
        let gateway = HttpGateway::new("http://example.test/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(gateway.base_url(), "http://example.test/api");
        assert_eq!(gateway.collection_url(), "http://example.test/api/content");
        assert_eq!(
            gateway.page_url(&PageId::new("42")),
            "http://example.test/api/content/42"
        );
    }
}
