//! Remote content gateway.
//!
//! The [`Gateway`] trait is the only way pages reach durable storage.
//! [`HttpGateway`] talks JSON over HTTP to the content API;
//! [`MemoryGateway`] keeps pages in process and is used by tests.

mod http;
mod memory;
mod wire;

pub use http::{DEFAULT_API_URL, HttpGateway};
pub use memory::MemoryGateway;

use std::future::Future;

use thiserror::Error;

use crate::pages::{Page, PageDraft, PageId, PageUpdate};

/// Failures at the gateway boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The page does not exist on the server.
    #[error("page {0} not found")]
    NotFound(PageId),
}

impl GatewayError {
    /// Short text for the status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) => "Could not reach the content server",
            Self::Status { .. } => "The content server rejected the request",
            Self::Malformed(_) => "The content server sent an unexpected response",
            Self::NotFound(_) => "The page no longer exists on the server",
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Asynchronous CRUD access to page storage.
pub trait Gateway: Send + Sync {
    /// Fetch every page, in display order.
    fn list_pages(&self) -> impl Future<Output = Result<Vec<Page>>> + Send;

    /// Create a page and return the stored record.
    fn create_page(&self, draft: &PageDraft) -> impl Future<Output = Result<Page>> + Send;

    /// Apply a partial update and return the canonical record.
    fn update_page(
        &self,
        id: &PageId,
        update: &PageUpdate,
    ) -> impl Future<Output = Result<Page>> + Send;

    /// Remove a page.
    fn delete_page(&self, id: &PageId) -> impl Future<Output = Result<()>> + Send;
}
