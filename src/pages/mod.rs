//! Pages and the collection that owns them.
//!
//! - [`Page`]: the authoritative record for one page
//! - [`PageCollection`]: the ordered list plus the selected page

mod collection;

pub use collection::{Confirm, DELETE_PROMPT, PageCollection};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::GatewayError;

/// Opaque page identifier assigned by the content API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A page as held by the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub body: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Last update time in epoch milliseconds, never before `created_at`.
    pub updated_at: i64,
}

impl Page {
    /// Title for lists, with a placeholder for untitled pages.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled page"
        } else {
            &self.title
        }
    }
}

/// Payload for creating a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageDraft {
    pub title: String,
    pub body: String,
}

impl PageDraft {
    /// The empty page requested by "new page".
    pub fn blank() -> Self {
        Self::default()
    }
}

/// Partial update; absent fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PageUpdate {
    pub fn both(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: None,
        }
    }

    pub fn body(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: Some(body.into()),
        }
    }
}

/// Errors returned by collection operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("page {0} is not in the collection")]
    UnknownPage(PageId),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
