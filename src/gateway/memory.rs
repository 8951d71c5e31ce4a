use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use super::{Gateway, GatewayError, Result};
use crate::pages::{Page, PageDraft, PageId, PageUpdate};

#[derive(Debug, Default)]
struct Store {
    pages: Vec<Page>,
    next_id: u64,
    failure: Option<GatewayError>,
    requests: usize,
}

/// In-process gateway with server-assigned numeric ids.
///
/// [`MemoryGateway::fail_with`] makes every following request fail, which
/// is how tests exercise the error paths of the collection.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    store: Mutex<Store>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store. Ids continue after the largest numeric id present.
    pub fn with_pages(pages: Vec<Page>) -> Self {
        let next_id = pages
            .iter()
            .filter_map(|p| p.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            store: Mutex::new(Store {
                pages,
                next_id,
                ..Store::default()
            }),
        }
    }

    /// Fail every request with `error` until [`MemoryGateway::recover`].
    pub fn fail_with(&self, error: GatewayError) {
        self.lock().failure = Some(error);
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    /// Snapshot of the stored pages.
    pub fn pages(&self) -> Vec<Page> {
        self.lock().pages.clone()
    }

    /// Number of requests received, failed ones included.
    pub fn request_count(&self) -> usize {
        self.lock().requests
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> Result<MutexGuard<'_, Store>> {
        let mut store = self.lock();
        store.requests += 1;
        match store.failure.clone() {
            Some(err) => Err(err),
            None => Ok(store),
        }
    }
}

impl Gateway for MemoryGateway {
    async fn list_pages(&self) -> Result<Vec<Page>> {
        Ok(self.begin()?.pages.clone())
    }

    async fn create_page(&self, draft: &PageDraft) -> Result<Page> {
        let mut store = self.begin()?;
        store.next_id += 1;
        let now = Utc::now().timestamp_millis();
        let page = Page {
            id: PageId::new(store.next_id.to_string()),
            title: draft.title.clone(),
            body: draft.body.clone(),
            created_at: now,
            updated_at: now,
        };
        store.pages.push(page.clone());
        Ok(page)
    }

    async fn update_page(&self, id: &PageId, update: &PageUpdate) -> Result<Page> {
        let mut store = self.begin()?;
        let page = store
            .pages
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        if let Some(title) = &update.title {
            page.title.clone_from(title);
        }
        if let Some(body) = &update.body {
            page.body.clone_from(body);
        }
        page.updated_at = Utc::now().timestamp_millis().max(page.created_at);
        Ok(page.clone())
    }

    async fn delete_page(&self, id: &PageId) -> Result<()> {
        let mut store = self.begin()?;
        let before = store.pages.len();
        store.pages.retain(|p| &p.id != id);
        if store.pages.len() == before {
            return Err(GatewayError::NotFound(id.clone()));
        }
        Ok(())
    }
}
