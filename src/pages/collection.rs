use tracing::{debug, error, info, warn};

use super::{CollectionError, Page, PageDraft, PageId, PageUpdate};
use crate::gateway::{Gateway, GatewayError};

/// Prompt passed to the confirmation collaborator before deleting.
pub const DELETE_PROMPT: &str = "Delete this page?";

/// Yes/no confirmation supplied by the caller.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// The authoritative page list and the selected page.
///
/// `pages` is `None` until the first load finishes and a `Vec` (possibly
/// empty) from then on, so callers can tell "loading" from "no pages".
///
/// Every remote operation comes in two halves: an async method that calls
/// the gateway, and an `apply_*` method that folds a gateway result into
/// the state. The async methods are the `apply_*` methods plus the call, so
/// an event loop that runs requests in the background gets the same
/// semantics by applying results as they arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCollection {
    pages: Option<Vec<Page>>,
    current: Option<PageId>,
}

impl PageCollection {
    /// An unloaded collection.
    pub const fn new() -> Self {
        Self {
            pages: None,
            current: None,
        }
    }

    /// A loaded collection, selecting the first page.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        let current = pages.first().map(|p| p.id.clone());
        Self {
            pages: Some(pages),
            current,
        }
    }

    pub const fn is_loaded(&self) -> bool {
        self.pages.is_some()
    }

    /// The pages in display order, or `None` while loading.
    pub fn pages(&self) -> Option<&[Page]> {
        self.pages.as_deref()
    }

    pub fn len(&self) -> usize {
        self.pages.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn current_page_id(&self) -> Option<&PageId> {
        self.current.as_ref()
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    /// Display index of the selected page.
    pub fn current_index(&self) -> Option<usize> {
        let id = self.current.as_ref()?;
        self.position(id)
    }

    pub fn get(&self, id: &PageId) -> Option<&Page> {
        self.pages.as_ref()?.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PageId) -> bool {
        self.get(id).is_some()
    }

    fn position(&self, id: &PageId) -> Option<usize> {
        self.pages.as_ref()?.iter().position(|p| &p.id == id)
    }

    /// Select `id`. Unknown ids are ignored and return `false`.
    pub fn select_page(&mut self, id: &PageId) -> bool {
        if !self.contains(id) {
            debug!(%id, "ignoring selection of unknown page");
            return false;
        }
        self.current = Some(id.clone());
        true
    }

    /// Move the selection by `delta` places, clamped to the list.
    pub fn select_relative(&mut self, delta: isize) -> bool {
        let Some(pages) = self.pages.as_ref() else {
            return false;
        };
        if pages.is_empty() {
            return false;
        }
        let from = self.current_index().unwrap_or(0);
        let to = from.saturating_add_signed(delta).min(pages.len() - 1);
        let id = pages[to].id.clone();
        let changed = self.current.as_ref() != Some(&id);
        self.current = Some(id);
        changed
    }

    /// Keep the selection on an existing page: first page when the current
    /// one is gone, nothing when the list is empty.
    fn resolve_selection(&mut self) {
        let pages = self.pages.as_deref().unwrap_or_default();
        let still_there = self
            .current
            .as_ref()
            .is_some_and(|id| pages.iter().any(|p| &p.id == id));
        if !still_there {
            self.current = pages.first().map(|p| p.id.clone());
        }
    }

    // --- Applying gateway results ---

    /// Fold the result of a full fetch into the collection.
    ///
    /// On failure a first load yields an empty list; a reload of an already
    /// loaded collection leaves it unchanged.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after logging it.
    pub fn apply_loaded(
        &mut self,
        result: Result<Vec<Page>, GatewayError>,
    ) -> Result<usize, GatewayError> {
        match result {
            Ok(pages) => {
                let count = pages.len();
                info!(count, "loaded pages");
                self.pages = Some(pages);
                self.resolve_selection();
                Ok(count)
            }
            Err(err) => {
                error!(%err, "failed to load pages");
                if self.pages.is_none() {
                    self.pages = Some(Vec::new());
                    self.current = None;
                }
                Err(err)
            }
        }
    }

    /// Append and select a page the gateway just created.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after logging it; the collection is unchanged.
    pub fn apply_created(
        &mut self,
        result: Result<Page, GatewayError>,
    ) -> Result<PageId, GatewayError> {
        match result {
            Ok(page) => {
                let id = page.id.clone();
                info!(%id, "created page");
                self.pages.get_or_insert_with(Vec::new).push(page);
                self.current = Some(id.clone());
                Ok(id)
            }
            Err(err) => {
                error!(%err, "failed to create page");
                Err(err)
            }
        }
    }

    /// Replace the record for `id` with the gateway's canonical copy.
    ///
    /// A result for a page removed in the meantime is dropped.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after logging it; the collection is unchanged.
    pub fn apply_updated(
        &mut self,
        id: &PageId,
        result: Result<Page, GatewayError>,
    ) -> Result<(), GatewayError> {
        match result {
            Ok(page) => {
                let Some(index) = self.position(id) else {
                    warn!(%id, "update finished for a page no longer in the collection");
                    return Ok(());
                };
                if let Some(pages) = self.pages.as_mut() {
                    pages[index] = page;
                }
                debug!(%id, "updated page");
                Ok(())
            }
            Err(err) => {
                error!(%id, %err, "failed to update page");
                Err(err)
            }
        }
    }

    /// Remove `id` after the gateway confirmed the delete.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after logging it; the collection is unchanged.
    pub fn apply_deleted(
        &mut self,
        id: &PageId,
        result: Result<(), GatewayError>,
    ) -> Result<(), GatewayError> {
        if let Err(err) = result {
            error!(%id, %err, "failed to delete page");
            return Err(err);
        }
        if let Some(pages) = self.pages.as_mut() {
            pages.retain(|p| &p.id != id);
        }
        info!(%id, "deleted page");
        self.resolve_selection();
        Ok(())
    }

    // --- Remote operations ---

    /// Fetch every page from the gateway.
    ///
    /// Never leaves the collection unloaded; see [`Self::apply_loaded`].
    ///
    /// # Errors
    ///
    /// Returns the gateway error after it has been logged and applied.
    pub async fn load<G: Gateway>(&mut self, gateway: &G) -> Result<usize, GatewayError> {
        let result = gateway.list_pages().await;
        self.apply_loaded(result)
    }

    /// Create a blank page and select it once the gateway assigns its id.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the collection is unchanged.
    pub async fn create_page<G: Gateway>(&mut self, gateway: &G) -> Result<PageId, GatewayError> {
        let result = gateway.create_page(&PageDraft::blank()).await;
        self.apply_created(result)
    }

    /// Send a partial update for `id`.
    ///
    /// # Errors
    ///
    /// [`CollectionError::UnknownPage`] if `id` is not in the collection (no
    /// request is made), otherwise the gateway error.
    pub async fn update_page<G: Gateway>(
        &mut self,
        gateway: &G,
        id: &PageId,
        update: PageUpdate,
    ) -> Result<(), CollectionError> {
        if !self.contains(id) {
            return Err(CollectionError::UnknownPage(id.clone()));
        }
        let result = gateway.update_page(id, &update).await;
        self.apply_updated(id, result)?;
        Ok(())
    }

    /// Delete `id` once `confirm` agrees. Returns `false` when declined.
    ///
    /// # Errors
    ///
    /// [`CollectionError::UnknownPage`] if `id` is not in the collection,
    /// otherwise the gateway error.
    pub async fn delete_page<G: Gateway>(
        &mut self,
        gateway: &G,
        id: &PageId,
        confirm: &impl Confirm,
    ) -> Result<bool, CollectionError> {
        if !self.contains(id) {
            return Err(CollectionError::UnknownPage(id.clone()));
        }
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(%id, "delete declined");
            return Ok(false);
        }
        let result = gateway.delete_page(id).await;
        self.apply_deleted(id, result)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str, title: &str) -> Page {
        Page {
            id: PageId::new(id),
            title: title.to_string(),
            body: format!("{title} body text"),
            created_at: 1_000,
            updated_at: 1_000,
        }
    }

    fn network() -> GatewayError {
        GatewayError::Network("connection refused".to_string())
    }

    #[test]
    fn test_new_collection_is_unloaded() {
        let collection = PageCollection::new();
        assert!(!collection.is_loaded());
        assert!(collection.pages().is_none());
        assert!(collection.current_page().is_none());
    }

    #[test]
    fn test_apply_loaded_selects_first_page() {
        let mut collection = PageCollection::new();
        let count = collection
            .apply_loaded(Ok(vec![page("1", "A"), page("2", "B")]))
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(collection.current_page_id(), Some(&PageId::new("1")));
    }

    #[test]
    fn test_apply_loaded_empty_leaves_selection_empty() {
        let mut collection = PageCollection::new();
        collection.apply_loaded(Ok(Vec::new())).unwrap();
        assert_eq!(collection.pages(), Some(&[][..]));
        assert!(collection.current_page_id().is_none());
    }

    #[test]
    fn test_failed_first_load_yields_empty_list() {
        let mut collection = PageCollection::new();
        assert!(collection.apply_loaded(Err(network())).is_err());
        assert!(collection.is_loaded());
        assert_eq!(collection.pages(), Some(&[][..]));
    }

    #[test]
    fn test_failed_reload_keeps_existing_pages() {
        let mut collection = PageCollection::from_pages(vec![page("1", "A")]);
        assert!(collection.apply_loaded(Err(network())).is_err());
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.current_page_id(), Some(&PageId::new("1")));
    }

    #[test]
    fn test_reload_keeps_selection_when_present() {
        let mut collection = PageCollection::from_pages(vec![page("1", "A"), page("2", "B")]);
        collection.select_page(&PageId::new("2"));
        collection
            .apply_loaded(Ok(vec![page("1", "A"), page("2", "B2"), page("3", "C")]))
            .unwrap();
        assert_eq!(collection.current_page().unwrap().title, "B2");
    }

    #[test]
    fn test_select_unknown_page_is_ignored() {
        let mut collection = PageCollection::from_pages(vec![page("1", "A")]);
        assert!(!collection.select_page(&PageId::new("nope")));
        assert_eq!(collection.current_page_id(), Some(&PageId::new("1")));
    }

    #[test]
    fn test_select_relative_clamps() {
        let mut collection =
            PageCollection::from_pages(vec![page("1", "A"), page("2", "B"), page("3", "C")]);
        assert!(collection.select_relative(1));
        assert_eq!(collection.current_index(), Some(1));
        assert!(collection.select_relative(5));
        assert_eq!(collection.current_index(), Some(2));
        assert!(!collection.select_relative(1));
        assert!(collection.select_relative(-10));
        assert_eq!(collection.current_index(), Some(0));
    }

    #[test]
    fn test_apply_created_appends_and_selects() {
        let mut collection = PageCollection::from_pages(vec![page("1", "A")]);
        let id = collection.apply_created(Ok(page("42", ""))).unwrap();
        assert_eq!(id, PageId::new("42"));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.pages().unwrap()[1].id, PageId::new("42"));
        assert_eq!(collection.current_page_id(), Some(&id));
    }

    #[test]
    fn test_failed_create_leaves_collection_unchanged() {
        let mut collection = PageCollection::from_pages(vec![page("1", "A")]);
        let before = collection.clone();
        assert!(collection.apply_created(Err(network())).is_err());
        assert_eq!(collection, before);
    }

    #[test]
    fn test_apply_updated_replaces_record_in_place() {
        let mut collection = PageCollection::from_pages(vec![page("1", "A"), page("2", "B")]);
        let mut updated = page("1", "A2");
        updated.updated_at = 2_000;
        collection.apply_updated(&PageId::new("1"), Ok(updated)).unwrap();
        let first = &collection.pages().unwrap()[0];
        assert_eq!(first.title, "A2");
        assert_eq!(first.updated_at, 2_000);
    }

    #[test]
    fn test_update_for_removed_page_is_dropped() {
        let mut collection = PageCollection::from_pages(vec![page("1", "A")]);
        collection
            .apply_updated(&PageId::new("9"), Ok(page("9", "ghost")))
            .unwrap();
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_delete_selected_reselects_first_remaining() {
        let mut collection = PageCollection::from_pages(vec![page("A", "A"), page("B", "B")]);
        collection.apply_deleted(&PageId::new("A"), Ok(())).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.current_page_id(), Some(&PageId::new("B")));
    }

    #[test]
    fn test_delete_unselected_keeps_selection() {
        let mut collection =
            PageCollection::from_pages(vec![page("A", "A"), page("B", "B"), page("C", "C")]);
        collection.select_page(&PageId::new("C"));
        collection.apply_deleted(&PageId::new("B"), Ok(())).unwrap();
        assert_eq!(collection.current_page_id(), Some(&PageId::new("C")));
    }

    #[test]
    fn test_delete_last_page_clears_selection() {
        let mut collection = PageCollection::from_pages(vec![page("A", "A")]);
        collection.apply_deleted(&PageId::new("A"), Ok(())).unwrap();
        assert!(collection.is_empty());
        assert!(collection.current_page_id().is_none());
        assert!(collection.is_loaded());
    }

    #[test]
    fn test_failed_delete_leaves_collection_unchanged() {
        let mut collection = PageCollection::from_pages(vec![page("A", "A")]);
        let before = collection.clone();
        assert!(collection.apply_deleted(&PageId::new("A"), Err(network())).is_err());
        assert_eq!(collection, before);
    }
}
