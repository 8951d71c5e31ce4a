// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. pages::PageCollection)
    clippy::module_name_repetitions
)]

//! # Folio
//!
//! A terminal editor for pages kept behind a remote content API.
//!
//! Each page has a title and a body. Folio lists the pages, lets the user
//! edit either field in place with length validation, and pushes saves,
//! creates and deletes through a [`gateway::Gateway`].
//!
//! ## Architecture
//!
//! The terminal UI uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events, key presses and gateway results
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`config`]: Flag files and resolved settings
//! - [`editor`]: Per-page edit state machine and text input
//! - [`gateway`]: Remote storage for pages
//! - [`pages`]: Page records and the page collection
//! - [`ui`]: Terminal UI components
//! - [`validation`]: Field length rules

pub mod app;
pub mod config;
pub mod editor;
pub mod gateway;
pub mod pages;
pub mod ui;
pub mod validation;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::PageEditor;
    pub use crate::gateway::{Gateway, GatewayError, HttpGateway, MemoryGateway};
    pub use crate::pages::{Page, PageCollection, PageId, PageUpdate};
    pub use crate::validation::{Field, Rules};
}
