//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Gateway calls never block the loop. `update` queues a [`Request`] on
//! the model, the [`Dispatcher`] runs it on a tokio runtime, and the result
//! comes back as a [`Message`].

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::Dispatcher;
pub use model::{FieldInput, Focus, Model, Request, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::time::Duration;

use crate::config::DEFAULT_TIMEOUT;
use crate::gateway::DEFAULT_API_URL;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    api_url: String,
    timeout: Duration,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application talking to the content API at `api_url`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: DEFAULT_TIMEOUT,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Set the per-request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
