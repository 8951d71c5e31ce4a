use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::editor::{FieldBuffer, PageEditor};
use crate::gateway::DEFAULT_API_URL;
use crate::pages::{PageCollection, PageId, PageUpdate};
use crate::validation::{Field, Rules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    Page,
}

/// A gateway call produced by `update` and started by the effects layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Load,
    Create,
    Update { id: PageId, update: PageUpdate },
    Delete { id: PageId },
}

/// The text input for the field currently being edited.
#[derive(Debug)]
pub struct FieldInput {
    pub field: Field,
    pub buffer: FieldBuffer,
    /// First visible line of the input
    pub scroll_offset: usize,
    /// First visible char column of every line
    pub col_offset: usize,
}

impl FieldInput {
    pub fn new(field: Field, text: &str) -> Self {
        Self {
            field,
            buffer: FieldBuffer::at_end(text),
            scroll_offset: 0,
            col_offset: 0,
        }
    }

    /// Scroll so the cursor cell is inside a window of `rows` x `cols`.
    pub const fn keep_cursor_visible(&mut self, rows: usize, cols: usize) {
        let cursor = self.buffer.cursor();
        self.scroll_offset = scroll_to(self.scroll_offset, cursor.line, rows);
        self.col_offset = scroll_to(self.col_offset, cursor.col, cols);
    }
}

/// Smallest change to `offset` that keeps `pos` inside `[offset, offset + span)`.
const fn scroll_to(offset: usize, pos: usize, span: usize) -> usize {
    if pos < offset {
        pos
    } else if span > 0 && pos >= offset + span {
        pos + 1 - span
    } else {
        offset
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Pages and selection
    pub collection: PageCollection,
    /// Drafts for the selected page
    pub editor: Option<PageEditor>,
    /// Text input while a field is in edit mode
    pub input: Option<FieldInput>,
    /// Length rules handed to every editor
    pub rules: Rules,
    /// Pane receiving keys
    pub focus: Focus,
    /// Field highlighted in the page pane
    pub focused_field: Field,
    /// Scroll offset for the sidebar list
    pub sidebar_scroll_offset: usize,
    /// Page awaiting delete confirmation
    pub delete_prompt: Option<PageId>,
    /// Gateway calls waiting to be started
    pub outbox: Vec<Request>,
    /// Gateway calls started but not yet answered
    pub in_flight: usize,
    /// Content API address shown in the status bar
    pub api_url: String,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Scroll offset for the help overlay
    pub help_scroll_offset: usize,
    /// Terminal size
    pub width: u16,
    pub height: u16,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after first quit attempt with an unsaved edit; allows second quit to proceed
    pub quit_confirmed: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("pages", &self.collection.len())
            .field("current", &self.collection.current_page_id())
            .field("focus", &self.focus)
            .field("editing", &self.input.as_ref().map(|i| i.field))
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model that has not loaded any pages yet.
    pub fn new(api_url: impl Into<String>, rules: Rules, terminal_size: (u16, u16)) -> Self {
        Self {
            collection: PageCollection::new(),
            editor: None,
            input: None,
            rules,
            focus: Focus::Sidebar,
            focused_field: Field::Title,
            sidebar_scroll_offset: 0,
            delete_prompt: None,
            outbox: Vec::new(),
            in_flight: 0,
            api_url: api_url.into(),
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            help_scroll_offset: 0,
            width: terminal_size.0,
            height: terminal_size.1,
            toast: None,
            should_quit: false,
            quit_confirmed: false,
        }
    }

    /// Queue a gateway call for the effects layer.
    pub(super) fn request(&mut self, request: Request) {
        self.outbox.push(request);
    }

    /// Hand queued gateway calls to the caller, counting them as in flight.
    pub fn take_requests(&mut self) -> Vec<Request> {
        let requests = std::mem::take(&mut self.outbox);
        self.in_flight += requests.len();
        requests
    }

    pub(super) fn finish_request(&mut self) {
        if let Some(remaining) = self.in_flight.checked_sub(1) {
            self.in_flight = remaining;
        } else {
            warn!("gateway result arrived with no request in flight");
        }
    }

    pub const fn is_syncing(&self) -> bool {
        self.in_flight > 0 || !self.outbox.is_empty()
    }

    pub const fn is_editing(&self) -> bool {
        self.input.is_some()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.editor
            .as_ref()
            .is_some_and(PageEditor::has_unsaved_changes)
    }

    /// Point the editor at the selected page.
    ///
    /// A different page gets a fresh editor and drops any text input; the
    /// same page only refreshes its committed values.
    pub(super) fn sync_editor(&mut self) {
        let Some(page) = self.collection.current_page() else {
            self.editor = None;
            self.input = None;
            return;
        };
        match self.editor.as_mut() {
            Some(editor) if editor.page_id() == &page.id => {
                editor.sync_committed(&page.title, &page.body);
            }
            _ => {
                self.editor = Some(PageEditor::for_page(page, self.rules));
                self.input = None;
                self.focused_field = Field::Title;
            }
        }
        self.keep_selection_visible();
    }

    /// Rows available to the sidebar list.
    pub const fn sidebar_rows(&self) -> usize {
        // borders (2) + status bar (1)
        self.height.saturating_sub(3) as usize
    }

    pub(super) fn keep_selection_visible(&mut self) {
        let Some(index) = self.collection.current_index() else {
            self.sidebar_scroll_offset = 0;
            return;
        };
        let rows = self.sidebar_rows().max(1);
        if index < self.sidebar_scroll_offset {
            self.sidebar_scroll_offset = index;
        } else if index >= self.sidebar_scroll_offset + rows {
            self.sidebar_scroll_offset = index + 1 - rows;
        }
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Rules::default(), (80, 24))
    }
}
