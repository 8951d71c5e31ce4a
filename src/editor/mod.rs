//! Page editing.
//!
//! [`PageEditor`] is the per-page state machine for the title and body
//! drafts; [`FieldBuffer`] is the rope-backed text input the terminal UI
//! types into while a field is being edited.

mod buffer;
mod page_editor;

pub use buffer::{Cursor, Direction, FieldBuffer};
pub use page_editor::{DraftField, FieldMode, PageEditor};
