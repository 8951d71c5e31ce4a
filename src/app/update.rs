use crate::app::Model;
use crate::app::model::{FieldInput, Focus, Request, ToastLevel};
use crate::editor::Direction;
use crate::gateway::GatewayError;
use crate::pages::{Page, PageId, PageUpdate};
use crate::validation::Field;

/// All possible events and actions in the application.
///
/// These represent user input, gateway results, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Sidebar
    /// Select the page above
    SelectPrevious,
    /// Select the page below
    SelectNext,
    /// Select a page by id (mouse click)
    SelectPage(PageId),
    /// Ask the gateway for a new blank page
    NewPage,
    /// Open the delete prompt for the selected page
    DeletePage,
    /// Confirm the pending delete
    ConfirmDelete,
    /// Dismiss the pending delete
    CancelDelete,
    /// Fetch the page list again
    Reload,

    // Focus
    /// Move keyboard focus to the sidebar
    FocusSidebar,
    /// Move keyboard focus to the page pane
    FocusPage,
    /// Toggle between title and body in the page pane
    NextField,

    // Field editing
    /// Enter edit mode for a field
    StartEdit(Field),
    /// Leave edit mode without saving
    CancelEdit,
    /// Validate and save the field being edited
    SaveEdit,
    /// Insert a character at the cursor
    InputChar(char),
    /// Insert a line break at the cursor
    InputNewline,
    /// Delete character before cursor (Backspace)
    InputBackspace,
    /// Delete character at cursor (Delete)
    InputDelete,
    /// Move the input cursor
    InputMove(Direction),
    /// Move cursor to beginning of line (Home)
    InputHome,
    /// Move cursor to end of line (End)
    InputEnd,

    // Gateway results
    /// Initial load or reload finished
    PagesLoaded(Result<Vec<Page>, GatewayError>),
    /// Create finished
    PageCreated(Result<Page, GatewayError>),
    /// Update for a page finished
    PageUpdated(PageId, Result<Page, GatewayError>),
    /// Delete for a page finished
    PageDeleted(PageId, Result<(), GatewayError>),

    // Overlays
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Scroll help overlay up
    HelpScrollUp,
    /// Scroll help overlay down
    HelpScrollDown,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// Gateway calls are not made here; they are queued on the model and
/// started by the effects layer after `update` returns.
pub fn update(mut model: Model, msg: Message) -> Model {
    if !matches!(msg, Message::Quit) {
        model.quit_confirmed = false;
    }

    match msg {
        // Sidebar
        Message::SelectPrevious => select_relative(&mut model, -1),
        Message::SelectNext => select_relative(&mut model, 1),
        Message::SelectPage(id) => {
            if !model.is_editing() && model.collection.select_page(&id) {
                model.sync_editor();
            }
        }
        Message::NewPage => {
            if model.collection.is_loaded() && !model.is_editing() {
                model.request(Request::Create);
            }
        }
        Message::DeletePage => {
            if !model.is_editing()
                && let Some(id) = model.collection.current_page_id()
            {
                model.delete_prompt = Some(id.clone());
            }
        }
        Message::ConfirmDelete => {
            if let Some(id) = model.delete_prompt.take() {
                model.request(Request::Delete { id });
            }
        }
        Message::CancelDelete => {
            model.delete_prompt = None;
        }
        Message::Reload => model.request(Request::Load),

        // Focus
        Message::FocusSidebar => {
            if !model.is_editing() {
                model.focus = Focus::Sidebar;
            }
        }
        Message::FocusPage => {
            if model.editor.is_some() {
                model.focus = Focus::Page;
            }
        }
        Message::NextField => {
            if !model.is_editing() {
                model.focused_field = model.focused_field.other();
            }
        }

        // Field editing
        Message::StartEdit(field) => start_edit(&mut model, field),
        Message::CancelEdit => {
            if let Some(input) = model.input.take()
                && let Some(editor) = model.editor.as_mut()
            {
                editor.cancel(input.field);
            }
        }
        Message::SaveEdit => save_edit(&mut model),
        Message::InputChar(ch) => edit_input(&mut model, |buf| buf.insert_char(ch)),
        Message::InputNewline => edit_input(&mut model, |buf| {
            buf.split_line();
        }),
        Message::InputBackspace => edit_input(&mut model, |buf| {
            buf.delete_back();
        }),
        Message::InputDelete => edit_input(&mut model, |buf| {
            buf.delete_forward();
        }),
        Message::InputMove(direction) => edit_input(&mut model, |buf| buf.move_cursor(direction)),
        Message::InputHome => edit_input(&mut model, |buf| buf.move_home()),
        Message::InputEnd => edit_input(&mut model, |buf| buf.move_end()),

        // Gateway results
        Message::PagesLoaded(result) => {
            model.finish_request();
            if let Err(err) = model.collection.apply_loaded(result) {
                model.show_toast(ToastLevel::Error, format!("Load failed: {}", err.user_message()));
            }
            model.sync_editor();
        }
        Message::PageCreated(result) => {
            model.finish_request();
            let editing = model
                .is_editing()
                .then(|| model.collection.current_page_id().cloned())
                .flatten();
            match model.collection.apply_created(result) {
                Ok(_) => {
                    // Keep an open edit on its page; the new page waits in the list.
                    if let Some(previous) = editing {
                        model.collection.select_page(&previous);
                    } else {
                        model.sync_editor();
                        model.focus = Focus::Page;
                    }
                    model.show_toast(ToastLevel::Info, "Page created");
                }
                Err(err) => model.show_toast(
                    ToastLevel::Error,
                    format!("Create failed: {}", err.user_message()),
                ),
            }
        }
        Message::PageUpdated(id, result) => {
            model.finish_request();
            match model.collection.apply_updated(&id, result) {
                Ok(()) => model.show_toast(ToastLevel::Info, "Saved"),
                Err(err) => model.show_toast(
                    ToastLevel::Error,
                    format!("Save failed: {}", err.user_message()),
                ),
            }
            model.sync_editor();
        }
        Message::PageDeleted(id, result) => {
            model.finish_request();
            match model.collection.apply_deleted(&id, result) {
                Ok(()) => model.show_toast(ToastLevel::Info, "Page deleted"),
                Err(err) => model.show_toast(
                    ToastLevel::Error,
                    format!("Delete failed: {}", err.user_message()),
                ),
            }
            model.sync_editor();
            if model.editor.is_none() {
                model.focus = Focus::Sidebar;
            }
        }

        // Overlays
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll_offset = 0;
        }
        Message::HideHelp => {
            model.help_visible = false;
            model.help_scroll_offset = 0;
        }
        Message::HelpScrollUp => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_sub(1);
        }
        Message::HelpScrollDown => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_add(1);
        }

        // Window
        Message::Resize(width, height) => {
            model.width = width;
            model.height = height;
            model.keep_selection_visible();
            keep_input_cursor_visible(&mut model);
        }
        Message::Redraw => {}

        // Application
        Message::Quit => {
            if model.has_unsaved_changes() && !model.quit_confirmed {
                model.quit_confirmed = true;
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved edit. Quit again to discard it",
                );
            } else {
                model.should_quit = true;
            }
        }
    }

    model
}

fn select_relative(model: &mut Model, delta: isize) {
    // Switching pages mid-edit would drop the draft.
    if model.is_editing() {
        return;
    }
    if model.collection.select_relative(delta) {
        model.sync_editor();
    }
}

fn start_edit(model: &mut Model, field: Field) {
    if model.is_editing() {
        return;
    }
    let Some(editor) = model.editor.as_mut() else {
        return;
    };
    editor.start_edit(field);
    model.input = Some(FieldInput::new(field, editor.field(field).value()));
    model.focus = Focus::Page;
    model.focused_field = field;
    keep_input_cursor_visible(model);
}

fn save_edit(model: &mut Model) {
    let (Some(input), Some(editor)) = (model.input.as_ref(), model.editor.as_mut()) else {
        return;
    };
    let field = input.field;
    let id = editor.page_id().clone();
    let mut update = None;
    let saved = editor.save(field, |title, body| {
        update = Some(PageUpdate::both(title, body));
    });
    if saved {
        model.input = None;
        if let Some(update) = update {
            model.request(Request::Update { id, update });
        }
    }
}

/// Apply `edit` to the active input and pass the new text to the editor.
fn edit_input(model: &mut Model, edit: impl FnOnce(&mut crate::editor::FieldBuffer)) {
    let Some(input) = model.input.as_mut() else {
        return;
    };
    edit(&mut input.buffer);
    keep_input_cursor_visible(model);
    let Some(input) = model.input.as_ref() else {
        return;
    };
    if input.buffer.is_dirty()
        && let Some(editor) = model.editor.as_mut()
    {
        editor.change(input.field, input.buffer.text());
    }
}

/// Scroll the active input so its cursor fits the field block on screen.
fn keep_input_cursor_visible(model: &mut Model) {
    let cols = crate::ui::field_input_cols(model.width);
    let Some(input) = model.input.as_mut() else {
        return;
    };
    let rows = match input.field {
        Field::Title => 1,
        Field::Body => crate::ui::body_input_rows(model.height),
    };
    input.keep_cursor_visible(rows, cols);
}
