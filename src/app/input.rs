use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::model::Focus;
use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::validation::Field;

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::HelpScrollDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::HelpScrollUp),
                _ => Some(Message::HideHelp),
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('q') {
            return Some(Message::Quit);
        }

        if model.delete_prompt.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Message::ConfirmDelete),
                _ => Some(Message::CancelDelete),
            };
        }

        if let Some(input) = model.input.as_ref() {
            return Self::handle_input_key(key, input.field);
        }

        if ctrl && key.code == KeyCode::Char('c') {
            return Some(Message::Quit);
        }

        match model.focus {
            Focus::Sidebar => Self::handle_sidebar_key(key),
            Focus::Page => Self::handle_page_key(key, model),
        }
    }

    fn handle_sidebar_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Message::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::SelectPrevious),
            KeyCode::Char('n') => Some(Message::NewPage),
            KeyCode::Char('d') | KeyCode::Delete => Some(Message::DeletePage),
            KeyCode::Char('r') => Some(Message::Reload),
            KeyCode::Tab | KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                Some(Message::FocusPage)
            }
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }

    fn handle_page_key(key: KeyEvent, model: &Model) -> Option<Message> {
        match key.code {
            KeyCode::Char('t') => Some(Message::StartEdit(Field::Title)),
            KeyCode::Char('b') => Some(Message::StartEdit(Field::Body)),
            KeyCode::Char('e') | KeyCode::Enter => Some(Message::StartEdit(model.focused_field)),
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Char('j' | 'k')
            | KeyCode::Up
            | KeyCode::Down => Some(Message::NextField),
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => Some(Message::FocusSidebar),
            KeyCode::Char('r') => Some(Message::Reload),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }

    fn handle_input_key(key: KeyEvent, field: Field) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(Message::CancelEdit),
            KeyCode::Char('s') if ctrl => Some(Message::SaveEdit),
            KeyCode::Char('c') if ctrl => Some(Message::CancelEdit),
            KeyCode::Enter => match field {
                Field::Title => Some(Message::SaveEdit),
                Field::Body => Some(Message::InputNewline),
            },
            KeyCode::Backspace => Some(Message::InputBackspace),
            KeyCode::Delete => Some(Message::InputDelete),
            KeyCode::Left => Some(Message::InputMove(Direction::Left)),
            KeyCode::Right => Some(Message::InputMove(Direction::Right)),
            KeyCode::Up => Some(Message::InputMove(Direction::Up)),
            KeyCode::Down => Some(Message::InputMove(Direction::Down)),
            KeyCode::Home => Some(Message::InputHome),
            KeyCode::End => Some(Message::InputEnd),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Message::InputChar(c))
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible || model.delete_prompt.is_some() || model.input.is_some() {
            return None;
        }

        let total_area = Rect::new(0, 0, model.width, model.height.saturating_sub(1));
        let [sidebar, page] = crate::ui::split_main_columns(total_area);

        if point_in_rect(mouse.column, mouse.row, sidebar) {
            return match mouse.kind {
                MouseEventKind::ScrollDown => Some(Message::SelectNext),
                MouseEventKind::ScrollUp => Some(Message::SelectPrevious),
                MouseEventKind::Up(MouseButton::Left) => sidebar_page_at(model, sidebar, mouse.row),
                _ => None,
            };
        }

        if matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left))
            && point_in_rect(mouse.column, mouse.row, page)
            && model.editor.is_some()
        {
            let [title, _, body, _] = crate::ui::split_page_fields(page);
            if point_in_rect(mouse.column, mouse.row, title) {
                return Some(Message::StartEdit(Field::Title));
            }
            if point_in_rect(mouse.column, mouse.row, body) {
                return Some(Message::StartEdit(Field::Body));
            }
        }
        None
    }
}

const fn point_in_rect(column: u16, row: u16, rect: Rect) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

/// The page listed on sidebar row `row`, skipping the border rows.
fn sidebar_page_at(model: &Model, sidebar: Rect, row: u16) -> Option<Message> {
    if row <= sidebar.y || row >= sidebar.y + sidebar.height.saturating_sub(1) {
        return None;
    }
    let visible_rows = usize::from(sidebar.height.saturating_sub(2));
    let first = crate::ui::sidebar_first_row(model, visible_rows);
    let idx = first + usize::from(row - sidebar.y - 1);
    let page = model.collection.pages()?.get(idx)?;
    Some(Message::SelectPage(page.id.clone()))
}
