use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};
use crate::validation::Field;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    if let Some(input) = model.input.as_ref() {
        let cursor = input.buffer.cursor();
        let keys = match input.field {
            Field::Title => "Enter:save  Esc:cancel  Ctrl+Q:quit",
            Field::Body => "Ctrl+S:save  Esc:cancel  Ctrl+Q:quit",
        };
        let status = format!(
            " EDIT {}  Ln {}, Col {}  {keys}",
            input.field,
            cursor.line + 1,
            cursor.col + 1
        );
        let bar =
            Paragraph::new(status).style(Style::default().bg(Color::Magenta).fg(Color::White));
        frame.render_widget(bar, area);
        return;
    }

    let count = model
        .collection
        .pages()
        .map_or_else(|| "-".to_string(), |p| p.len().to_string());
    let syncing = if model.is_syncing() { " [syncing]" } else { "" };
    let unsaved = if model.has_unsaved_changes() {
        " [unsaved]"
    } else {
        ""
    };

    let status = format!(
        " {}  {count} pages{syncing}{unsaved}  ?:help",
        model.api_url
    );
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
