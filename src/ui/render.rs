use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{FieldInput, Focus, Model};
use crate::editor::PageEditor;
use crate::validation::Field;

use super::{PAGE_WIDTH_PERCENT, SIDEBAR_WIDTH_PERCENT, overlays, status};

const TITLE_BLOCK_HEIGHT: u16 = 3;
const ERROR_LINE_HEIGHT: u16 = 1;

pub fn split_main_columns(area: Rect) -> [Rect; 2] {
    Layout::horizontal([
        Constraint::Percentage(SIDEBAR_WIDTH_PERCENT),
        Constraint::Percentage(PAGE_WIDTH_PERCENT),
    ])
    .areas(area)
}

/// Title block, title error line, body block and body error line.
pub fn split_page_fields(area: Rect) -> [Rect; 4] {
    Layout::vertical([
        Constraint::Length(TITLE_BLOCK_HEIGHT),
        Constraint::Length(ERROR_LINE_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(ERROR_LINE_HEIGHT),
    ])
    .areas(area)
}

/// Text rows inside the body block for a terminal `height` rows tall.
pub fn body_input_rows(height: u16) -> usize {
    // status bar, title block, two error lines, body borders
    let chrome = 1 + TITLE_BLOCK_HEIGHT + 2 * ERROR_LINE_HEIGHT + 2;
    usize::from(height.saturating_sub(chrome).max(1))
}

/// Text columns inside a field block for a terminal `width` cols wide.
pub fn field_input_cols(width: u16) -> usize {
    let [_, page] = split_main_columns(Rect::new(0, 0, width, 1));
    usize::from(page.width.saturating_sub(2).max(1))
}

/// Index of the first page shown in a sidebar with `visible_rows` rows.
pub fn sidebar_first_row(model: &Model, visible_rows: usize) -> usize {
    let len = model.collection.pages().map_or(0, <[_]>::len);
    model
        .sidebar_scroll_offset
        .min(len.saturating_sub(visible_rows))
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let main_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let bar_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    let [sidebar, page] = split_main_columns(main_area);
    render_sidebar(model, frame, sidebar);
    render_page(model, frame, page);

    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, bar_area);
    } else {
        status::render_status_bar(model, frame, bar_area);
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, main_area);
    } else if model.delete_prompt.is_some() {
        overlays::render_delete_prompt(model, frame, main_area);
    }
}

fn focus_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn render_sidebar(model: &Model, frame: &mut Frame, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let title = model
        .collection
        .pages()
        .map_or_else(|| "Pages".to_string(), |p| format!("Pages ({})", p.len()));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focus_style(
            model.focus == Focus::Sidebar && !model.is_editing(),
        ));

    let Some(pages) = model.collection.pages() else {
        let loading = Paragraph::new(Line::styled("Loading...", dim)).block(block);
        frame.render_widget(loading, area);
        return;
    };
    if pages.is_empty() {
        let hint = Paragraph::new(Line::styled("No pages. Press n to create one.", dim))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let visible_rows = area.height.saturating_sub(2) as usize;
    let start = sidebar_first_row(model, visible_rows);
    let current = model.collection.current_page_id();
    // border (2) + marker and space (2)
    let title_width = usize::from(area.width.saturating_sub(4));

    let items: Vec<Line> = pages
        .iter()
        .skip(start)
        .take(visible_rows)
        .map(|page| {
            let selected = current == Some(&page.id);
            let marker = if selected { ">" } else { " " };
            let mut style = if page.title.is_empty() {
                dim.add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };
            if selected {
                style = style.reversed();
            }
            let title = truncate_to_width(page.display_title(), title_width);
            Line::styled(format!("{marker} {title}"), style)
        })
        .collect();

    frame.render_widget(Paragraph::new(items).block(block), area);
}

fn render_page(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(editor) = model.editor.as_ref() else {
        let message = if model.collection.is_loaded() {
            "Select or create a page"
        } else {
            "Loading..."
        };
        let empty = Paragraph::new(Line::styled(message, Style::default().fg(Color::DarkGray)))
            .block(Block::default().title("Page").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let [title_area, title_error, body_area, body_error] = split_page_fields(area);
    render_field(model, editor, Field::Title, frame, title_area, title_error);
    render_field(model, editor, Field::Body, frame, body_area, body_error);
}

fn render_field(
    model: &Model,
    editor: &PageEditor,
    field: Field,
    frame: &mut Frame,
    area: Rect,
    error_area: Rect,
) {
    let draft = editor.field(field);
    let input = model.input.as_ref().filter(|input| input.field == field);
    let highlighted = model.focus == Focus::Page && model.focused_field == field;

    let label = match field {
        Field::Title => "Title",
        Field::Body => "Body",
    };
    let (title, border_style) = if input.is_some() {
        (
            format!("{label} [editing]"),
            Style::default().fg(Color::Cyan),
        )
    } else {
        (label.to_string(), focus_style(highlighted))
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let paragraph = if let Some(input) = input {
        let inner = block.inner(area);
        Paragraph::new(input_lines(input, inner.height.into(), inner.width.into())).block(block)
    } else if draft.value().is_empty() {
        let placeholder = match field {
            Field::Title => "Untitled page",
            Field::Body => "Empty page",
        };
        Paragraph::new(Line::styled(
            placeholder,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
        .block(block)
    } else {
        Paragraph::new(draft.value().to_string())
            .wrap(Wrap { trim: false })
            .block(block)
    };
    frame.render_widget(paragraph, area);

    if let Some(error) = draft.error() {
        let line = Line::styled(format!(" {error}"), Style::default().fg(Color::Red));
        frame.render_widget(Paragraph::new(line), error_area);
    }
}

/// Cut `text` to at most `max` display columns, marking the cut with `…`.
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if max > 0 {
        out.push('\u{2026}');
    }
    out
}

/// Visible part of an input with the cursor drawn as an inverted cell.
///
/// Lines are cut to `cols` chars starting at the input's column offset.
fn input_lines(input: &FieldInput, rows: usize, cols: usize) -> Vec<Line<'static>> {
    let buf = &input.buffer;
    let cursor = buf.cursor();
    let start = input.scroll_offset;
    let end = (start + rows).min(buf.line_count());

    (start..end)
        .map(|line_idx| {
            let text: String = buf
                .line_at(line_idx)
                .unwrap_or_default()
                .chars()
                .skip(input.col_offset)
                .take(cols)
                .collect();
            if line_idx != cursor.line {
                return Line::raw(text);
            }
            let col = cursor.col.saturating_sub(input.col_offset);
            let before: String = text.chars().take(col).collect();
            let at = text
                .chars()
                .nth(col)
                .map_or_else(|| " ".to_string(), String::from);
            let after: String = text.chars().skip(col + 1).collect();
            Line::from(vec![
                Span::raw(before),
                Span::styled(at, Style::default().bg(Color::White).fg(Color::Black)),
                Span::raw(after),
            ])
        })
        .collect()
}
