use ratatui::layout::Flex;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::pages::{DELETE_PROMPT, Page};

pub fn render_delete_prompt(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(id) = model.delete_prompt.as_ref() else {
        return;
    };
    let title = model
        .collection
        .get(id)
        .map_or("Untitled page", Page::display_title);

    let popup = centered_popup_rect(area.width.saturating_sub(16).max(40), 8, area);
    let lines = vec![
        Line::styled(DELETE_PROMPT, Style::default().add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::styled(format!("\"{title}\""), Style::default().fg(Color::Cyan)),
        Line::raw(""),
        Line::styled(
            "y confirm \u{00b7} any other key cancels",
            Style::default().fg(Color::Indexed(245)),
        ),
    ];
    let block = Block::default()
        .title("Delete Page")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Key bindings shown in the help overlay, grouped by where they apply.
const KEYMAP: &[(&str, &[(&str, &str)])] = &[
    (
        "Pages",
        &[
            ("j/k or Up/Down", "Select page"),
            ("n", "New page"),
            ("d / Delete", "Delete page (asks first)"),
            ("r", "Reload from server"),
            ("Tab / Enter", "Focus page"),
        ],
    ),
    (
        "Page",
        &[
            ("t / b", "Edit title / body"),
            ("Tab", "Switch field"),
            ("e / Enter", "Edit focused field"),
            ("Esc", "Back to pages"),
            ("Click", "Edit field"),
        ],
    ),
    (
        "Editing",
        &[
            ("Enter", "Save title"),
            ("Ctrl-s", "Save"),
            ("Enter (body)", "New line"),
            ("Esc", "Cancel edit"),
            ("Arrows, Home/End", "Move cursor"),
        ],
    ),
    (
        "Other",
        &[
            ("q / Ctrl-c", "Quit"),
            ("Ctrl-q", "Quit, also while editing"),
            ("? / F1", "Toggle help"),
        ],
    ),
];

const KEY_COLUMN: usize = 20;

fn help_lines(model: &Model) -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let path_or = |path: Option<&std::path::PathBuf>, missing: &str| {
        path.map_or_else(|| missing.to_string(), |p| p.display().to_string())
    };

    let mut lines = Vec::new();
    for (section, bindings) in KEYMAP {
        lines.push(Line::styled(*section, heading));
        lines.extend(
            bindings
                .iter()
                .map(|(keys, action)| Line::raw(format!("  {keys:<KEY_COLUMN$}{action}"))),
        );
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled("Config", heading));
    lines.extend([
        Line::raw(format!("  Server: {}", model.api_url)),
        Line::raw(format!(
            "  Global: {}",
            path_or(model.config_global_path.as_ref(), "<unknown>")
        )),
        Line::raw(format!(
            "  Local override: {}",
            path_or(model.config_local_path.as_ref(), "<none>")
        )),
    ]);
    lines
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup = centered_popup_rect(
        area.width.saturating_sub(12).max(48),
        area.height.saturating_sub(4).max(12),
        area,
    );
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let [content, footer] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
    let lines = help_lines(model);
    let max_scroll = lines.len().saturating_sub(usize::from(content.height));
    let scroll = model.help_scroll_offset.min(max_scroll);
    let visible: Vec<Line> = lines.into_iter().skip(scroll).collect();
    frame.render_widget(Paragraph::new(visible), content);

    let hint = Line::styled(
        "j/k scroll \u{2502} any other key closes",
        Style::default().fg(Color::Indexed(245)),
    );
    frame.render_widget(Paragraph::new(hint), footer);
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    popup
}
