use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::common::{mask, truncate_start_with_ellipsis};
use crate::prompt::{Field, Notice, NoticeLevel, PromptState};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Centers a `width` x `height` box inside `area`, shrinking it to fit.
pub fn centered_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Clears `area` and draws a titled border. Returns the inner area.
pub fn render_container(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
    border_type: BorderType,
) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Helper struct for keyboard hints.
pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

pub const PROMPT_HINTS: [InputHint<'static>; 4] = [
    InputHint {
        key: "Enter",
        action: "next/submit",
    },
    InputHint {
        key: "Tab",
        action: "switch",
    },
    InputHint {
        key: "F2",
        action: "layout",
    },
    InputHint {
        key: "Esc",
        action: "cancel",
    },
];

/// Renders a line of keyboard hints on the last row of `area`.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[InputHint], highlight_color: Color) {
    if area.height == 0 {
        return;
    }
    let hints_y = area.y + area.height.saturating_sub(1);
    let hints_area = Rect::new(area.x, hints_y, area.width, 1);

    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(highlight_color)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(para, hints_area);
}

/// Renders a separator line.
pub fn render_separator(frame: &mut Frame, area: Rect, y_offset: u16) {
    if y_offset >= area.height {
        return;
    }
    let separator = "─".repeat(area.width as usize);
    let separator_area = Rect::new(area.x, area.y + y_offset, area.width, 1);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        ))),
        separator_area,
    );
}

/// Renders one field as `Label  value█`. Password values are always masked.
pub fn render_field(frame: &mut Frame, area: Rect, state: &PromptState, field: Field, accent: Color) {
    let focused = state.focus == field;
    let label = format!("{:<10}", field.label());
    let raw = state.field(field);
    let value = match field {
        Field::Username => raw.to_string(),
        Field::Password => mask(raw),
    };

    let cursor = if focused && !state.is_checking() { "█" } else { "" };
    let max_value_width = (area.width as usize)
        .saturating_sub(label.width())
        .saturating_sub(cursor.width());
    let value = truncate_start_with_ellipsis(&value, max_value_width);

    let label_style = if focused {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let spans = vec![
        Span::styled(label, label_style),
        Span::styled(value, Style::default().fg(Color::White)),
        Span::styled(cursor, Style::default().fg(accent)),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    }
}

/// Renders the notice, or the spinner while a check is outstanding.
pub fn render_notice(frame: &mut Frame, area: Rect, state: &PromptState) {
    if state.is_checking() {
        let spinner = SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()];
        let line = Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Cyan)),
            Span::styled(" Checking credentials…", Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let Some(notice) = &state.notice else {
        return;
    };
    let style = Style::default().fg(notice_color(notice.level()));
    let text = match notice {
        Notice::Welcome(_) => notice.message(),
        _ => format!("{}: {}", notice.title(), notice.message()),
    };
    frame.render_widget(
        Paragraph::new(text).style(style).wrap(Wrap { trim: true }),
        area,
    );
}

/// Renders the fields, notice and hints shared by every layout into `body`.
pub fn render_form(frame: &mut Frame, body: Rect, state: &PromptState, accent: Color) {
    let row = |offset: u16, height: u16| {
        let y = body.y + offset.min(body.height);
        let height = height.min((body.y + body.height).saturating_sub(y));
        Rect::new(body.x, y, body.width, height)
    };

    render_field(frame, row(0, 1), state, Field::Username, accent);
    render_field(frame, row(2, 1), state, Field::Password, accent);
    render_notice(frame, row(4, body.height.saturating_sub(5)), state);
    render_hints(frame, body, &PROMPT_HINTS, accent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_area_fits_inside() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_area(area, 40, 10), Rect::new(20, 7, 40, 10));

        let small = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_area(small, 40, 10), small);
    }
}
