use libdesk_core::config::PromptLayout;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use super::LoginView;
use super::render_utils::{centered_area, render_container, render_form, render_separator};
use crate::prompt::PromptState;

const WIDTH: u16 = 62;
const HEIGHT: u16 = 14;
const BACKDROP: Color = Color::Rgb(24, 28, 40);

/// Centred card over a shaded backdrop, with a library header.
pub struct CardView;

impl LoginView for CardView {
    fn layout(&self) -> PromptLayout {
        PromptLayout::Card
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &PromptState) {
        frame.render_widget(Block::default().style(Style::default().bg(BACKDROP)), area);

        let card = centered_area(area, WIDTH, HEIGHT);
        let inner = render_container(frame, card, "Sign in", Color::Yellow, BorderType::Rounded);
        if inner.height < 3 {
            return;
        }

        let header = Paragraph::new(vec![
            Line::styled(
                "Library Desk",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::styled("Staff access only", Style::default().fg(Color::Gray)),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, Rect::new(inner.x, inner.y, inner.width, 2));
        render_separator(frame, inner, 2);

        let body = Rect::new(
            inner.x + 2,
            inner.y + 3,
            inner.width.saturating_sub(4),
            inner.height.saturating_sub(3),
        );
        render_form(frame, body, state, Color::Yellow);
    }
}
