use libdesk_core::config::PromptLayout;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

use super::LoginView;
use super::render_utils::{centered_area, render_container, render_form};
use crate::prompt::PromptState;

const WIDTH: u16 = 60;
const HEIGHT: u16 = 11;

/// Bordered form centred on the screen.
pub struct PlainView;

impl LoginView for PlainView {
    fn layout(&self) -> PromptLayout {
        PromptLayout::Plain
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &PromptState) {
        let popup = centered_area(area, WIDTH, HEIGHT);
        let inner = render_container(frame, popup, "Staff Login", Color::Cyan, BorderType::Plain);
        let body = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height,
        );
        render_form(frame, body, state, Color::Cyan);
    }
}
