//! Presentations of the login prompt.
//!
//! Both layouts draw the same `PromptState`; they differ only in decoration.
//! Views are pure functions of state and never see anything but the masked
//! password.

mod card;
mod plain;
mod render_utils;

pub use card::CardView;
pub use plain::PlainView;
use libdesk_core::config::PromptLayout;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::prompt::PromptState;

/// A way of drawing the prompt.
pub trait LoginView {
    fn layout(&self) -> PromptLayout;

    fn render(&self, frame: &mut Frame, area: Rect, state: &PromptState);
}

pub fn for_layout(layout: PromptLayout) -> Box<dyn LoginView> {
    match layout {
        PromptLayout::Plain => Box::new(PlainView),
        PromptLayout::Card => Box::new(CardView),
    }
}

/// Renders `state` with the view its layout selects, over the whole frame.
pub fn render(frame: &mut Frame, state: &PromptState) {
    let area = frame.area();
    for_layout(state.layout).render(frame, area, state);
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    /// Draws `state` on a `width` x `height` test terminal and returns the
    /// screen as one string per row.
    pub fn draw(view: &dyn LoginView, state: &PromptState, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                view.render(frame, area, state);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    pub fn screen_contains(screen: &[String], needle: &str) -> bool {
        screen.iter().any(|row| row.contains(needle))
    }
}
