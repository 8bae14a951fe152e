use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;

use super::PromptFrontend;
use crate::prompt::{Notice, PromptInput, PromptState};

/// One step of a scripted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Input(PromptInput),
    /// Wait until no credential check is outstanding.
    Settle,
}

/// Front-end that replays a fixed list of steps.
///
/// Once the script runs out it answers `Cancel`, so a prompt driven by a
/// script always closes. Every distinct notice the prompt shows is recorded.
#[derive(Debug, Default)]
pub struct ScriptedFrontend {
    steps: VecDeque<ScriptStep>,
    notices: Vec<Notice>,
    frames: usize,
    exhausted_while_open: Option<bool>,
}

impl ScriptedFrontend {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Notices in the order they appeared. Repeats of the same notice on
    /// consecutive frames are recorded once.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// True when the script ran out while the prompt was still open.
    pub fn exhausted_while_open(&self) -> bool {
        self.exhausted_while_open.unwrap_or(false)
    }
}

impl PromptFrontend for ScriptedFrontend {
    fn render(&mut self, state: &PromptState) -> Result<()> {
        self.frames += 1;
        if let Some(notice) = &state.notice
            && self.notices.last() != Some(notice)
        {
            self.notices.push(notice.clone());
        }
        Ok(())
    }

    fn next_input(
        &mut self,
        state: &PromptState,
        timeout: Duration,
    ) -> Result<Option<PromptInput>> {
        loop {
            match self.steps.pop_front() {
                None => {
                    self.exhausted_while_open.get_or_insert(state.is_open());
                    return Ok(Some(PromptInput::Cancel));
                }
                Some(ScriptStep::Settle) if state.is_checking() => {
                    self.steps.push_front(ScriptStep::Settle);
                    std::thread::sleep(timeout);
                    return Ok(None);
                }
                Some(ScriptStep::Settle) => {}
                Some(ScriptStep::Input(input)) => return Ok(Some(input)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use libdesk_core::config::PromptLayout;

    use super::*;
    use crate::common::TaskId;

    #[test]
    fn test_replays_inputs_then_cancels() {
        let state = PromptState::new(PromptLayout::Plain);
        let mut frontend = ScriptedFrontend::new([
            ScriptStep::Settle,
            ScriptStep::Input(PromptInput::Insert('a')),
        ]);
        let poll = Duration::from_millis(1);

        assert_eq!(
            frontend.next_input(&state, poll).unwrap(),
            Some(PromptInput::Insert('a'))
        );
        assert_eq!(
            frontend.next_input(&state, poll).unwrap(),
            Some(PromptInput::Cancel)
        );
        assert!(frontend.exhausted_while_open());
    }

    #[test]
    fn test_settle_waits_while_checking() {
        let mut state = PromptState::new(PromptLayout::Plain);
        state.check.active = Some(TaskId(0));
        let mut frontend = ScriptedFrontend::new([ScriptStep::Settle]);

        assert_eq!(
            frontend.next_input(&state, Duration::from_millis(1)).unwrap(),
            None
        );
        state.check.clear();
        assert_eq!(
            frontend.next_input(&state, Duration::from_millis(1)).unwrap(),
            Some(PromptInput::Cancel)
        );
    }

    #[test]
    fn test_records_distinct_notices() {
        let mut state = PromptState::new(PromptLayout::Plain);
        let mut frontend = ScriptedFrontend::default();

        frontend.render(&state).unwrap();
        state.notice = Some(Notice::MissingInput);
        frontend.render(&state).unwrap();
        frontend.render(&state).unwrap();
        state.notice = Some(Notice::AuthenticationRejected);
        frontend.render(&state).unwrap();

        assert_eq!(frontend.frames(), 4);
        assert_eq!(
            frontend.notices(),
            &[Notice::MissingInput, Notice::AuthenticationRejected]
        );
    }
}
