//! Observer trait and the stock observers.

use std::cell::RefCell;

use crate::actions::ActionRecord;
use crate::game::TurnReport;

/// Receives notifications as a game is played.
pub trait GameObserver {
    /// Called after every `ActionProcessor::execute`.
    fn on_action(&self, _record: &ActionRecord) {}

    /// Called after an `end_turn` action advanced the turn.
    fn on_turn(&self, _report: &TurnReport) {}
}

/// Observer that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl GameObserver for NoopObserver {}

/// Observer that keeps everything it sees.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    actions: RefCell<Vec<ActionRecord>>,
    turns: RefCell<Vec<TurnReport>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All action records so far, oldest first.
    #[must_use]
    pub fn actions(&self) -> Vec<ActionRecord> {
        self.actions.borrow().clone()
    }

    #[must_use]
    pub fn turns(&self) -> Vec<TurnReport> {
        self.turns.borrow().clone()
    }

    /// Number of failed actions seen.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.actions.borrow().iter().filter(|r| !r.success).count()
    }

    pub fn clear(&self) {
        self.actions.borrow_mut().clear();
        self.turns.borrow_mut().clear();
    }
}

impl GameObserver for RecordingObserver {
    fn on_action(&self, record: &ActionRecord) {
        self.actions.borrow_mut().push(record.clone());
    }

    fn on_turn(&self, report: &TurnReport) {
        self.turns.borrow_mut().push(report.clone());
    }
}
