//! Machine-readable output for `--json`.

use chess::{Outcome, Position};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub fen: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved: Option<String>,
    /// Set when an occupancy change could not be resolved and the turn passed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_passed: Option<String>,
}

impl Report {
    pub fn from_position(position: &Position) -> Self {
        Self {
            fen: position.to_fen(),
            moved: None,
            turn_passed: None,
        }
    }

    pub fn with_outcome(mut self, outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Moved(mv) => self.moved = Some(mv.uci()),
            Outcome::TurnPassed(reason) => self.turn_passed = Some(reason.to_string()),
        }
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
