//! Scripted MoveSearch implementation for testing

use crate::uci::parse_uci_move;
use crate::{EngineError, GoParams, MoveSearch};
use async_trait::async_trait;
use cozy_chess::Move;
use std::collections::VecDeque;

/// Replays queued replies in order and records every request.
#[derive(Default)]
pub struct ScriptedEngine {
    replies: VecDeque<Result<Move, EngineError>>,
    requests: Vec<(String, GoParams)>,
    quit: bool,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply in UCI notation. Panics on a malformed move.
    pub fn with_reply(mut self, uci: &str) -> Self {
        let mv = parse_uci_move(uci).expect("scripted reply must be a UCI move");
        self.replies.push_back(Ok(mv));
        self
    }

    /// Queue a failure.
    pub fn with_error(mut self, err: EngineError) -> Self {
        self.replies.push_back(Err(err));
        self
    }

    /// Positions requested so far, oldest first.
    pub fn requests(&self) -> &[(String, GoParams)] {
        &self.requests
    }

    pub fn was_quit(&self) -> bool {
        self.quit
    }
}

#[async_trait]
impl MoveSearch for ScriptedEngine {
    async fn best_move(&mut self, fen: &str, params: &GoParams) -> Result<Move, EngineError> {
        self.requests.push((fen.to_string(), *params));
        self.replies.pop_front().unwrap_or(Err(EngineError::Closed))
    }

    async fn quit(&mut self) -> Result<(), EngineError> {
        self.quit = true;
        Ok(())
    }
}
