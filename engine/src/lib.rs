//! Engine Bridge: a line-based UCI client for an external move-search process.
//!
//! Requests go through [`MoveSearch`], which takes `&mut self`, so a caller
//! cannot issue a second request before the previous `bestmove` has been read.

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod process;
pub mod uci;

#[cfg(any(test, feature = "mock"))]
pub use mock::ScriptedEngine;
pub use process::{find_engine_path, EngineConfig, UciProcess};
pub use uci::{UciError, UciMessage};

use async_trait::async_trait;
use cozy_chess::Move;
use std::time::Duration;

/// Default search time per request, in milliseconds.
pub const DEFAULT_MOVETIME_MS: u64 = 1000;

/// Parameters for the "go" command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoParams {
    pub movetime_ms: u64,
}

impl Default for GoParams {
    fn default() -> Self {
        Self {
            movetime_ms: DEFAULT_MOVETIME_MS,
        }
    }
}

/// Engine analysis information from the last "info" line of a search
#[derive(Debug, Clone, Default)]
pub struct EngineInfo {
    pub depth: Option<u8>,
    pub time_ms: Option<u64>,
    pub nodes: Option<u64>,
    pub score: Option<Score>,
    pub pv: Vec<Move>, // Principal variation
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    Mate(i32), // Negative for being mated
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("No UCI engine executable found")]
    NotFound,
    #[error("Failed to spawn engine {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Engine did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Engine closed its output")]
    Closed,
    #[error("Engine has no move in this position")]
    NoMove,
    #[error("Engine is out of sync after an unanswered request")]
    Desynchronized,
    #[error(transparent)]
    Uci(#[from] UciError),
}

/// Something that can be asked for a best move.
#[async_trait]
pub trait MoveSearch: Send {
    /// Search `fen` and return the engine's reply.
    async fn best_move(&mut self, fen: &str, params: &GoParams) -> Result<Move, EngineError>;

    /// Ask the engine to exit.
    async fn quit(&mut self) -> Result<(), EngineError>;
}
