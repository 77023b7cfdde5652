//! A game session: the one live position plus the engine that answers it.

use chess::{
    apply_move, apply_occupancy_change, apply_uci_move, Move, Occupancy, Outcome, Position,
    TransitionError, TransitionOptions,
};
use chess_common::move_squares;
use engine::{EngineError, GoParams, MoveSearch};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// The engine's answer and the position after applying it.
#[derive(Debug, Clone)]
pub struct EngineReply {
    /// Move as the engine sent it, promotion suffix included.
    pub uci: String,
    pub position: Position,
}

/// Owns exactly one [`Position`]; every half-move replaces it.
pub struct GameSession<E> {
    position: Position,
    options: TransitionOptions,
    engine: E,
    go: GoParams,
}

impl<E: MoveSearch> GameSession<E> {
    pub fn new(position: Position, options: TransitionOptions, engine: E, go: GoParams) -> Self {
        Self {
            position,
            options,
            engine,
            go,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Apply a 4-character move typed by the player.
    pub fn play_user_move(&mut self, mv: &str) -> Result<&Position, SessionError> {
        self.position = apply_uci_move(&self.position, mv.trim(), &self.options)?;
        tracing::debug!(fen = %self.position, "Applied user move {}", mv.trim());
        Ok(&self.position)
    }

    /// Apply a sensed occupancy change.
    pub fn observe(
        &mut self,
        before: &Occupancy,
        after: &Occupancy,
    ) -> Result<Outcome, SessionError> {
        let transition = apply_occupancy_change(&self.position, before, after, &self.options)?;
        self.position = transition.position;
        Ok(transition.outcome)
    }

    /// Ask the engine for a move in the current position and apply it.
    ///
    /// A promotion suffix in the reply is not executed: the pawn is moved to
    /// the last rank unchanged.
    pub async fn engine_reply(&mut self) -> Result<EngineReply, SessionError> {
        let fen = self.position.to_fen();
        let reply = self.engine.best_move(&fen, &self.go).await?;
        let (from, to) = move_squares(&reply);
        if let Some(promotion) = reply.promotion {
            tracing::warn!(
                "Engine promotes to {:?} on {}; applying the pawn move only",
                promotion,
                to
            );
        }

        self.position = apply_move(&self.position, Move::new(from, to), &self.options)?;
        Ok(EngineReply {
            uci: reply.to_string(),
            position: self.position.clone(),
        })
    }

    /// Shut the engine down.
    pub async fn close(mut self) -> Result<(), SessionError> {
        self.engine.quit().await?;
        Ok(())
    }
}
