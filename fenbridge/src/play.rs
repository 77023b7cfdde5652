//! Interactive loop: the player types a move, the engine answers.
//!
//! Only the engine's moves go to `out`, one per line. Prompts, FENs and
//! errors go to `diag`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::session::{GameSession, SessionError};
use engine::{EngineError, MoveSearch};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayOptions {
    /// Let the engine move before reading any input.
    pub engine_first: bool,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayEnd {
    /// EOF or `quit` on input.
    Quit,
    /// The engine had no legal move to offer.
    NoEngineMove,
}

/// Run the loop until the player quits or the engine runs out of moves.
///
/// Bad input and moves from an empty square are reported and the loop asks
/// again. Engine failures other than "no move" are returned.
pub async fn run<E, R, W, D>(
    session: &mut GameSession<E>,
    opts: PlayOptions,
    input: R,
    out: &mut W,
    diag: &mut D,
) -> anyhow::Result<PlayEnd>
where
    E: MoveSearch,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    D: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    if opts.engine_first && !engine_turn(session, out, diag).await? {
        return Ok(PlayEnd::NoEngineMove);
    }

    loop {
        diag.write_all(b"Enter your move (e.g., g8f6):\n").await?;
        diag.flush().await?;

        let Some(line) = lines.next_line().await? else {
            diag.write_all(b"Exiting...\n").await?;
            return Ok(PlayEnd::Quit);
        };
        let user_move = line.trim();
        if user_move.is_empty() {
            continue;
        }
        if user_move.eq_ignore_ascii_case("quit") {
            diag.write_all(b"Exiting...\n").await?;
            return Ok(PlayEnd::Quit);
        }

        match session.play_user_move(user_move) {
            Ok(position) => {
                let msg = format!("Updated FEN after your move: {position}\n");
                diag.write_all(msg.as_bytes()).await?;
            }
            Err(e) => {
                tracing::info!("Rejected input {user_move:?}: {e}");
                let msg = format!("Error: {e}\nPlease try again with valid input.\n");
                diag.write_all(msg.as_bytes()).await?;
                continue;
            }
        }

        if !engine_turn(session, out, diag).await? {
            return Ok(PlayEnd::NoEngineMove);
        }
    }
}

/// Returns `false` when the engine has no move.
async fn engine_turn<E, W, D>(
    session: &mut GameSession<E>,
    out: &mut W,
    diag: &mut D,
) -> anyhow::Result<bool>
where
    E: MoveSearch,
    W: AsyncWrite + Unpin,
    D: AsyncWrite + Unpin,
{
    let reply = match session.engine_reply().await {
        Ok(reply) => reply,
        Err(SessionError::Engine(EngineError::NoMove)) => {
            diag.write_all(b"Engine has no move, game over.\n").await?;
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    let msg = format!(
        "Bot plays: {}\nNew FEN after bot's move: {}\n",
        reply.uci, reply.position
    );
    diag.write_all(msg.as_bytes()).await?;
    out.write_all(format!("{}\n", reply.uci).as_bytes()).await?;
    out.flush().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{Position, TransitionOptions, START_FEN};
    use engine::{GoParams, ScriptedEngine};

    fn session(engine: ScriptedEngine) -> GameSession<ScriptedEngine> {
        GameSession::new(
            Position::from_fen(START_FEN).unwrap(),
            TransitionOptions::default(),
            engine,
            GoParams::default(),
        )
    }

    async fn play(
        session: &mut GameSession<ScriptedEngine>,
        opts: PlayOptions,
        input: &str,
    ) -> (PlayEnd, String, String) {
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let end = run(session, opts, input.as_bytes(), &mut out, &mut diag)
            .await
            .unwrap();
        (
            end,
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_two_rounds_then_eof() {
        let mut session = session(
            ScriptedEngine::new()
                .with_reply("e7e5")
                .with_reply("b8c6"),
        );

        let (end, out, diag) =
            play(&mut session, PlayOptions::default(), "e2e4\ng1f3\n").await;

        assert_eq!(end, PlayEnd::Quit);
        assert_eq!(out, "e7e5\nb8c6\n");
        assert!(diag.contains("Bot plays: e7e5"));
        assert_eq!(
            session.fen(),
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"
        );
    }

    #[tokio::test]
    async fn test_invalid_input_is_reported_and_loop_continues() {
        let mut session = session(ScriptedEngine::new().with_reply("e7e5"));

        let (end, out, diag) = play(
            &mut session,
            PlayOptions::default(),
            "e2\ne4e5\n\ne2e4\nquit\nd2d4\n",
        )
        .await;

        assert_eq!(end, PlayEnd::Quit);
        assert_eq!(out, "e7e5\n");
        assert_eq!(diag.matches("Please try again").count(), 2);
        assert_eq!(session.engine().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_engine_without_move_ends_game() {
        let mut session = session(ScriptedEngine::new().with_error(EngineError::NoMove));

        let (end, out, diag) = play(&mut session, PlayOptions::default(), "f2f3\ne2e4\n").await;

        assert_eq!(end, PlayEnd::NoEngineMove);
        assert!(out.is_empty());
        assert!(diag.contains("game over"));
    }

    #[tokio::test]
    async fn test_engine_failure_propagates() {
        let mut session = session(ScriptedEngine::new());
        let mut out = Vec::new();
        let mut diag = Vec::new();

        let result = run(
            &mut session,
            PlayOptions::default(),
            "e2e4\n".as_bytes(),
            &mut out,
            &mut diag,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_engine_first() {
        let mut session = session(ScriptedEngine::new().with_reply("e2e4"));

        let (end, out, _) = play(
            &mut session,
            PlayOptions { engine_first: true },
            "",
        )
        .await;

        assert_eq!(end, PlayEnd::Quit);
        assert_eq!(out, "e2e4\n");
        assert_eq!(session.engine().requests()[0].0, START_FEN);
    }
}
