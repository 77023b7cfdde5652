//! fenbridge: keeps a FEN in step with a physical board and a UCI engine.
//!
//! One-shot subcommands turn a FEN plus a move (or a before/after occupancy
//! grid) into the next FEN. `play` runs the interactive loop against an
//! external engine. Configuration comes from the environment (see [`config`]),
//! command-line flags win over it.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use chess::{
    apply_occupancy_change, apply_uci_move, DiffPolicy, Occupancy, Outcome, Position,
    TransitionOptions,
};
use engine::{GoParams, UciProcess};

mod config;
mod logging;
mod play;
mod report;
mod session;

use play::{PlayEnd, PlayOptions};
use report::Report;
use session::GameSession;

#[derive(Parser)]
#[command(name = "fenbridge", about = "FEN state tracking bridge for a UCI engine")]
struct Cli {
    /// Never revoke castling rights when a king or rook moves.
    #[arg(long, global = true)]
    no_castling: bool,

    /// Print a JSON report instead of the bare FEN.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a 4-character move (e.g. `e2e4`) to a FEN.
    Apply {
        #[arg(long)]
        fen: String,
        #[arg(value_name = "MOVE")]
        mv: String,
    },
    /// Apply a sensed occupancy change to a FEN.
    ///
    /// Grids are 64 `0`/`1` cells, rank 8 first; whitespace and `/` are ignored.
    Diff {
        #[arg(long)]
        fen: String,
        /// Defaults to the occupancy of `--fen`.
        #[arg(long)]
        before: Option<String>,
        #[arg(long)]
        after: String,
        /// Fail instead of passing the turn when the change is not one move.
        #[arg(long)]
        strict: bool,
    },
    /// Print the occupancy grid of a FEN.
    Occupancy {
        #[arg(long)]
        fen: String,
    },
    /// Play against the engine: moves on stdin, engine moves on stdout.
    Play {
        /// Starting position (defaults to `FENBRIDGE_START_FEN` or the initial position).
        #[arg(long)]
        fen: Option<String>,
        /// Engine executable (defaults to `FENBRIDGE_ENGINE_PATH`, then a Stockfish probe).
        #[arg(long)]
        engine: Option<PathBuf>,
        /// Search time per engine move in milliseconds.
        #[arg(long)]
        movetime: Option<u64>,
        /// Let the engine make the first move.
        #[arg(long)]
        engine_first: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_tracing(config::get_log_dir().as_deref())?;

    let options = TransitionOptions {
        track_castling: !cli.no_castling,
        ..Default::default()
    };

    match cli.command {
        Commands::Apply { fen, mv } => {
            let prev = Position::from_fen(&fen)?;
            let next = apply_uci_move(&prev, &mv, &options)?;
            let report = Report::from_position(&next);
            print_report(&report, cli.json)?;
        }
        Commands::Diff {
            fen,
            before,
            after,
            strict,
        } => {
            let prev = Position::from_fen(&fen)?;
            let before = match before {
                Some(grid) => grid.parse::<Occupancy>().context("invalid --before grid")?,
                None => Occupancy::from_board(prev.board()),
            };
            let after = after
                .parse::<Occupancy>()
                .context("invalid --after grid")?;
            let options = TransitionOptions {
                diff_policy: if strict {
                    DiffPolicy::Strict
                } else {
                    DiffPolicy::Lenient
                },
                ..options
            };

            let transition = apply_occupancy_change(&prev, &before, &after, &options)?;
            if let Outcome::TurnPassed(reason) = transition.outcome {
                eprintln!("No move recognised ({reason}); turn passed");
            }
            let report = Report::from_position(&transition.position)
                .with_outcome(&transition.outcome);
            print_report(&report, cli.json)?;
        }
        Commands::Occupancy { fen } => {
            let position = Position::from_fen(&fen)?;
            println!("{}", Occupancy::from_board(position.board()));
        }
        Commands::Play {
            fen,
            engine,
            movetime,
            engine_first,
        } => {
            let fen = fen.unwrap_or_else(config::get_start_fen);
            let position = Position::from_fen(&fen).context("invalid starting FEN")?;
            let go = GoParams {
                movetime_ms: movetime.unwrap_or_else(config::get_movetime_ms),
            };

            let process = UciProcess::spawn(config::engine_config(engine))
                .await
                .context("failed to start the engine")?;
            tracing::info!("Engine ready: {}", process.name().unwrap_or("unknown"));

            let mut session = GameSession::new(position, options, process, go);
            let end = play::run(
                &mut session,
                PlayOptions { engine_first },
                tokio::io::BufReader::new(tokio::io::stdin()),
                &mut tokio::io::stdout(),
                &mut tokio::io::stderr(),
            )
            .await;

            // Always try to shut the engine down, even if the loop failed.
            if let Err(e) = session.close().await {
                tracing::warn!("Engine did not shut down cleanly: {e}");
            }
            if end? == PlayEnd::NoEngineMove {
                tracing::info!("Game ended: engine has no move");
            }
        }
    }

    Ok(())
}

fn print_report(report: &Report, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.fen);
    }
    Ok(())
}
