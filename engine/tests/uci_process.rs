//! Drives `UciProcess` against small shell-script engines.
#![cfg(unix)]

use engine::{EngineConfig, EngineError, GoParams, MoveSearch, UciProcess};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Answers the handshake, logs every command it receives and replies to
/// `go` with `$GO_REPLY` (nothing when empty).
fn write_fake_engine(dir: &Path, go_reply: &str) -> (PathBuf, PathBuf) {
    let script = dir.join("fake_engine.sh");
    let log = dir.join("commands.log");
    let body = format!(
        r#"#!/bin/sh
while IFS= read -r line; do
  echo "$line" >> "{log}"
  case "$line" in
    uci) echo "id name FakeFish 1.0"; echo "option name Hash type spin"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) {go_reply} ;;
    quit) exit 0 ;;
  esac
done
"#,
        log = log.display(),
        go_reply = if go_reply.is_empty() { ":" } else { go_reply },
    );
    std::fs::write(&script, body).expect("failed to write fake engine");
    (script, log)
}

fn config(script: &Path) -> EngineConfig {
    EngineConfig {
        path: Some(PathBuf::from("sh")),
        args: vec![script.display().to_string()],
        hash_mb: Some(1),
        handshake_timeout: Duration::from_secs(5),
        request_grace: Duration::from_millis(300),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_handshake_and_best_move() {
    let tempdir = tempfile::tempdir().expect("failed to create temp dir");
    let (script, log) = write_fake_engine(
        tempdir.path(),
        r#"echo "info depth 3 score cp 20 pv e7e5 g1f3"; echo "bestmove e7e5 ponder g1f3""#,
    );

    let mut engine = UciProcess::spawn(config(&script)).await.unwrap();
    assert_eq!(engine.name(), Some("FakeFish 1.0"));

    let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
    let mv = engine
        .best_move(fen, &GoParams { movetime_ms: 50 })
        .await
        .unwrap();
    assert_eq!(mv.to_string(), "e7e5");
    assert_eq!(engine.last_info().and_then(|i| i.depth), Some(3));

    engine.quit().await.unwrap();

    let position_cmd = format!("position fen {fen}");
    let commands = std::fs::read_to_string(log).unwrap();
    let commands: Vec<&str> = commands.lines().collect();
    assert_eq!(
        commands,
        vec![
            "uci",
            "setoption name Hash value 1",
            "isready",
            position_cmd.as_str(),
            "go movetime 50",
            "quit",
        ]
    );
}

#[tokio::test]
async fn test_bestmove_none_is_no_move() {
    let tempdir = tempfile::tempdir().expect("failed to create temp dir");
    let (script, _) = write_fake_engine(tempdir.path(), r#"echo "bestmove (none)""#);

    let mut engine = UciProcess::spawn(config(&script)).await.unwrap();
    let result = engine
        .best_move("4k3/8/8/8/8/8/8/4K3 w - - 0 1", &GoParams { movetime_ms: 10 })
        .await;
    assert!(matches!(result, Err(EngineError::NoMove)));
    engine.quit().await.unwrap();
}

#[tokio::test]
async fn test_silent_engine_times_out_then_desyncs() {
    let tempdir = tempfile::tempdir().expect("failed to create temp dir");
    let (script, _) = write_fake_engine(tempdir.path(), "");

    let mut engine = UciProcess::spawn(config(&script)).await.unwrap();
    let params = GoParams { movetime_ms: 10 };
    let fen = "4k3/8/8/8/8/8/8/4K3 w - - 0 1";

    assert!(matches!(
        engine.best_move(fen, &params).await,
        Err(EngineError::Timeout(_))
    ));
    assert!(matches!(
        engine.best_move(fen, &params).await,
        Err(EngineError::Desynchronized)
    ));
    engine.quit().await.unwrap();
}

#[tokio::test]
async fn test_missing_executable_fails_to_spawn() {
    let result = UciProcess::spawn(EngineConfig {
        path: Some(PathBuf::from("/nonexistent/uci-engine")),
        ..Default::default()
    })
    .await;
    assert!(matches!(result, Err(EngineError::Spawn { .. })));
}
