//! Configuration for fenbridge runtime.
//!
//! Every tunable has a compile-time default and can be overridden at runtime
//! via a dedicated environment variable. Command-line flags override both.

use std::path::PathBuf;
use std::time::Duration;

use engine::EngineConfig;

/// Default search time per engine request (in milliseconds).
const DEFAULT_MOVETIME_MS: u64 = engine::DEFAULT_MOVETIME_MS;

/// Default engine hash table size (in MB).
const DEFAULT_HASH_MB: u32 = 1;

/// Default bound on the UCI handshake (in seconds).
const DEFAULT_HANDSHAKE_TIMEOUT_SECS: u64 = 10;

/// Default slack on top of the movetime before a request times out (in milliseconds).
const DEFAULT_REQUEST_GRACE_MS: u64 = 2000;

/// Get the engine executable path.
///
/// Priority:
/// 1. `FENBRIDGE_ENGINE_PATH` env variable if set
/// 2. `None`, which makes the engine crate probe for Stockfish
pub fn get_engine_path() -> Option<PathBuf> {
    std::env::var_os("FENBRIDGE_ENGINE_PATH").map(PathBuf::from)
}

/// Get the per-request search time in milliseconds.
///
/// Priority:
/// 1. `FENBRIDGE_MOVETIME_MS` env variable if set (falls back to default
///    if the value cannot be parsed as a `u64`)
/// 2. `1000` ms as fallback
pub fn get_movetime_ms() -> u64 {
    if let Ok(ms) = std::env::var("FENBRIDGE_MOVETIME_MS") {
        return ms.parse().unwrap_or(DEFAULT_MOVETIME_MS);
    }

    DEFAULT_MOVETIME_MS
}

/// Get the engine hash size in MB (`FENBRIDGE_HASH_MB`, default `1`).
pub fn get_hash_mb() -> u32 {
    if let Ok(mb) = std::env::var("FENBRIDGE_HASH_MB") {
        return mb.parse().unwrap_or(DEFAULT_HASH_MB);
    }

    DEFAULT_HASH_MB
}

/// Get the handshake timeout in seconds (`FENBRIDGE_HANDSHAKE_TIMEOUT_SECS`, default `10`).
pub fn get_handshake_timeout_secs() -> u64 {
    if let Ok(secs) = std::env::var("FENBRIDGE_HANDSHAKE_TIMEOUT_SECS") {
        return secs.parse().unwrap_or(DEFAULT_HANDSHAKE_TIMEOUT_SECS);
    }

    DEFAULT_HANDSHAKE_TIMEOUT_SECS
}

/// Get the request grace period in milliseconds (`FENBRIDGE_REQUEST_GRACE_MS`, default `2000`).
pub fn get_request_grace_ms() -> u64 {
    if let Ok(ms) = std::env::var("FENBRIDGE_REQUEST_GRACE_MS") {
        return ms.parse().unwrap_or(DEFAULT_REQUEST_GRACE_MS);
    }

    DEFAULT_REQUEST_GRACE_MS
}

/// Get the directory for rolling log files.
///
/// Unset means logs go to stderr.
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var_os("FENBRIDGE_LOG_DIR").map(PathBuf::from)
}

/// Get the FEN a `play` session starts from (`FENBRIDGE_START_FEN`, default
/// the standard initial position).
pub fn get_start_fen() -> String {
    std::env::var("FENBRIDGE_START_FEN").unwrap_or_else(|_| chess::START_FEN.to_string())
}

/// Assemble the engine configuration, preferring an explicit path.
pub fn engine_config(path: Option<PathBuf>) -> EngineConfig {
    EngineConfig {
        path: path.or_else(get_engine_path),
        hash_mb: Some(get_hash_mb()),
        handshake_timeout: Duration::from_secs(get_handshake_timeout_secs()),
        request_grace: Duration::from_millis(get_request_grace_ms()),
        ..Default::default()
    }
}
