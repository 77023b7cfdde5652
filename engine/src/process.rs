use crate::uci::{format_go_command, format_position_command, parse_uci_message, UciMessage};
use crate::{EngineError, EngineInfo, GoParams, MoveSearch, UciError};
use async_trait::async_trait;
use cozy_chess::Move;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout};

/// Well-known install locations, tried before `$PATH`.
const ENGINE_CANDIDATES: &[&str] = &[
    "/usr/local/bin/stockfish",
    "/usr/bin/stockfish",
    "/opt/homebrew/bin/stockfish",
    "/usr/games/stockfish",
];

/// How to launch and talk to the engine process.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Executable to run. `None` probes for a Stockfish install.
    pub path: Option<PathBuf>,
    pub args: Vec<String>,
    pub hash_mb: Option<u32>,
    pub threads: Option<u32>,
    pub skill_level: Option<u8>,
    /// Bound on `uci`/`uciok` and `isready`/`readyok`.
    pub handshake_timeout: Duration,
    /// Extra time allowed on top of the requested movetime.
    pub request_grace: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: None,
            args: Vec::new(),
            hash_mb: None,
            threads: None,
            skill_level: None,
            handshake_timeout: Duration::from_secs(10),
            request_grace: Duration::from_secs(2),
        }
    }
}

/// A UCI engine running as a child process.
pub struct UciProcess {
    process: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    config: EngineConfig,
    name: Option<String>,
    last_info: Option<EngineInfo>,
    desynced: bool,
}

impl UciProcess {
    /// Spawn the engine and complete the UCI handshake.
    #[tracing::instrument(level = "info")]
    pub async fn spawn(config: EngineConfig) -> Result<Self, EngineError> {
        let path = match &config.path {
            Some(path) => path.clone(),
            None => find_engine_path().ok_or(EngineError::NotFound)?,
        };
        tracing::info!("Spawning engine at {:?}", path);

        let mut process = tokio::process::Command::new(&path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                tracing::error!("Failed to spawn engine: {}", source);
                EngineError::Spawn {
                    path: path.display().to_string(),
                    source,
                }
            })?;

        let stdin = process.stdin.take().ok_or(UciError::NoStdin)?;
        let stdout = process.stdout.take().ok_or(UciError::NoStdout)?;

        let mut engine = Self {
            process,
            stdin,
            lines: BufReader::new(stdout).lines(),
            config,
            name: None,
            last_info: None,
            desynced: false,
        };
        engine.handshake().await?;
        tracing::info!(
            "Engine ready: {}",
            engine.name.as_deref().unwrap_or("unnamed")
        );
        Ok(engine)
    }

    /// Engine name from `id name`, if it sent one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Last "info" line seen during the most recent search.
    pub fn last_info(&self) -> Option<&EngineInfo> {
        self.last_info.as_ref()
    }

    async fn handshake(&mut self) -> Result<(), EngineError> {
        let limit = self.config.handshake_timeout;

        self.send("uci").await?;
        let mut name = None;
        self.wait_for(limit, |msg| match msg {
            UciMessage::Id { name: key, value } if key == "name" => {
                name = Some(value);
                None
            }
            UciMessage::UciOk => Some(()),
            _ => None,
        })
        .await?;
        self.name = name;

        if let Some(hash_mb) = self.config.hash_mb {
            let hash_mb = hash_mb.clamp(1, 2048);
            tracing::info!("Setting Hash to {} MB", hash_mb);
            self.send(&format!("setoption name Hash value {}", hash_mb))
                .await?;
        }
        if let Some(threads) = self.config.threads {
            let threads = threads.clamp(1, 16);
            tracing::info!("Setting Threads to {}", threads);
            self.send(&format!("setoption name Threads value {}", threads))
                .await?;
        }
        if let Some(level) = self.config.skill_level {
            let level = level.min(20);
            tracing::info!("Setting skill level to {}", level);
            self.send(&format!("setoption name Skill Level value {}", level))
                .await?;
        }

        self.send("isready").await?;
        self.wait_for(limit, |msg| matches!(msg, UciMessage::ReadyOk).then_some(()))
            .await
    }

    async fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        tracing::trace!("UCI >> {}", cmd);
        self.stdin.write_all(cmd.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Read one line. Lines that are not UCI messages come back as `None`.
    async fn read_message(&mut self) -> Result<Option<UciMessage>, EngineError> {
        let line = self.lines.next_line().await?.ok_or_else(|| {
            tracing::warn!("Engine stdout EOF - engine closed");
            EngineError::Closed
        })?;
        let line = line.trim();
        tracing::trace!("UCI << {}", line);

        match parse_uci_message(line) {
            Ok(msg) => Ok(Some(msg)),
            Err(UciError::UnknownMessage(_)) => Ok(None),
            Err(e) if line.starts_with("bestmove") => Err(e.into()),
            Err(e) => {
                tracing::trace!("Ignoring engine output: {}", e);
                Ok(None)
            }
        }
    }

    async fn read_until<T>(
        &mut self,
        mut select: impl FnMut(UciMessage) -> Option<T>,
    ) -> Result<T, EngineError> {
        loop {
            let Some(msg) = self.read_message().await? else {
                continue;
            };
            if let UciMessage::Info(info) = &msg {
                self.last_info = Some(info.clone());
            }
            if let Some(found) = select(msg) {
                return Ok(found);
            }
        }
    }

    async fn wait_for<T>(
        &mut self,
        limit: Duration,
        select: impl FnMut(UciMessage) -> Option<T>,
    ) -> Result<T, EngineError> {
        match tokio::time::timeout(limit, self.read_until(select)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(limit)),
        }
    }

    /// After a timed-out search: send `stop` and swallow the late `bestmove`
    /// so the next request starts clean. If that fails too, give up on the
    /// process.
    async fn recover(&mut self) {
        let grace = self.config.request_grace;
        let drained = match self.send("stop").await {
            Ok(()) => self
                .wait_for(grace, |msg| {
                    matches!(msg, UciMessage::BestMove { .. }).then_some(())
                })
                .await
                .is_ok(),
            Err(_) => false,
        };
        if !drained {
            tracing::error!("Engine did not answer stop, marking it desynchronized");
            self.desynced = true;
        }
    }
}

#[async_trait]
impl MoveSearch for UciProcess {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn best_move(&mut self, fen: &str, params: &GoParams) -> Result<Move, EngineError> {
        if self.desynced {
            return Err(EngineError::Desynchronized);
        }
        self.last_info = None;

        self.send(&format_position_command(fen)).await?;
        self.send(&format_go_command(params)).await?;

        let limit = Duration::from_millis(params.movetime_ms) + self.config.request_grace;
        let reply = match self
            .wait_for(limit, |msg| match msg {
                UciMessage::BestMove { mv, .. } => Some(mv),
                _ => None,
            })
            .await
        {
            Err(EngineError::Timeout(waited)) => {
                tracing::warn!("No bestmove within {:?}, sending stop", waited);
                self.recover().await;
                return Err(EngineError::Timeout(waited));
            }
            other => other?,
        };

        if let Some(info) = &self.last_info {
            tracing::debug!(depth = ?info.depth, score = ?info.score, "Search finished");
        }
        let mv = reply.ok_or(EngineError::NoMove)?;
        tracing::info!("Received bestmove: {}", mv);
        Ok(mv)
    }

    async fn quit(&mut self) -> Result<(), EngineError> {
        tracing::info!("Sending quit command to engine");
        if let Err(e) = self.send("quit").await {
            tracing::debug!("Engine already gone: {}", e);
        }
        if tokio::time::timeout(Duration::from_secs(1), self.process.wait())
            .await
            .is_err()
        {
            tracing::warn!("Engine ignored quit, killing it");
            self.process.kill().await?;
        }
        Ok(())
    }
}

/// Find a Stockfish executable in common locations or on `$PATH`.
pub fn find_engine_path() -> Option<PathBuf> {
    let on_path: Vec<PathBuf> = std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths)
                .map(|dir| dir.join("stockfish"))
                .collect()
        })
        .unwrap_or_default();

    ENGINE_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .chain(on_path)
        .find(|path| path.is_file())
}
