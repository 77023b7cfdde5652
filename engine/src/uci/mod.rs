pub mod parser;

pub use parser::{
    format_go_command, format_position_command, format_uci_move, parse_uci_message,
    parse_uci_move, UciMessage,
};

#[derive(Debug, thiserror::Error)]
pub enum UciError {
    #[error("Engine has no stdin")]
    NoStdin,
    #[error("Engine has no stdout")]
    NoStdout,
    #[error("Malformed UCI message: {0}")]
    MalformedMessage(String),
    #[error("Unknown UCI message: {0}")]
    UnknownMessage(String),
    #[error("Invalid move: {0}")]
    InvalidMove(String),
}
