//! Common utilities for fenbridge
//!
//! This crate provides the square/coordinate conversions shared by the FEN
//! core, the engine bridge and the CLI.

pub mod converters;
pub mod square;

// Re-export commonly used items
pub use converters::*;
pub use square::{Square, SquareError};
