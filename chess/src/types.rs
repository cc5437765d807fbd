//! Basic types to describe the chess board
//!
//! Re-exported from `ox88_base` for convenience.

pub use ox88_base::types::*;
