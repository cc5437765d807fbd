pub mod board;
pub mod eval;
pub mod movegen;
pub mod moves;
pub mod search;
pub mod types;

pub use ox88_base::geometry;

pub use board::Board;
pub use movegen::MoveList;
pub use moves::{Move, MoveKind};
pub use types::{CastlingRights, CastlingSide, Cell, Color, File, Piece, Rank, Square};
