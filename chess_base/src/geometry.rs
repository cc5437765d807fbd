//! Board geometry on the 0x88 grid
//!
//! All deltas here are raw offsets into the 128-cell array. Adding one rank
//! is `+16`, one file is `+1`; the 0x88 mask catches every off-board result
//! of such arithmetic.

use crate::types::{CastlingSide, Color, File, Rank, Square};

/// Rook and queen ray directions
pub const ORTHO_DELTAS: [i8; 4] = [16, -16, 1, -1];

/// Bishop and queen ray directions
pub const DIAG_DELTAS: [i8; 4] = [17, -17, 15, -15];

/// King steps, also used as the union of ray directions
pub const KING_DELTAS: [i8; 8] = [16, -16, 1, -1, 17, -17, 15, -15];

pub const KNIGHT_DELTAS: [i8; 8] = [31, 33, 18, -14, -31, -33, -18, 14];

pub const fn pawn_forward_delta(c: Color) -> i8 {
    match c {
        Color::White => 16,
        Color::Black => -16,
    }
}

/// Rank the pawns of `c` start on, from which a double push is allowed
pub const fn double_move_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

/// Rank on which a pawn of `c` promotes
pub const fn promote_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Back rank of `c`, where its king and rooks start
pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

pub const fn king_home(c: Color) -> Square {
    Square::from_parts(File::E, castling_rank(c))
}

pub const fn rook_home(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::King => File::H,
        CastlingSide::Queen => File::A,
    };
    Square::from_parts(file, castling_rank(c))
}
