//! Moves and their application

use crate::board::Board;
use crate::movegen;
use crate::types::{CastlingSide, Cell, Color, File, Piece, Square, SquareParseError};
use ox88_base::geometry;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a move in UCI notation
#[derive(Debug, Copy, Clone, Error, PartialEq, Eq)]
pub enum UciParseError {
    #[error("invalid string length")]
    BadLength,
    #[error("bad source square: {0}")]
    Src(SquareParseError),
    #[error("bad destination square: {0}")]
    Dst(SquareParseError),
    #[error("bad promote char {0:?}")]
    BadPromote(char),
}

/// Kind of move, stored alongside the squares so that applying a move never
/// needs to re-derive what it does
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Normal = 0,
    PawnDouble = 1,
    Enpassant = 2,
    Castling = 3,
    PromoteKnight = 4,
    PromoteBishop = 5,
    PromoteRook = 6,
    PromoteQueen = 7,
}

impl MoveKind {
    pub const fn promote_to(&self) -> Option<Piece> {
        match *self {
            Self::PromoteKnight => Some(Piece::Knight),
            Self::PromoteBishop => Some(Piece::Bishop),
            Self::PromoteRook => Some(Piece::Rook),
            Self::PromoteQueen => Some(Piece::Queen),
            _ => None,
        }
    }

    const fn promote_char(&self) -> Option<char> {
        match *self {
            Self::PromoteKnight => Some('n'),
            Self::PromoteBishop => Some('b'),
            Self::PromoteRook => Some('r'),
            Self::PromoteQueen => Some('q'),
            _ => None,
        }
    }
}

/// Chess move
///
/// A move does not carry the captured piece or any other undo information.
/// Search code snapshots the board before applying a move and restores the
/// snapshot to take it back.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub kind: MoveKind,
    pub src: Square,
    pub dst: Square,
}

impl Move {
    pub const fn new(kind: MoveKind, src: Square, dst: Square) -> Move {
        Move { kind, src, dst }
    }

    /// Parses a move from UCI notation, like `e2e4` or `g7g8q`
    ///
    /// The move kind cannot be recovered from the notation alone, so it is
    /// inferred from `board`. The result is not guaranteed to be legal.
    pub fn from_uci(s: &str, board: &Board) -> Result<Move, UciParseError> {
        if !matches!(s.len(), 4 | 5) {
            return Err(UciParseError::BadLength);
        }
        let src = Square::from_str(&s[0..2]).map_err(UciParseError::Src)?;
        let dst = Square::from_str(&s[2..4]).map_err(UciParseError::Dst)?;
        let kind = if s.len() == 5 {
            let ch = s.as_bytes()[4] as char;
            match ch {
                'n' => MoveKind::PromoteKnight,
                'b' => MoveKind::PromoteBishop,
                'r' => MoveKind::PromoteRook,
                'q' => MoveKind::PromoteQueen,
                _ => return Err(UciParseError::BadPromote(ch)),
            }
        } else {
            let piece = board.get(src).piece();
            let file_dist = src.file().index().abs_diff(dst.file().index());
            let rank_dist = src.rank().index().abs_diff(dst.rank().index());
            match piece {
                Some(Piece::Pawn) if rank_dist == 2 => MoveKind::PawnDouble,
                Some(Piece::Pawn) if file_dist == 1 && board.get(dst).is_empty() => {
                    MoveKind::Enpassant
                }
                Some(Piece::King) if file_dist == 2 => MoveKind::Castling,
                _ => MoveKind::Normal,
            }
        };
        Ok(Move::new(kind, src, dst))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(ch) = self.kind.promote_char() {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

// Castling rights die with the squares involved. A move from the king's home
// square drops both rights of that color; a move from or to a corner drops
// the right tied to that corner, even when the corner is already empty.
fn update_castling(board: &mut Board, mv: Move) {
    for color in [Color::White, Color::Black] {
        if !board.castling.has_color(color) {
            continue;
        }
        if mv.src == geometry::king_home(color) {
            board.castling.unset_color(color);
        }
        for side in [CastlingSide::King, CastlingSide::Queen] {
            let corner = geometry::rook_home(color, side);
            if mv.src == corner || mv.dst == corner {
                board.castling.unset(color, side);
            }
        }
    }
}

impl Board {
    /// Applies `mv` to the board and reports whether it was legal
    ///
    /// `mv` must be pseudo-legal for the current position. The board is
    /// mutated unconditionally, including the side to move; on `false` the
    /// position left behind is garbage and the caller must restore its
    /// snapshot. A move is legal when the mover's king is not attacked
    /// afterwards; that single check also rejects castling into check,
    /// because the intermediate squares were vetted at generation time.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let side = self.side;
        let src_cell = self.get(mv.src);
        self.ep_dest = None;

        match mv.kind {
            MoveKind::Normal => {
                self.put(mv.dst, src_cell);
                self.put(mv.src, Cell::EMPTY);
            }
            MoveKind::PawnDouble => {
                self.put(mv.dst, src_cell);
                self.put(mv.src, Cell::EMPTY);
                self.ep_dest = Some(mv.src.add(geometry::pawn_forward_delta(side)));
            }
            MoveKind::Enpassant => {
                self.put(mv.dst, src_cell);
                self.put(mv.src, Cell::EMPTY);
                self.put(mv.dst.add(-geometry::pawn_forward_delta(side)), Cell::EMPTY);
            }
            MoveKind::Castling => {
                let midpoint = Square::from_index((mv.src.index() + mv.dst.index()) / 2);
                let corner = if mv.dst.file() == File::G {
                    mv.dst.add(1)
                } else {
                    mv.dst.add(-2)
                };
                self.put(mv.dst, src_cell);
                self.put(mv.src, Cell::EMPTY);
                self.put(midpoint, self.get(corner));
                self.put(corner, Cell::EMPTY);
            }
            _ => {
                let piece = match mv.kind.promote_to() {
                    Some(piece) => piece,
                    None => unreachable!(),
                };
                self.put(mv.dst, Cell::from_parts(side, piece));
                self.put(mv.src, Cell::EMPTY);
            }
        }

        update_castling(self, mv);
        self.side = side.inv();
        if side == Color::Black {
            self.move_number += 1;
        }

        !movegen::is_attacked(self, self.king_pos(side), side.inv())
    }
}
