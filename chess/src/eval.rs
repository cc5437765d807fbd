//! Position evaluation
//!
//! Scores are in pawn units and are always from White's point of view:
//! positive numbers favor White, negative ones favor Black.

use crate::board::Board;
use crate::types::{Color, Piece, Square};

/// Evaluation mode
///
/// [`Mode::Simple`] scores every position as zero, which turns the search
/// into a pure mate finder.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Full,
    Simple,
}

// Material values in centipawns, indexed by `Piece`. The king carries no
// material; its placement is scored by the tapered tables below.
const PIECE_VALUES: [i32; 6] = [100, 320, 330, 510, 880, 0];

// Piece-square tables, written as seen from White's side: the first row is
// rank 8. White pieces look rows up with a flipped rank, Black pieces read
// the table directly, so one table serves both colors.

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MIDDLE_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_END_TABLE: [i32; 64] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-50,-50,
];

fn table_index(color: Color, sq: Square) -> usize {
    let row = match color {
        Color::White => 7 - sq.rank().index(),
        Color::Black => sq.rank().index(),
    };
    row * 8 + sq.file().index()
}

const fn piece_table(piece: Piece) -> &'static [i32; 64] {
    match piece {
        Piece::Pawn => &PAWN_TABLE,
        Piece::Knight => &KNIGHT_TABLE,
        Piece::Bishop => &BISHOP_TABLE,
        Piece::Rook => &ROOK_TABLE,
        Piece::Queen => &QUEEN_TABLE,
        Piece::King => &KING_MIDDLE_TABLE,
    }
}

/// Statically evaluates the position, in pawn units
///
/// Material and piece-square bonuses are summed per piece. King placement is
/// interpolated between a middlegame and an endgame table, with the total
/// material on the board as the taper: full boards want a tucked-away king,
/// bare ones want it centralized. The board must contain both kings.
pub fn evaluate(board: &Board, mode: Mode) -> f64 {
    if mode == Mode::Simple {
        return 0.0;
    }

    let mut evaluation = 0_i32;
    let mut total_material = 0_i32;
    for sq in Square::iter() {
        let cell = board.get(sq);
        let (color, piece) = match (cell.color(), cell.piece()) {
            (Some(c), Some(p)) => (c, p),
            _ => continue,
        };
        if piece == Piece::King {
            continue;
        }
        let piece_eval =
            PIECE_VALUES[piece as usize] + piece_table(piece)[table_index(color, sq)];
        total_material += piece_eval;
        match color {
            Color::White => evaluation += piece_eval,
            Color::Black => evaluation -= piece_eval,
        }
    }

    let weight = 1.0 - total_material as f64 / 8000.0;
    let mut score = evaluation as f64;
    for color in [Color::White, Color::Black] {
        let idx = table_index(color, board.king_pos(color));
        let middle = KING_MIDDLE_TABLE[idx] as f64;
        let end = KING_END_TABLE[idx] as f64;
        let king_eval = middle + (end - middle) * weight;
        match color {
            Color::White => score += king_eval,
            Color::Black => score -= king_eval,
        }
    }
    score / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetry() {
        assert_eq!(evaluate(&Board::initial(), Mode::Full), 0.0);
        let board =
            Board::from_fen("r1bqkbnr/pppppppp/2n5/8/8/2N5/PPPPPPPP/R1BQKBNR w KQkq - 2 2")
                .unwrap();
        assert_eq!(evaluate(&board, Mode::Full), 0.0);
    }

    #[test]
    fn test_simple_mode() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/QQQQK3 w - - 0 1").unwrap();
        assert_eq!(evaluate(&board, Mode::Simple), 0.0);
        assert!(evaluate(&board, Mode::Full) > 0.0);
    }

    #[test]
    fn test_material() {
        // An extra queen should dominate any positional term.
        let up = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        assert!(evaluate(&up, Mode::Full) > 5.0);
        let down = Board::from_fen("q3k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&down, Mode::Full) < -5.0);
    }

    #[test]
    fn test_pst_favors_center() {
        let edge = Board::from_fen("4k3/8/8/8/8/8/8/N3K3 b - - 0 1").unwrap();
        let center = Board::from_fen("4k3/8/8/8/3N4/8/8/4K3 b - - 0 1").unwrap();
        assert!(evaluate(&center, Mode::Full) > evaluate(&edge, Mode::Full));
    }

    #[test]
    fn test_king_taper() {
        // With queens on, a castled king beats a centralized one; with bare
        // kings the preference flips.
        let full_castled =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQ1BKR w - - 0 1").unwrap();
        let full_central =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKB1R w - - 0 1").unwrap();
        assert!(
            evaluate(&full_castled, Mode::Full) > evaluate(&full_central, Mode::Full)
        );
        let bare_central = Board::from_fen("4k3/8/8/8/4K3/8/8/8 w - - 0 1").unwrap();
        let bare_corner = Board::from_fen("4k3/8/8/8/8/8/8/6K1 w - - 0 1").unwrap();
        assert!(
            evaluate(&bare_central, Mode::Full) > evaluate(&bare_corner, Mode::Full)
        );
    }
}
