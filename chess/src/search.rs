//! Depth-bounded alpha-beta search and perft

use crate::board::Board;
use crate::eval::{self, Mode};
use crate::movegen;
use crate::moves::Move;
use crate::types::Color;

/// Score of a checkmated White, in pawn units; Black's mirror is `1000.0`
///
/// Mate scores deliberately sit outside anything [`eval::evaluate()`] can
/// produce, and the search seeds its best value just beyond them, so a line
/// with at least one legal move always beats an unvisited one.
pub const MATE_SCORE: f64 = 1000.0;

/// Counts leaf nodes of the legal move tree at the given depth
///
/// Each legal move is applied to a copy of the board; there is no undo.
pub fn perft(board: &Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut count = 0;
    let mut moves = movegen::gen_pseudo_legal(board);
    while let Some(mv) = moves.pop() {
        let mut next = *board;
        if next.make_move(mv) {
            count += perft(&next, depth - 1);
        }
    }
    count
}

/// Perft split by first move, taken from the tail of the generated list
///
/// Useful to bisect a disagreement with a known-good engine: the per-move
/// subtotals sum to `perft(board, depth)`.
pub fn divide(board: &Board, depth: usize) -> Vec<(Move, u64)> {
    assert!(depth > 0, "divide needs at least depth 1");
    let mut res = Vec::new();
    let mut moves = movegen::gen_pseudo_legal(board);
    while let Some(mv) = moves.pop() {
        let mut next = *board;
        if next.make_move(mv) {
            res.push((mv, perft(&next, depth - 1)));
        }
    }
    res
}

// Scores a position where the side to move has no legal moves.
fn terminal_score(board: &Board) -> f64 {
    if board.is_check() {
        match board.side() {
            Color::White => -MATE_SCORE,
            Color::Black => MATE_SCORE,
        }
    } else {
        0.0
    }
}

fn alpha_beta(
    board: &Board,
    depth: usize,
    mut alpha: f64,
    mut beta: f64,
    maximizing: bool,
    mode: Mode,
) -> f64 {
    if depth == 0 {
        return eval::evaluate(board, mode);
    }

    let mut best_value: f64 = if maximizing { -1001.0 } else { 1001.0 };
    let mut terminal = true;
    let mut moves = movegen::gen_pseudo_legal(board);
    while let Some(mv) = moves.pop() {
        let mut next = *board;
        if !next.make_move(mv) {
            continue;
        }
        terminal = false;
        let value = alpha_beta(&next, depth - 1, alpha, beta, !maximizing, mode);
        if maximizing {
            best_value = best_value.max(value);
            alpha = alpha.max(value);
        } else {
            best_value = best_value.min(value);
            beta = beta.min(value);
        }
        if alpha >= beta {
            break;
        }
    }
    if terminal {
        return terminal_score(board);
    }
    best_value
}

/// Searches the position to the given depth
///
/// Returns the score in pawn units from White's point of view, together
/// with the best move for the side to move. The move is `None` when `depth`
/// is zero or the position is already decided (checkmate or stalemate).
/// Moves are consumed from the tail of the generated list, so ties are
/// broken towards the move generated last.
pub fn search(board: &Board, depth: usize, mode: Mode) -> (f64, Option<Move>) {
    if depth == 0 {
        return (eval::evaluate(board, mode), None);
    }

    let maximizing = board.side() == Color::White;
    let mut alpha = f64::NEG_INFINITY;
    let mut beta = f64::INFINITY;
    let mut best_value: f64 = if maximizing { -1001.0 } else { 1001.0 };
    let mut best_move = None;
    let mut terminal = true;
    let mut moves = movegen::gen_pseudo_legal(board);
    while let Some(mv) = moves.pop() {
        let mut next = *board;
        if !next.make_move(mv) {
            continue;
        }
        terminal = false;
        let value = alpha_beta(&next, depth - 1, alpha, beta, !maximizing, mode);
        if (maximizing && value > best_value) || (!maximizing && value < best_value) {
            best_value = value;
            best_move = Some(mv);
        }
        if maximizing {
            alpha = alpha.max(value);
        } else {
            beta = beta.min(value);
        }
        if alpha >= beta {
            break;
        }
    }
    if terminal {
        return (terminal_score(board), None);
    }
    (best_value, best_move)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perft_initial() {
        let board = Board::initial();
        assert_eq!(perft(&board, 0), 1);
        assert_eq!(perft(&board, 1), 20);
        assert_eq!(perft(&board, 2), 400);
        assert_eq!(perft(&board, 3), 8902);
        assert_eq!(perft(&board, 4), 197_281);
    }

    #[test]
    fn test_perft_kiwipete() {
        // Position heavy on castling, pins and en passant.
        let board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(perft(&board, 1), 48);
        assert_eq!(perft(&board, 2), 2039);
        assert_eq!(perft(&board, 3), 97_862);
    }

    #[test]
    fn test_perft_endgame() {
        let board = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        assert_eq!(perft(&board, 1), 14);
        assert_eq!(perft(&board, 2), 191);
        assert_eq!(perft(&board, 3), 2812);
        assert_eq!(perft(&board, 4), 43_238);
    }

    #[test]
    fn test_divide_sums() {
        let board = Board::initial();
        let parts = divide(&board, 3);
        assert_eq!(parts.len(), 20);
        assert_eq!(parts.iter().map(|(_, n)| n).sum::<u64>(), perft(&board, 3));
    }

    #[test]
    fn test_divide_pops_from_tail() {
        // Generation scans squares a1 upwards, so the h2 pawn's double push
        // is generated last and must be reported first.
        let parts = divide(&Board::initial(), 1);
        assert_eq!(parts[0].0.to_string(), "h2h4");
        assert_eq!(parts.last().unwrap().0.to_string(), "b1a3");
    }

    #[test]
    fn test_greedy_capture() {
        let board = Board::from_fen("k7/8/8/3q4/4P3/8/8/7K w - - 0 1").unwrap();
        let (score, best) = search(&board, 1, Mode::Full);
        assert_eq!(best.unwrap().to_string(), "e4d5");
        assert!(score > 0.0);
    }

    #[test]
    fn test_mate_in_one() {
        let board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1").unwrap();
        let (score, best) = search(&board, 2, Mode::Full);
        assert_eq!(score, MATE_SCORE);
        assert_eq!(best.unwrap().to_string(), "a1a8");
        // The mate is found in Simple mode too.
        let (score, best) = search(&board, 2, Mode::Simple);
        assert_eq!(score, MATE_SCORE);
        assert_eq!(best.unwrap().to_string(), "a1a8");
    }

    #[test]
    fn test_checkmated() {
        let board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/7K b - - 0 1").unwrap();
        assert_eq!(search(&board, 3, Mode::Full), (MATE_SCORE, None));
    }

    #[test]
    fn test_stalemate() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(search(&board, 3, Mode::Full), (0.0, None));
    }

    #[test]
    fn test_depth_zero() {
        let board = Board::initial();
        assert_eq!(search(&board, 0, Mode::Full), (0.0, None));
    }

    #[test]
    fn test_black_to_move() {
        // The score stays from White's point of view.
        let board = Board::from_fen("7k/8/8/4p3/3Q4/8/8/K7 b - - 0 1").unwrap();
        let (score, best) = search(&board, 1, Mode::Full);
        assert_eq!(best.unwrap().to_string(), "e5d4");
        assert!(score < 0.0);
    }
}
