//! Move generation and attack detection

use crate::board::Board;
use crate::moves::{Move, MoveKind};
use crate::types::{CastlingSide, Cell, Color, Piece, Square};
use ox88_base::geometry;

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

/// List of moves with a fixed capacity
///
/// The capacity is enough for any reachable chess position, so generation
/// never allocates.
#[derive(Debug, Clone, Default)]
pub struct MoveList(ArrayVec<Move, 256>);

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = <ArrayVec<Move, 256> as IntoIterator>::IntoIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Is the square `sq` attacked by pieces of color `by`?
///
/// `sq` may be invalid, in which case the answer is `false`. Only cells that
/// pass the 0x88 validity mask are ever read, so ray walks stop at the board
/// edge without explicit bounds checks.
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    if !sq.is_valid() {
        return false;
    }
    for delta in geometry::KNIGHT_DELTAS {
        let from = sq.add(delta);
        if from.is_valid() && board.get(from) == Cell::from_parts(by, Piece::Knight) {
            return true;
        }
    }
    for delta in geometry::KING_DELTAS {
        let from = sq.add(delta);
        if from.is_valid() && board.get(from) == Cell::from_parts(by, Piece::King) {
            return true;
        }
    }
    // A pawn attacks sq from one step backwards along its own direction.
    let back = -geometry::pawn_forward_delta(by);
    for delta in [back + 1, back - 1] {
        let from = sq.add(delta);
        if from.is_valid() && board.get(from) == Cell::from_parts(by, Piece::Pawn) {
            return true;
        }
    }
    ray_attack(board, sq, by, &geometry::ORTHO_DELTAS, Piece::Rook)
        || ray_attack(board, sq, by, &geometry::DIAG_DELTAS, Piece::Bishop)
}

fn ray_attack(board: &Board, sq: Square, by: Color, deltas: &[i8], slider: Piece) -> bool {
    for &delta in deltas {
        let mut cur = sq.add(delta);
        while cur.is_valid() {
            let cell = board.get(cur);
            if cell.is_occupied() {
                if cell == Cell::from_parts(by, slider)
                    || cell == Cell::from_parts(by, Piece::Queen)
                {
                    return true;
                }
                break;
            }
            cur = cur.add(delta);
        }
    }
    false
}

fn push_pawn_dst(list: &mut MoveList, side: Color, src: Square, dst: Square) {
    if dst.rank() == geometry::promote_dst_rank(side) {
        for kind in [
            MoveKind::PromoteKnight,
            MoveKind::PromoteBishop,
            MoveKind::PromoteRook,
            MoveKind::PromoteQueen,
        ] {
            list.push(Move::new(kind, src, dst));
        }
    } else {
        list.push(Move::new(MoveKind::Normal, src, dst));
    }
}

fn gen_pawn(board: &Board, src: Square, list: &mut MoveList) {
    let side = board.side();
    let forward = geometry::pawn_forward_delta(side);
    let one = src.add(forward);
    if one.is_valid() && board.get(one).is_empty() {
        push_pawn_dst(list, side, src, one);
        let two = one.add(forward);
        if src.rank() == geometry::double_move_src_rank(side) && board.get(two).is_empty() {
            list.push(Move::new(MoveKind::PawnDouble, src, two));
        }
    }
    for delta in [forward + 1, forward - 1] {
        let dst = src.add(delta);
        if !dst.is_valid() {
            continue;
        }
        if board.get(dst).color() == Some(side.inv()) {
            push_pawn_dst(list, side, src, dst);
        } else if board.ep_dest() == Some(dst) {
            list.push(Move::new(MoveKind::Enpassant, src, dst));
        }
    }
}

fn gen_steps(board: &Board, src: Square, deltas: &[i8], list: &mut MoveList) {
    let side = board.side();
    for &delta in deltas {
        let dst = src.add(delta);
        if dst.is_valid() && board.get(dst).color() != Some(side) {
            list.push(Move::new(MoveKind::Normal, src, dst));
        }
    }
}

fn gen_rays(board: &Board, src: Square, deltas: &[i8], list: &mut MoveList) {
    let side = board.side();
    for &delta in deltas {
        let mut dst = src.add(delta);
        while dst.is_valid() {
            let cell = board.get(dst);
            if cell.color() == Some(side) {
                break;
            }
            list.push(Move::new(MoveKind::Normal, src, dst));
            if cell.is_occupied() {
                break;
            }
            dst = dst.add(delta);
        }
    }
}

// Emptiness of the squares between king and rook, and safety of the king's
// own square plus the one it crosses. The destination square is left to the
// legality check in make_move.
fn gen_castling(board: &Board, list: &mut MoveList) {
    let side = board.side();
    let enemy = side.inv();
    let king = geometry::king_home(side);
    if board.castling().has(side, CastlingSide::King) {
        let crossed = king.add(1);
        if board.get(crossed).is_empty()
            && board.get(king.add(2)).is_empty()
            && !is_attacked(board, king, enemy)
            && !is_attacked(board, crossed, enemy)
        {
            list.push(Move::new(MoveKind::Castling, king, king.add(2)));
        }
    }
    if board.castling().has(side, CastlingSide::Queen) {
        let crossed = king.add(-1);
        if board.get(crossed).is_empty()
            && board.get(king.add(-2)).is_empty()
            && board.get(king.add(-3)).is_empty()
            && !is_attacked(board, king, enemy)
            && !is_attacked(board, crossed, enemy)
        {
            list.push(Move::new(MoveKind::Castling, king, king.add(-2)));
        }
    }
}

/// Generates all pseudo-legal moves for the side to move
///
/// A pseudo-legal move obeys piece movement rules but may leave the mover's
/// own king attacked; [`Board::make_move()`] reports that when the move is
/// applied. Castling through check is already excluded here.
pub fn gen_pseudo_legal(board: &Board) -> MoveList {
    let side = board.side();
    let mut list = MoveList::new();
    for src in Square::iter() {
        let cell = board.get(src);
        if cell.color() != Some(side) {
            continue;
        }
        match cell.piece() {
            Some(Piece::Pawn) => gen_pawn(board, src, &mut list),
            Some(Piece::Knight) => gen_steps(board, src, &geometry::KNIGHT_DELTAS, &mut list),
            Some(Piece::King) => gen_steps(board, src, &geometry::KING_DELTAS, &mut list),
            Some(Piece::Bishop) => gen_rays(board, src, &geometry::DIAG_DELTAS, &mut list),
            Some(Piece::Rook) => gen_rays(board, src, &geometry::ORTHO_DELTAS, &mut list),
            Some(Piece::Queen) => gen_rays(board, src, &geometry::KING_DELTAS, &mut list),
            None => {}
        }
    }
    gen_castling(board, &mut list);
    list
}

/// Generates all legal moves for the side to move
///
/// Filters the pseudo-legal list by applying each move to a scratch copy.
pub fn gen_legal(board: &Board) -> MoveList {
    let mut list = MoveList::new();
    for mv in gen_pseudo_legal(board) {
        let mut scratch = *board;
        if scratch.make_move(mv) {
            list.push(mv);
        }
    }
    list
}

/// Does the side to move have at least one legal move?
pub fn has_legal_moves(board: &Board) -> bool {
    for mv in gen_pseudo_legal(board) {
        let mut scratch = *board;
        if scratch.make_move(mv) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_initial() {
        let board = Board::initial();
        assert_eq!(gen_pseudo_legal(&board).len(), 20);
        assert_eq!(gen_legal(&board).len(), 20);
        assert!(has_legal_moves(&board));
    }

    #[test]
    fn test_attacks() {
        let board = Board::from_fen("4k3/8/8/3r4/8/8/3P4/4K3 w - - 0 1").unwrap();
        let sq = |s: &str| Square::from_str(s).unwrap();
        assert!(is_attacked(&board, sq("d3"), Color::Black));
        assert!(is_attacked(&board, sq("d8"), Color::Black));
        assert!(!is_attacked(&board, sq("d1"), Color::Black));
        assert!(is_attacked(&board, sq("e3"), Color::White));
        assert!(is_attacked(&board, sq("c3"), Color::White));
        assert!(!is_attacked(&board, sq("d3"), Color::White));
    }

    #[test]
    fn test_promotions() {
        let board = Board::from_fen("3r1r2/4P3/8/8/8/8/8/k3K3 w - - 0 1").unwrap();
        let list = gen_pseudo_legal(&board);
        let f8 = Square::from_str("f8").unwrap();
        let caps = list.iter().filter(|m| m.dst == f8).count();
        assert_eq!(caps, 4);
        let promotes = list
            .iter()
            .filter(|m| m.kind.promote_to().is_some())
            .count();
        // Push, capture left, capture right; four pieces each.
        assert_eq!(promotes, 12);
    }

    #[test]
    fn test_enpassant_gen() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let list = gen_pseudo_legal(&board);
        assert!(list
            .iter()
            .any(|m| m.kind == MoveKind::Enpassant && m.to_string() == "e5d6"));
    }

    #[test]
    fn test_castling_gen() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castles = gen_pseudo_legal(&board)
            .iter()
            .filter(|m| m.kind == MoveKind::Castling)
            .count();
        assert_eq!(castles, 2);

        // A rook eyeing the crossed square forbids that side only.
        let board = Board::from_fen("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1").unwrap();
        let castles: Vec<_> = gen_pseudo_legal(&board)
            .into_iter()
            .filter(|m| m.kind == MoveKind::Castling)
            .collect();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].to_string(), "e1c1");

        // A king in check cannot castle at all.
        let board = Board::from_fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1").unwrap();
        assert!(gen_pseudo_legal(&board)
            .iter()
            .all(|m| m.kind != MoveKind::Castling));
    }

    #[test]
    fn test_pinned_filtered() {
        let board = Board::from_fen("4k3/8/8/8/7b/8/5P2/4K3 w - - 0 1").unwrap();
        let f2 = Square::from_str("f2").unwrap();
        let legal = gen_legal(&board);
        assert!(!legal.is_empty());
        assert!(legal.iter().all(|m| m.src != f2));
    }
}
