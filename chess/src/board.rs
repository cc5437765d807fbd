//! Board and related things

use crate::movegen;
use crate::types::{
    self, CastlingRights, CastlingSide, Cell, Color, File, Piece, Rank, Square,
};
use ox88_base::geometry;

use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing the first part of FEN (i.e. the positions of pieces on the board)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CellsParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing [`Board`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// FEN contains non-ASCII characters
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// FEN doesn't have board part
    #[error("board not specified")]
    NoBoard,
    /// Error parsing board from FEN
    #[error("bad board: {0}")]
    Board(#[from] CellsParseError),
    /// FEN doesn't have move side part
    #[error("no move side")]
    NoMoveSide,
    /// Error parsing move side from FEN
    #[error("bad move side: {0}")]
    MoveSide(#[from] types::ColorParseError),
    /// FEN doesn't have castling rights part
    #[error("no castling rights")]
    NoCastling,
    /// Error parsing castling rights from FEN
    #[error("bad castling rights: {0}")]
    Castling(#[from] types::CastlingRightsParseError),
    /// FEN doesn't have enpassant part
    #[error("no enpassant")]
    NoEnpassant,
    /// Error parsing enpassant from FEN
    #[error("bad enpassant: {0}")]
    Enpassant(#[from] types::SquareParseError),
    /// Enpassant rank is invalid
    #[error("invalid enpassant rank {0}")]
    InvalidEnpassantRank(Rank),
    /// Error parsing move counter
    #[error("bad move counter: {0}")]
    MoveCounter(ParseIntError),
    /// Error parsing move number
    #[error("bad move number: {0}")]
    MoveNumber(ParseIntError),
    /// FEN contains extra data
    #[error("extra data in FEN")]
    ExtraData,
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// There is a pawn on the 1st or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Square),
}

/// Chess board on the 0x88 mailbox
///
/// The board holds the position itself plus the side to move, castling
/// rights, en passant state and move counters. It is `Copy` and small, so
/// search code backtracks by taking a snapshot before a move and restoring
/// it afterwards; there is no undo-move.
///
/// En passant state is kept as the square on which the capturing pawn would
/// land (e.g. `e3` right after White plays `e2e4`), not the square of the
/// pawn itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) cells: [Cell; 128],
    pub(crate) side: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) ep_dest: Option<Square>,
    pub(crate) move_counter: u16,
    pub(crate) move_number: u16,
    pub(crate) kings: [Square; 2],
}

// Sentinel for a missing king; fails the 0x88 validity check.
const NO_KING: Square = Square::from_index(0x7f);

impl Board {
    /// Creates an empty board with White to move
    ///
    /// The result is not a playable position until kings are placed on it.
    pub fn empty() -> Board {
        Board {
            cells: [Cell::EMPTY; 128],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep_dest: None,
            move_counter: 0,
            move_number: 1,
            kings: [NO_KING; 2],
        }
    }

    /// Creates a board with the initial position
    pub fn initial() -> Board {
        const BACK_ROW: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        let mut board = Board::empty();
        for (file, piece) in File::iter().zip(BACK_ROW) {
            board.put(
                Square::from_parts(file, Rank::R1),
                Cell::from_parts(Color::White, piece),
            );
            board.put(
                Square::from_parts(file, Rank::R2),
                Cell::from_parts(Color::White, Piece::Pawn),
            );
            board.put(
                Square::from_parts(file, Rank::R7),
                Cell::from_parts(Color::Black, Piece::Pawn),
            );
            board.put(
                Square::from_parts(file, Rank::R8),
                Cell::from_parts(Color::Black, piece),
            );
        }
        board.castling = CastlingRights::FULL;
        board
    }

    pub fn from_fen(fen: &str) -> Result<Board, FenParseError> {
        fen.parse()
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Cell {
        self.cells[sq.index()]
    }

    /// Puts `cell` on the square `sq`
    ///
    /// King positions are re-cached when a king is placed or removed.
    pub fn put(&mut self, sq: Square, cell: Cell) {
        let old = self.cells[sq.index()];
        self.cells[sq.index()] = cell;
        // The cache entry is dropped only while it still points here, so a
        // king's arrival square surviving the clearing of its source square
        // does not lose its entry.
        if let (Some(c), Some(Piece::King)) = (old.color(), old.piece()) {
            if self.kings[c.index()] == sq {
                self.kings[c.index()] = NO_KING;
            }
        }
        if let (Some(c), Some(Piece::King)) = (cell.color(), cell.piece()) {
            self.kings[c.index()] = sq;
        }
    }

    #[inline]
    pub const fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub const fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Square onto which an en passant capture would go, if one is available
    #[inline]
    pub const fn ep_dest(&self) -> Option<Square> {
        self.ep_dest
    }

    #[inline]
    pub const fn move_counter(&self) -> u16 {
        self.move_counter
    }

    #[inline]
    pub const fn move_number(&self) -> u16 {
        self.move_number
    }

    #[inline]
    pub const fn king_pos(&self, c: Color) -> Square {
        self.kings[c.index()]
    }

    /// Is the king of the side to move currently attacked?
    pub fn is_check(&self) -> bool {
        movegen::is_attacked(self, self.king_pos(self.side), self.side.inv())
    }

    pub fn as_fen(&self) -> String {
        self.to_string()
    }

    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }

    fn parse_cells(s: &str) -> Result<Board, CellsParseError> {
        let mut board = Board::empty();
        let mut file = 0_usize;
        let mut rank = Rank::R8;
        for ch in s.chars() {
            match ch {
                '/' => {
                    if file < 8 {
                        return Err(CellsParseError::RankUnderflow(rank));
                    }
                    if rank == Rank::R1 {
                        return Err(CellsParseError::Overflow);
                    }
                    rank = Rank::from_index(rank.index() - 1);
                    file = 0;
                }
                '1'..='8' => {
                    file += (u32::from(ch) - u32::from('0')) as usize;
                    if file > 8 {
                        return Err(CellsParseError::RankOverflow(rank));
                    }
                }
                _ => {
                    if file >= 8 {
                        return Err(CellsParseError::RankOverflow(rank));
                    }
                    let cell = match Cell::from_char(ch) {
                        Some(cell) if cell.is_occupied() => cell,
                        _ => return Err(CellsParseError::UnexpectedChar(ch)),
                    };
                    board.put(Square::from_parts(File::from_index(file), rank), cell);
                    file += 1;
                }
            }
        }
        if file < 8 {
            return Err(CellsParseError::RankUnderflow(rank));
        }
        if rank != Rank::R1 {
            return Err(CellsParseError::Underflow);
        }
        Ok(board)
    }

    fn validate(&self) -> Result<(), FenParseError> {
        for color in [Color::White, Color::Black] {
            let king = Cell::from_parts(color, Piece::King);
            let count = Square::iter().filter(|&sq| self.get(sq) == king).count();
            match count {
                0 => return Err(FenParseError::NoKing(color)),
                1 => {}
                _ => return Err(FenParseError::TooManyKings(color)),
            }
        }
        // Pawns on the edge ranks would have no forward square; movegen
        // relies on them never appearing there.
        for sq in Square::iter() {
            if self.get(sq).piece() == Some(Piece::Pawn)
                && matches!(sq.rank(), Rank::R1 | Rank::R8)
            {
                return Err(FenParseError::InvalidPawn(sq));
            }
        }
        Ok(())
    }

    // Drops castling rights that the position itself contradicts, so that
    // movegen can trust the flags without re-checking piece placement.
    fn fix_castling(&mut self) {
        for color in [Color::White, Color::Black] {
            for side in [CastlingSide::King, CastlingSide::Queen] {
                if !self.castling.has(color, side) {
                    continue;
                }
                let king_ok =
                    self.get(geometry::king_home(color)) == Cell::from_parts(color, Piece::King);
                let rook_ok = self.get(geometry::rook_home(color, side))
                    == Cell::from_parts(color, Piece::Rook);
                if !king_ok || !rook_ok {
                    self.castling.unset(color, side);
                }
            }
        }
    }
}

impl FromStr for Board {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        type Error = FenParseError;

        if !s.is_ascii() {
            return Err(Error::NonAscii);
        }
        let mut iter = s.split(' ').filter(|t| !t.is_empty());

        let mut board = Board::parse_cells(iter.next().ok_or(Error::NoBoard)?)?;
        board.side = Color::from_str(iter.next().ok_or(Error::NoMoveSide)?)?;
        board.castling = CastlingRights::from_str(iter.next().ok_or(Error::NoCastling)?)?;
        match iter.next().ok_or(Error::NoEnpassant)? {
            "-" => board.ep_dest = None,
            tok => {
                let sq = Square::from_str(tok)?;
                let expected = match board.side {
                    Color::White => Rank::R6,
                    Color::Black => Rank::R3,
                };
                if sq.rank() != expected {
                    return Err(Error::InvalidEnpassantRank(sq.rank()));
                }
                board.ep_dest = Some(sq);
            }
        }
        board.move_counter = match iter.next() {
            Some(tok) => tok.parse().map_err(Error::MoveCounter)?,
            None => 0,
        };
        board.move_number = match iter.next() {
            Some(tok) => tok.parse().map_err(Error::MoveNumber)?,
            None => 1,
        };
        if iter.next().is_some() {
            return Err(Error::ExtraData);
        }

        board.validate()?;
        board.fix_castling();
        Ok(board)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank_idx in (0..8).rev() {
            let rank = Rank::from_index(rank_idx);
            let mut empty = 0;
            for file in File::iter() {
                let cell = self.get(Square::from_parts(file, rank));
                if cell.is_empty() {
                    empty += 1;
                    continue;
                }
                if empty != 0 {
                    write!(f, "{}", empty)?;
                    empty = 0;
                }
                write!(f, "{}", cell)?;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
            }
            if rank_idx != 0 {
                write!(f, "/")?;
            }
        }
        write!(f, " {} {}", self.side, self.castling)?;
        match self.ep_dest {
            Some(sq) => write!(f, " {}", sq)?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.move_counter, self.move_number)
    }
}

/// Style for pretty-printing the board
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrettyStyle {
    Ascii,
    Utf8,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;

    fn cell(c: Cell) -> char;
    fn indicator(c: Color) -> char;

    fn fmt(board: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank_idx in (0..8).rev() {
            let rank = Rank::from_index(rank_idx);
            write!(f, "{}{}", rank.as_char(), Self::VERT_FRAME)?;
            for file in File::iter() {
                write!(f, "{}", Self::cell(board.get(Square::from_parts(file, rank))))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in 0..8 {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, "{}{}", Self::indicator(board.side), Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file.as_char())?;
        }
        writeln!(f)
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';

    fn cell(c: Cell) -> char {
        c.as_char()
    }

    fn indicator(c: Color) -> char {
        match c {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '\u{2500}';
    const VERT_FRAME: char = '\u{2502}';
    const ANGLE_FRAME: char = '\u{253c}';

    fn cell(c: Cell) -> char {
        c.as_utf8_char()
    }

    fn indicator(c: Color) -> char {
        match c {
            Color::White => '\u{25cb}',
            Color::Black => '\u{25cf}',
        }
    }
}

/// Wrapper to pretty-print the board
///
/// Created by [`Board::pretty()`].
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

impl<'a> fmt::Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}
