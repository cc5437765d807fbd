use std::fmt::{self, Display};
use std::hint;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SquareParseError {
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellParseError {
    #[error("unexpected cell char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unexpected color char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastlingRightsParseError {
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
    #[error("duplicate char {0:?}")]
    DuplicateChar(char),
    #[error("unexpected empty string")]
    EmptyString,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const unsafe fn from_index_unchecked(val: usize) -> Self {
        match val {
            0 => File::A,
            1 => File::B,
            2 => File::C,
            3 => File::D,
            4 => File::E,
            5 => File::F,
            6 => File::G,
            7 => File::H,
            _ => hint::unreachable_unchecked(),
        }
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "file index must be between 0 and 7");
        unsafe { Self::from_index_unchecked(val) }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(unsafe {
                Self::from_index_unchecked((u32::from(c) - u32::from('a')) as usize)
            }),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Board rank, numbered from White's side
///
/// `R1` has index 0, so that `square / 16` yields the rank index directly
/// on the 0x88 grid.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const unsafe fn from_index_unchecked(val: usize) -> Self {
        match val {
            0 => Rank::R1,
            1 => Rank::R2,
            2 => Rank::R3,
            3 => Rank::R4,
            4 => Rank::R5,
            5 => Rank::R6,
            6 => Rank::R7,
            7 => Rank::R8,
            _ => hint::unreachable_unchecked(),
        }
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "rank index must be between 0 and 7");
        unsafe { Self::from_index_unchecked(val) }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(unsafe {
                Self::from_index_unchecked((u32::from(c) - u32::from('1')) as usize)
            }),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'1' + *self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Square on the 0x88 board
///
/// The board is a 16x8 logical grid; a square is valid iff `(index & 0x88) == 0`,
/// which bounds both file and rank to 0..8 with a single mask. File is
/// `index % 16`, rank is `index / 16`. Off-board results of delta arithmetic
/// are representable and detected via [`Square::is_valid()`], so ray walks
/// need no separate bounds checks.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Square(u8);

impl Square {
    pub const fn from_index(val: usize) -> Square {
        assert!(val < 128, "square index must be between 0 and 127");
        Square(val as u8)
    }

    pub const fn from_parts(file: File, rank: Rank) -> Square {
        Square(((rank as u8) << 4) | file as u8)
    }

    pub const fn is_valid(&self) -> bool {
        self.0 & 0x88 == 0
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the file of a valid square
    ///
    /// Must not be called on an invalid square.
    pub const fn file(&self) -> File {
        File::from_index((self.0 % 16) as usize)
    }

    /// Returns the rank of a valid square
    ///
    /// Must not be called on an invalid square.
    pub const fn rank(&self) -> Rank {
        Rank::from_index((self.0 / 16) as usize)
    }

    /// Offsets the square by a 0x88 delta, wrapping on overflow
    ///
    /// The result may be off-board; check it with [`Square::is_valid()`].
    pub const fn add(self, delta: i8) -> Square {
        Square(self.0.wrapping_add(delta as u8))
    }

    /// Iterates over the 64 valid squares, a1 first
    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..128_u8).map(Square).filter(Square::is_valid)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.is_valid() {
            return write!(f, "Square({})", self);
        }
        write!(f, "Square(?0x{:02x})", self.0)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if !self.is_valid() {
            return write!(f, "xx");
        }
        write!(f, "{}{}", self.file().as_char(), self.rank().as_char())
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(SquareParseError::BadLength);
        }
        let bytes = s.as_bytes();
        let (file_ch, rank_ch) = (bytes[0] as char, bytes[1] as char);
        Ok(Square::from_parts(
            File::from_char(file_ch).ok_or(SquareParseError::UnexpectedFileChar(file_ch))?,
            Rank::from_char(rank_ch).ok_or(SquareParseError::UnexpectedRankChar(rank_ch))?,
        ))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ColorParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Color::from_char(ch).ok_or(ColorParseError::UnexpectedChar(ch))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

/// Contents of one board square: empty, or a colored piece
///
/// This is the enumerated replacement for a raw color-bits-plus-type byte:
/// color and piece kind are recovered with [`Cell::color()`] and
/// [`Cell::piece()`] instead of masking.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell(u8);

impl Cell {
    pub const EMPTY: Cell = Cell(0);
    pub const COUNT: usize = 13;

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_occupied(&self) -> bool {
        self.0 != 0
    }

    pub const fn from_parts(c: Color, p: Piece) -> Cell {
        Cell(match c {
            Color::White => 1 + p as u8,
            Color::Black => 7 + p as u8,
        })
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    pub const fn color(&self) -> Option<Color> {
        match self.0 {
            0 => None,
            1..=6 => Some(Color::White),
            _ => Some(Color::Black),
        }
    }

    pub const fn piece(&self) -> Option<Piece> {
        match self.0 {
            0 => None,
            1 | 7 => Some(Piece::Pawn),
            2 | 8 => Some(Piece::Knight),
            3 | 9 => Some(Piece::Bishop),
            4 | 10 => Some(Piece::Rook),
            5 | 11 => Some(Piece::Queen),
            _ => Some(Piece::King),
        }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u8).map(Cell)
    }

    pub fn as_char(&self) -> char {
        b".PNBRQKpnbrqk"[self.0 as usize] as char
    }

    pub fn as_utf8_char(&self) -> char {
        [
            '.', '\u{2659}', '\u{2658}', '\u{2657}', '\u{2656}', '\u{2655}', '\u{2654}',
            '\u{265f}', '\u{265e}', '\u{265d}', '\u{265c}', '\u{265b}', '\u{265a}',
        ][self.0 as usize]
    }

    pub fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Cell::EMPTY);
        }
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        Some(Cell::from_parts(color, piece))
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if (self.0 as usize) < Self::COUNT {
            return write!(f, "Cell({})", self.as_char());
        }
        write!(f, "Cell(?{:?})", self.0)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Cell {
    type Err = CellParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(CellParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Cell::from_char(ch).ok_or(CellParseError::UnexpectedChar(ch))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    King = 0,
    Queen = 1,
}

/// Castling rights for both sides, two bits per color
///
/// Bit 0 is White kingside, bit 1 White queenside, bits 2 and 3 the same
/// rights for Black.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const fn to_index(c: Color, s: CastlingSide) -> u8 {
        ((c as u8) << 1) | s as u8
    }

    pub const EMPTY: CastlingRights = CastlingRights(0);
    pub const FULL: CastlingRights = CastlingRights(15);

    pub const fn has(&self, c: Color, s: CastlingSide) -> bool {
        ((self.0 >> Self::to_index(c, s)) & 1) != 0
    }

    pub const fn has_color(&self, c: Color) -> bool {
        self.has(c, CastlingSide::King) || self.has(c, CastlingSide::Queen)
    }

    pub const fn with(self, c: Color, s: CastlingSide) -> CastlingRights {
        CastlingRights(self.0 | (1_u8 << Self::to_index(c, s)))
    }

    pub fn set(&mut self, c: Color, s: CastlingSide) {
        *self = self.with(c, s)
    }

    pub fn unset(&mut self, c: Color, s: CastlingSide) {
        self.0 &= !(1_u8 << Self::to_index(c, s))
    }

    pub fn unset_color(&mut self, c: Color) {
        self.unset(c, CastlingSide::King);
        self.unset(c, CastlingSide::Queen);
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "CastlingRights({})", self)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if *self == Self::EMPTY {
            return write!(f, "-");
        }
        if self.has(Color::White, CastlingSide::King) {
            write!(f, "K")?;
        }
        if self.has(Color::White, CastlingSide::Queen) {
            write!(f, "Q")?;
        }
        if self.has(Color::Black, CastlingSide::King) {
            write!(f, "k")?;
        }
        if self.has(Color::Black, CastlingSide::Queen) {
            write!(f, "q")?;
        }
        Ok(())
    }
}

impl FromStr for CastlingRights {
    type Err = CastlingRightsParseError;

    fn from_str(s: &str) -> Result<CastlingRights, Self::Err> {
        type Error = CastlingRightsParseError;
        if s == "-" {
            return Ok(CastlingRights::EMPTY);
        }
        if s.is_empty() {
            return Err(Error::EmptyString);
        }
        let mut res = CastlingRights::EMPTY;
        for b in s.bytes() {
            let (color, side) = match b {
                b'K' => (Color::White, CastlingSide::King),
                b'Q' => (Color::White, CastlingSide::Queen),
                b'k' => (Color::Black, CastlingSide::King),
                b'q' => (Color::Black, CastlingSide::Queen),
                _ => return Err(Error::UnexpectedChar(b as char)),
            };
            if res.has(color, side) {
                return Err(Error::DuplicateChar(b as char));
            }
            res.set(color, side);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file() {
        for (idx, file) in File::iter().enumerate() {
            assert_eq!(file.index(), idx);
            assert_eq!(File::from_index(idx), file);
        }
    }

    #[test]
    fn test_rank() {
        for (idx, rank) in Rank::iter().enumerate() {
            assert_eq!(rank.index(), idx);
            assert_eq!(Rank::from_index(idx), rank);
        }
        assert_eq!(Rank::R1.as_char(), '1');
        assert_eq!(Rank::from_char('8'), Some(Rank::R8));
    }

    #[test]
    fn test_square_mask() {
        // The 0x88 mask admits exactly the 64 real squares.
        assert_eq!(Square::iter().count(), 64);
        for rank in Rank::iter() {
            for file in File::iter() {
                let sq = Square::from_parts(file, rank);
                assert!(sq.is_valid());
                assert_eq!(sq.file(), file);
                assert_eq!(sq.rank(), rank);
                assert_eq!(sq.index(), rank.index() * 16 + file.index());
            }
        }
        for idx in 0..128 {
            let sq = Square::from_index(idx);
            assert_eq!(sq.is_valid(), idx % 16 < 8);
        }
    }

    #[test]
    fn test_square_add() {
        let e4 = Square::from_parts(File::E, Rank::R4);
        assert_eq!(e4.add(16), Square::from_parts(File::E, Rank::R5));
        assert_eq!(e4.add(-16), Square::from_parts(File::E, Rank::R3));
        assert_eq!(e4.add(17), Square::from_parts(File::F, Rank::R5));
        let h1 = Square::from_parts(File::H, Rank::R1);
        assert!(!h1.add(1).is_valid());
        assert!(!h1.add(-17).is_valid());
        let a8 = Square::from_parts(File::A, Rank::R8);
        assert!(!a8.add(16).is_valid());
        assert!(!a8.add(-1).is_valid());
    }

    #[test]
    fn test_square_str() {
        assert_eq!(
            Square::from_parts(File::B, Rank::R4).to_string(),
            "b4".to_string()
        );
        assert_eq!(
            Square::from_str("a1"),
            Ok(Square::from_parts(File::A, Rank::R1))
        );
        assert_eq!(
            Square::from_str("h8"),
            Ok(Square::from_parts(File::H, Rank::R8))
        );
        assert_eq!(
            Square::from_str("h9"),
            Err(SquareParseError::UnexpectedRankChar('9'))
        );
        assert_eq!(
            Square::from_str("i4"),
            Err(SquareParseError::UnexpectedFileChar('i'))
        );
        assert_eq!(Square::from_str("e44"), Err(SquareParseError::BadLength));
        // Off-board squares render as the "xx" sentinel.
        assert_eq!(Square::from_index(8).to_string(), "xx");
    }

    #[test]
    fn test_cell() {
        assert_eq!(Cell::EMPTY.color(), None);
        assert_eq!(Cell::EMPTY.piece(), None);
        let mut cells = vec![Cell::EMPTY];
        for color in [Color::White, Color::Black] {
            for piece in [
                Piece::Pawn,
                Piece::Knight,
                Piece::Bishop,
                Piece::Rook,
                Piece::Queen,
                Piece::King,
            ] {
                let cell = Cell::from_parts(color, piece);
                assert_eq!(cell.color(), Some(color));
                assert_eq!(cell.piece(), Some(piece));
                cells.push(cell);
            }
        }
        assert_eq!(cells, Cell::iter().collect::<Vec<_>>());
        for cell in Cell::iter() {
            let s = cell.to_string();
            assert_eq!(Cell::from_str(&s), Ok(cell));
        }
    }

    #[test]
    fn test_castling() {
        let empty = CastlingRights::EMPTY;
        assert!(!empty.has(Color::White, CastlingSide::Queen));
        assert!(!empty.has_color(Color::Black));
        assert_eq!(empty.to_string(), "-");
        assert_eq!(CastlingRights::from_str("-"), Ok(empty));

        let full = CastlingRights::FULL;
        assert!(full.has(Color::White, CastlingSide::Queen));
        assert!(full.has(Color::White, CastlingSide::King));
        assert!(full.has(Color::Black, CastlingSide::Queen));
        assert!(full.has(Color::Black, CastlingSide::King));
        assert_eq!(full.to_string(), "KQkq");
        assert_eq!(CastlingRights::from_str("KQkq"), Ok(full));

        let mut rights = CastlingRights::EMPTY;
        rights.set(Color::White, CastlingSide::King);
        assert!(rights.has(Color::White, CastlingSide::King));
        assert!(!rights.has(Color::White, CastlingSide::Queen));
        assert_eq!(rights.to_string(), "K");
        assert_eq!(CastlingRights::from_str("K"), Ok(rights));

        rights.unset(Color::White, CastlingSide::King);
        rights.set(Color::Black, CastlingSide::Queen);
        assert_eq!(rights.to_string(), "q");
        rights.unset_color(Color::Black);
        assert_eq!(rights, CastlingRights::EMPTY);

        assert_eq!(
            CastlingRights::from_str("KK"),
            Err(CastlingRightsParseError::DuplicateChar('K'))
        );
        assert_eq!(
            CastlingRights::from_str("Kx"),
            Err(CastlingRightsParseError::UnexpectedChar('x'))
        );
    }
}
