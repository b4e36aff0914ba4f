// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{convert::TryFrom, fmt, str::FromStr};

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SquareParseError {
    #[error("square out of range: row {0}, column {1}")]
    OutOfRange(i32, i32),
    #[error("invalid file: {0}")]
    InvalidFile(char),
    #[error("invalid rank: {0}")]
    InvalidRank(char),
    #[error("invalid square: {0:?}")]
    InvalidLength(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("invalid color letter: {0}")]
    InvalidChar(char),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PieceParseError {
    #[error("invalid piece letter: {0}")]
    InvalidChar(char),
}

/// A square on the chessboard.
///
/// Squares are addressed by row and column. Row 0 is the eighth rank (black's back rank) and row 7 is the first
/// rank; column 0 is the a-file. The wrapped value is `row * 8 + column` and is always in range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub(in crate::core) u8);

impl Square {
    /// Creates a new square from a row and column, failing if either is off the board.
    pub fn new(row: u8, column: u8) -> Result<Square, SquareParseError> {
        if row >= 8 || column >= 8 {
            return Err(SquareParseError::OutOfRange(row as i32, column as i32));
        }

        Ok(Square(row * 8 + column))
    }

    pub const fn row(self) -> u8 {
        self.0 >> 3
    }

    pub const fn column(self) -> u8 {
        self.0 & 7
    }

    /// The rank of this square in algebraic notation, 1 through 8.
    pub const fn rank(self) -> u8 {
        8 - self.row()
    }

    /// The file letter of this square in algebraic notation, 'a' through 'h'.
    pub const fn file(self) -> char {
        (b'a' + self.column()) as char
    }

    /// Returns the square reached by stepping the given number of rows and columns away from this one, or `None` if
    /// that falls off the board.
    pub fn offset(self, rows: i8, columns: i8) -> Option<Square> {
        let row = self.row() as i8 + rows;
        let column = self.column() as i8 + columns;
        if !(0..8).contains(&row) || !(0..8).contains(&column) {
            return None;
        }

        Some(Square(row as u8 * 8 + column as u8))
    }

    /// The square on the row of `row_of` and the column of `column_of`. An en-passant capture removes the pawn
    /// standing on the capturer's row and the destination's column.
    pub const fn crossing(row_of: Square, column_of: Square) -> Square {
        Square(row_of.row() * 8 + column_of.column())
    }

    /// Whether or not this square is on either back rank, where pawns promote.
    pub const fn is_back_rank(self) -> bool {
        self.row() == 0 || self.row() == 7
    }

    /// Whether or not this square and the two given squares lie on one straight line, in the geometric sense.
    pub fn is_collinear(self, a: Square, b: Square) -> bool {
        let (r0, c0) = (self.row() as i32, self.column() as i32);
        let (r1, c1) = (a.row() as i32, a.column() as i32);
        let (r2, c2) = (b.row() as i32, b.column() as i32);
        c0 * (r1 - r2) + c1 * (r2 - r0) + c2 * (r0 - r1) == 0
    }
}

impl TryFrom<u8> for Square {
    type Error = SquareParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 64 {
            return Err(SquareParseError::OutOfRange(
                (value / 8) as i32,
                (value % 8) as i32,
            ));
        }

        Ok(Square(value))
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(SquareParseError::InvalidLength(s.to_string()));
        }

        let column = match chars[0] {
            c @ 'a'..='h' => c as u8 - b'a',
            c => return Err(SquareParseError::InvalidFile(c)),
        };
        let row = match chars[1] {
            c @ '1'..='8' => b'8' - c as u8,
            c => return Err(SquareParseError::InvalidRank(c)),
        };
        Square::new(row, column)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

pub const A1: Square = Square(56);
pub const B1: Square = Square(57);
pub const C1: Square = Square(58);
pub const D1: Square = Square(59);
pub const E1: Square = Square(60);
pub const F1: Square = Square(61);
pub const G1: Square = Square(62);
pub const H1: Square = Square(63);
pub const A2: Square = Square(48);
pub const B2: Square = Square(49);
pub const C2: Square = Square(50);
pub const D2: Square = Square(51);
pub const E2: Square = Square(52);
pub const F2: Square = Square(53);
pub const G2: Square = Square(54);
pub const H2: Square = Square(55);
pub const A3: Square = Square(40);
pub const B3: Square = Square(41);
pub const C3: Square = Square(42);
pub const D3: Square = Square(43);
pub const E3: Square = Square(44);
pub const F3: Square = Square(45);
pub const G3: Square = Square(46);
pub const H3: Square = Square(47);
pub const A4: Square = Square(32);
pub const B4: Square = Square(33);
pub const C4: Square = Square(34);
pub const D4: Square = Square(35);
pub const E4: Square = Square(36);
pub const F4: Square = Square(37);
pub const G4: Square = Square(38);
pub const H4: Square = Square(39);
pub const A5: Square = Square(24);
pub const B5: Square = Square(25);
pub const C5: Square = Square(26);
pub const D5: Square = Square(27);
pub const E5: Square = Square(28);
pub const F5: Square = Square(29);
pub const G5: Square = Square(30);
pub const H5: Square = Square(31);
pub const A6: Square = Square(16);
pub const B6: Square = Square(17);
pub const C6: Square = Square(18);
pub const D6: Square = Square(19);
pub const E6: Square = Square(20);
pub const F6: Square = Square(21);
pub const G6: Square = Square(22);
pub const H6: Square = Square(23);
pub const A7: Square = Square(8);
pub const B7: Square = Square(9);
pub const C7: Square = Square(10);
pub const D7: Square = Square(11);
pub const E7: Square = Square(12);
pub const F7: Square = Square(13);
pub const G7: Square = Square(14);
pub const H7: Square = Square(15);
pub const A8: Square = Square(0);
pub const B8: Square = Square(1);
pub const C8: Square = Square(2);
pub const D8: Square = Square(3);
pub const E8: Square = Square(4);
pub const F8: Square = Square(5);
pub const G8: Square = Square(6);
pub const H8: Square = Square(7);

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The letter used for this color in position notation.
    pub fn as_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// The row delta of a pawn step for this color.
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The row holding this color's king and rooks in the initial position.
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The row pawns of this color start on, and may double push from.
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

impl TryFrom<char> for Color {
    type Error = ColorParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'w' => Ok(Color::White),
            'b' => Ok(Color::Black),
            c => Err(ColorParseError::InvalidChar(c)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

/// Every piece kind, in the order the attack detector scans them.
pub const PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::King,
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Pawn,
];

/// Pieces a pawn may promote to, most valuable first.
pub const PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

impl PieceKind {
    pub fn is_slider(self) -> bool {
        matches!(self, PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop)
    }

    /// The movement template of this piece kind and the farthest it may walk along each entry. Pawns are not
    /// covered; their geometry depends on color.
    pub fn reach(self) -> (&'static [(i8, i8)], u8) {
        match self {
            PieceKind::King => (&QUEEN_LINES, 1),
            PieceKind::Queen => (&QUEEN_LINES, 7),
            PieceKind::Rook => (&ROOK_LINES, 7),
            PieceKind::Bishop => (&BISHOP_LINES, 7),
            PieceKind::Knight => (&KNIGHT_JUMPS, 1),
            PieceKind::Pawn => panic!("pawn movement depends on color"),
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = PieceParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let kind = match value.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => return Err(PieceParseError::InvalidChar(value)),
        };

        Ok(kind)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        write!(f, "{}", c)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { color, kind }
    }

    /// Offsets this piece captures along, if it is a pawn: one row forward and one column to either side.
    pub fn pawn_captures(color: Color) -> &'static [(i8, i8)] {
        match color {
            Color::White => &WHITE_PAWN_CAPTURES,
            Color::Black => &BLACK_PAWN_CAPTURES,
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = PieceParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let kind = PieceKind::try_from(value)?;
        let color = if value.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Ok(Piece { color, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.kind.to_string();
        match self.color {
            Color::White => write!(f, "{}", c.to_ascii_uppercase()),
            Color::Black => write!(f, "{}", c),
        }
    }
}

/// The eight compass directions, as seen from white's side of the board.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// The (row, column) step of this direction. North points toward the eighth rank, which is row 0.
    pub const fn as_offset(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }
}

const ROOK_LINES: [(i8, i8); 4] = [
    Direction::North.as_offset(),
    Direction::South.as_offset(),
    Direction::West.as_offset(),
    Direction::East.as_offset(),
];

const BISHOP_LINES: [(i8, i8); 4] = [
    Direction::NorthWest.as_offset(),
    Direction::NorthEast.as_offset(),
    Direction::SouthWest.as_offset(),
    Direction::SouthEast.as_offset(),
];

const QUEEN_LINES: [(i8, i8); 8] = [
    Direction::NorthWest.as_offset(),
    Direction::North.as_offset(),
    Direction::NorthEast.as_offset(),
    Direction::SouthWest.as_offset(),
    Direction::South.as_offset(),
    Direction::SouthEast.as_offset(),
    Direction::West.as_offset(),
    Direction::East.as_offset(),
];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (2, -1),
    (2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
];

const WHITE_PAWN_CAPTURES: [(i8, i8); 2] = [
    Direction::NorthWest.as_offset(),
    Direction::NorthEast.as_offset(),
];

const BLACK_PAWN_CAPTURES: [(i8, i8); 2] = [
    Direction::SouthWest.as_offset(),
    Direction::SouthEast.as_offset(),
];

/// Iterates over every square, row by row starting from the eighth rank.
pub fn squares() -> impl DoubleEndedIterator<Item = Square> {
    (0..64u8).map(Square)
}

pub fn colors() -> ::std::array::IntoIter<Color, 2> {
    [Color::White, Color::Black].into_iter()
}
