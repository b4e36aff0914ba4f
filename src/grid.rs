// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The board grid, an 8x8 array of squares that are either empty or hold a piece, and the square walker used to
//! step along movement templates.

use std::fmt;

use crate::core::{self, Color, Piece, PlacedPiece, Square};

/// Piece placement on the board, and nothing else. All other position state lives in `PositionState`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [[Option<Piece>; 8]; 8],
}

impl Grid {
    /// Creates an empty grid.
    pub fn new() -> Grid {
        Grid {
            cells: [[None; 8]; 8],
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.row() as usize][square.column() as usize]
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Overwrites the contents of a square, returning whatever was there before.
    pub fn replace(&mut self, square: Square, content: Option<Piece>) -> Option<Piece> {
        std::mem::replace(
            &mut self.cells[square.row() as usize][square.column() as usize],
            content,
        )
    }

    /// Puts a piece on a square, returning the piece it displaced, if any.
    pub fn place(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.replace(square, Some(piece))
    }

    /// Empties a square, returning the piece that stood on it, if any.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.replace(square, None)
    }

    /// All pieces on the board, row by row starting at the eighth rank.
    pub fn pieces(&self) -> impl Iterator<Item = PlacedPiece> + '_ {
        core::squares().filter_map(move |square| {
            self.piece_at(square)
                .map(|piece| PlacedPiece::new(piece, square))
        })
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = PlacedPiece> + '_ {
        self.pieces().filter(move |placed| placed.piece.color == color)
    }

    /// The first square holding the given piece, if any.
    pub fn find(&self, piece: Piece) -> Option<Square> {
        self.pieces()
            .find(|placed| placed.piece == piece)
            .map(|placed| placed.square)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sq in core::squares() {
            if let Some(piece) = self.piece_at(sq) {
                write!(f, " {} ", piece)?;
            } else {
                write!(f, " . ")?;
            }

            if sq.column() == 7 {
                writeln!(f, "| {}", sq.rank())?;
            }
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in 'a'..='h' {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

/// What the square walker should do after visiting a square.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Walk {
    /// Keep stepping in the current direction.
    Continue,
    /// Abandon the current direction and move on to the next one.
    StopDirection,
    /// Abandon the walk entirely.
    StopWalking,
}

/// Steps outward from `origin` along each of the given (row, column) offsets, up to `distance` steps per offset,
/// handing every square that stays on the board to `visit`. The origin itself is never visited.
///
/// Returns `Walk::StopWalking` if the visitor cut the walk short, `Walk::Continue` otherwise.
pub fn walk<F>(origin: Square, lines: &[(i8, i8)], distance: u8, mut visit: F) -> Walk
where
    F: FnMut(Square) -> Walk,
{
    for &(rows, columns) in lines {
        let mut current = origin;
        for _ in 0..distance {
            current = match current.offset(rows, columns) {
                Some(next) => next,
                None => break,
            };

            match visit(current) {
                Walk::Continue => {}
                Walk::StopDirection => break,
                Walk::StopWalking => return Walk::StopWalking,
            }
        }
    }

    Walk::Continue
}
