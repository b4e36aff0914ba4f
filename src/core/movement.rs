// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Movements produced by the move generator.
//!
//! A generated movement is an origin (piece and square) plus a destination (piece and square) plus a set of
//! flags. The destination piece differs from the origin piece only for promotions. Castling is encoded as the
//! king moving onto the square of the rook it castles with; the `CASTLING` flag tells it apart from any other
//! king move.
//!
//! Movements are grouped per origin square into `PieceMovements`, and the per-origin groups are aggregated into
//! `Movements`. Both keep running `MovementCounts` so that consumers like perft never need to re-scan flags.

use std::{
    fmt,
    iter::FromIterator,
    ops::{Add, AddAssign},
};

use bitflags::bitflags;
use serde::Serialize;

use crate::core::{Piece, PieceKind, Square};

bitflags! {
    /// Annotations computed once, at generation time, for every generated movement.
    ///
    /// | Flag           | Kind        | Set when                                                          |
    /// |----------------|-------------|-------------------------------------------------------------------|
    /// | `CAPTURE`      | structural  | the destination holds an enemy piece, or the move is en passant   |
    /// | `EN_PASSANT`   | structural  | a pawn moves diagonally onto an empty square                      |
    /// | `CASTLING`     | structural  | a king moves onto a rook of its own color                         |
    /// | `PROMOTION`    | structural  | a pawn reaches a back rank                                        |
    /// | `CHECK`        | situational | the opponent's king is attacked afterwards                        |
    /// | `DISCOVERY`    | situational | the single checking piece was unmasked by the move                |
    /// | `DOUBLE_CHECK` | situational | two pieces attack the opponent's king afterwards                  |
    /// | `CHECKMATE`    | situational | check, and the opponent has no legal reply                        |
    /// | `STALEMATE`    | situational | no check, and the opponent has no legal reply                     |
    pub struct MovementFlags: u16 {
        const NONE = 0;
        const CAPTURE = 0b0000_0000_0001;
        const EN_PASSANT = 0b0000_0000_0010;
        const CASTLING = 0b0000_0000_0100;
        const PROMOTION = 0b0000_0000_1000;
        const CHECK = 0b0000_0001_0000;
        const DISCOVERY = 0b0000_0010_0000;
        const DOUBLE_CHECK = 0b0000_0100_0000;
        const CHECKMATE = 0b0000_1000_0000;
        const STALEMATE = 0b0001_0000_0000;
    }
}

impl fmt::Display for MovementFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(MovementFlags, &str); 9] = [
            (MovementFlags::CAPTURE, "capture"),
            (MovementFlags::EN_PASSANT, "en passant"),
            (MovementFlags::CASTLING, "castling"),
            (MovementFlags::PROMOTION, "promotion"),
            (MovementFlags::CHECK, "check"),
            (MovementFlags::DISCOVERY, "discovery"),
            (MovementFlags::DOUBLE_CHECK, "double"),
            (MovementFlags::CHECKMATE, "checkmate"),
            (MovementFlags::STALEMATE, "stalemate"),
        ];

        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            write!(f, "no flags")
        } else {
            write!(f, "{}", names.join(", "))
        }
    }
}

/// A piece together with the square it stands on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlacedPiece {
    pub piece: Piece,
    pub square: Square,
}

impl PlacedPiece {
    pub const fn new(piece: Piece, square: Square) -> PlacedPiece {
        PlacedPiece { piece, square }
    }
}

impl fmt::Display for PlacedPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.piece, self.square)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MovementDestination {
    pub target: PlacedPiece,
    pub flags: MovementFlags,
}

/// A single generated movement: where a piece starts, and where (and as what) it ends up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PieceMovement {
    pub origin: PlacedPiece,
    pub destination: MovementDestination,
}

impl PieceMovement {
    pub fn source(&self) -> Square {
        self.origin.square
    }

    pub fn target(&self) -> PlacedPiece {
        self.destination.target
    }

    pub fn flags(&self) -> MovementFlags {
        self.destination.flags
    }

    /// The piece a pawn turns into, if this movement is a promotion.
    pub fn promotion(&self) -> Option<PieceKind> {
        if self.flags().contains(MovementFlags::PROMOTION) {
            Some(self.destination.target.piece.kind)
        } else {
            None
        }
    }

    /// Returns a coordinate-notation string for this movement. Castling is written as the king capturing its own
    /// rook, the same way the movement is encoded.
    pub fn as_uci(&self) -> String {
        match self.promotion() {
            Some(kind) => format!("{}{}{}", self.source(), self.target().square, kind),
            None => format!("{}{}", self.source(), self.target().square),
        }
    }
}

impl fmt::Display for PieceMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}={}, {}",
            self.source(),
            self.target().square,
            self.target().piece,
            self.flags()
        )
    }
}

/// Counters over a set of movements, one per flag kind plus the total.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MovementCounts {
    pub movements: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castlings: u64,
    pub promotions: u64,
    pub checks: u64,
    pub discoveries: u64,
    pub double_checks: u64,
    pub checkmates: u64,
    pub stalemates: u64,
}

impl MovementCounts {
    /// Counts one more movement carrying the given flags.
    pub fn record(&mut self, flags: MovementFlags) {
        self.movements += 1;
        let bump = |flag: MovementFlags, counter: &mut u64| {
            if flags.contains(flag) {
                *counter += 1;
            }
        };

        bump(MovementFlags::CAPTURE, &mut self.captures);
        bump(MovementFlags::EN_PASSANT, &mut self.en_passants);
        bump(MovementFlags::CASTLING, &mut self.castlings);
        bump(MovementFlags::PROMOTION, &mut self.promotions);
        bump(MovementFlags::CHECK, &mut self.checks);
        bump(MovementFlags::DISCOVERY, &mut self.discoveries);
        bump(MovementFlags::DOUBLE_CHECK, &mut self.double_checks);
        bump(MovementFlags::CHECKMATE, &mut self.checkmates);
        bump(MovementFlags::STALEMATE, &mut self.stalemates);
    }
}

impl AddAssign for MovementCounts {
    fn add_assign(&mut self, rhs: MovementCounts) {
        self.movements += rhs.movements;
        self.captures += rhs.captures;
        self.en_passants += rhs.en_passants;
        self.castlings += rhs.castlings;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.discoveries += rhs.discoveries;
        self.double_checks += rhs.double_checks;
        self.checkmates += rhs.checkmates;
        self.stalemates += rhs.stalemates;
    }
}

impl fmt::Display for MovementCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "movements = {}, captures = {}, enPassants = {}, castlings = {}, promotions = {}, checks = {}, \
             discoveries = {}, doubles = {}, checkmates = {}, stalemates = {}",
            self.movements,
            self.captures,
            self.en_passants,
            self.castlings,
            self.promotions,
            self.checks,
            self.discoveries,
            self.double_checks,
            self.checkmates,
            self.stalemates
        )
    }
}

/// All movements of the piece on one origin square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceMovements {
    origin: PlacedPiece,
    destinations: Vec<MovementDestination>,
    counts: MovementCounts,
}

impl PieceMovements {
    pub fn new(origin: PlacedPiece, destinations: Vec<MovementDestination>) -> PieceMovements {
        let mut counts = MovementCounts::default();
        for destination in &destinations {
            counts.record(destination.flags);
        }

        PieceMovements {
            origin,
            destinations,
            counts,
        }
    }

    pub fn origin(&self) -> PlacedPiece {
        self.origin
    }

    pub fn destinations(&self) -> &[MovementDestination] {
        &self.destinations
    }

    pub fn counts(&self) -> MovementCounts {
        self.counts
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PieceMovement> + '_ {
        let origin = self.origin;
        self.destinations
            .iter()
            .map(move |&destination| PieceMovement {
                origin,
                destination,
            })
    }
}

/// The full movement set of a position: per-origin groups plus aggregate counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Movements {
    origins: Vec<PieceMovements>,
    counts: MovementCounts,
}

impl Movements {
    pub fn origins(&self) -> &[PieceMovements] {
        &self.origins
    }

    pub fn counts(&self) -> MovementCounts {
        self.counts
    }

    /// Number of distinct movements, across all origins.
    pub fn len(&self) -> usize {
        self.origins.iter().map(PieceMovements::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.iter().all(PieceMovements::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = PieceMovement> + '_ {
        self.origins.iter().flat_map(PieceMovements::iter)
    }

    /// Appends the movements of another origin, skipping it if it has none.
    pub fn push(&mut self, movements: PieceMovements) {
        if movements.is_empty() {
            return;
        }

        self.counts += movements.counts;
        self.origins.push(movements);
    }
}

impl From<PieceMovements> for Movements {
    fn from(movements: PieceMovements) -> Movements {
        let mut result = Movements::default();
        result.push(movements);
        result
    }
}

impl FromIterator<PieceMovements> for Movements {
    fn from_iter<I: IntoIterator<Item = PieceMovements>>(iter: I) -> Movements {
        let mut result = Movements::default();
        result.extend(iter);
        result
    }
}

impl Extend<PieceMovements> for Movements {
    fn extend<I: IntoIterator<Item = PieceMovements>>(&mut self, iter: I) {
        for movements in iter {
            self.push(movements);
        }
    }
}

impl Add for Movements {
    type Output = Movements;

    fn add(mut self, rhs: Movements) -> Movements {
        self.extend(rhs.origins);
        self
    }
}
