// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Position state that is not piece placement: whose turn it is, the clocks, castling rights, king squares and the
//! en-passant target.

use crate::core::*;

/// One side of the board for the purposes of castling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Wing {
    Queenside,
    Kingside,
}

pub const WINGS: [Wing; 2] = [Wing::Queenside, Wing::Kingside];

impl Wing {
    /// Where the king ends up after castling on this wing.
    pub const fn king_target(self, color: Color) -> Square {
        match (color, self) {
            (Color::White, Wing::Queenside) => C1,
            (Color::White, Wing::Kingside) => G1,
            (Color::Black, Wing::Queenside) => C8,
            (Color::Black, Wing::Kingside) => G8,
        }
    }

    /// Where the rook ends up after castling on this wing.
    pub const fn rook_target(self, color: Color) -> Square {
        match (color, self) {
            (Color::White, Wing::Queenside) => D1,
            (Color::White, Wing::Kingside) => F1,
            (Color::Black, Wing::Queenside) => D8,
            (Color::Black, Wing::Kingside) => F8,
        }
    }

    /// The wing a rook on the given square castles toward, judged relative to its own king.
    pub fn of_rook(rook: Square, king: Square) -> Wing {
        if rook.column() < king.column() {
            Wing::Queenside
        } else {
            Wing::Kingside
        }
    }
}

/// Everything about a position besides where the pieces are. Copying it is cheap, which is how the movement
/// history snapshots it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionState {
    /// Half-moves played since this state was created.
    ply: u32,
    /// Side to move at ply zero. The side to move is derived from this and the parity of `ply`.
    first_to_move: Color,
    /// Half-moves since the last capture or pawn move.
    halfmove_clock: u16,
    /// Starts at 1 and increments after every move by black.
    fullmove_counter: u16,
    /// Per color and wing, the square of the rook that still grants the right to castle.
    castling: [[Option<Square>; 2]; 2],
    /// Per color, the square of the king, if there is one.
    kings: [Option<Square>; 2],
    en_passant: Option<Square>,
}

impl PositionState {
    pub fn new(side_to_move: Color) -> PositionState {
        PositionState {
            ply: 0,
            first_to_move: side_to_move,
            halfmove_clock: 0,
            fullmove_counter: 1,
            castling: [[None; 2]; 2],
            kings: [None; 2],
            en_passant: None,
        }
    }

    pub fn side_to_move(&self) -> Color {
        if self.ply % 2 == 0 {
            self.first_to_move
        } else {
            self.first_to_move.toggle()
        }
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_counter(&self) -> u16 {
        self.fullmove_counter
    }

    pub fn set_clocks(&mut self, halfmove_clock: u16, fullmove_counter: u16) {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_counter = fullmove_counter;
    }

    /// Advances the clocks past a move by `mover`. `reset_halfmove` is set for pawn moves and captures.
    pub fn advance(&mut self, mover: Color, reset_halfmove: bool) {
        if mover == Color::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }

        if reset_halfmove {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        self.ply += 1;
    }

    pub fn castling_rook(&self, color: Color, wing: Wing) -> Option<Square> {
        self.castling[color as usize][wing as usize]
    }

    pub fn set_castling_rook(&mut self, color: Color, wing: Wing, rook: Option<Square>) {
        self.castling[color as usize][wing as usize] = rook;
    }

    /// Revokes both castling rights of a color.
    pub fn clear_castling(&mut self, color: Color) {
        self.castling[color as usize] = [None; 2];
    }

    /// Revokes whichever castling right is granted by a rook on the given square.
    pub fn clear_castling_rook(&mut self, square: Square) {
        for rights in self.castling.iter_mut() {
            for rook in rights.iter_mut() {
                if *rook == Some(square) {
                    *rook = None;
                }
            }
        }
    }

    pub fn has_castling_rights(&self) -> bool {
        self.castling.iter().flatten().any(Option::is_some)
    }

    pub fn king(&self, color: Color) -> Option<Square> {
        self.kings[color as usize]
    }

    pub fn set_king(&mut self, color: Color, square: Option<Square>) {
        self.kings[color as usize] = square;
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn set_en_passant(&mut self, square: Option<Square>) {
        self.en_passant = square;
    }
}
