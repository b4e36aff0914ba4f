// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `fianchetto` is a chess position model with a fully legal move generator.
//!
//! A [`Position`] holds an 8x8 grid of pieces, the state that is not piece placement (side to move, clocks,
//! castling rights, en-passant target) and a history of applied movements that can be undone. Generated movements
//! are always legal and carry flags describing what they do: capture, en passant, castling, promotion, check,
//! discovered check, double check, checkmate and stalemate. [`perft`] walks the movement tree for verifying the
//! generator against known node counts.

pub mod attacks;
pub mod core;
pub mod grid;
pub mod history;
pub mod movegen;
pub mod perft;
pub mod position;
pub mod state;

pub use movegen::GenerationOptions;
pub use position::{FenParseError, MoveChoice, Position, PositionError};
