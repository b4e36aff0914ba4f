// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The undo stack of applied movements.

use crate::{core::PlacedPiece, state::PositionState};

/// Everything needed to reverse one applied movement exactly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MovementRecord {
    /// Position state as it was immediately before the movement.
    pub state: PositionState,
    pub origin: PlacedPiece,
    /// The piece that arrived and where. For castling this is the king standing on its own rook's square.
    pub target: PlacedPiece,
    pub is_capture: bool,
    pub is_en_passant: bool,
    pub is_castling: bool,
    /// The captured piece and the square it was taken from, which differs from the target on en passant.
    pub captured: Option<PlacedPiece>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementHistory {
    records: Vec<MovementRecord>,
}

impl MovementHistory {
    pub fn new() -> MovementHistory {
        MovementHistory::default()
    }

    pub fn push(&mut self, record: MovementRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<MovementRecord> {
        self.records.pop()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;

    fn record(from: Square, to: Square) -> MovementRecord {
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        MovementRecord {
            state: PositionState::new(Color::White),
            origin: PlacedPiece::new(pawn, from),
            target: PlacedPiece::new(pawn, to),
            is_capture: false,
            is_en_passant: false,
            is_castling: false,
            captured: None,
        }
    }

    #[test]
    fn last_in_first_out() {
        let mut history = MovementHistory::new();
        assert!(history.is_empty());
        history.push(record(E2, E4));
        history.push(record(D2, D4));
        assert_eq!(2, history.len());

        assert_eq!(D4, history.pop().unwrap().target.square);
        assert_eq!(1, history.len());
        assert_eq!(E4, history.pop().unwrap().target.square);
        assert!(history.pop().is_none());
    }
}
