// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack detection on the board grid.
//!
//! Attackers are found by walking outward from the attacked square using each piece kind's own movement template,
//! since reachability is symmetric for every piece but the pawn. Pawns are found with the capture offsets of the
//! opposite color: a white pawn attacks a square if it stands where a black pawn on that square could capture.

use crate::{
    core::*,
    grid::{self, Grid, Walk},
};

/// Finds the pieces of color `attacker` that attack `target`. With `stop_at_first`, the scan ends at the first
/// attacker found and the result holds at most one piece.
pub fn find_attackers(
    grid: &Grid,
    target: Square,
    attacker: Color,
    stop_at_first: bool,
) -> Vec<PlacedPiece> {
    let mut attackers = vec![];
    for kind in PIECE_KINDS {
        let (lines, distance) = match kind {
            PieceKind::Pawn => (Piece::pawn_captures(attacker.toggle()), 1),
            _ => kind.reach(),
        };

        let expected = Piece::new(kind, attacker);
        let walked = grid::walk(target, lines, distance, |sq| match grid.piece_at(sq) {
            None => Walk::Continue,
            Some(piece) if piece == expected => {
                attackers.push(PlacedPiece::new(piece, sq));
                if stop_at_first {
                    Walk::StopWalking
                } else {
                    Walk::StopDirection
                }
            }
            Some(_) => Walk::StopDirection,
        });

        if walked == Walk::StopWalking {
            break;
        }
    }

    attackers
}

/// Whether or not any piece of color `attacker` attacks `target`.
pub fn is_attacked(grid: &Grid, target: Square, attacker: Color) -> bool {
    !find_attackers(grid, target, attacker, true).is_empty()
}
