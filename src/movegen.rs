// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Legal move generation.
//!
//! Every candidate destination is tested for king safety before it is recorded, so the generator only ever produces
//! legal movements. King safety is tested by simulating the movement on the grid, asking the attack detector about
//! the mover's king, and reverting. Situational flags (check, discovery, double check, checkmate and stalemate) are
//! computed by applying the movement for real, inspecting the opponent's king, and undoing it; checkmate and
//! stalemate additionally probe the opponent's replies with situational flags switched off, which is what keeps
//! generation from recursing without bound.

use crate::{
    attacks,
    core::*,
    grid::{self, Walk},
    position::{Position, PositionError},
    state::WINGS,
};

/// Knobs for a single generation request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Stop as soon as one legal movement has been found.
    pub stop_at_first: bool,
    /// Compute check, discovery, double check, checkmate and stalemate flags.
    pub situational_flags: bool,
}

impl GenerationOptions {
    /// Every legal movement, with every flag.
    pub const FULL: GenerationOptions = GenerationOptions {
        stop_at_first: false,
        situational_flags: true,
    };

    /// Every legal movement, with structural flags only.
    pub const STRUCTURAL: GenerationOptions = GenerationOptions {
        stop_at_first: false,
        situational_flags: false,
    };

    /// Whether or not any legal movement exists.
    pub const PROBE: GenerationOptions = GenerationOptions {
        stop_at_first: true,
        situational_flags: false,
    };
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions::FULL
    }
}

impl Position {
    /// All legal movements of the side to move, fully flagged.
    pub fn movements(&mut self) -> Movements {
        self.generate(self.side_to_move(), GenerationOptions::FULL)
    }

    /// All legal movements of the given color, fully flagged, regardless of whose turn it is.
    pub fn movements_for(&mut self, color: Color) -> Movements {
        self.generate(color, GenerationOptions::FULL)
    }

    /// All legal movements of the piece on `square`, fully flagged.
    pub fn movements_from(&mut self, square: Square) -> Result<PieceMovements, PositionError> {
        self.generate_from(square, GenerationOptions::FULL)
    }

    pub fn generate(&mut self, color: Color, options: GenerationOptions) -> Movements {
        let origins: Vec<PlacedPiece> = self.grid.pieces_of(color).collect();
        let mut movements = Movements::default();
        for origin in origins {
            let found = self.piece_movements(origin, options);
            let done = options.stop_at_first && !found.is_empty();
            movements.push(found);
            if done {
                break;
            }
        }

        movements
    }

    pub fn generate_from(
        &mut self,
        square: Square,
        options: GenerationOptions,
    ) -> Result<PieceMovements, PositionError> {
        let piece = self
            .piece_at(square)
            .ok_or(PositionError::EmptySquare(square))?;
        Ok(self.piece_movements(PlacedPiece::new(piece, square), options))
    }

    /// Whether or not the side to move is checkmated.
    pub fn is_checkmate(&mut self) -> bool {
        let side = self.side_to_move();
        self.is_check(side) && self.generate(side, GenerationOptions::PROBE).is_empty()
    }

    /// Whether or not the side to move is stalemated.
    pub fn is_stalemate(&mut self) -> bool {
        let side = self.side_to_move();
        !self.is_check(side) && self.generate(side, GenerationOptions::PROBE).is_empty()
    }

    fn piece_movements(&mut self, origin: PlacedPiece, options: GenerationOptions) -> PieceMovements {
        let mut destinations = vec![];
        match origin.piece.kind {
            PieceKind::Pawn => self.pawn_destinations(origin, options, &mut destinations),
            PieceKind::King => {
                self.walk_destinations(origin, options, &mut destinations);
                if !(options.stop_at_first && !destinations.is_empty()) {
                    self.castling_destinations(origin, options, &mut destinations);
                }
            }
            _ => self.walk_destinations(origin, options, &mut destinations),
        }

        PieceMovements::new(origin, destinations)
    }

    /// Destinations of every piece but the pawn, found by walking the piece's movement template.
    fn walk_destinations(
        &mut self,
        origin: PlacedPiece,
        options: GenerationOptions,
        out: &mut Vec<MovementDestination>,
    ) {
        let color = origin.piece.color;
        let (lines, distance) = origin.piece.kind.reach();
        grid::walk(origin.square, lines, distance, |sq| {
            let occupant = self.grid.piece_at(sq);
            if occupant.map_or(false, |piece| piece.color == color) {
                return Walk::StopDirection;
            }

            if self.leaves_king_attacked(origin, sq, false) {
                // a pinned piece may still reach squares further along an open line.
                return if occupant.is_none() {
                    Walk::Continue
                } else {
                    Walk::StopDirection
                };
            }

            out.push(self.classify(origin, PlacedPiece::new(origin.piece, sq), options));
            if options.stop_at_first {
                Walk::StopWalking
            } else if occupant.is_some() {
                Walk::StopDirection
            } else {
                Walk::Continue
            }
        });
    }

    fn pawn_destinations(
        &mut self,
        origin: PlacedPiece,
        options: GenerationOptions,
        out: &mut Vec<MovementDestination>,
    ) {
        let color = origin.piece.color;
        let forward = color.forward();
        let done = |out: &Vec<MovementDestination>| options.stop_at_first && !out.is_empty();

        if let Some(single) = origin.square.offset(forward, 0) {
            if self.grid.is_empty_at(single) {
                if !self.leaves_king_attacked(origin, single, false) {
                    self.push_pawn_destination(origin, single, options, out);
                    if done(out) {
                        return;
                    }
                }

                if origin.square.row() == color.pawn_row() {
                    if let Some(double) = single.offset(forward, 0) {
                        if self.grid.is_empty_at(double)
                            && !self.leaves_king_attacked(origin, double, false)
                        {
                            self.push_pawn_destination(origin, double, options, out);
                            if done(out) {
                                return;
                            }
                        }
                    }
                }
            }
        }

        for &(rows, columns) in Piece::pawn_captures(color) {
            let sq = match origin.square.offset(rows, columns) {
                Some(sq) => sq,
                None => continue,
            };

            let legal = match self.grid.piece_at(sq) {
                Some(piece) => piece.color != color && !self.leaves_king_attacked(origin, sq, false),
                None => {
                    self.is_en_passant_target(origin, sq)
                        && !self.leaves_king_attacked(origin, sq, true)
                }
            };

            if legal {
                self.push_pawn_destination(origin, sq, options, out);
                if done(out) {
                    return;
                }
            }
        }
    }

    /// Whether or not the pawn on `origin` may capture en passant onto `sq`.
    fn is_en_passant_target(&self, origin: PlacedPiece, sq: Square) -> bool {
        let color = origin.piece.color;
        let target_row = match color {
            Color::White => 2,
            Color::Black => 5,
        };

        self.state.en_passant() == Some(sq)
            && sq.row() == target_row
            && self.grid.piece_at(Square::crossing(origin.square, sq))
                == Some(Piece::new(PieceKind::Pawn, color.toggle()))
    }

    /// Records a pawn arriving at `sq`, once per promotion piece if it reaches the back rank.
    fn push_pawn_destination(
        &mut self,
        origin: PlacedPiece,
        sq: Square,
        options: GenerationOptions,
        out: &mut Vec<MovementDestination>,
    ) {
        if !sq.is_back_rank() {
            out.push(self.classify(origin, PlacedPiece::new(origin.piece, sq), options));
            return;
        }

        let promotions = if options.stop_at_first {
            &PROMOTIONS[..1]
        } else {
            &PROMOTIONS[..]
        };

        for &kind in promotions {
            let promoted = Piece::new(kind, origin.piece.color);
            out.push(self.classify(origin, PlacedPiece::new(promoted, sq), options));
        }
    }

    /// Castling, encoded as the king moving onto the square of its own rook.
    fn castling_destinations(
        &mut self,
        origin: PlacedPiece,
        options: GenerationOptions,
        out: &mut Vec<MovementDestination>,
    ) {
        let color = origin.piece.color;
        if origin.square.row() != color.back_row() {
            return;
        }

        for wing in WINGS {
            let rook = match self.state.castling_rook(color, wing) {
                Some(rook) => rook,
                None => continue,
            };

            if self.grid.piece_at(rook) != Some(Piece::new(PieceKind::Rook, color)) {
                continue;
            }

            let king_target = wing.king_target(color);
            let rook_target = wing.rook_target(color);
            let clear = |sq: Square| sq == origin.square || sq == rook || self.grid.is_empty_at(sq);
            if !row_span(rook, rook_target).all(clear) {
                continue;
            }

            let safe = row_span(origin.square, king_target)
                .all(|sq| clear(sq) && !attacks::is_attacked(&self.grid, sq, color.toggle()));
            if !safe {
                continue;
            }

            out.push(self.classify(origin, PlacedPiece::new(origin.piece, rook), options));
            if options.stop_at_first {
                return;
            }
        }
    }

    /// Simulates `origin` moving to `destination` on the grid and reports whether the mover's king is attacked
    /// afterwards. The grid is restored before returning. A color without a king is never in danger.
    fn leaves_king_attacked(&mut self, origin: PlacedPiece, destination: Square, en_passant: bool) -> bool {
        let color = origin.piece.color;
        let king = if origin.piece.kind == PieceKind::King {
            destination
        } else {
            match self.state.king(color) {
                Some(king) => king,
                None => return false,
            }
        };

        let replaced = self.grid.place(destination, origin.piece);
        self.grid.take(origin.square);
        let victim = if en_passant {
            let sq = Square::crossing(origin.square, destination);
            self.grid.take(sq).map(|piece| (sq, piece))
        } else {
            None
        };

        let attacked = attacks::is_attacked(&self.grid, king, color.toggle());

        if let Some((sq, piece)) = victim {
            self.grid.place(sq, piece);
        }
        self.grid.place(origin.square, origin.piece);
        self.grid.replace(destination, replaced);
        attacked
    }

    /// Computes the flags of a legal candidate movement.
    fn classify(
        &mut self,
        origin: PlacedPiece,
        target: PlacedPiece,
        options: GenerationOptions,
    ) -> MovementDestination {
        let color = origin.piece.color;
        let occupant = self.grid.piece_at(target.square);
        let is_pawn = origin.piece.kind == PieceKind::Pawn;
        let castling = origin.piece.kind == PieceKind::King
            && occupant == Some(Piece::new(PieceKind::Rook, color));
        let en_passant =
            is_pawn && occupant.is_none() && origin.square.column() != target.square.column();
        let capture = en_passant || occupant.map_or(false, |piece| piece.color != color);

        let mut flags = MovementFlags::NONE;
        flags.set(MovementFlags::CAPTURE, capture);
        flags.set(MovementFlags::EN_PASSANT, en_passant);
        flags.set(MovementFlags::CASTLING, castling);
        flags.set(MovementFlags::PROMOTION, is_pawn && target.square.is_back_rank());
        if options.situational_flags {
            flags |= self.situational_flags(origin, target, capture, en_passant, castling);
        }

        MovementDestination { target, flags }
    }

    fn situational_flags(
        &mut self,
        origin: PlacedPiece,
        target: PlacedPiece,
        capture: bool,
        en_passant: bool,
        castling: bool,
    ) -> MovementFlags {
        let color = origin.piece.color;
        let them = color.toggle();
        self.apply(origin, target, capture, en_passant, castling);

        let mut flags = MovementFlags::NONE;
        // a side without a king can be neither checked nor mated.
        if let Some(king) = self.state.king(them) {
            let attackers = attacks::find_attackers(&self.grid, king, color, false);
            let check = !attackers.is_empty();
            flags.set(MovementFlags::CHECK, check);
            flags.set(MovementFlags::DOUBLE_CHECK, attackers.len() == 2);
            if let [attacker] = attackers.as_slice() {
                let discovered = attacker.piece.kind.is_slider()
                    && attacker.square.is_collinear(origin.square, king)
                    && !attacker.square.is_collinear(target.square, king);
                flags.set(MovementFlags::DISCOVERY, discovered);
            }

            // only the king can answer a double check.
            let stuck = if attackers.len() >= 2 {
                self.generate_from(king, GenerationOptions::PROBE)
                    .map_or(true, |replies| replies.is_empty())
            } else {
                self.generate(them, GenerationOptions::PROBE).is_empty()
            };

            if stuck {
                flags |= if check {
                    MovementFlags::CHECKMATE
                } else {
                    MovementFlags::STALEMATE
                };
            }
        }

        self.undo()
            .expect("a movement that was just applied can be undone");
        flags
    }
}

/// The squares on one row from `a` to `b`, both included, in either direction.
fn row_span(a: Square, b: Square) -> impl Iterator<Item = Square> {
    let (low, high) = if a.column() <= b.column() {
        (a.column(), b.column())
    } else {
        (b.column(), a.column())
    };

    (low..=high).filter_map(move |column| a.offset(0, column as i8 - a.column() as i8))
}

#[cfg(test)]
mod tests {
    use crate::{core::*, position::Position, state::Wing};

    fn targets(fen: &'static str) -> Vec<(Square, Square, Option<PieceKind>)> {
        let mut pos = Position::from_fen(fen).unwrap();
        pos.movements()
            .iter()
            .map(|m| (m.source(), m.target().square, m.promotion()))
            .collect()
    }

    fn assert_moves_generated(fen: &'static str, expected: &[(Square, Square)]) {
        let mut actual: Vec<_> = targets(fen).into_iter().map(|(a, b, _)| (a, b)).collect();
        let mut expected = expected.to_vec();
        actual.sort();
        expected.sort();
        assert_eq!(expected, actual, "movements mismatch for {}", fen);
    }

    fn assert_moves_contains(fen: &'static str, expected: &[(Square, Square)]) {
        let actual: Vec<_> = targets(fen).into_iter().map(|(a, b, _)| (a, b)).collect();
        for mov in expected {
            assert!(actual.contains(mov), "{:?} not generated for {}", mov, fen);
        }
    }

    fn assert_moves_does_not_contain(fen: &'static str, unexpected: &[(Square, Square)]) {
        let actual: Vec<_> = targets(fen).into_iter().map(|(a, b, _)| (a, b)).collect();
        for mov in unexpected {
            assert!(!actual.contains(mov), "{:?} generated for {}", mov, fen);
        }
    }

    fn flags_of(fen: &'static str, from: Square, to: Square) -> MovementFlags {
        let mut pos = Position::from_fen(fen).unwrap();
        let movements = pos.movements_from(from).unwrap();
        let found = movements.iter().find(|m| m.target().square == to);
        found
            .unwrap_or_else(|| panic!("{} -> {} not generated for {}", from, to, fen))
            .flags()
    }

    mod pawns {
        use super::*;

        #[test]
        fn white_pawn_smoke() {
            assert_moves_generated(
                "8/8/8/6P1/2P5/4P3/8/8 w - - 0 1",
                &[(C4, C5), (E3, E4), (G5, G6)],
            );
        }

        #[test]
        fn white_pawn_blocked() {
            assert_moves_generated("8/8/6p1/6P1/2P1p3/4P3/8/8 w - - 0 1", &[(C4, C5)]);
        }

        #[test]
        fn no_double_pawn_push_when_blocked() {
            assert_moves_does_not_contain("8/8/8/8/8/4p3/4P3/8 w - - 0 1", &[(E2, E4)]);
            assert_moves_does_not_contain("8/8/8/8/4p3/8/4P3/8 w - - 0 1", &[(E2, E4)]);
        }

        #[test]
        fn double_pawn_push_smoke() {
            assert_moves_generated(
                "8/8/8/8/8/4P1p1/2P3P1/8 w - - 0 1",
                &[(C2, C3), (C2, C4), (E3, E4)],
            );
        }

        #[test]
        fn black_pawns_move_down() {
            assert_moves_generated("8/3p4/8/8/8/8/8/8 b - - 0 1", &[(D7, D6), (D7, D5)]);
        }

        #[test]
        fn pawn_promo_smoke() {
            let generated = targets("8/3P4/8/8/8/8/8/8 w - - 0 1");
            assert_eq!(4, generated.len());
            for kind in PROMOTIONS {
                assert!(generated.contains(&(D7, D8, Some(kind))));
            }
        }

        #[test]
        fn pawn_promo_blocked() {
            assert_moves_does_not_contain("3n4/3P4/8/8/8/8/8/8 w - - 0 1", &[(D7, D8)]);
        }

        #[test]
        fn pawn_promo_captures() {
            let generated = targets("2nnn3/3P4/8/8/8/8/8/8 w - - 0 1");
            assert_eq!(8, generated.len());
            assert!(generated.contains(&(D7, C8, Some(PieceKind::Knight))));
            assert!(generated.contains(&(D7, E8, Some(PieceKind::Queen))));
        }

        #[test]
        fn kiwipete_bug_1() {
            assert_moves_contains(
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/Pp2P3/2N2Q1p/1PPBBPPP/R3K2R b KQkq a3 0 1",
                &[(B4, A3)],
            );
        }

        #[test]
        fn illegal_en_passant() {
            assert_moves_does_not_contain(
                "8/8/4p3/8/8/8/5P2/8 w - e7 0 1",
                &[
                    // a target on the wrong rank is never capturable.
                    (F2, E7),
                ],
            );
        }

        #[test]
        fn en_passant_flags() {
            let flags = flags_of(
                "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
                E5,
                D6,
            );
            assert!(flags.contains(MovementFlags::EN_PASSANT | MovementFlags::CAPTURE));
        }

        #[test]
        fn en_passant_exposing_king_on_rank() {
            // taking en passant would clear both pawns off the fifth rank.
            assert_moves_does_not_contain("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1", &[(E5, D6)]);
        }
    }

    mod bishops {
        use super::*;

        #[test]
        fn smoke_test() {
            assert_moves_generated(
                "8/8/8/8/3B4/8/8/8 w - - 0 1",
                &[
                    (D4, E5),
                    (D4, F6),
                    (D4, G7),
                    (D4, H8),
                    (D4, E3),
                    (D4, F2),
                    (D4, G1),
                    (D4, C3),
                    (D4, B2),
                    (D4, A1),
                    (D4, C5),
                    (D4, B6),
                    (D4, A7),
                ],
            );
        }

        #[test]
        fn smoke_capture() {
            assert_moves_generated(
                "8/8/8/2p1p3/3B4/2p1p3/8/8 w - - 0 1",
                &[(D4, E5), (D4, E3), (D4, C5), (D4, C3)],
            );
        }
    }

    mod knights {
        use super::*;

        #[test]
        fn corner_knight() {
            assert_moves_generated("8/8/8/8/8/8/8/N7 w - - 0 1", &[(A1, B3), (A1, C2)]);
        }

        #[test]
        fn friendly_pieces_block() {
            assert_moves_generated("8/8/8/8/8/1P6/2P5/N7 w - - 0 1", &[(B3, B4), (C2, C3), (C2, C4)]);
        }
    }

    mod pins {
        use super::*;

        #[test]
        fn pinned_rook_slides_along_pin() {
            assert_moves_generated(
                "4r3/8/8/8/8/8/4R3/4K3 w - - 0 1",
                &[
                    (E2, E3),
                    (E2, E4),
                    (E2, E5),
                    (E2, E6),
                    (E2, E7),
                    (E2, E8),
                    (E1, D1),
                    (E1, D2),
                    (E1, F1),
                    (E1, F2),
                ],
            );
        }

        #[test]
        fn pinned_knight_cannot_move() {
            assert_moves_does_not_contain(
                "4r3/8/8/8/8/8/4N3/4K3 w - - 0 1",
                &[(E2, C1), (E2, C3), (E2, D4), (E2, F4), (E2, G3), (E2, G1)],
            );
        }

        #[test]
        fn pinned_bishop_may_capture_pinner() {
            assert_moves_generated(
                "7k/8/8/8/8/2b5/1B6/K7 w - - 0 1",
                &[(B2, C3), (A1, A2), (A1, B1)],
            );
        }

        #[test]
        fn must_answer_check() {
            // the rook on e8 checks; only blocks and king moves are legal.
            assert_moves_generated(
                "4r2k/8/8/8/8/8/3R4/4K3 w - - 0 1",
                &[(D2, E2), (E1, D1), (E1, F1), (E1, F2)],
            );
        }
    }

    mod kings {
        use super::*;

        #[test]
        fn king_cannot_step_into_attack() {
            assert_moves_does_not_contain("8/8/8/8/8/8/r7/4K3 w - - 0 1", &[(E1, E2), (E1, D2), (E1, F2)]);
        }

        #[test]
        fn king_cannot_retreat_along_checking_line() {
            // the king itself must not shadow the square behind it.
            assert_moves_does_not_contain("8/8/8/8/8/8/8/r3K3 w - - 0 1", &[(E1, F1)]);
        }

        #[test]
        fn king_may_capture_unprotected_piece() {
            assert_moves_contains("8/8/8/8/8/8/4q3/4K3 w - - 0 1", &[(E1, E2)]);
            assert_moves_does_not_contain("8/8/8/8/8/4r3/4q3/4K3 w - - 0 1", &[(E1, E2)]);
        }

        #[test]
        fn castling_both_wings() {
            let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
            let castles: Vec<_> = pos
                .movements()
                .iter()
                .filter(|m| m.flags().contains(MovementFlags::CASTLING))
                .map(|m| m.target().square)
                .collect();
            assert_eq!(2, castles.len());
            assert!(castles.contains(&A1));
            assert!(castles.contains(&H1));
        }

        #[test]
        fn no_castling_through_check() {
            // the bishop on c4 covers f1.
            assert_moves_does_not_contain("4k3/8/8/8/2b5/8/8/4K2R w K - 0 1", &[(E1, H1)]);
        }

        #[test]
        fn no_castling_into_check() {
            assert_moves_does_not_contain("4k1r1/8/8/8/8/8/8/4K2R w K - 0 1", &[(E1, H1)]);
        }

        #[test]
        fn no_castling_out_of_check() {
            assert_moves_does_not_contain("4r1k1/8/8/8/8/8/8/4K2R w K - 0 1", &[(E1, H1)]);
        }

        #[test]
        fn queenside_castling_ignores_attacked_b_file() {
            // b1 is attacked, but the king never crosses it.
            assert_moves_contains("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1", &[(E1, A1)]);
        }

        #[test]
        fn no_castling_when_blocked() {
            assert_moves_does_not_contain("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1", &[(E1, A1)]);
        }

        #[test]
        fn no_castling_without_rights() {
            assert_moves_does_not_contain("4k3/8/8/8/8/8/8/R3K2R w - - 0 1", &[(E1, A1), (E1, H1)]);
        }

        fn castle_and_undo(fen: &'static str, king: Square, rook: Square, expected_rank: &str) {
            let mut pos = Position::from_fen(fen).unwrap();
            let before = pos.clone();
            let castle = pos
                .movements_from(king)
                .unwrap()
                .iter()
                .find(|m| m.flags().contains(MovementFlags::CASTLING))
                .unwrap_or_else(|| panic!("no castling generated for {}", fen));
            assert_eq!(rook, castle.target().square);

            pos.make_move(castle);
            let fen_after = pos.as_fen();
            let first_rank = fen_after.split(' ').next().unwrap().rsplit('/').next().unwrap();
            assert_eq!(expected_rank, first_rank);
            assert_eq!(None, pos.castling_rook(Color::White, Wing::Queenside));
            assert_eq!(None, pos.castling_rook(Color::White, Wing::Kingside));

            pos.undo().unwrap();
            assert_eq!(before, pos);
        }

        #[test]
        fn castling_with_b_file_rook() {
            castle_and_undo("4k3/8/8/8/8/8/8/1R2K3 w B - 0 1", E1, B1, "2KR4");
        }

        #[test]
        fn castling_with_adjacent_kingside_rook() {
            castle_and_undo("4k3/8/8/8/8/8/8/5KR1 w G - 0 1", F1, G1, "5RK1");
        }

        #[test]
        fn castling_with_king_beside_corner_rook() {
            castle_and_undo("4k3/8/8/8/8/8/8/RK6 w A - 0 1", B1, A1, "2KR4");
        }
    }

    mod flags {
        use super::*;

        #[test]
        fn direct_check() {
            let flags = flags_of("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", A1, A8);
            assert_eq!(MovementFlags::CHECK, flags);
        }

        #[test]
        fn discovered_check() {
            // the bishop steps off the e-file and unmasks the rook.
            let flags = flags_of("4k3/8/8/8/8/8/4B3/4RK2 w - - 0 1", E2, D3);
            assert!(flags.contains(MovementFlags::CHECK | MovementFlags::DISCOVERY));
            assert!(!flags.contains(MovementFlags::DOUBLE_CHECK));
        }

        #[test]
        fn double_check() {
            // the knight checks from d6 and unmasks the rook on the e-file.
            let flags = flags_of("4k3/8/8/8/4N3/8/8/4RK2 w - - 0 1", E4, D6);
            assert!(flags.contains(MovementFlags::CHECK | MovementFlags::DOUBLE_CHECK));
            assert!(!flags.contains(MovementFlags::DISCOVERY));
        }

        #[test]
        fn capture_flag() {
            let flags = flags_of("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", E4, D5);
            assert_eq!(MovementFlags::CAPTURE, flags);
        }

        #[test]
        fn back_rank_mate() {
            let flags = flags_of("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", A1, A8);
            assert!(flags.contains(MovementFlags::CHECK | MovementFlags::CHECKMATE));
        }

        #[test]
        fn double_check_mate_only_probes_king() {
            // the bishop could take the knight, but only a king move answers a double check.
            let flags = flags_of("3qkb2/3p1p2/8/8/4N3/8/8/4RK2 w - - 0 1", E4, D6);
            assert!(flags.contains(MovementFlags::DOUBLE_CHECK | MovementFlags::CHECKMATE));
        }

        #[test]
        fn stalemating_move() {
            let flags = flags_of("7k/5K2/8/6Q1/8/8/8/8 w - - 0 1", G5, G6);
            assert_eq!(MovementFlags::STALEMATE, flags);
        }

        #[test]
        fn promotion_with_check() {
            let flags = flags_of("3k4/6P1/8/8/8/8/8/4K3 w - - 0 1", G7, G8);
            assert!(flags.contains(MovementFlags::PROMOTION | MovementFlags::CHECK));
        }

        #[test]
        fn no_situational_flags_without_enemy_king() {
            assert_eq!(MovementFlags::NONE, flags_of("8/8/8/8/3B4/8/8/8 w - - 0 1", D4, E5));
            assert_eq!(MovementFlags::NONE, flags_of("8/8/8/8/3B4/8/8/K7 w - - 0 1", D4, G7));
            assert_eq!(MovementFlags::NONE, flags_of("8/8/8/8/8/8/8/K7 w - - 0 1", A1, A2));
        }

        #[test]
        fn castling_flag() {
            let flags = flags_of("4k3/8/8/8/8/8/8/4K2R w K - 0 1", E1, H1);
            assert!(flags.contains(MovementFlags::CASTLING));
            assert!(!flags.contains(MovementFlags::CAPTURE));
        }
    }

    mod game_state {
        use super::*;

        #[test]
        fn fools_mate() {
            let mut pos = Position::from_fen(
                "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1",
            )
            .unwrap();
            assert!(pos.is_check(Color::White));
            assert!(pos.is_checkmate());
            assert!(!pos.is_stalemate());
            assert!(pos.movements().is_empty());
        }

        #[test]
        fn stalemate() {
            let mut pos = Position::from_fen("7k/5K2/6Q1/8/8/8/8/8 b - - 0 1").unwrap();
            assert!(!pos.is_check(Color::Black));
            assert!(pos.is_stalemate());
            assert!(!pos.is_checkmate());
        }

        #[test]
        fn start_position_counts() {
            let mut pos = Position::from_start_position();
            let movements = pos.movements();
            assert_eq!(20, movements.len());
            assert_eq!(20, movements.counts().movements);
            assert_eq!(10, movements.origins().len());

            let black = pos.movements_for(Color::Black);
            assert_eq!(20, black.len());
            assert_eq!(40, (movements + black).counts().movements);
        }

        #[test]
        fn empty_square_has_no_movements() {
            let mut pos = Position::from_start_position();
            assert!(pos.movements_from(E4).is_err());
        }

        #[test]
        fn generation_leaves_position_untouched() {
            let mut pos = Position::from_fen(
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            )
            .unwrap();
            let before = pos.clone();
            let movements = pos.movements();
            assert_eq!(48, movements.len());
            assert_eq!(before, pos);
        }

        #[test]
        fn template_bounds() {
            let mut pos = Position::from_fen(
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            )
            .unwrap();
            for origin in pos.movements().origins() {
                let bound = match origin.origin().piece.kind {
                    PieceKind::Queen => 8 * 7,
                    PieceKind::Rook | PieceKind::Bishop => 4 * 7,
                    PieceKind::Knight => 8,
                    PieceKind::King => 8 + 2,
                    PieceKind::Pawn => 4 * 4,
                };
                assert!(origin.len() <= bound);
            }
        }
    }
}
