// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    convert::TryFrom,
    fmt::{self, Write},
};

use derive_more::From;
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use crate::{
    core::{self, *},
    grid::Grid,
    history::{MovementHistory, MovementRecord},
    state::{PositionState, Wing, WINGS},
};

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors arising from requests made of a `Position`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum PositionError {
    #[error("no piece on square {0}")]
    EmptySquare(Square),
    #[error("square {0} is already occupied")]
    OccupiedSquare(Square),
    #[error("no movement to undo")]
    EmptyHistory,
    #[error("no {0} king on the board")]
    MissingKing(Color),
    #[error("no legal movement from {0} to {1}")]
    IllegalMovement(Square, Square),
    #[error("no legal movement available")]
    NoMovementAvailable,
}

/// A position, representing a chess game that has progressed up to this point. A Position owns the piece placement,
/// the rest of the position state, and the history of every movement applied to it, so that every applied movement
/// can be reversed exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) grid: Grid,
    pub(crate) state: PositionState,
    pub(crate) history: MovementHistory,
}

impl Position {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &PositionState {
        &self.state
    }

    pub fn history(&self) -> &MovementHistory {
        &self.history
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid.piece_at(square)
    }

    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move()
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.state.en_passant()
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.state.halfmove_clock()
    }

    pub fn fullmove_counter(&self) -> u16 {
        self.state.fullmove_counter()
    }

    /// The square of the rook that grants `color` the right to castle on `wing`, if it still has that right.
    pub fn castling_rook(&self, color: Color, wing: Wing) -> Option<Square> {
        self.state.castling_rook(color, wing)
    }

    pub fn king_square(&self, color: Color) -> Result<Square, PositionError> {
        self.state.king(color).ok_or(PositionError::MissingKing(color))
    }
}

impl Position {
    /// An empty board with white to move.
    pub fn new() -> Position {
        Position {
            grid: Grid::new(),
            state: PositionState::new(Color::White),
            history: MovementHistory::new(),
        }
    }

    /// Puts a piece on an empty square, keeping the king squares current.
    pub fn add_piece(&mut self, square: Square, piece: Piece) -> Result<(), PositionError> {
        if self.grid.piece_at(square).is_some() {
            return Err(PositionError::OccupiedSquare(square));
        }

        self.grid.place(square, piece);
        if piece.kind == PieceKind::King {
            self.state.set_king(piece.color, Some(square));
        }

        Ok(())
    }

    pub fn remove_piece(&mut self, square: Square) -> Result<Piece, PositionError> {
        let piece = self
            .grid
            .take(square)
            .ok_or(PositionError::EmptySquare(square))?;
        if piece.kind == PieceKind::King && self.state.king(piece.color) == Some(square) {
            self.state.set_king(piece.color, None);
        }

        self.state.clear_castling_rook(square);
        Ok(piece)
    }

    pub fn is_check(&self, color: Color) -> bool {
        match self.state.king(color) {
            Some(king) => crate::attacks::is_attacked(&self.grid, king, color.toggle()),
            None => false,
        }
    }
}

//
// Apply and undo.
//

impl Position {
    /// Applies a movement of `origin` onto `target`, pushing everything needed to reverse it onto the history.
    ///
    /// The booleans describe the movement the way the move generator classified it: `is_castling` means `target`
    /// is the king standing on its own rook's square, and `is_en_passant` means the captured pawn stands beside the
    /// origin rather than on the target square.
    pub fn apply(
        &mut self,
        origin: PlacedPiece,
        target: PlacedPiece,
        is_capture: bool,
        is_en_passant: bool,
        is_castling: bool,
    ) {
        let color = origin.piece.color;
        let before = self.state;
        let mut captured = None;

        if is_castling {
            let wing = Wing::of_rook(target.square, origin.square);
            let king_target = wing.king_target(color);
            self.grid.take(target.square);
            self.grid.take(origin.square);
            self.grid
                .place(wing.rook_target(color), Piece::new(PieceKind::Rook, color));
            self.grid.place(king_target, origin.piece);
            self.state.set_king(color, Some(king_target));
            self.state.clear_castling(color);
        } else {
            self.grid.take(origin.square);
            if is_en_passant {
                let victim = Square::crossing(origin.square, target.square);
                captured = self
                    .grid
                    .take(victim)
                    .map(|piece| PlacedPiece::new(piece, victim));
                self.grid.place(target.square, target.piece);
            } else {
                captured = self
                    .grid
                    .place(target.square, target.piece)
                    .map(|piece| PlacedPiece::new(piece, target.square));
            }

            if origin.piece.kind == PieceKind::King {
                self.state.set_king(color, Some(target.square));
                self.state.clear_castling(color);
            }

            self.state.clear_castling_rook(origin.square);
            if let Some(taken) = captured {
                self.state.clear_castling_rook(taken.square);
                if taken.piece.kind == PieceKind::King {
                    self.state.set_king(taken.piece.color, None);
                }
            }
        }

        let is_pawn = origin.piece.kind == PieceKind::Pawn;
        let en_passant = if is_pawn && origin.square.row().abs_diff(target.square.row()) == 2 {
            self.en_passant_after_double_push(origin, target.square)
        } else {
            None
        };

        self.state.set_en_passant(en_passant);
        self.state
            .advance(color, is_pawn || is_capture || captured.is_some());
        self.history.push(MovementRecord {
            state: before,
            origin,
            target,
            is_capture,
            is_en_passant,
            is_castling,
            captured,
        });
    }

    /// The square a double-pushed pawn skipped over, if an enemy pawn beside its landing square could capture it.
    fn en_passant_after_double_push(&self, origin: PlacedPiece, landing: Square) -> Option<Square> {
        let enemy_pawn = Piece::new(PieceKind::Pawn, origin.piece.color.toggle());
        let capturable = [-1, 1]
            .iter()
            .filter_map(|&columns| landing.offset(0, columns))
            .any(|sq| self.grid.piece_at(sq) == Some(enemy_pawn));
        if capturable {
            origin.square.offset(origin.piece.color.forward(), 0)
        } else {
            None
        }
    }

    /// Applies a movement produced by the move generator.
    pub fn make_move(&mut self, movement: PieceMovement) {
        let flags = movement.flags();
        self.apply(
            movement.origin,
            movement.target(),
            flags.contains(MovementFlags::CAPTURE),
            flags.contains(MovementFlags::EN_PASSANT),
            flags.contains(MovementFlags::CASTLING),
        );
    }

    /// Reverses the most recently applied movement, restoring piece placement and position state exactly.
    pub fn undo(&mut self) -> Result<(), PositionError> {
        let record = self.history.pop().ok_or(PositionError::EmptyHistory)?;
        tracing::trace!(origin = %record.origin, target = %record.target, "undo");
        let color = record.origin.piece.color;
        if record.is_castling {
            let wing = Wing::of_rook(record.target.square, record.origin.square);
            self.grid.take(wing.king_target(color));
            self.grid.take(wing.rook_target(color));
            self.grid
                .place(record.target.square, Piece::new(PieceKind::Rook, color));
            self.grid.place(record.origin.square, record.origin.piece);
        } else {
            self.grid.take(record.target.square);
            if let Some(captured) = record.captured {
                self.grid.place(captured.square, captured.piece);
            }

            self.grid.place(record.origin.square, record.origin.piece);
        }

        self.state = record.state;
        Ok(())
    }
}

//
// Move choice.
//

/// The ways a caller can pick the next movement to play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, From)]
pub enum MoveChoice {
    /// Origin, destination and promotion piece, resolved against the legal movements of the origin. The promotion
    /// piece defaults to a queen. Castling may name either the king's final square or its rook's square.
    Squares(Square, Square, Option<PieceKind>),
    /// A movement previously produced by the move generator, applied as is.
    Movement(PieceMovement),
}

impl From<(Square, Square)> for MoveChoice {
    fn from((origin, destination): (Square, Square)) -> MoveChoice {
        MoveChoice::Squares(origin, destination, None)
    }
}

impl Position {
    /// Plays a movement for the side to move, returning the movement that was applied.
    pub fn play(&mut self, choice: impl Into<MoveChoice>) -> Result<PieceMovement, PositionError> {
        let movement = match choice.into() {
            MoveChoice::Movement(movement) => movement,
            MoveChoice::Squares(origin, destination, promotion) => {
                self.resolve(origin, destination, promotion.unwrap_or(PieceKind::Queen))?
            }
        };

        tracing::trace!(movement = %movement, "play");
        self.make_move(movement);
        Ok(movement)
    }

    fn resolve(
        &mut self,
        origin: Square,
        destination: Square,
        promotion: PieceKind,
    ) -> Result<PieceMovement, PositionError> {
        let side = self.side_to_move();
        match self.grid.piece_at(origin) {
            Some(piece) if piece.color == side => {}
            Some(_) => return Err(PositionError::IllegalMovement(origin, destination)),
            None => return Err(PositionError::EmptySquare(origin)),
        }

        let candidates = self.movements_from(origin)?;
        let found = candidates.iter().find(|movement| {
            let lands = movement.target().square == destination
                || (movement.flags().contains(MovementFlags::CASTLING)
                    && Wing::of_rook(movement.target().square, origin).king_target(side) == destination);
            lands && movement.promotion().map_or(true, |kind| kind == promotion)
        });

        found.ok_or(PositionError::IllegalMovement(origin, destination))
    }

    /// Picks one of the legal movements of the side to move, uniformly at random. The movement is not applied.
    pub fn random_movement<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<PieceMovement, PositionError> {
        let movements: Vec<PieceMovement> = self.movements().iter().collect();
        movements
            .choose(rng)
            .copied()
            .ok_or(PositionError::NoMovementAvailable)
    }
}

//
// FEN parsing and generation.
//

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FenParseError {
    #[error("unexpected char: {0}")]
    UnexpectedChar(char),
    #[error("unexpected EOF while reading")]
    UnexpectedEnd,
    #[error("invalid digit")]
    InvalidDigit,
    #[error("file does not sum to 8")]
    FileDoesNotSumToEight,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castle")]
    InvalidCastle,
    #[error("invalid en-passant")]
    InvalidEnPassant,
    #[error("invalid halfmove")]
    InvalidHalfmove,
    #[error("invalid fullmove")]
    InvalidFullmove,
}

impl Position {
    pub fn from_start_position() -> Position {
        Position::from_fen(START_FEN).expect("start position FEN is valid")
    }

    /// Constructs a new position from a FEN representation of a board position. The halfmove and fullmove fields
    /// may be omitted, in which case they default to 0 and 1.
    pub fn from_fen(fen: impl AsRef<str>) -> Result<Position, FenParseError> {
        use std::{iter::Peekable, str::Chars};

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn advance(iter: &mut Stream<'_>) -> Result<(), FenParseError> {
            let _ = iter.next();
            Ok(())
        }

        fn peek(iter: &mut Stream<'_>) -> Result<char, FenParseError> {
            if let Some(c) = iter.peek() {
                Ok(*c)
            } else {
                Err(FenParseError::UnexpectedEnd)
            }
        }

        fn eat_side_to_move(iter: &mut Stream<'_>) -> Result<Color, FenParseError> {
            let side =
                Color::try_from(peek(iter)?).map_err(|_| FenParseError::InvalidSideToMove)?;
            advance(iter)?;
            Ok(side)
        }

        fn eat_castle_status(iter: &mut Stream<'_>) -> Result<Vec<char>, FenParseError> {
            if peek(iter)? == '-' {
                advance(iter)?;
                return Ok(vec![]);
            }

            let mut status = vec![];
            while let Some(&c) = iter.peek() {
                match c {
                    'K' | 'Q' | 'k' | 'q' | 'A'..='H' | 'a'..='h' => status.push(c),
                    ' ' => break,
                    _ => return Err(FenParseError::InvalidCastle),
                }

                advance(iter)?;
            }

            if status.is_empty() {
                return Err(FenParseError::InvalidCastle);
            }

            Ok(status)
        }

        fn eat_en_passant(iter: &mut Stream<'_>) -> Result<Option<Square>, FenParseError> {
            if peek(iter)? == '-' {
                advance(iter)?;
                return Ok(None);
            }

            let mut buf = String::new();
            for _ in 0..2 {
                buf.push(peek(iter)?);
                advance(iter)?;
            }

            buf.parse::<Square>()
                .map(Some)
                .map_err(|_| FenParseError::InvalidEnPassant)
        }

        /// Reads a clock field, which may be missing entirely or written as `-`.
        fn eat_clock(
            iter: &mut Stream<'_>,
            default: u16,
            err: FenParseError,
        ) -> Result<u16, FenParseError> {
            if iter.peek().is_none() {
                return Ok(default);
            }

            eat(iter, ' ')?;
            if peek(iter)? == '-' {
                advance(iter)?;
                return Ok(default);
            }

            let mut buf = String::new();
            while let Some(&c) = iter.peek() {
                if !c.is_ascii_digit() {
                    break;
                }

                buf.push(c);
                advance(iter)?;
            }

            buf.parse::<u16>().map_err(|_| err)
        }

        let mut pos = Position::new();
        let iter = &mut fen.as_ref().chars().peekable();
        for row in 0..8u8 {
            let mut column = 0;
            while column <= 7 {
                let c = peek(iter)?;
                // digits 1 through 8 indicate empty squares.
                if c.is_ascii_digit() {
                    if !('1'..='8').contains(&c) {
                        return Err(FenParseError::InvalidDigit);
                    }

                    column += c as u8 - b'0';
                    if column > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    advance(iter)?;
                    continue;
                }

                if c == '/' || c == ' ' {
                    return Err(FenParseError::FileDoesNotSumToEight);
                }

                // if it's not a digit, it represents a piece.
                let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                let square = Square::new(row, column).map_err(|_| FenParseError::UnexpectedChar(c))?;
                pos.grid.place(square, piece);
                advance(iter)?;
                column += 1;
            }

            if row != 7 {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        let side = eat_side_to_move(iter)?;
        pos.state = PositionState::new(side);
        for color in core::colors() {
            pos.state
                .set_king(color, pos.grid.find(Piece::new(PieceKind::King, color)));
        }

        eat(iter, ' ')?;
        for c in eat_castle_status(iter)? {
            pos.add_castling_right(c)?;
        }

        eat(iter, ' ')?;
        pos.state.set_en_passant(eat_en_passant(iter)?);
        let halfmove = eat_clock(iter, 0, FenParseError::InvalidHalfmove)?;
        let fullmove = eat_clock(iter, 1, FenParseError::InvalidFullmove)?;
        pos.state.set_clocks(halfmove, fullmove);
        Ok(pos)
    }

    /// Records the castling right named by one character of a FEN castling field. `KQkq` name the outermost rook on
    /// that wing; file letters name the rook's file directly.
    fn add_castling_right(&mut self, c: char) -> Result<(), FenParseError> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        let row = color.back_row();
        let king_column = self.state.king(color).map_or(4, |king| king.column());
        let rook = Piece::new(PieceKind::Rook, color);
        let on_row = |column: u8| Square::new(row, column).map_err(|_| FenParseError::InvalidCastle);
        let (wing, square) = match c.to_ascii_lowercase() {
            'k' => {
                let mut found = on_row(7)?;
                for column in (king_column + 1..8).rev() {
                    let sq = on_row(column)?;
                    if self.grid.piece_at(sq) == Some(rook) {
                        found = sq;
                        break;
                    }
                }

                (Wing::Kingside, found)
            }
            'q' => {
                let mut found = on_row(0)?;
                for column in 0..king_column {
                    let sq = on_row(column)?;
                    if self.grid.piece_at(sq) == Some(rook) {
                        found = sq;
                        break;
                    }
                }

                (Wing::Queenside, found)
            }
            file @ 'a'..='h' => {
                let sq = on_row(file as u8 - b'a')?;
                let wing = if sq.column() < king_column {
                    Wing::Queenside
                } else {
                    Wing::Kingside
                };

                (wing, sq)
            }
            _ => return Err(FenParseError::InvalidCastle),
        };

        self.state.set_castling_rook(color, wing, Some(square));
        Ok(())
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        let mut empty_squares = 0;
        for sq in core::squares() {
            if let Some(piece) = self.piece_at(sq) {
                if empty_squares != 0 {
                    write!(&mut buf, "{}", empty_squares).unwrap();
                }
                write!(&mut buf, "{}", piece).unwrap();
                empty_squares = 0;
            } else {
                empty_squares += 1;
            }

            if sq.column() == 7 {
                if empty_squares != 0 {
                    write!(&mut buf, "{}", empty_squares).unwrap();
                    empty_squares = 0;
                }

                if sq.row() != 7 {
                    buf.push('/');
                }
            }
        }

        buf.push(' ');
        buf.push(self.side_to_move().as_char());
        buf.push(' ');
        if !self.state.has_castling_rights() {
            buf.push('-');
        }

        for color in core::colors() {
            for wing in WINGS.iter().rev() {
                if let Some(rook) = self.castling_rook(color, *wing) {
                    let c = match (wing, rook.column()) {
                        (Wing::Kingside, 7) => 'k',
                        (Wing::Queenside, 0) => 'q',
                        _ => rook.file(),
                    };

                    buf.push(match color {
                        Color::White => c.to_ascii_uppercase(),
                        Color::Black => c,
                    });
                }
            }
        }

        buf.push(' ');
        if let Some(ep_square) = self.en_passant_square() {
            write!(&mut buf, "{}", ep_square).unwrap();
        } else {
            buf.push('-');
        }
        buf.push(' ');
        write!(
            &mut buf,
            "{} {}",
            self.halfmove_clock(),
            self.fullmove_counter()
        )
        .unwrap();
        buf
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.grid)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
