// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Perft, a walk over the tree of legal movements used to check the move generator against known totals.

use std::fmt;

use serde::Serialize;

use crate::{core::MovementCounts, movegen::GenerationOptions, Position};

/// Per-depth totals of a perft run. Depth `d` aggregates the counters of every movement set generated `d - 1`
/// movements below the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PerftResults {
    pub fen: String,
    pub levels: Vec<MovementCounts>,
}

impl PerftResults {
    /// Totals at the given depth, starting at 1.
    pub fn at(&self, depth: usize) -> Option<&MovementCounts> {
        depth.checked_sub(1).and_then(|index| self.levels.get(index))
    }

    /// Number of leaves at the deepest level.
    pub fn nodes(&self) -> u64 {
        self.levels.last().map_or(1, |counts| counts.movements)
    }
}

/// Runs perft to `depth`, computing every movement flag along the way. The position is left as it was found.
pub fn perft(position: &mut Position, depth: u32) -> PerftResults {
    let _span = tracing::info_span!("perft", depth).entered();
    let mut results = PerftResults {
        fen: position.as_fen(),
        levels: vec![MovementCounts::default(); depth as usize],
    };

    perft_impl(position, 0, &mut results.levels);
    for (index, counts) in results.levels.iter().enumerate() {
        tracing::debug!(depth = index + 1, nodes = counts.movements, "depth complete");
    }

    tracing::info!(nodes = results.nodes(), "perft complete");
    results
}

fn perft_impl(position: &mut Position, level: usize, levels: &mut [MovementCounts]) {
    if level >= levels.len() {
        return;
    }

    let movements = position.movements();
    levels[level] += movements.counts();
    if level + 1 == levels.len() {
        return;
    }

    for movement in movements.iter() {
        position.make_move(movement);
        perft_impl(position, level + 1, levels);
        position
            .undo()
            .expect("a movement that was just applied can be undone");
    }
}

/// Counts the leaves `depth` movements below the position, with situational flags switched off.
pub fn count_nodes(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let movements = position.generate(position.side_to_move(), GenerationOptions::STRUCTURAL);
    if depth == 1 {
        return movements.len() as u64;
    }

    let mut nodes = 0;
    for movement in movements.iter() {
        position.make_move(movement);
        nodes += count_nodes(position, depth - 1);
        position
            .undo()
            .expect("a movement that was just applied can be undone");
    }

    nodes
}

/// Leaf count below one root movement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Division {
    pub movement: String,
    pub nodes: u64,
}

/// Splits a perft count by root movement, for comparing against another move generator.
pub fn divide(position: &mut Position, depth: u32) -> Vec<Division> {
    let _span = tracing::info_span!("divide", depth).entered();
    if depth == 0 {
        return vec![];
    }

    let movements = position.generate(position.side_to_move(), GenerationOptions::STRUCTURAL);
    let mut divisions = vec![];
    for movement in movements.iter() {
        position.make_move(movement);
        let nodes = count_nodes(position, depth - 1);
        position
            .undo()
            .expect("a movement that was just applied can be undone");
        tracing::debug!(movement = %movement.as_uci(), nodes, "divided");
        divisions.push(Division {
            movement: movement.as_uci(),
            nodes,
        });
    }

    divisions
}

impl fmt::Display for PerftResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const HEADERS: [&str; 11] = [
            "depth",
            "movements",
            "captures",
            "en passants",
            "castlings",
            "promotions",
            "checks",
            "discoveries",
            "doubles",
            "checkmates",
            "stalemates",
        ];

        let rows: Vec<[String; 11]> = self
            .levels
            .iter()
            .enumerate()
            .map(|(index, c)| {
                [
                    (index + 1).to_string(),
                    c.movements.to_string(),
                    c.captures.to_string(),
                    c.en_passants.to_string(),
                    c.castlings.to_string(),
                    c.promotions.to_string(),
                    c.checks.to_string(),
                    c.discoveries.to_string(),
                    c.double_checks.to_string(),
                    c.checkmates.to_string(),
                    c.stalemates.to_string(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        let rule = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            for width in &widths {
                write!(f, "+{}", "-".repeat(width + 2))?;
            }
            writeln!(f, "+")
        };

        writeln!(f, "{}", self.fen)?;
        rule(f)?;
        for (header, width) in HEADERS.iter().zip(widths.iter()) {
            write!(f, "| {:>width$} ", header, width = width)?;
        }
        writeln!(f, "|")?;
        rule(f)?;
        for row in &rows {
            for (cell, width) in row.iter().zip(widths.iter()) {
                write!(f, "| {:>width$} ", cell, width = width)?;
            }
            writeln!(f, "|")?;
        }
        rule(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_shallow() {
        let mut pos = Position::from_start_position();
        let results = perft(&mut pos, 2);
        assert_eq!(2, results.levels.len());
        assert_eq!(20, results.at(1).unwrap().movements);
        assert_eq!(400, results.at(2).unwrap().movements);
        assert_eq!(400, results.nodes());
        assert!(results.at(0).is_none());
        assert_eq!(Position::from_start_position(), pos);
    }

    #[test]
    fn zero_depth() {
        let mut pos = Position::from_start_position();
        assert_eq!(1, perft(&mut pos, 0).nodes());
        assert_eq!(1, count_nodes(&mut pos, 0));
        assert!(divide(&mut pos, 0).is_empty());
    }

    #[test]
    fn divide_sums_to_count() {
        let mut pos = Position::from_start_position();
        let divisions = divide(&mut pos, 3);
        assert_eq!(20, divisions.len());
        assert_eq!(8902, divisions.iter().map(|d| d.nodes).sum::<u64>());
        assert!(divisions.contains(&Division {
            movement: "e2e4".to_string(),
            nodes: 600,
        }));
    }

    #[test]
    fn table_lists_every_depth() {
        let mut pos = Position::from_start_position();
        let rendered = perft(&mut pos, 2).to_string();
        assert!(rendered.contains("movements"));
        assert!(rendered.contains("| 400 |") || rendered.contains(" 400 "));
        assert_eq!(1 + 3 + 2 + 1, rendered.lines().count());
    }

    #[test]
    fn results_serialize() {
        let mut pos = Position::from_start_position();
        let json = serde_json::to_value(perft(&mut pos, 1)).unwrap();
        assert_eq!(20, json["levels"][0]["movements"]);
        assert_eq!(0, json["levels"][0]["checks"]);
    }
}
