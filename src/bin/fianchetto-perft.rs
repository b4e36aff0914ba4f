// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{io, time::Instant};

use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

use fianchetto::{perft, position::START_FEN, Position};

/// Counts the movement tree of a position, with per-depth totals for every movement flag.
#[derive(Debug, StructOpt)]
struct Options {
    /// The depth to search to.
    #[structopt(short, long)]
    depth: u32,

    /// Print the leaf count below each root movement instead of the per-depth table. Flags are not computed.
    #[structopt(long)]
    divide: bool,

    /// Print results as JSON.
    #[structopt(long)]
    json: bool,

    /// FEN representation of the position to analyze. Defaults to the starting position.
    #[structopt(name = "FEN")]
    fen: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .with_env_filter(EnvFilter::from_env("FIANCHETTO_LOG"))
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let ops = Options::from_args();
    let mut pos = Position::from_fen(ops.fen.as_deref().unwrap_or(START_FEN))?;
    let start = Instant::now();
    if ops.divide {
        let divisions = perft::divide(&mut pos, ops.depth);
        if ops.json {
            serde_json::to_writer_pretty(io::stdout(), &divisions)?;
            println!();
        } else {
            for division in &divisions {
                println!("{}: {}", division.movement, division.nodes);
            }

            println!();
            println!("{}", divisions.iter().map(|d| d.nodes).sum::<u64>());
        }
    } else {
        let results = perft::perft(&mut pos, ops.depth);
        if ops.json {
            serde_json::to_writer_pretty(io::stdout(), &results)?;
            println!();
        } else {
            print!("{}", results);
        }
    }

    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "done");
    Ok(())
}
