// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

use fianchetto::{core::Square, Position};

/// Lists the legal movements of a position along with their flags.
#[derive(Debug, StructOpt)]
struct Options {
    /// Only list the movements of the piece on this square.
    #[structopt(short, long)]
    square: Option<Square>,

    /// Play this many random movements first, printing each one.
    #[structopt(short, long, default_value = "0")]
    random: u32,

    /// FEN representation of the position to analyze.
    #[structopt(name = "FEN")]
    fen: String,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::WARN)
        .with_env_filter(EnvFilter::from_env("FIANCHETTO_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let ops = Options::from_args();
    let mut pos = Position::from_fen(&ops.fen)?;
    let mut rng = rand::thread_rng();
    for _ in 0..ops.random {
        let movement = match pos.random_movement(&mut rng) {
            Ok(movement) => movement,
            Err(_) => break,
        };

        println!("played {}", movement);
        pos.play(movement)?;
    }

    if ops.random > 0 {
        println!("{}", pos);
        println!("{}", pos.as_fen());
    }

    let movements = match ops.square {
        Some(square) => pos.movements_from(square)?.into(),
        None => pos.movements(),
    };

    for movement in movements.iter() {
        println!("{} {}", movement.as_uci(), movement.flags());
    }

    println!("{}", movements.counts());
    Ok(())
}
