//! Perft and divide runner for checking move generation from the shell.
//!
//! Usage:
//! `cargo run --release --bin perft_runner`
//! `cargo run --release --bin perft_runner -- --depth 5 --fen "<FEN>" --divide`
//!
//! Set `RUST_LOG=debug` to see table and bitbase construction logs.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use tracing_subscriber::EnvFilter;

use chess_core::game_state::chess_rules::STARTING_POSITION_FEN;
use chess_core::game_state::game_state::GameState;
use chess_core::move_generation::perft::{perft, perft_counts, perft_divide};
use chess_core::moves::attack_tables::AttackTables;

fn parse_arg_u8(args: &[String], flag: &str, default: u8) -> u8 {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(v) = args[i + 1].parse::<u8>() {
                return v;
            }
        }
    }
    default
}

fn parse_arg_string(args: &[String], flag: &str, default: &str) -> String {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    default.to_owned()
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let depth = parse_arg_u8(&args, "--depth", 4);
    let fen = parse_arg_string(&args, "--fen", STARTING_POSITION_FEN);
    let divide = args.iter().any(|arg| arg == "--divide");

    let tables = Arc::new(AttackTables::build().map_err(|e| e.to_string())?);
    let mut game = GameState::from_fen(&fen, &tables).map_err(|e| e.to_string())?;
    info!(depth, fen = %game.get_fen(), "perft start");

    println!("{game}");

    let started = Instant::now();
    if divide {
        let mut total = 0u64;
        for (mv, nodes) in perft_divide(&mut game, depth) {
            println!("{mv}: {nodes}");
            total += nodes;
        }
        println!("total: {total}");
    } else {
        let nodes = perft(&mut game, depth);
        println!("depth={depth} nodes={nodes}");
    }
    let elapsed = started.elapsed();

    if depth <= 4 {
        let counts = perft_counts(&mut game, depth);
        println!(
            "captures={} en_passant={} castles={} promotions={} checks={} checkmates={}",
            counts.captures,
            counts.en_passant,
            counts.castles,
            counts.promotions,
            counts.checks,
            counts.checkmates
        );
    }

    println!("elapsed_ms={}", elapsed.as_millis());
    Ok(())
}
