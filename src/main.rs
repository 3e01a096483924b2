//! Headless self-play
//!
//! Plays the engine against itself and prints every position. An optional
//! argument names a JSON config file; `RUST_LOG=debug` shows per-depth
//! search progress.

use std::process::ExitCode;

use gomoku::{Engine, EngineConfig};

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig::default(),
    };
    let mut engine = Engine::new(config)?;
    let mut game = engine.new_game();

    while !game.is_over() {
        let ai = engine.play_turn(&mut game)?;
        println!(
            "#{} {} at {} (score {}, depth {}, {} nodes, {} ms)",
            game.move_count(),
            ai.mv.side,
            ai.mv.pos,
            ai.score,
            ai.depth,
            ai.nodes,
            ai.elapsed.as_millis()
        );
        println!("{}", game.board());
    }

    match game.outcome() {
        Some(win) => println!("{} wins by {:?}", win.winner, win.kind),
        None => println!("draw"),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
