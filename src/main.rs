use anyhow::Result;
use clap::Parser;

use draughts_engine::console::ConsoleHandler;
use draughts_engine::difficulty::{Difficulty, MachinePlayer};
use draughts_engine::game::Game;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Play forced-capture draughts against the machine",
    long_about = None
)]
struct Args {
    /// Machine strength: easy, medium or hard
    #[arg(long, default_value = "medium")]
    difficulty: String,

    /// Seed for the machine's randomness (reproducible games)
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the evaluator's tie-break noise
    #[arg(long)]
    no_jitter: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let difficulty = Difficulty::from_label(&args.difficulty);
    let mut machine = match args.seed {
        Some(seed) => MachinePlayer::seeded(seed),
        None => MachinePlayer::new(),
    };
    if args.no_jitter {
        machine.search_mut().evaluator_mut().jitter = 0.0;
    }

    println!("draughts: you play the lower side (p), difficulty {}", difficulty);
    println!("type help for commands");
    let mut console = ConsoleHandler::new(Game::with_machine(difficulty, machine));
    console.run()
}
