//! Sim command - headless self-play between two heuristic policies
//!
//! Useful for eyeballing how often the first mover wins and for exercising
//! the engine at every grid size without a terminal session.

use anyhow::{bail, Result};
use clap::Args;
use dotbox_core::{GameState, HeuristicPolicy, Outcome, Player, GRID_SIZES};
use serde::Serialize;

#[derive(Args)]
pub struct SimArgs {
    /// Grid size (cells per side)
    #[arg(long, default_value = "5")]
    pub size: u8,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Base seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    outcome: Outcome,
    moves: u64,
    /// (first seat, second seat) box counts
    scores: (u32, u32),
}

/// Aggregated results
#[derive(Clone, Debug, Serialize)]
struct SimResults {
    games: Vec<GameRecord>,
    first_seat_wins: usize,
    second_seat_wins: usize,
    ties: usize,
    avg_moves: f32,
}

/// Run sim command: play all games, then report
pub fn run(args: SimArgs) -> Result<()> {
    if !GRID_SIZES.contains(&args.size) {
        bail!(
            "grid size {} is not selectable (choose one of {:?})",
            args.size,
            GRID_SIZES
        );
    }

    let base_seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(
        "Starting sim: {}x{} grid, {} games, base seed {}",
        args.size,
        args.size,
        args.games,
        base_seed
    );

    let results = play_all(&args, base_seed)?;
    report(&results, &args)
}

fn play_all(args: &SimArgs, base_seed: u64) -> Result<SimResults> {
    let mut games = Vec::with_capacity(args.games);

    for n in 0..args.games {
        let record = play_single_game(args.size, base_seed.wrapping_add(n as u64), n + 1)?;
        tracing::info!(
            "Game {}: {:?} ({} moves, {}-{})",
            record.game_number,
            record.outcome,
            record.moves,
            record.scores.0,
            record.scores.1
        );
        games.push(record);
    }

    Ok(compute_statistics(games))
}

/// One full game; the first seat drives the `Human` side of the state
fn play_single_game(size: u8, seed: u64, game_number: usize) -> Result<GameRecord> {
    let mut first = HeuristicPolicy::with_seed(seed);
    let mut second = HeuristicPolicy::with_seed(seed ^ 0x9e37_79b9_7f4a_7c15);
    let mut state = GameState::new(size);

    while state.outcome() == Outcome::InProgress {
        let mover = state.turn();
        let policy = match mover {
            Player::Human => &mut first,
            Player::Computer => &mut second,
        };
        let edge = policy.choose_move(&state)?;
        state = state.apply_claim(edge, mover)?.0;
    }

    Ok(GameRecord {
        game_number,
        outcome: state.outcome(),
        moves: state.move_count(),
        scores: state.scores(),
    })
}

fn compute_statistics(games: Vec<GameRecord>) -> SimResults {
    let first_seat_wins = games
        .iter()
        .filter(|g| g.outcome == Outcome::PlayerWins)
        .count();
    let second_seat_wins = games
        .iter()
        .filter(|g| g.outcome == Outcome::ComputerWins)
        .count();
    let ties = games.iter().filter(|g| g.outcome == Outcome::Tie).count();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        games.iter().map(|g| g.moves as f32).sum::<f32>() / games.len() as f32
    };

    SimResults {
        games,
        first_seat_wins,
        second_seat_wins,
        ties,
        avg_moves,
    }
}

fn report(results: &SimResults, args: &SimArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    println!(
        "{} games on a {}x{} grid: first seat {} wins, second seat {} wins, {} ties",
        args.games,
        args.size,
        args.size,
        results.first_seat_wins,
        results.second_seat_wins,
        results.ties
    );
    println!("average moves per game: {:.1}", results.avg_moves);
    Ok(())
}
