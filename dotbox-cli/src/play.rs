//! Play command - interactive game against the computer
//!
//! The terminal stands in for the original pointer-driven canvas: the
//! player names an edge by its two dot coordinates instead of clicking
//! near it. All rules live in dotbox-core; this loop only renders, reads
//! input, and runs the computer's thinking delay.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;
use dotbox_core::{AppliedMove, Dot, Player, Session, GRID_SIZES, THINKING_DELAY};

use crate::render;

#[derive(Args)]
pub struct PlayArgs {
    /// Grid size (cells per side)
    #[arg(long, default_value = "10")]
    pub size: u8,

    /// Seed for the computer opponent (reproducible games)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the computer's thinking delay
    #[arg(long)]
    pub fast: bool,
}

pub async fn run(args: PlayArgs) -> Result<()> {
    let mut session = new_session(&args)
        .with_context(|| format!("selectable grid sizes are {:?}", GRID_SIZES))?;

    println!("Dots and Boxes - {0}x{0} grid", args.size);
    println!("Claim an edge by naming its two dots: x1 y1 x2 y2 (or 'quit')");

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let state = session.state();
        println!("\n{}", render::render(state));
        let (player, computer) = state.scores();
        println!(
            "Player: {}  Computer: {}  [{}]",
            player,
            computer,
            state.status_line()
        );

        if state.outcome().is_decided() {
            if !prompt_yes_no(&mut input, "New game? [y/N] ")? {
                return Ok(());
            }
            session.reset(args.size)?;
            continue;
        }

        match state.turn() {
            Player::Human => {
                let Some((a, b)) = read_edge(&mut input)? else {
                    return Ok(());
                };
                let Some(edge) = session.state().board().edge_between(a, b) else {
                    println!("no edge between those dots");
                    continue;
                };
                if let Err(err) = session.human_claim(edge) {
                    println!("rejected: {}", err);
                }
            }
            Player::Computer => {
                if let Some(token) = session.schedule_computer_move() {
                    if !args.fast {
                        tokio::time::sleep(THINKING_DELAY).await;
                    }
                    if let Some(applied) = session.complete_computer_move(token)? {
                        announce_computer_move(&session, &applied);
                    }
                }
            }
        }
    }
}

fn new_session(args: &PlayArgs) -> Result<Session> {
    let session = match args.seed {
        Some(seed) => Session::with_seed(args.size, seed)?,
        None => Session::new(args.size)?,
    };
    Ok(session)
}

/// Read an edge as four coordinates. `None` means the player quit.
fn read_edge(input: &mut impl BufRead) -> Result<Option<(Dot, Dot)>> {
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None); // EOF
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        let coords: Vec<u8> = line
            .split_whitespace()
            .filter_map(|part| part.parse().ok())
            .collect();
        match coords[..] {
            [x1, y1, x2, y2] => {
                return Ok(Some((Dot::new(x1, y1), Dot::new(x2, y2))));
            }
            _ => println!("enter four coordinates: x1 y1 x2 y2"),
        }
    }
}

fn announce_computer_move(session: &Session, applied: &AppliedMove) {
    if let Some(edge) = session.state().board().edge(applied.edge) {
        let boxes = applied.completed.len();
        if boxes > 0 {
            println!(
                "computer claims ({},{})-({},{}) and takes {} box{}",
                edge.a.x,
                edge.a.y,
                edge.b.x,
                edge.b.y,
                boxes,
                if boxes == 1 { "" } else { "es" }
            );
        } else {
            println!(
                "computer claims ({},{})-({},{})",
                edge.a.x, edge.a.y, edge.b.x, edge.b.y
            );
        }
    }
}

fn prompt_yes_no(input: &mut impl BufRead, prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
