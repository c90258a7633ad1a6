//! dotbox core - dots-and-boxes engine and computer opponent
//!
//! This crate provides the game logic for dotbox:
//! - Board geometry (square lattice of dots, edges, and cells)
//! - Edge-claim rules: completion detection, scoring, extra turns
//! - Heuristic decision policy for the computer player
//! - Session controller with stale-move guarding

pub mod board;
pub mod game;
pub mod policy;
pub mod session;

// Re-exports for convenient access
pub use board::{Board, Cell, CellId, Dot, Edge, EdgeId, GRID_SIZES};
pub use game::{AppliedMove, GameState, MoveError, Outcome, Player};
pub use policy::{HeuristicPolicy, PolicyError, TAKE_PROBABILITY};
pub use session::{Session, SessionError, ThinkToken, THINKING_DELAY};
