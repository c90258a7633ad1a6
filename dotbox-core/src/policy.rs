//! Heuristic move selection for the computer player
//!
//! Three tiers, in order: prefer a box-completing edge with probability
//! [`TAKE_PROBABILITY`], else avoid edges that hand the opponent a free
//! box, else pick uniformly at random. Deliberately not a search — one-ply
//! greed plus a one-ply safety filter.

use crate::board::EdgeId;
use crate::game::GameState;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Chance of taking an available box instead of falling through
pub const TAKE_PROBABILITY: f64 = 0.7;

/// Policy failure. `NoCandidates` on an undecided board means the rules
/// engine miscounted a cell and is an internal-consistency bug, not a
/// playable position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("no unclaimed edges while the game is undecided")]
    NoCandidates,
    #[error("move requested on a decided game")]
    GameDecided,
}

/// The computer's move picker
pub struct HeuristicPolicy {
    pub take_probability: f64,
    rng: ChaCha8Rng,
}

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self {
            take_probability: TAKE_PROBABILITY,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            take_probability: TAKE_PROBABILITY,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick the edge the computer claims this turn
    pub fn choose_move(&mut self, state: &GameState) -> Result<EdgeId, PolicyError> {
        if state.outcome().is_decided() {
            return Err(PolicyError::GameDecided);
        }

        let available: Vec<EdgeId> = state.unclaimed_edges().collect();
        if available.is_empty() {
            return Err(PolicyError::NoCandidates);
        }

        let completing: Vec<EdgeId> = available
            .iter()
            .copied()
            .filter(|&edge| completes_a_cell(state, edge))
            .collect();

        let mut candidates =
            if !completing.is_empty() && self.rng.gen_bool(self.take_probability) {
                completing
            } else {
                available
            };

        // Safety filter: drop giveaway edges unless that empties the set
        let safe: Vec<EdgeId> = candidates
            .iter()
            .copied()
            .filter(|&edge| !concedes_a_cell(state, edge))
            .collect();
        if !safe.is_empty() {
            candidates = safe;
        }

        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(PolicyError::NoCandidates)
    }
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Would claiming this edge complete some still-unclaimed cell?
///
/// True when an adjacent unclaimed cell already has its other 3 edges
/// owned. Boolean membership: completing two cells at once counts the same
/// as one.
pub fn completes_a_cell(state: &GameState, edge: EdgeId) -> bool {
    state
        .board()
        .cells_of_edge(edge)
        .into_iter()
        .flatten()
        .any(|cell| state.cell_owner(cell).is_none() && state.owned_edge_count(cell) == 3)
}

/// Would claiming this edge leave some unclaimed cell one edge from
/// completion, handing the opponent a free box next turn?
pub fn concedes_a_cell(state: &GameState, edge: EdgeId) -> bool {
    state
        .board()
        .cells_of_edge(edge)
        .into_iter()
        .flatten()
        .any(|cell| state.cell_owner(cell).is_none() && state.owned_edge_count(cell) == 2)
}
