//! Game state and the edge-claim transaction
//!
//! A claim is applied as a single transaction: edge ownership, completed
//! cells, scores, turn, and outcome are all updated in one step and the
//! result is returned as a complete new snapshot.

use crate::board::{Board, CellId, EdgeId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// The two actors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// The human player (serialized as "player", matching the UI vocabulary)
    #[serde(rename = "player")]
    Human = 0,
    #[serde(rename = "computer")]
    Computer = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Computer,
            Player::Computer => Player::Human,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Player::Human => "player",
            Player::Computer => "computer",
        }
    }
}

/// Game outcome, decided once every cell is owned
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    PlayerWins,
    ComputerWins,
    Tie,
}

impl Outcome {
    pub fn is_decided(self) -> bool {
        self != Outcome::InProgress
    }

    /// User-facing result text, `None` while the game is in progress
    pub fn message(self) -> Option<&'static str> {
        match self {
            Outcome::InProgress => None,
            Outcome::PlayerWins => Some("Player wins!"),
            Outcome::ComputerWins => Some("Computer wins!"),
            Outcome::Tie => Some("It's a tie!"),
        }
    }
}

/// Why a claim was rejected. Rejections leave the state untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no edge {0} on this board")]
    UnknownEdge(EdgeId),
    #[error("edge {0} is already claimed")]
    AlreadyClaimed(EdgeId),
    #[error("the game is already decided")]
    GameOver,
}

/// Record of one applied claim
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMove {
    pub edge: EdgeId,
    pub owner: Player,
    /// Cells completed by this claim (0, 1, or 2)
    pub completed: Vec<CellId>,
}

/// Full game state (clone to mutate)
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    edge_owner: Vec<Option<Player>>,
    cell_owner: Vec<Option<Player>>,
    scores: [u32; 2],
    turn: Player,
    outcome: Outcome,
    move_count: u64,
    last_move: Option<AppliedMove>,
}

impl GameState {
    /// Fresh game on an N x N grid. The human moves first.
    pub fn new(size: u8) -> Self {
        let board = Board::new(size);
        let edge_owner = vec![None; board.edge_count()];
        let cell_owner = vec![None; board.cell_count()];
        Self {
            board,
            edge_owner,
            cell_owner,
            scores: [0, 0],
            turn: Player::Human,
            outcome: Outcome::InProgress,
            move_count: 0,
            last_move: None,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Total number of claims applied so far
    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    pub fn last_move(&self) -> Option<&AppliedMove> {
        self.last_move.as_ref()
    }

    pub fn edge_owner(&self, edge: EdgeId) -> Option<Player> {
        self.edge_owner.get(edge).copied().flatten()
    }

    pub fn cell_owner(&self, cell: CellId) -> Option<Player> {
        self.cell_owner.get(cell).copied().flatten()
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player as usize]
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.scores[0], self.scores[1])
    }

    /// All edges still claimable
    pub fn unclaimed_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_owner
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.is_none())
            .map(|(id, _)| id)
    }

    pub fn is_full(&self) -> bool {
        self.cell_owner.iter().all(|owner| owner.is_some())
    }

    /// How many of a cell's 4 bounding edges are owned
    pub fn owned_edge_count(&self, cell: CellId) -> usize {
        self.board
            .edges_of_cell(cell)
            .iter()
            .filter(|&&edge| self.edge_owner[edge].is_some())
            .count()
    }

    /// Recount scores from cell ownership. Always equals `scores()`.
    pub fn recount_scores(&self) -> (u32, u32) {
        let mut counts = [0u32; 2];
        for owner in self.cell_owner.iter().flatten() {
            counts[*owner as usize] += 1;
        }
        (counts[0], counts[1])
    }

    /// Status text: whose turn it is, or the result once decided
    pub fn status_line(&self) -> &'static str {
        match self.outcome.message() {
            Some(message) => message,
            None => match self.turn {
                Player::Human => "your turn",
                Player::Computer => "computer's turn",
            },
        }
    }

    // ========================================================================
    // APPLY CLAIM
    // ========================================================================

    /// Apply an edge claim, returning the new state snapshot and the move
    /// record (which lists the cells the claim completed).
    ///
    /// The turn passes to the opponent only when the claim completed zero
    /// cells; completing one or two cells keeps the turn with `owner`.
    pub fn apply_claim(
        &self,
        edge: EdgeId,
        owner: Player,
    ) -> Result<(GameState, AppliedMove), MoveError> {
        let mut next = self.clone();
        let applied = next.apply_claim_internal(edge, owner)?;
        Ok((next, applied))
    }

    fn apply_claim_internal(&mut self, edge: EdgeId, owner: Player) -> Result<AppliedMove, MoveError> {
        if self.outcome.is_decided() {
            return Err(MoveError::GameOver);
        }
        match self.edge_owner.get(edge) {
            None => return Err(MoveError::UnknownEdge(edge)),
            Some(Some(_)) => return Err(MoveError::AlreadyClaimed(edge)),
            Some(None) => {}
        }

        self.edge_owner[edge] = Some(owner);

        // A shared edge can complete both of its cells in one claim.
        let mut completed = Vec::new();
        for cell in self.board.cells_of_edge(edge).into_iter().flatten() {
            if self.cell_owner[cell].is_none() && self.owned_edge_count(cell) == 4 {
                self.cell_owner[cell] = Some(owner);
                self.scores[owner as usize] += 1;
                completed.push(cell);
            }
        }

        // One extra turn regardless of how many cells completed
        self.turn = if completed.is_empty() {
            owner.opponent()
        } else {
            owner
        };

        self.move_count += 1;
        let applied = AppliedMove {
            edge,
            owner,
            completed,
        };
        self.last_move = Some(applied.clone());

        if self.is_full() {
            self.outcome = match self.scores[0].cmp(&self.scores[1]) {
                Ordering::Greater => Outcome::PlayerWins,
                Ordering::Less => Outcome::ComputerWins,
                Ordering::Equal => Outcome::Tie,
            };
        }

        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Dot;

    /// Claim the edge between two dots, panicking on geometry mistakes
    fn claim(state: &GameState, a: Dot, b: Dot, owner: Player) -> GameState {
        let edge = state.board().edge_between(a, b).expect("edge exists");
        state.apply_claim(edge, owner).expect("claim accepted").0
    }

    #[test]
    fn test_fresh_game() {
        let game = GameState::new(3);
        assert_eq!(game.turn(), Player::Human);
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert_eq!(game.scores(), (0, 0));
        assert_eq!(game.unclaimed_edges().count(), 24);
        assert_eq!(game.status_line(), "your turn");
    }

    #[test]
    fn test_zero_completion_switches_turn() {
        let game = GameState::new(2);
        let next = claim(&game, Dot::new(0, 0), Dot::new(1, 0), Player::Human);
        assert_eq!(next.turn(), Player::Computer);
        assert_eq!(next.scores(), (0, 0));
        assert_eq!(next.status_line(), "computer's turn");
        assert_eq!(next.last_move().unwrap().completed, Vec::<usize>::new());
    }

    #[test]
    fn test_already_claimed_is_rejected() {
        let game = GameState::new(2);
        let edge = game
            .board()
            .edge_between(Dot::new(0, 0), Dot::new(1, 0))
            .unwrap();
        let (next, _) = game.apply_claim(edge, Player::Human).unwrap();

        let err = next.apply_claim(edge, Player::Computer).unwrap_err();
        assert_eq!(err, MoveError::AlreadyClaimed(edge));
        // Rejection leaves the snapshot usable and unchanged
        assert_eq!(next.turn(), Player::Computer);
        assert_eq!(next.move_count(), 1);
    }

    #[test]
    fn test_unknown_edge_is_rejected() {
        let game = GameState::new(2);
        let err = game.apply_claim(9999, Player::Human).unwrap_err();
        assert_eq!(err, MoveError::UnknownEdge(9999));
    }

    #[test]
    fn test_fourth_edge_completes_cell_and_keeps_turn() {
        let game = GameState::new(2);
        // Box (0,0): top, right, left by alternating players, then human
        // takes the bottom.
        let game = claim(&game, Dot::new(0, 0), Dot::new(1, 0), Player::Human);
        let game = claim(&game, Dot::new(1, 0), Dot::new(1, 1), Player::Computer);
        let game = claim(&game, Dot::new(0, 0), Dot::new(0, 1), Player::Human);
        let game = claim(&game, Dot::new(0, 1), Dot::new(1, 1), Player::Computer);

        let cell = game.board().cell_id(0, 0);
        assert_eq!(game.cell_owner(cell), Some(Player::Computer));
        assert_eq!(game.score(Player::Computer), 1);
        assert_eq!(game.last_move().unwrap().completed, vec![cell]);
        // Completion grants the extra turn
        assert_eq!(game.turn(), Player::Computer);
    }

    #[test]
    fn test_shared_edge_completes_two_cells() {
        let game = GameState::new(2);
        let mut state = game;
        // Fill every edge of cells (0,0) and (0,1) except their shared
        // vertical edge at x=1.
        let edges = [
            (Dot::new(0, 0), Dot::new(1, 0)), // top left box
            (Dot::new(1, 0), Dot::new(2, 0)), // top right box
            (Dot::new(0, 1), Dot::new(1, 1)), // bottom left box
            (Dot::new(1, 1), Dot::new(2, 1)), // bottom right box
            (Dot::new(0, 0), Dot::new(0, 1)), // left side
            (Dot::new(2, 0), Dot::new(2, 1)), // right side
        ];
        for (a, b) in edges {
            state = claim(&state, a, b, Player::Human);
        }

        let before = state.score(Player::Computer);
        let state = claim(&state, Dot::new(1, 0), Dot::new(1, 1), Player::Computer);

        assert_eq!(state.score(Player::Computer), before + 2);
        assert_eq!(state.last_move().unwrap().completed.len(), 2);
        // Still only one extra turn
        assert_eq!(state.turn(), Player::Computer);
    }

    #[test]
    fn test_scores_always_match_recount() {
        let mut state = GameState::new(2);
        let claimer = |n: u64| {
            if n % 2 == 0 {
                Player::Human
            } else {
                Player::Computer
            }
        };
        loop {
            let Some(edge) = state.unclaimed_edges().next() else {
                break;
            };
            state = state
                .apply_claim(edge, claimer(state.move_count()))
                .expect("claim accepted")
                .0;
            assert_eq!(state.scores(), state.recount_scores());
        }
        assert!(state.outcome().is_decided());
    }

    #[test]
    fn test_outcome_matches_score_comparison() {
        // Single-cell board: whoever claims the 4th edge owns the game.
        let game = GameState::new(1);
        let mut state = game;
        let ids: Vec<_> = state.unclaimed_edges().collect();
        assert_eq!(ids.len(), 4);

        state = state.apply_claim(ids[0], Player::Human).unwrap().0;
        state = state.apply_claim(ids[1], Player::Computer).unwrap().0;
        state = state.apply_claim(ids[2], Player::Human).unwrap().0;
        assert_eq!(state.outcome(), Outcome::InProgress);

        state = state.apply_claim(ids[3], Player::Computer).unwrap().0;
        assert_eq!(state.outcome(), Outcome::ComputerWins);
        assert_eq!(state.status_line(), "Computer wins!");
        assert_eq!(state.scores(), (0, 1));

        // Claims after the game is decided are rejected
        assert_eq!(
            state.apply_claim(ids[3], Player::Human).unwrap_err(),
            MoveError::GameOver
        );
    }

    #[test]
    fn test_player_serialization_vocabulary() {
        assert_eq!(
            serde_json::to_string(&Player::Human).unwrap(),
            "\"player\""
        );
        assert_eq!(
            serde_json::to_string(&Player::Computer).unwrap(),
            "\"computer\""
        );
    }
}
