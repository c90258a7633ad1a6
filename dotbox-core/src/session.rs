//! Game session controller
//!
//! Holds the authoritative state for one game, enforces turn order, and
//! hands out an explicit token for the computer's delayed move so a stale
//! callback can never mutate a superseded board. The thinking delay itself
//! is the caller's scheduling concern; the session only guards it.

use crate::board::{EdgeId, GRID_SIZES};
use crate::game::{AppliedMove, GameState, MoveError, Player};
use crate::policy::{HeuristicPolicy, PolicyError};
use std::time::Duration;
use thiserror::Error;

/// How long the computer "thinks" before its move is applied
pub const THINKING_DELAY: Duration = Duration::from_millis(500);

/// Why the session refused an input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("grid size {0} is not selectable")]
    InvalidGridSize(u8),
    #[error("it is the computer's turn")]
    NotYourTurn,
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Handle for one scheduled computer move.
///
/// Valid only while the session epoch and move counter both still match:
/// a reset or any applied move invalidates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThinkToken {
    epoch: u64,
    move_count: u64,
}

/// One game session: state machine over turn and outcome
pub struct Session {
    state: GameState,
    policy: HeuristicPolicy,
    epoch: u64,
    pending: Option<ThinkToken>,
}

impl Session {
    /// Start a session on one of the selectable grid sizes
    pub fn new(size: u8) -> Result<Self, SessionError> {
        Self::build(size, HeuristicPolicy::new())
    }

    /// Start a session with a deterministic computer opponent
    pub fn with_seed(size: u8, seed: u64) -> Result<Self, SessionError> {
        Self::build(size, HeuristicPolicy::with_seed(seed))
    }

    fn build(size: u8, policy: HeuristicPolicy) -> Result<Self, SessionError> {
        if !GRID_SIZES.contains(&size) {
            return Err(SessionError::InvalidGridSize(size));
        }
        Ok(Self {
            state: GameState::new(size),
            policy,
            epoch: 0,
            pending: None,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Throw away the whole game and start over. Any outstanding
    /// [`ThinkToken`] is dead after this.
    pub fn reset(&mut self, size: u8) -> Result<(), SessionError> {
        if !GRID_SIZES.contains(&size) {
            return Err(SessionError::InvalidGridSize(size));
        }
        self.state = GameState::new(size);
        self.epoch += 1;
        self.pending = None;
        tracing::debug!(size, epoch = self.epoch, "session reset");
        Ok(())
    }

    /// Apply a human edge claim.
    ///
    /// Rejected (state untouched) when it is the computer's turn, the game
    /// is decided, or the edge is unknown/already claimed.
    pub fn human_claim(&mut self, edge: EdgeId) -> Result<AppliedMove, SessionError> {
        if self.state.outcome().is_decided() {
            return Err(MoveError::GameOver.into());
        }
        if self.state.turn() != Player::Human {
            return Err(SessionError::NotYourTurn);
        }
        self.apply(edge, Player::Human)
    }

    /// Ask for a computer-move token.
    ///
    /// `Some` exactly when the game is in progress, it is the computer's
    /// turn, and no token is already outstanding — at most one per
    /// turn-entry. The caller sleeps [`THINKING_DELAY`] and then calls
    /// [`Session::complete_computer_move`].
    pub fn schedule_computer_move(&mut self) -> Option<ThinkToken> {
        if self.state.outcome().is_decided() || self.state.turn() != Player::Computer {
            return None;
        }
        if self.pending.is_some() {
            return None;
        }
        let token = ThinkToken {
            epoch: self.epoch,
            move_count: self.state.move_count(),
        };
        self.pending = Some(token);
        Some(token)
    }

    /// Fire a scheduled computer move.
    ///
    /// Returns `Ok(None)` when the token is stale (the session was reset or
    /// the state advanced since it was issued); the callback is discarded
    /// without touching the board.
    pub fn complete_computer_move(
        &mut self,
        token: ThinkToken,
    ) -> Result<Option<AppliedMove>, SessionError> {
        let current = ThinkToken {
            epoch: self.epoch,
            move_count: self.state.move_count(),
        };
        if self.pending != Some(token) || token != current {
            tracing::debug!(?token, ?current, "discarding stale computer move");
            return Ok(None);
        }
        self.pending = None;

        let edge = self.policy.choose_move(&self.state)?;
        let applied = self.apply(edge, Player::Computer)?;
        Ok(Some(applied))
    }

    fn apply(&mut self, edge: EdgeId, owner: Player) -> Result<AppliedMove, SessionError> {
        let (next, applied) = self.state.apply_claim(edge, owner)?;
        tracing::debug!(
            owner = owner.label(),
            edge,
            completed = applied.completed.len(),
            "claim applied"
        );
        if next.turn() != self.state.turn() {
            tracing::debug!(turn = next.turn().label(), "turn changed");
        }
        if next.outcome().is_decided() {
            tracing::info!(result = next.status_line(), "game decided");
        }
        self.state = next;
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Outcome;

    /// First unclaimed edge that completes nothing, if one exists
    fn quiet_edge(state: &GameState) -> EdgeId {
        state
            .unclaimed_edges()
            .find(|&edge| !crate::policy::completes_a_cell(state, edge))
            .or_else(|| state.unclaimed_edges().next())
            .expect("board not full")
    }

    #[test]
    fn test_invalid_grid_size_rejected() {
        assert_eq!(
            Session::new(4).err(),
            Some(SessionError::InvalidGridSize(4))
        );
        assert!(Session::new(5).is_ok());
    }

    #[test]
    fn test_human_claim_out_of_turn_rejected() {
        let mut session = Session::with_seed(5, 1).unwrap();
        let edge = quiet_edge(session.state());
        session.human_claim(edge).unwrap();
        assert_eq!(session.state().turn(), Player::Computer);

        let next = quiet_edge(session.state());
        assert_eq!(session.human_claim(next), Err(SessionError::NotYourTurn));
        // The rejection changed nothing
        assert_eq!(session.state().move_count(), 1);
    }

    #[test]
    fn test_one_token_per_turn_entry() {
        let mut session = Session::with_seed(5, 1).unwrap();
        assert!(session.schedule_computer_move().is_none()); // human's turn

        let edge = quiet_edge(session.state());
        session.human_claim(edge).unwrap();

        let token = session.schedule_computer_move();
        assert!(token.is_some());
        assert!(session.schedule_computer_move().is_none()); // already pending

        let applied = session.complete_computer_move(token.unwrap()).unwrap();
        assert!(applied.is_some());
        assert_eq!(applied.unwrap().owner, Player::Computer);
    }

    #[test]
    fn test_stale_token_after_reset_is_discarded() {
        let mut session = Session::with_seed(5, 1).unwrap();
        let edge = quiet_edge(session.state());
        session.human_claim(edge).unwrap();

        let token = session.schedule_computer_move().unwrap();
        session.reset(5).unwrap();

        // The timer fires on a superseded board: nothing happens.
        assert_eq!(session.complete_computer_move(token), Ok(None));
        assert_eq!(session.state().move_count(), 0);
    }

    #[test]
    fn test_consumed_token_cannot_fire_twice() {
        let mut session = Session::with_seed(5, 1).unwrap();
        let edge = quiet_edge(session.state());
        session.human_claim(edge).unwrap();

        let token = session.schedule_computer_move().unwrap();
        assert!(session.complete_computer_move(token).unwrap().is_some());
        let after = session.state().move_count();

        assert_eq!(session.complete_computer_move(token), Ok(None));
        assert_eq!(session.state().move_count(), after);
    }

    #[test]
    fn test_full_game_drives_to_outcome() {
        let mut session = Session::with_seed(5, 99).unwrap();

        while !session.state().outcome().is_decided() {
            match session.state().turn() {
                Player::Human => {
                    let edge = quiet_edge(session.state());
                    session.human_claim(edge).unwrap();
                }
                Player::Computer => {
                    let token = session
                        .schedule_computer_move()
                        .expect("token available on computer turn entry");
                    session
                        .complete_computer_move(token)
                        .unwrap()
                        .expect("fresh token is never stale");
                }
            }
        }

        let state = session.state();
        let (human, computer) = state.scores();
        assert_eq!(human + computer, state.board().cell_count() as u32);
        assert_eq!(state.scores(), state.recount_scores());
        assert_ne!(state.outcome(), Outcome::InProgress);
        assert!(state.status_line().ends_with('!'));
    }
}
