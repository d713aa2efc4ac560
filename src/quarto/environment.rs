//! Episode state machine
//!
//! One call to [`Environment::step`] plays a full turn: the learner's
//! half-turn, then (unless the episode ended) the opponent's. Each half-turn
//! places the currently selected piece and hands a new piece to the other
//! side. Terminal episodes are recorded in the result log and the board is
//! reset before `step` returns, so callers always observe a live position.

use log::{debug, info};
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::{
    board::{AvailablePieces, Board, CELLS, Piece},
    codec::{Action, StateAddress, encode_state},
    lines::{is_winning, legal_positions},
    results::{Outcome, ResultLog},
};
use crate::{Error, Result, ports::Policy};

/// Where the episode is within a turn
///
/// Episodes end inside [`Environment::step`] and are reset before it
/// returns; the end of an episode is reported through [`Step::termination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    AwaitingLearnerMove,
    AwaitingOpponentMove,
}

/// Reward for a tie; the result log still records [`Outcome::Tie`]
pub const TIE_REWARD: f64 = -1.0;

/// Side making a half-turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Learner,
    Opponent,
}

impl Side {
    /// +1 for the learner, -1 for the opponent
    pub fn sign(self) -> i8 {
        match self {
            Side::Learner => 1,
            Side::Opponent => -1,
        }
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// The mover completed a matching line
    Win(Side),
    /// The piece pool ran out and the forced last placement completed a line
    ForcedWin(Side),
    /// Board filled without a matching line
    Tie,
    /// The mover played on an occupied cell
    IllegalPosition(Side),
    /// The mover handed over a piece that is not available
    IllegalPiece(Side),
}

/// Result of one [`Environment::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Board after the step (a fresh board when the episode ended)
    pub board: Board,
    /// Reward from the learner's perspective
    pub reward: f64,
    /// Set when the step ended the episode
    pub termination: Option<Termination>,
}

impl Step {
    pub fn is_terminal(&self) -> bool {
        self.termination.is_some()
    }
}

/// Read-only view of the environment handed to policies
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentView<'a> {
    pub board: &'a Board,
    pub available: &'a AvailablePieces,
    pub selected: Piece,
    pub phase: Phase,
}

impl EnvironmentView<'_> {
    pub fn legal_positions(&self) -> Vec<usize> {
        legal_positions(self.board)
    }

    /// Every legal position paired with every available piece, position-major
    pub fn legal_actions(&self) -> Vec<Action> {
        let positions = self.legal_positions();
        positions
            .iter()
            .flat_map(|&position| {
                self.available
                    .iter()
                    .map(move |piece| Action { position, piece })
            })
            .collect()
    }

    pub fn state_address(&self) -> StateAddress {
        encode_state(self.board)
    }

    /// Uniformly random legal position and, independently, a uniformly
    /// random available piece.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] if either set is empty.
    pub fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Action> {
        let positions = self.legal_positions();
        let position = *positions.choose(rng).ok_or(Error::NoLegalActions)?;
        let piece = *self
            .available
            .as_slice()
            .choose(rng)
            .ok_or(Error::NoLegalActions)?;
        Ok(Action { position, piece })
    }
}

/// Quarto environment playing the learner against an opponent policy
pub struct Environment {
    board: Board,
    available: AvailablePieces,
    selected: Piece,
    phase: Phase,
    opponent: Box<dyn Policy>,
    result_log: ResultLog,
    trace: bool,
}

impl Environment {
    /// Create an environment with a fresh episode
    pub fn new(opponent: Box<dyn Policy>) -> Self {
        Self {
            board: Board::new(),
            available: AvailablePieces::initial(),
            selected: Piece::FIRST,
            phase: Phase::AwaitingLearnerMove,
            opponent,
            result_log: ResultLog::new(),
            trace: false,
        }
    }

    /// Log every half-turn and the resulting board at info level
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn available(&self) -> &AvailablePieces {
        &self.available
    }

    /// Piece the side to move must place
    pub fn selected(&self) -> Piece {
        self.selected
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result_log(&self) -> &ResultLog {
        &self.result_log
    }

    pub fn into_result_log(self) -> ResultLog {
        self.result_log
    }

    pub fn opponent_name(&self) -> &str {
        self.opponent.name()
    }

    pub fn view(&self) -> EnvironmentView<'_> {
        EnvironmentView {
            board: &self.board,
            available: &self.available,
            selected: self.selected,
            phase: self.phase,
        }
    }

    pub fn state_address(&self) -> StateAddress {
        encode_state(&self.board)
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        self.view().legal_actions()
    }

    /// Play the learner's action and, if the episode continues, the
    /// opponent's reply.
    ///
    /// # Errors
    ///
    /// Only errors raised by the opponent policy are propagated; illegal
    /// actions from either side are forfeits, not errors.
    pub fn step(&mut self, action: Action) -> Result<Step> {
        if let Some(step) = self.half_turn(action, Side::Learner) {
            return Ok(step);
        }

        self.phase = Phase::AwaitingOpponentMove;
        let view = EnvironmentView {
            board: &self.board,
            available: &self.available,
            selected: self.selected,
            phase: self.phase,
        };
        let reply = self.opponent.choose_action(&view)?;
        if let Some(step) = self.half_turn(reply, Side::Opponent) {
            return Ok(step);
        }

        self.phase = Phase::AwaitingLearnerMove;
        Ok(Step {
            board: self.board,
            reward: 0.0,
            termination: None,
        })
    }

    fn half_turn(&mut self, action: Action, side: Side) -> Option<Step> {
        let sign = side.sign();

        if action.position >= CELLS || !self.board.is_empty(action.position) {
            debug!("illegal position {} by {side:?}", action.position);
            return Some(self.finish(
                Outcome::loss_for(sign),
                Termination::IllegalPosition(side),
            ));
        }

        if !self.available.remove(action.piece) {
            debug!("illegal piece {} by {side:?}", action.piece);
            return Some(self.finish(Outcome::loss_for(sign), Termination::IllegalPiece(side)));
        }

        self.board.place(action.position, self.selected);
        self.selected = action.piece;

        if self.trace {
            info!("{sign} {action}\n{}", self.board);
        }

        if is_winning(&self.board) {
            return Some(self.finish(Outcome::win_for(sign), Termination::Win(side)));
        }

        if self.available.is_empty() {
            return Some(self.force_last_placement(side));
        }

        None
    }

    /// With the pool exhausted the handed-over piece can only go to the one
    /// remaining cell; a line it completes counts for the receiving side.
    fn force_last_placement(&mut self, side: Side) -> Step {
        let empty = self.board.empty_positions();
        assert!(
            empty.len() <= 1,
            "forced placement with {} empty cells",
            empty.len()
        );
        for pos in empty {
            self.board.place(pos, self.selected);
        }

        if self.trace {
            info!("last move\n{}", self.board);
        }

        if is_winning(&self.board) {
            self.finish(Outcome::loss_for(side.sign()), Termination::ForcedWin(side))
        } else {
            self.finish(Outcome::Tie, Termination::Tie)
        }
    }

    fn finish(&mut self, outcome: Outcome, termination: Termination) -> Step {
        debug!("episode {} ended: {termination:?}", self.result_log.len());
        self.result_log.push(outcome);
        self.reset();
        let reward = match termination {
            Termination::Tie => TIE_REWARD,
            _ => f64::from(outcome.value()),
        };
        Step {
            board: self.board,
            reward,
            termination: Some(termination),
        }
    }

    fn reset(&mut self) {
        self.board = Board::new();
        self.available = AvailablePieces::initial();
        self.selected = Piece::FIRST;
        self.phase = Phase::AwaitingLearnerMove;
    }
}
