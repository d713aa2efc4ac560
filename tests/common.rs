//! Common test utilities for the quarto test suite.
//!
//! Scripted policies and complete-board fixtures for driving the environment
//! through known games.

#![allow(dead_code)]

use std::collections::VecDeque;

use quarto::{
    Error, Result,
    ports::Policy,
    quarto::{Action, EnvironmentView},
};

/// Full board without any winning line
pub const TIE_BOARD: [u8; 16] = [13, 9, 3, 8, 6, 1, 11, 5, 12, 15, 10, 4, 2, 14, 7, 16];

/// Full board whose only winning line is the bottom row, completed by cell 15
pub const FORCED_WIN_BOARD: [u8; 16] = [16, 10, 4, 13, 11, 15, 9, 6, 2, 14, 1, 12, 8, 5, 7, 3];

/// Piece on cell 15 of [`FORCED_WIN_BOARD`]
pub const FORCED_WIN_PIECE: u8 = 3;

/// Policy replaying a fixed list of actions
pub struct ScriptedPolicy {
    moves: VecDeque<Action>,
}

impl ScriptedPolicy {
    pub fn new(moves: Vec<Action>) -> Self {
        Self {
            moves: moves.into(),
        }
    }

    pub fn raw(moves: &[(usize, u8)]) -> Self {
        Self::new(
            moves
                .iter()
                .map(|&(position, piece)| Action::from_raw(position, piece).unwrap())
                .collect(),
        )
    }
}

impl Policy for ScriptedPolicy {
    fn choose_action(&mut self, _view: &EnvironmentView<'_>) -> Result<Action> {
        self.moves.pop_front().ok_or(Error::NoLegalActions)
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

/// Split the fifteen half-turns that fill `board` into learner and opponent
/// moves.
///
/// Pieces are placed in identity order with `last` held back for the forced
/// final placement.
pub fn fill_script(board: [u8; 16], last: u8) -> (Vec<Action>, Vec<Action>) {
    assert_ne!(last, 1, "piece 1 is always placed first");

    let mut cell_of = [0usize; 17];
    for (cell, &identity) in board.iter().enumerate() {
        cell_of[usize::from(identity)] = cell;
    }

    let mut order = vec![1u8];
    order.extend((2..=16).filter(|&identity| identity != last));
    order.push(last);

    let mut learner = Vec::new();
    let mut opponent = Vec::new();
    for turn in 0..15 {
        let action = Action::from_raw(cell_of[usize::from(order[turn])], order[turn + 1]).unwrap();
        if turn % 2 == 0 {
            learner.push(action);
        } else {
            opponent.push(action);
        }
    }
    (learner, opponent)
}
