//! Quarto rules engine and episode environment

pub mod board;
pub mod codec;
pub mod environment;
pub mod format;
pub mod lines;
pub mod results;

pub use board::{AvailablePieces, Board, CELLS, PIECE_COUNT, Piece};
pub use codec::{
    ACTION_SPACE, Action, ActionAddress, STATE_SPACE, StateAddress, decode_action, encode_action,
    encode_state,
};
pub use environment::{
    Environment, EnvironmentView, Phase, Side, Step, TIE_REWARD, Termination,
};
pub use format::format_board;
pub use lines::{WINNING_LINES, is_winning, legal_positions, pieces_match, winning_line};
pub use results::{Outcome, OutcomeCounts, ResultLog};
