//! Episode-level rules of the Quarto environment

mod common;

use std::collections::HashSet;

use common::{FORCED_WIN_BOARD, FORCED_WIN_PIECE, ScriptedPolicy, TIE_BOARD, fill_script};
use quarto::quarto::{
    Action, Board, Environment, Outcome, Phase, Piece, Side, Step, TIE_REWARD, Termination,
    encode_state,
};

fn play_script(board: [u8; 16], last: u8) -> (Environment, Vec<Step>) {
    let (learner, opponent) = fill_script(board, last);
    let mut env = Environment::new(Box::new(ScriptedPolicy::new(opponent)));
    let steps = learner
        .into_iter()
        .map(|action| env.step(action).unwrap())
        .collect();
    (env, steps)
}

#[test]
fn full_board_without_line_is_a_tie() {
    let (env, steps) = play_script(TIE_BOARD, 16);

    assert_eq!(steps.len(), 8);
    for step in &steps[..7] {
        assert_eq!(step.reward, 0.0);
        assert!(!step.is_terminal());
    }
    let last = steps[7];
    assert_eq!(last.termination, Some(Termination::Tie));
    assert_eq!(last.reward, TIE_REWARD);
    assert_eq!(last.reward, -1.0);
    assert_eq!(env.result_log().as_slice(), &[Outcome::Tie]);
}

#[test]
fn forced_placement_win_counts_against_the_mover() {
    let (env, steps) = play_script(FORCED_WIN_BOARD, FORCED_WIN_PIECE);

    let last = steps.last().copied().unwrap();
    assert_eq!(last.termination, Some(Termination::ForcedWin(Side::Learner)));
    assert_eq!(last.reward, -1.0);
    assert_eq!(env.result_log().as_slice(), &[Outcome::OpponentWin]);
}

#[test]
fn terminal_step_returns_fresh_board() {
    let (env, steps) = play_script(TIE_BOARD, 16);

    let last = steps.last().copied().unwrap();
    assert_eq!(last.board, Board::new());
    assert_eq!(encode_state(&last.board).value(), 0);
    assert_eq!(env.phase(), Phase::AwaitingLearnerMove);
    assert_eq!(env.selected(), Piece::FIRST);
    assert_eq!(env.available().len(), 15);
}

#[test]
fn half_turns_alternate_between_learner_and_opponent() {
    let mut env = Environment::new(Box::new(ScriptedPolicy::raw(&[(1, 5)])));

    let step = env.step(Action::from_raw(0, 3).unwrap()).unwrap();

    assert!(!step.is_terminal());
    assert_eq!(step.board.get(0), Some(Piece::new(1).unwrap()));
    assert_eq!(step.board.get(1), Some(Piece::new(3).unwrap()));
    assert_eq!(step.board.occupied_count(), 2);
    assert_eq!(env.selected(), Piece::new(5).unwrap());
    assert_eq!(env.phase(), Phase::AwaitingLearnerMove);
    assert!(!env.available().contains(Piece::new(3).unwrap()));
    assert!(!env.available().contains(Piece::new(5).unwrap()));
}

#[test]
fn learner_occupied_cell_forfeits_and_resets() {
    let mut env = Environment::new(Box::new(ScriptedPolicy::raw(&[(1, 5)])));
    env.step(Action::from_raw(0, 3).unwrap()).unwrap();

    let step = env.step(Action::from_raw(1, 7).unwrap()).unwrap();

    assert_eq!(
        step.termination,
        Some(Termination::IllegalPosition(Side::Learner))
    );
    assert_eq!(step.reward, -1.0);
    assert_eq!(step.board, Board::new());
    assert_eq!(env.result_log().as_slice(), &[Outcome::OpponentWin]);
    assert_eq!(env.available().len(), 15);
}

#[test]
fn learner_unavailable_piece_forfeits() {
    let mut env = Environment::new(Box::new(ScriptedPolicy::raw(&[(1, 5)])));
    env.step(Action::from_raw(0, 3).unwrap()).unwrap();

    let step = env.step(Action::from_raw(2, 3).unwrap()).unwrap();

    assert_eq!(step.termination, Some(Termination::IllegalPiece(Side::Learner)));
    assert_eq!(env.result_log().last(), Some(Outcome::OpponentWin));
}

#[test]
fn opponent_forfeit_is_a_learner_win() {
    let mut env = Environment::new(Box::new(ScriptedPolicy::raw(&[(0, 5)])));

    let step = env.step(Action::from_raw(0, 3).unwrap()).unwrap();

    assert_eq!(
        step.termination,
        Some(Termination::IllegalPosition(Side::Opponent))
    );
    assert_eq!(step.reward, 1.0);
    assert_eq!(env.result_log().as_slice(), &[Outcome::LearnerWin]);
}

#[test]
fn episodes_accumulate_in_the_result_log() {
    let (learner, opponent) = fill_script(TIE_BOARD, 16);
    let mut moves = opponent.clone();
    moves.push(Action::from_raw(5, 2).unwrap());
    let mut env = Environment::new(Box::new(ScriptedPolicy::new(moves)));

    for action in learner {
        env.step(action).unwrap();
    }
    // Second episode: the opponent answers on the cell the learner just filled
    let step = env.step(Action::from_raw(5, 4).unwrap()).unwrap();
    assert_eq!(
        step.termination,
        Some(Termination::IllegalPosition(Side::Opponent))
    );
    assert_eq!(
        env.result_log().as_slice(),
        &[Outcome::Tie, Outcome::LearnerWin]
    );
}

#[test]
fn state_addresses_are_injective_on_small_boards() {
    let mut seen = HashSet::new();
    seen.insert(encode_state(&Board::new()));
    for cell in 0..16 {
        for identity in 1..=16 {
            let mut cells = [0; 16];
            cells[cell] = identity;
            let board = Board::from_identities(cells).unwrap();
            assert!(seen.insert(encode_state(&board)), "collision at {cell}/{identity}");
        }
    }
    assert!(seen.insert(encode_state(&Board::from_identities(TIE_BOARD).unwrap())));
    assert!(seen.insert(encode_state(&Board::from_identities(FORCED_WIN_BOARD).unwrap())));
    assert_eq!(seen.len(), 16 * 16 + 3);
}
