//! Winning line analysis for Quarto

use super::board::{Board, Piece};

/// Winning line indices on the 4x4 board
pub const WINNING_LINES: [[usize; 4]; 10] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [8, 9, 10, 11],
    [12, 13, 14, 15], // rows
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15], // columns
    [0, 5, 10, 15],
    [3, 6, 9, 12], // diagonals
];

const ALL_ATTRIBUTES: u8 = 0b1111;

/// Four pieces match when some attribute bit is set on all of them or
/// clear on all of them.
pub fn pieces_match(pieces: [Piece; 4]) -> bool {
    let and = pieces.iter().fold(ALL_ATTRIBUTES, |acc, p| acc & p.attributes());
    let or = pieces.iter().fold(0, |acc, p| acc | p.attributes());
    and != 0 || or != ALL_ATTRIBUTES
}

/// The first completed line whose pieces match, if any
pub fn winning_line(board: &Board) -> Option<[usize; 4]> {
    WINNING_LINES.iter().copied().find(|line| {
        let [a, b, c, d] = line.map(|pos| board.get(pos));
        match (a, b, c, d) {
            (Some(a), Some(b), Some(c), Some(d)) => pieces_match([a, b, c, d]),
            _ => false,
        }
    })
}

/// Check whether any of the ten lines is a win
pub fn is_winning(board: &Board) -> bool {
    winning_line(board).is_some()
}

/// Empty cells in ascending order
pub fn legal_positions(board: &Board) -> Vec<usize> {
    board.empty_positions()
}
