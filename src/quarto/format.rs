//! Console rendering of boards

use std::fmt;

use super::board::{Board, CELLS};

const SIDE: usize = 4;
const ATTRIBUTES: u8 = 4;

fn cell_char(board: &Board, pos: usize, bit: u8) -> char {
    match board.get(pos) {
        None => '.',
        Some(piece) if piece.has_attribute(bit) => 'x',
        Some(_) => 'o',
    }
}

/// Render a board as four 4x4 grids, one per attribute bit.
///
/// Empty cells print as `.`, a clear bit as `o` and a set bit as `x`.
///
/// ```
/// use quarto::quarto::{Board, format_board};
///
/// let mut identities = [0u8; 16];
/// for (i, cell) in identities.iter_mut().enumerate() {
///     *cell = i as u8;
/// }
/// let board = Board::from_identities(identities).unwrap();
/// let rendered = format_board(&board);
/// assert_eq!(
///     rendered.lines().next(),
///     Some(". o x o | . o o x | . o o o | . o o o")
/// );
/// ```
pub fn format_board(board: &Board) -> String {
    (0..CELLS / SIDE)
        .map(|row| {
            (0..ATTRIBUTES)
                .map(|bit| {
                    (0..SIDE)
                        .map(|col| cell_char(board, row * SIDE + col, bit).to_string())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_board(self))
    }
}
