//! Board state representation and the piece pool

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of cells on the 4x4 board
pub const CELLS: usize = 16;

/// Number of distinct pieces (identities 1-16)
pub const PIECE_COUNT: u8 = 16;

/// A Quarto piece, identified by 1-16.
///
/// The four binary attributes of a piece are the bits of `identity - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Piece(u8);

impl Piece {
    /// The piece every episode starts with already selected.
    pub const FIRST: Piece = Piece(1);

    /// Create a piece from its identity (1-16)
    pub fn new(identity: u8) -> Result<Self> {
        if (1..=PIECE_COUNT).contains(&identity) {
            Ok(Piece(identity))
        } else {
            Err(Error::PieceOutOfRange { piece: identity })
        }
    }

    /// Identity in 1-16
    pub fn identity(self) -> u8 {
        self.0
    }

    /// Zero-based attribute bits (0-15)
    pub fn attributes(self) -> u8 {
        self.0 - 1
    }

    /// Whether attribute `bit` (0-3) is set
    pub fn has_attribute(self, bit: u8) -> bool {
        (self.attributes() >> bit) & 1 == 1
    }

    /// All sixteen pieces in identity order
    pub fn all() -> impl Iterator<Item = Piece> {
        (1..=PIECE_COUNT).map(Piece)
    }
}

impl TryFrom<u8> for Piece {
    type Error = Error;

    fn try_from(identity: u8) -> Result<Self> {
        Piece::new(identity)
    }
}

impl From<Piece> for u8 {
    fn from(piece: Piece) -> u8 {
        piece.0
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The 16 cells of a Quarto board, row-major
///
/// This type implements `Copy` since it is 16 bytes wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Piece>; CELLS],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from raw identities where 0 marks an empty cell.
    ///
    /// # Errors
    ///
    /// Returns error if an identity is above 16 or a piece appears twice.
    pub fn from_identities(identities: [u8; CELLS]) -> Result<Self> {
        let mut board = Board::new();
        for (pos, &identity) in identities.iter().enumerate() {
            if identity == 0 {
                continue;
            }
            let piece = Piece::new(identity)?;
            if board.contains(piece) {
                return Err(Error::DuplicatePiece { piece: identity });
            }
            board.cells[pos] = Some(piece);
        }
        Ok(board)
    }

    /// Raw identities with 0 for empty cells
    pub fn identities(&self) -> [u8; CELLS] {
        self.cells.map(|cell| cell.map_or(0, Piece::identity))
    }

    /// Get cell at position (0-15)
    pub fn get(&self, pos: usize) -> Option<Piece> {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos].is_none()
    }

    /// Whether the piece is already on the board
    pub fn contains(&self, piece: Piece) -> bool {
        self.cells.contains(&Some(piece))
    }

    /// Get all empty positions in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Count the number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied_count() == CELLS
    }

    pub fn cells(&self) -> &[Option<Piece>; CELLS] {
        &self.cells
    }

    /// Put a piece on a cell. Legality is checked by the environment.
    pub(crate) fn place(&mut self, pos: usize, piece: Piece) {
        debug_assert!(self.cells[pos].is_none(), "cell {pos} already occupied");
        self.cells[pos] = Some(piece);
    }
}

/// Pieces that are neither on the board nor currently selected
///
/// Keeps insertion order so that random draws and action enumeration are
/// reproducible under a fixed seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailablePieces {
    pieces: Vec<Piece>,
}

impl AvailablePieces {
    /// The pool at episode start: pieces 2-16 (piece 1 is pre-selected)
    pub fn initial() -> Self {
        Self {
            pieces: Piece::all().filter(|&p| p != Piece::FIRST).collect(),
        }
    }

    pub fn contains(&self, piece: Piece) -> bool {
        self.pieces.contains(&piece)
    }

    /// Remove a piece, returning whether it was present
    pub(crate) fn remove(&mut self, piece: Piece) -> bool {
        match self.pieces.iter().position(|&p| p == piece) {
            Some(idx) => {
                self.pieces.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn as_slice(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn iter(&self) -> impl Iterator<Item = Piece> + '_ {
        self.pieces.iter().copied()
    }
}

impl Default for AvailablePieces {
    fn default() -> Self {
        Self::initial()
    }
}
