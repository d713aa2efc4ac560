//! Integer addressing of board states and actions
//!
//! A board is read as a 16-digit base-17 number (digit `i` is the identity in
//! cell `i`, 0 when empty). An action `(position, piece)` maps to
//! `position * 16 + (piece - 1)`, giving 256 action addresses.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, CELLS, PIECE_COUNT, Piece};
use crate::{Error, Result};

const BASE: u128 = PIECE_COUNT as u128 + 1;

/// Number of distinct state addresses (17^16)
pub const STATE_SPACE: u128 = BASE.pow(CELLS as u32);

/// Number of distinct action addresses
pub const ACTION_SPACE: usize = CELLS * PIECE_COUNT as usize;

/// Integer address of a board configuration
///
/// 17^16 exceeds `u64::MAX`, hence the 128-bit representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateAddress(u128);

impl StateAddress {
    pub fn value(self) -> u128 {
        self.0
    }

    /// Split into (high, low) 64-bit words for formats without 128-bit integers
    pub fn to_parts(self) -> [u64; 2] {
        [(self.0 >> 64) as u64, self.0 as u64]
    }

    pub fn from_parts(parts: [u64; 2]) -> Self {
        StateAddress((u128::from(parts[0]) << 64) | u128::from(parts[1]))
    }
}

impl fmt::Display for StateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer address of a `(position, piece)` action, 0-255
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionAddress(u8);

impl ActionAddress {
    /// Validate a raw address
    pub fn new(address: usize) -> Result<Self> {
        u8::try_from(address)
            .map(ActionAddress)
            .map_err(|_| Error::ActionOutOfRange { address })
    }

    pub fn value(self) -> usize {
        usize::from(self.0)
    }
}

/// A move: place the selected piece on `position`, then hand `piece` to the
/// other side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub position: usize,
    pub piece: Piece,
}

impl Action {
    /// # Errors
    ///
    /// Returns error if `position` is not in 0-15.
    pub fn new(position: usize, piece: Piece) -> Result<Self> {
        if position >= CELLS {
            return Err(Error::PositionOutOfRange { position });
        }
        Ok(Self { position, piece })
    }

    /// Build from raw values, validating both halves
    pub fn from_raw(position: usize, piece: u8) -> Result<Self> {
        Self::new(position, Piece::new(piece)?)
    }

    pub fn address(self) -> ActionAddress {
        encode_action(self)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.position, self.piece)
    }
}

/// Encode a board as its base-17 state address
pub fn encode_state(board: &Board) -> StateAddress {
    let address = board
        .identities()
        .iter()
        .rev()
        .fold(0u128, |acc, &digit| acc * BASE + u128::from(digit));
    StateAddress(address)
}

/// Encode an action as `position * 16 + (piece - 1)`
pub fn encode_action(action: Action) -> ActionAddress {
    let raw = action.position * PIECE_COUNT as usize + usize::from(action.piece.attributes());
    debug_assert!(raw < ACTION_SPACE);
    ActionAddress(raw as u8)
}

/// Inverse of [`encode_action`].
///
/// # Errors
///
/// Returns [`Error::ActionOutOfRange`] when `address` is outside 0-255.
pub fn decode_action(address: usize) -> Result<Action> {
    if address >= ACTION_SPACE {
        return Err(Error::ActionOutOfRange { address });
    }
    let position = address / PIECE_COUNT as usize;
    let piece = Piece::new((address % PIECE_COUNT as usize) as u8 + 1)?;
    Ok(Action { position, piece })
}
