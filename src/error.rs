//! Error types for the Quarto crate

use thiserror::Error;

/// Main error type for the Quarto crate
///
/// Illegal moves are not represented here: the environment resolves them as
/// a forfeit recorded in the result log.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("action address {address} is out of range (must be 0-255)")]
    ActionOutOfRange { address: usize },

    #[error("position {position} is out of bounds (must be 0-15)")]
    PositionOutOfRange { position: usize },

    #[error("piece {piece} is out of range (must be 1-16)")]
    PieceOutOfRange { piece: u8 },

    #[error("piece {piece} appears more than once on the board")]
    DuplicatePiece { piece: u8 },

    #[error("outcome value {value} is not one of -1, 0 or 1")]
    InvalidOutcome { value: i8 },

    #[error("no legal (position, piece) pair is available")]
    NoLegalActions,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
