//! Error types for the tic-tac-toe engine and experiment harness.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("position {position} is already occupied")]
    OccupiedPosition { position: usize },

    #[error("board text must describe 9 cells, got {got} in '{context}'")]
    InvalidBoardLength { got: usize, context: String },

    #[error("invalid character '{character}' in board text '{context}'")]
    InvalidCellCharacter { character: char, context: String },

    #[error("invalid marker '{input}' (expected 'X' or 'O')")]
    InvalidMarker { input: String },

    #[error("both players use marker {marker}")]
    SameMarker { marker: char },

    #[error("no positions are available on the board")]
    NoAvailablePositions,

    #[error("input source closed before a valid position was entered")]
    InputClosed,

    #[error("probability {value} must lie within [0, 1]")]
    InvalidProbability { value: f64 },

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

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience type alias for Results using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}
