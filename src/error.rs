use thiserror::Error;

/// Everything that can go wrong while estimating a pitch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Signal length mismatch: expected {expected} samples, got {got}")]
    SignalLength { expected: usize, got: usize },

    #[error("No rising zero crossing found at or after sample {start}")]
    NoCrossingFound { start: usize },

    #[error("Degenerate interpolation at index {index}")]
    DegenerateInterpolation { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
