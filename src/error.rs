use thiserror::Error;

/// Errors raised by the simulator and the move codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Move sequences are consumed in batches of one code per slot
    #[error("invalid move sequence length {len}: not a multiple of 6")]
    MalformedBatch { len: usize },

    #[error("invalid move code {code} at position {position}")]
    InvalidMoveCode { position: usize, code: i32 },

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid move submission '{0}'")]
    InvalidSubmission(String),
}
