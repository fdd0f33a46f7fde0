//! Domain error types.

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("index {index} out of bounds (valid {begin}..={end})")]
    OutOfBounds {
        index: usize,
        begin: usize,
        end: usize,
    },

    #[error("invalid indicator period: {period}")]
    InvalidPeriod { period: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("series must contain at least one bar")]
    EmptySeries,

    #[error("bar at index {index} precedes its predecessor in time")]
    UnorderedBars { index: usize },

    #[error("invalid slicing policy: {reason}")]
    InvalidSlicing { reason: String },

    #[error("trade already has an entry order")]
    AlreadyEntered,

    #[error("trade has no entry order to exit from")]
    NotEntered,

    #[error("trade is closed and immutable")]
    AlreadyClosed,

    #[error("exit index {exit} precedes entry index {entry}")]
    ExitBeforeEntry { entry: usize, exit: usize },

    #[error("bad data: {reason}")]
    DataFormat { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) => 1,
            SigtraderError::Csv(_) | SigtraderError::DataFormat { .. } => 2,
            SigtraderError::EmptySeries
            | SigtraderError::UnorderedBars { .. }
            | SigtraderError::InvalidSlicing { .. } => 3,
            SigtraderError::InvalidPeriod { .. }
            | SigtraderError::OutOfBounds { .. }
            | SigtraderError::DivisionByZero => 4,
            SigtraderError::AlreadyEntered
            | SigtraderError::NotEntered
            | SigtraderError::AlreadyClosed
            | SigtraderError::ExitBeforeEntry { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
