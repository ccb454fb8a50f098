use thiserror::Error;

/// Input rejected by the checked change-point entry points
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EdmError {
    #[error("minimum segment width must be at least 1, got {0}")]
    InvalidDelta(usize),

    #[error("series of length {len} is too short for delta {delta} (need at least 2 * delta + 1 samples)")]
    SeriesTooShort { len: usize, delta: usize },

    #[error("sample {index} is not a finite number")]
    NonFiniteSample { index: usize },

    #[error("series has zero range; every sample equals {value}")]
    ConstantSeries { value: f64 },

    #[error("series range {min} to {max} overflows when normalized")]
    RangeOverflow { min: f64, max: f64 },

    #[error("no split point produced a finite statistic")]
    NoFiniteStatistic,
}

/// Result type for checked change-point detection
pub type Result<T> = std::result::Result<T, EdmError>;
