//! Error types for booking-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid selection: expected at most 2 dates, got {0}")]
    InvalidSelection(usize),

    #[error("Snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BookingError>;
