use thiserror::Error;

/// Rejected user input. Raising one never mutates planner state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid item name.")]
    InvalidName,
    #[error("Please enter a valid price greater than zero.")]
    InvalidPrice,
    #[error("Unknown category `{0}` (expected necessities, wants or investment).")]
    InvalidCategory(String),
    #[error("Income must be a non-negative number.")]
    InvalidIncome,
    #[error("Saving percentage must be a whole number between 1 and 100.")]
    InvalidPercentage,
    #[error("Unknown time unit `{0}` (expected day, week, month or year).")]
    InvalidTimeUnit(String),
    #[error("Wallet balance must be a finite number.")]
    InvalidWallet,
}

/// Durable store failures. Always recovered by defaulting or skipping the write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt data: {0}")]
    Corrupt(String),
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Corrupt(err.to_string())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Unavailable(err.to_string())
    }
}
