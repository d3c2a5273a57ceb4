pub mod allocation;
pub mod error;
pub mod schedule;
pub mod types;

pub use error::LoanbookError;
pub use types::*;

/// Standard result type for all loanbook operations
pub type LoanbookResult<T> = Result<T, LoanbookError>;
