use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanbookError {
    #[error("Invalid loan terms ({field}): {reason}")]
    InvalidLoanTerms { field: String, reason: String },

    #[error("Invalid payment: {reason}")]
    InvalidPayment { reason: String },
}
