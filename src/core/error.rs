use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FireError {
    #[error("withdrawal rate must be greater than 0% to compute a FI number")]
    ZeroWithdrawalRate,

    #[error("invalid input: {0}")]
    Validation(String),
}
