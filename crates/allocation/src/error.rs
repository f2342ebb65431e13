use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AllocationError {
    #[error("No fund named '{0}' in the allocation table")]
    UnknownFund(String),

    #[error("Bonus for '{fund}' must not be negative, got {amount}")]
    NegativeBonus { fund: String, amount: Decimal },

    #[error("Bonus for '{fund}' would push the allocated total past the representable range")]
    TotalOverflow { fund: String },
}
