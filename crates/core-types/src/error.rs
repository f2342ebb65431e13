use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Date arithmetic out of range: {0}")]
    DateOutOfRange(String),
}
