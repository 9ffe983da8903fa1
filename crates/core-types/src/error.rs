// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Price history mixes instruments: expected {expected}, found {found}")]
    MixedHistory { expected: String, found: String },

    #[error("Invalid trade date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
