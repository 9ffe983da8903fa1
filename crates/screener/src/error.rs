// In crates/screener/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown screening filter '{0}'")]
    UnknownFilter(String),

    #[error("Storage query failed: {0}")]
    Storage(#[from] database::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
