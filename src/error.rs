use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("audio unavailable: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, Error>;
