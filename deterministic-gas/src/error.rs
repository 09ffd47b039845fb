use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Unsupported message type for deterministic gas: {0}")]
    UnsupportedMessage(String),
}
