use {crate::params::ParamsError, thiserror::Error};

pub type Result<T, E> = std::result::Result<T, Error<E>>;

/// Failure of a fee model operation backed by a store with error type `E`.
#[derive(Debug, Error)]
pub enum Error<E> {
    #[error("Invalid fee model parameters: {0}")]
    InvalidParams(#[from] ParamsError),
    #[error("Fee model storage access failed")]
    Store(#[source] E),
    #[error("Failed to encode or decode the value under {key}")]
    Encoding {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
