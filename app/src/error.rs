use {gasfuse_shared::Coin, thiserror::Error};

pub type Result<T, E> = std::result::Result<T, Error<E>>;

#[derive(Debug, Error)]
pub enum Error<E> {
    #[error(transparent)]
    FeeModel(#[from] gasfuse_fee_model::Error<E>),
    #[error("Insufficient fee: got {provided}, required {required}")]
    InsufficientFee { provided: Coin, required: Coin },
}
