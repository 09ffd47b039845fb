use gasfuse_shared::{Coin, Gas};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx<M> {
    pub msgs: Vec<M>,
    pub gas_limit: Gas,
    pub fee: Coin,
}

impl<M> Tx<M> {
    pub fn new(msgs: Vec<M>, gas_limit: Gas, fee: Coin) -> Self {
        Self {
            msgs,
            gas_limit,
            fee,
        }
    }
}

/// Result of running every message of a transaction.
///
/// Execution stops at the first failing message. `gas_used` is what the transaction meter
/// counted up to that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome<R, E> {
    pub gas_used: Gas,
    pub result: Result<Vec<R>, E>,
}
