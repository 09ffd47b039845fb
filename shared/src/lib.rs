pub use {
    alloy::primitives::U256,
    coin::{Coin, DecCoin},
    context::{ExecMode, ExecutionContext},
    decimal::{Dec, ParseDecError},
    gas::{BasicGasMeter, Gas, GasMeter, InfiniteGasMeter, OutOfGas},
    msg::{Msg, MsgHandler},
};

mod coin;
mod context;
mod decimal;
mod gas;
mod msg;
