//! Congestion-driven minimum gas price.
//!
//! At the end of every block the gas used by the block is folded into two moving averages of
//! block fullness. The larger average picks a point on the price curve, and the resulting price
//! becomes the minimum gas price of the next block.

pub use {
    ema::{CongestionEstimate, calculate_ema, smoothing_factor, usage_fraction},
    error::{Error, Result},
    genesis::GenesisState,
    keeper::Keeper,
    params::{ModelParams, Params, ParamsError},
    price::{MinGasPriceModel, PiecewiseLinearGasPrice},
    store::{InMemoryKvStore, InMemoryTransientStore, KvStore, TransientStore},
    tracker::GasTracker,
};

mod ema;
mod error;
mod genesis;
mod keeper;
mod params;
mod price;
mod store;
mod tracker;
