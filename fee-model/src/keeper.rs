use {
    crate::{
        ema::CongestionEstimate,
        error::{Error, Result},
        genesis::GenesisState,
        params::Params,
        price::{MinGasPriceModel, PiecewiseLinearGasPrice},
        store::{KvStore, TransientStore},
        tracker::GasTracker,
    },
    gasfuse_shared::{Dec, DecCoin, ExecutionContext, Gas},
    serde::{Serialize, de::DeserializeOwned},
};

const SHORT_EMA_GAS_KEY: &str = "short_ema_gas";
const LONG_EMA_GAS_KEY: &str = "long_ema_gas";
const MIN_GAS_PRICE_KEY: &str = "min_gas_price";
const PARAMS_KEY: &str = "params";

/// Owns the fee model state and moves it forward block by block.
///
/// Durable values live in `S` encoded as JSON, the per-block gas total lives in `T`.
#[derive(Debug)]
pub struct Keeper<S, T, P = PiecewiseLinearGasPrice> {
    store: S,
    tracker: GasTracker<T>,
    price_model: P,
    denom: String,
}

impl<S: KvStore, T: TransientStore> Keeper<S, T> {
    pub fn new(store: S, transient_store: T, denom: impl Into<String>) -> Self {
        Self::with_price_model(store, transient_store, denom, PiecewiseLinearGasPrice)
    }
}

impl<S: KvStore, T: TransientStore, P: MinGasPriceModel> Keeper<S, T, P> {
    pub fn with_price_model(
        store: S,
        transient_store: T,
        denom: impl Into<String>,
        price_model: P,
    ) -> Self {
        Self {
            store,
            tracker: GasTracker::new(transient_store),
            price_model,
            denom: denom.into(),
        }
    }

    /// The denomination minimum gas prices are quoted in.
    pub fn denom(&self) -> &str {
        &self.denom
    }

    pub fn track_gas(&mut self, ctx: &ExecutionContext, amount: Gas) {
        self.tracker.track_gas(ctx, amount);
    }

    pub fn tracked_gas(&self, ctx: &ExecutionContext) -> Gas {
        self.tracker.tracked_gas(ctx)
    }

    pub fn get_short_ema_gas(&self) -> Result<Dec, S::Err> {
        Ok(self.read(SHORT_EMA_GAS_KEY)?.unwrap_or_default())
    }

    pub fn set_short_ema_gas(&mut self, value: Dec) -> Result<(), S::Err> {
        self.write(SHORT_EMA_GAS_KEY, &value)
    }

    pub fn get_long_ema_gas(&self) -> Result<Dec, S::Err> {
        Ok(self.read(LONG_EMA_GAS_KEY)?.unwrap_or_default())
    }

    pub fn set_long_ema_gas(&mut self, value: Dec) -> Result<(), S::Err> {
        self.write(LONG_EMA_GAS_KEY, &value)
    }

    /// The minimum gas price in effect for the current block.
    ///
    /// Until the first block has ended this is the initial gas price of the stored parameters.
    pub fn get_min_gas_price(&self) -> Result<DecCoin, S::Err> {
        match self.read(MIN_GAS_PRICE_KEY)? {
            Some(price) => Ok(price),
            None => Ok(DecCoin::new(
                self.denom.as_str(),
                self.get_params()?.model.initial_gas_price,
            )),
        }
    }

    pub fn set_min_gas_price(&mut self, price: DecCoin) -> Result<(), S::Err> {
        self.write(MIN_GAS_PRICE_KEY, &price)
    }

    pub fn get_params(&self) -> Result<Params, S::Err> {
        Ok(self.read(PARAMS_KEY)?.unwrap_or_default())
    }

    /// Replaces the parameters. Invalid parameters are rejected and the stored ones stay.
    pub fn set_params(&mut self, params: Params) -> Result<(), S::Err> {
        params.validate()?;
        self.write(PARAMS_KEY, &params)?;

        tracing::debug!(?params, "Fee model parameters updated");

        Ok(())
    }

    /// Feeds the gas used by a block into both moving averages and persists them.
    pub fn update_emas(&mut self, gas_used: Gas) -> Result<CongestionEstimate, S::Err> {
        let params = self.get_params()?;
        let estimate = CongestionEstimate::new(self.get_short_ema_gas()?, self.get_long_ema_gas()?)
            .update(gas_used, &params.model);

        self.set_short_ema_gas(estimate.short)?;
        self.set_long_ema_gas(estimate.long)?;

        Ok(estimate)
    }

    /// Closes the block of `ctx` and sets the minimum gas price for the next one.
    pub fn end_block(&mut self, ctx: &ExecutionContext) -> Result<DecCoin, S::Err> {
        let gas_used = self.tracked_gas(ctx);
        let estimate = self.update_emas(gas_used)?;
        let params = self.get_params()?;
        let amount =
            self.price_model
                .compute_min_gas_price(estimate.short, estimate.long, &params.model);
        let price = DecCoin::new(self.denom.as_str(), amount);

        self.set_min_gas_price(price.clone())?;

        tracing::debug!(
            block_height = ctx.block_height(),
            gas_used,
            short_ema = %estimate.short,
            long_ema = %estimate.long,
            min_gas_price = %price,
            "Minimum gas price updated"
        );

        Ok(price)
    }

    /// Stores the genesis state. Nothing is written unless all of it is valid.
    pub fn init_genesis(&mut self, genesis: GenesisState) -> Result<(), S::Err> {
        genesis.validate()?;
        self.set_params(genesis.params)?;
        self.set_min_gas_price(DecCoin::new(self.denom.as_str(), genesis.min_gas_price))
    }

    pub fn export_genesis(&self) -> Result<GenesisState, S::Err> {
        Ok(GenesisState {
            params: self.get_params()?,
            min_gas_price: self.get_min_gas_price()?.amount,
        })
    }

    fn read<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, S::Err> {
        self.store
            .get(key.as_bytes())
            .map_err(Error::Store)?
            .map(|bytes| {
                serde_json::from_slice(&bytes).map_err(|source| Error::Encoding {
                    key: key.into(),
                    source,
                })
            })
            .transpose()
    }

    fn write<V: Serialize>(&mut self, key: &str, value: &V) -> Result<(), S::Err> {
        let bytes = serde_json::to_vec(value).map_err(|source| Error::Encoding {
            key: key.into(),
            source,
        })?;

        self.store.set(key.as_bytes(), &bytes).map_err(Error::Store)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            params::{ModelParams, ParamsError},
            store::{InMemoryKvStore, InMemoryTransientStore},
        },
        gasfuse_shared::{ExecMode, InfiniteGasMeter},
    };

    type TestKeeper = Keeper<InMemoryKvStore, InMemoryTransientStore>;

    fn setup() -> (ExecutionContext, TestKeeper) {
        let ctx = ExecutionContext::new(1, ExecMode::Deliver, InfiniteGasMeter::new());
        let keeper = Keeper::new(InMemoryKvStore::new(), InMemoryTransientStore::new(), "coin");

        (ctx, keeper)
    }

    fn dec(s: &str) -> Dec {
        s.parse().unwrap()
    }

    #[test]
    fn test_track_gas() {
        let (ctx, mut keeper) = setup();

        assert_eq!(keeper.tracked_gas(&ctx), 0);

        keeper.track_gas(&ctx, 10);
        assert_eq!(keeper.tracked_gas(&ctx), 10);

        keeper.track_gas(&ctx, 5);
        assert_eq!(keeper.tracked_gas(&ctx), 15);
    }

    #[test]
    fn test_short_ema_gas() {
        let (_, mut keeper) = setup();

        assert_eq!(keeper.get_short_ema_gas().unwrap(), Dec::ZERO);

        keeper.set_short_ema_gas(dec("0.1")).unwrap();
        assert_eq!(keeper.get_short_ema_gas().unwrap(), dec("0.1"));
    }

    #[test]
    fn test_long_ema_gas() {
        let (_, mut keeper) = setup();

        assert_eq!(keeper.get_long_ema_gas().unwrap(), Dec::ZERO);

        keeper.set_long_ema_gas(dec("0.1")).unwrap();
        assert_eq!(keeper.get_long_ema_gas().unwrap(), dec("0.1"));
    }

    #[test]
    fn test_min_gas_price() {
        let (_, mut keeper) = setup();

        keeper
            .set_min_gas_price(DecCoin::from_u64("coin", 10))
            .unwrap();
        let min_gas_price = keeper.get_min_gas_price().unwrap();
        assert_eq!(min_gas_price.amount.to_string(), "10.000000000000000000");
        assert_eq!(min_gas_price.denom, "coin");

        keeper
            .set_min_gas_price(DecCoin::from_u64("coin", 20))
            .unwrap();
        let min_gas_price = keeper.get_min_gas_price().unwrap();
        assert_eq!(min_gas_price.amount.to_string(), "20.000000000000000000");
        assert_eq!(min_gas_price.denom, "coin");
    }

    #[test]
    fn test_min_gas_price_defaults_to_initial_price() {
        let (_, keeper) = setup();

        let actual = keeper.get_min_gas_price().unwrap();

        assert_eq!(actual, DecCoin::new("coin", dec("0.0625")));
    }

    #[test]
    fn test_params() {
        let (_, mut keeper) = setup();
        let params = Params {
            model: ModelParams {
                max_block_gas: 1_000_000,
                short_ema_block_length: 5,
                ..Default::default()
            },
        };

        keeper.set_params(params.clone()).unwrap();

        assert_eq!(keeper.get_params().unwrap(), params);
    }

    #[test]
    fn test_invalid_params_leave_stored_params_untouched() {
        let (_, mut keeper) = setup();
        let valid = Params::default();
        keeper.set_params(valid.clone()).unwrap();
        let invalid = Params {
            model: ModelParams {
                max_discount: Dec::ONE,
                ..Default::default()
            },
        };

        let actual = keeper.set_params(invalid).unwrap_err();

        assert!(matches!(
            actual,
            Error::InvalidParams(ParamsError::MaxDiscountOutOfRange(_))
        ));
        assert_eq!(keeper.get_params().unwrap(), valid);
    }

    #[test]
    fn test_end_block_without_load_discounts_price() {
        let (ctx, mut keeper) = setup();

        let actual = keeper.end_block(&ctx).unwrap();

        assert_eq!(actual, DecCoin::new("coin", dec("0.03125")));
        assert_eq!(keeper.get_min_gas_price().unwrap(), actual);
    }

    #[test]
    fn test_end_block_with_full_block_raises_price() {
        let (ctx, mut keeper) = setup();
        let model = ModelParams::default();
        keeper.track_gas(&ctx, model.max_block_gas);

        let actual = keeper.end_block(&ctx).unwrap();

        // The short average jumps to 2/11 of a full block.
        let short = keeper.get_short_ema_gas().unwrap();
        assert_eq!(short, Dec::from_ratio(2, 11).unwrap());
        assert!(keeper.get_long_ema_gas().unwrap() < short);
        assert!(actual.amount > model.min_gas_price_floor());
        assert!(actual.amount < model.initial_gas_price);
    }

    #[test]
    fn test_sustained_full_blocks_reach_ceiling_region() {
        let (_, mut keeper) = setup();
        let model = ModelParams::default();
        let mut price = DecCoin::new("coin", Dec::ZERO);

        for height in 1..=50 {
            let ctx = ExecutionContext::new(height, ExecMode::Deliver, InfiniteGasMeter::new());
            keeper.track_gas(&ctx, model.max_block_gas);
            let next = keeper.end_block(&ctx).unwrap();
            assert!(next.amount >= price.amount);
            price = next;
        }

        assert!(price.amount > model.initial_gas_price);
        assert!(price.amount <= model.max_gas_price());
    }

    #[test]
    fn test_genesis_round_trip() {
        let (_, mut keeper) = setup();
        let genesis = GenesisState {
            params: Params::default(),
            min_gas_price: dec("0.5"),
        };

        keeper.init_genesis(genesis.clone()).unwrap();

        assert_eq!(keeper.export_genesis().unwrap(), genesis);
        assert_eq!(
            keeper.get_min_gas_price().unwrap(),
            DecCoin::new("coin", dec("0.5"))
        );
    }

    #[test]
    fn test_invalid_genesis_is_rejected() {
        let (_, mut keeper) = setup();
        let genesis = GenesisState {
            params: Params {
                model: ModelParams {
                    max_block_gas: 0,
                    ..Default::default()
                },
            },
            min_gas_price: dec("0.5"),
        };

        let actual = keeper.init_genesis(genesis);

        assert!(matches!(
            actual,
            Err(Error::InvalidParams(ParamsError::ZeroMaxBlockGas))
        ));
        assert_eq!(keeper.export_genesis().unwrap(), GenesisState::default());
    }

    #[test]
    fn test_genesis_price_outside_band_writes_nothing() {
        let (_, mut keeper) = setup();
        let params = Params {
            model: ModelParams {
                max_block_gas: 1_000,
                ..Default::default()
            },
        };
        let genesis = GenesisState {
            params,
            min_gas_price: dec("100"),
        };

        let actual = keeper.init_genesis(genesis);

        assert!(matches!(
            actual,
            Err(Error::InvalidParams(ParamsError::MinGasPriceOutOfRange { .. }))
        ));
        assert_eq!(keeper.get_params().unwrap(), Params::default());
        assert_eq!(keeper.export_genesis().unwrap(), GenesisState::default());
    }
}
