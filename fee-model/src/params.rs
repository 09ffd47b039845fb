//! Governance-controlled parameters of the fee model.

use {
    gasfuse_shared::{Dec, Gas, U256},
    serde::{Deserialize, Serialize},
    thiserror::Error,
};

/// 0.0625
const DEFAULT_INITIAL_GAS_PRICE: Dec =
    Dec::from_raw(U256::from_limbs([62_500_000_000_000_000, 0, 0, 0]));
/// 0.5
const DEFAULT_MAX_DISCOUNT: Dec =
    Dec::from_raw(U256::from_limbs([500_000_000_000_000_000, 0, 0, 0]));
/// 0.8
const DEFAULT_ESCALATION_START_FRACTION: Dec =
    Dec::from_raw(U256::from_limbs([800_000_000_000_000_000, 0, 0, 0]));
const DEFAULT_MAX_GAS_PRICE_MULTIPLIER: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Params {
    pub model: ModelParams,
}

impl Params {
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.model.validate()
    }
}

/// Shape of the price curve and of the congestion estimate feeding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelParams {
    /// The price charged per unit of gas when congestion sits exactly at
    /// [`Self::escalation_start_fraction`].
    pub initial_gas_price: Dec,
    /// Ratio of the highest possible price to [`Self::initial_gas_price`], reached at full
    /// blocks. At least 1.
    pub max_gas_price_multiplier: Dec,
    /// Fraction of [`Self::initial_gas_price`] taken off when blocks are empty. Below 1.
    pub max_discount: Dec,
    /// Congestion above which the price starts rising over [`Self::initial_gas_price`].
    pub escalation_start_fraction: Dec,
    /// Gas capacity of a block, the amount that counts as full congestion.
    pub max_block_gas: Gas,
    /// Window of the reactive moving average, in blocks.
    pub short_ema_block_length: u32,
    /// Window of the stable moving average, in blocks.
    pub long_ema_block_length: u32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            initial_gas_price: DEFAULT_INITIAL_GAS_PRICE,
            max_gas_price_multiplier: Dec::from_u64(DEFAULT_MAX_GAS_PRICE_MULTIPLIER),
            max_discount: DEFAULT_MAX_DISCOUNT,
            escalation_start_fraction: DEFAULT_ESCALATION_START_FRACTION,
            max_block_gas: 50_000_000,
            short_ema_block_length: 10,
            long_ema_block_length: 1_000,
        }
    }
}

impl ModelParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_discount >= Dec::ONE {
            return Err(ParamsError::MaxDiscountOutOfRange(self.max_discount));
        }
        if self.max_gas_price_multiplier < Dec::ONE {
            return Err(ParamsError::MaxGasPriceMultiplierBelowOne(
                self.max_gas_price_multiplier,
            ));
        }
        if self.escalation_start_fraction.is_zero() || self.escalation_start_fraction > Dec::ONE {
            return Err(ParamsError::EscalationStartFractionOutOfRange(
                self.escalation_start_fraction,
            ));
        }
        if self.max_block_gas == 0 {
            return Err(ParamsError::ZeroMaxBlockGas);
        }
        if self.short_ema_block_length == 0 {
            return Err(ParamsError::ZeroShortEmaBlockLength);
        }
        if self.long_ema_block_length == 0 {
            return Err(ParamsError::ZeroLongEmaBlockLength);
        }

        Ok(())
    }

    /// The price at zero congestion: `initial_gas_price * (1 - max_discount)`.
    pub fn min_gas_price_floor(&self) -> Dec {
        self.initial_gas_price
            .saturating_mul(Dec::ONE.saturating_sub(self.max_discount))
    }

    /// The price at full congestion: `initial_gas_price * max_gas_price_multiplier`.
    pub fn max_gas_price(&self) -> Dec {
        self.initial_gas_price
            .saturating_mul(self.max_gas_price_multiplier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("max_discount must be below 1, got {0}")]
    MaxDiscountOutOfRange(Dec),
    #[error("max_gas_price_multiplier must be at least 1, got {0}")]
    MaxGasPriceMultiplierBelowOne(Dec),
    #[error("escalation_start_fraction must be in (0, 1], got {0}")]
    EscalationStartFractionOutOfRange(Dec),
    #[error("max_block_gas must be positive")]
    ZeroMaxBlockGas,
    #[error("short_ema_block_length must be positive")]
    ZeroShortEmaBlockLength,
    #[error("long_ema_block_length must be positive")]
    ZeroLongEmaBlockLength,
    #[error("min_gas_price must be in [{floor}, {ceiling}], got {price}")]
    MinGasPriceOutOfRange { price: Dec, floor: Dec, ceiling: Dec },
}
