use {
    crate::{Dec, Gas},
    alloy::primitives::U256,
    serde::{Deserialize, Serialize},
    std::fmt::{self, Display, Formatter},
};

/// An integer amount of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: U256,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: U256) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A decimal amount of a token, used for prices quoted per unit of gas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecCoin {
    pub denom: String,
    pub amount: Dec,
}

impl DecCoin {
    pub fn new(denom: impl Into<String>, amount: Dec) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn from_u64(denom: impl Into<String>, amount: u64) -> Self {
        Self::new(denom, Dec::from_u64(amount))
    }

    /// Calculates the fee for `gas` units when this coin is the price of a single unit.
    ///
    /// Any fractional remainder is rounded up so that the fee never falls below the price.
    pub fn fee_for_gas(&self, gas: Gas) -> Coin {
        Coin::new(
            self.denom.clone(),
            self.amount.saturating_mul_u64(gas).ceil(),
        )
    }
}

impl Display for DecCoin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
