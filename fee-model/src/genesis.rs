use {
    crate::params::{Params, ParamsError},
    gasfuse_shared::Dec,
    serde::{Deserialize, Serialize},
};

/// The fee model state a chain starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
    pub min_gas_price: Dec,
}

impl Default for GenesisState {
    fn default() -> Self {
        let params = Params::default();
        let min_gas_price = params.model.initial_gas_price;

        Self {
            params,
            min_gas_price,
        }
    }
}

impl GenesisState {
    /// Checks the parameters and that the starting price lies within the band they allow.
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.params.validate()?;

        let floor = self.params.model.min_gas_price_floor();
        let ceiling = self.params.model.max_gas_price();
        if self.min_gas_price < floor || self.min_gas_price > ceiling {
            return Err(ParamsError::MinGasPriceOutOfRange {
                price: self.min_gas_price,
                floor,
                ceiling,
            });
        }

        Ok(())
    }
}
