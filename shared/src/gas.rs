use {std::fmt::Debug, thiserror::Error};

/// Amount of gas units.
pub type Gas = u64;

/// The error of charging more gas than a meter has left.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Out of gas in {descriptor}: limit={limit} consumed={consumed} requested={requested}")]
pub struct OutOfGas {
    pub descriptor: String,
    pub limit: Gas,
    pub consumed: Gas,
    pub requested: Gas,
}

/// Counts gas consumed by an execution against a limit.
pub trait GasMeter: Debug {
    /// Total gas charged so far.
    fn gas_consumed(&self) -> Gas;

    /// Upper bound for [`Self::gas_consumed`].
    fn limit(&self) -> Gas;

    fn gas_remaining(&self) -> Gas {
        self.limit().saturating_sub(self.gas_consumed())
    }

    /// Charges `amount` of gas, labeling the charge with `descriptor`.
    ///
    /// A charge beyond the limit fails and leaves the meter exhausted, so the work attempted
    /// still shows up in [`Self::gas_consumed`].
    fn consume_gas(&mut self, amount: Gas, descriptor: &str) -> Result<(), OutOfGas>;
}

/// A gas meter that refuses to go beyond its limit.
///
/// A failed charge consumes the meter up to its limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicGasMeter {
    limit: Gas,
    consumed: Gas,
}

impl BasicGasMeter {
    pub fn new(limit: Gas) -> Self {
        Self { limit, consumed: 0 }
    }
}

impl GasMeter for BasicGasMeter {
    fn gas_consumed(&self) -> Gas {
        self.consumed
    }

    fn limit(&self) -> Gas {
        self.limit
    }

    fn consume_gas(&mut self, amount: Gas, descriptor: &str) -> Result<(), OutOfGas> {
        match self.consumed.checked_add(amount) {
            Some(consumed) if consumed <= self.limit => {
                self.consumed = consumed;
                Ok(())
            }
            _ => {
                let error = OutOfGas {
                    descriptor: descriptor.into(),
                    limit: self.limit,
                    consumed: self.consumed,
                    requested: amount,
                };
                self.consumed = self.limit;

                Err(error)
            }
        }
    }
}

/// A gas meter without a limit, used where gas is only measured, e.g. for simulations.
///
/// The count saturates at [`Gas::MAX`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfiniteGasMeter {
    consumed: Gas,
}

impl InfiniteGasMeter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GasMeter for InfiniteGasMeter {
    fn gas_consumed(&self) -> Gas {
        self.consumed
    }

    fn limit(&self) -> Gas {
        Gas::MAX
    }

    fn consume_gas(&mut self, amount: Gas, _descriptor: &str) -> Result<(), OutOfGas> {
        self.consumed = self.consumed.saturating_add(amount);
        Ok(())
    }
}
