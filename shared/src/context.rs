use crate::{Gas, GasMeter, OutOfGas};

/// The phase of transaction processing an execution belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecMode {
    /// Admission check of a new transaction before it enters the mempool.
    Check,
    /// Re-validation of a mempool transaction after a block was committed.
    ReCheck,
    /// Gas estimation that never commits.
    Simulate,
    /// Execution of a transaction included in a block.
    Deliver,
}

impl ExecMode {
    /// Whether the execution is the real one whose effects end up in a block.
    ///
    /// All other modes are speculative and can run any number of times for the same
    /// transaction.
    pub fn is_deliver(self) -> bool {
        matches!(self, Self::Deliver)
    }
}

/// State of a single message execution that is threaded through handlers.
///
/// The context owns the gas meter the handlers charge. Whoever holds `&mut ExecutionContext`
/// can temporarily swap a different meter in using [`Self::with_gas_meter`].
#[derive(Debug)]
pub struct ExecutionContext {
    block_height: u64,
    mode: ExecMode,
    gas_meter: Box<dyn GasMeter>,
}

impl ExecutionContext {
    pub fn new(block_height: u64, mode: ExecMode, gas_meter: impl GasMeter + 'static) -> Self {
        Self {
            block_height,
            mode,
            gas_meter: Box::new(gas_meter),
        }
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    pub fn mode(&self) -> ExecMode {
        self.mode
    }

    pub fn gas_meter(&self) -> &dyn GasMeter {
        self.gas_meter.as_ref()
    }

    pub fn consume_gas(&mut self, amount: Gas, descriptor: &str) -> Result<(), OutOfGas> {
        self.gas_meter.consume_gas(amount, descriptor)
    }

    /// Runs `f` with `gas_meter` in place of the current meter.
    ///
    /// The original meter is put back once `f` returns or unwinds, and the substituted meter is
    /// handed back to the caller together with the result of `f`.
    pub fn with_gas_meter<R>(
        &mut self,
        mut gas_meter: Box<dyn GasMeter>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> (R, Box<dyn GasMeter>) {
        std::mem::swap(&mut self.gas_meter, &mut gas_meter);

        let mut guard = SwapBackGasMeter {
            ctx: self,
            gas_meter: &mut gas_meter,
        };
        let result = f(&mut *guard.ctx);
        drop(guard);

        (result, gas_meter)
    }
}

/// Swaps the meter held aside back into the context when dropped.
struct SwapBackGasMeter<'a> {
    ctx: &'a mut ExecutionContext,
    gas_meter: &'a mut Box<dyn GasMeter>,
}

impl Drop for SwapBackGasMeter<'_> {
    fn drop(&mut self) {
        std::mem::swap(&mut self.ctx.gas_meter, self.gas_meter);
    }
}
