use {
    crate::{
        Application, Dependencies, Error, HandlerError, Response, StoreError, Tx, TxOutcome,
    },
    gasfuse_fee_model::GenesisState,
    gasfuse_shared::{
        BasicGasMeter, DecCoin, ExecMode, ExecutionContext, GasMeter, InfiniteGasMeter,
        MsgHandler,
    },
};

impl<D: Dependencies> Application<D> {
    /// Admission check of a new transaction.
    ///
    /// The fee has to cover the gas limit at the current minimum gas price. Messages are run
    /// against a throwaway meter, nothing is tracked.
    pub fn check_tx(
        &self,
        tx: &Tx<D::Msg>,
    ) -> crate::Result<TxOutcome<Response<D>, HandlerError<D>>, StoreError<D>> {
        self.check_tx_in_mode(tx, ExecMode::Check)
    }

    /// Re-validation of a pending transaction after a block was committed.
    pub fn recheck_tx(
        &self,
        tx: &Tx<D::Msg>,
    ) -> crate::Result<TxOutcome<Response<D>, HandlerError<D>>, StoreError<D>> {
        self.check_tx_in_mode(tx, ExecMode::ReCheck)
    }

    /// Runs `tx` without a gas limit to find out how much gas it needs.
    pub fn simulate_tx(&self, tx: &Tx<D::Msg>) -> TxOutcome<Response<D>, HandlerError<D>> {
        let mut ctx =
            ExecutionContext::new(self.block_height, ExecMode::Simulate, InfiniteGasMeter::new());

        let result = self.execute(&mut ctx, &tx.msgs);

        TxOutcome {
            gas_used: ctx.gas_meter().gas_consumed(),
            result,
        }
    }

    pub fn min_gas_price(&self) -> gasfuse_fee_model::Result<DecCoin, StoreError<D>> {
        self.keeper.get_min_gas_price()
    }

    pub fn export_genesis(&self) -> gasfuse_fee_model::Result<GenesisState, StoreError<D>> {
        self.keeper.export_genesis()
    }

    pub(crate) fn execute(
        &self,
        ctx: &mut ExecutionContext,
        msgs: &[D::Msg],
    ) -> Result<Vec<Response<D>>, HandlerError<D>> {
        msgs.iter().map(|msg| self.router.handle(ctx, msg)).collect()
    }

    fn check_tx_in_mode(
        &self,
        tx: &Tx<D::Msg>,
        mode: ExecMode,
    ) -> crate::Result<TxOutcome<Response<D>, HandlerError<D>>, StoreError<D>> {
        let required = self.keeper.get_min_gas_price()?.fee_for_gas(tx.gas_limit);

        if tx.fee.denom != required.denom || tx.fee.amount < required.amount {
            return Err(Error::InsufficientFee {
                provided: tx.fee.clone(),
                required,
            });
        }

        let mut ctx =
            ExecutionContext::new(self.block_height, mode, BasicGasMeter::new(tx.gas_limit));
        let result = self.execute(&mut ctx, &tx.msgs);

        Ok(TxOutcome {
            gas_used: ctx.gas_meter().gas_consumed(),
            result,
        })
    }
}
