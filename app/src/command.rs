use {
    crate::{Application, Dependencies, HandlerError, Response, StoreError, Tx, TxOutcome},
    gasfuse_fee_model::GenesisState,
    gasfuse_shared::{
        BasicGasMeter, DecCoin, ExecMode, ExecutionContext, GasMeter, InfiniteGasMeter,
    },
};

impl<D: Dependencies> Application<D> {
    pub fn init_chain(
        &mut self,
        genesis: GenesisState,
    ) -> gasfuse_fee_model::Result<(), StoreError<D>> {
        self.keeper.init_genesis(genesis)
    }

    /// Moves on to the block at `height`. Gas tracked for earlier blocks no longer counts.
    pub fn begin_block(&mut self, height: u64) {
        self.block_height = height;

        tracing::debug!(height, "Block started");
    }

    /// Executes `tx` as part of the current block.
    ///
    /// Whatever the transaction meter consumed counts towards block congestion, also when a
    /// message fails.
    pub fn deliver_tx(&mut self, tx: &Tx<D::Msg>) -> TxOutcome<Response<D>, HandlerError<D>> {
        let mut ctx = ExecutionContext::new(
            self.block_height,
            ExecMode::Deliver,
            BasicGasMeter::new(tx.gas_limit),
        );

        let result = self.execute(&mut ctx, &tx.msgs);
        let gas_used = ctx.gas_meter().gas_consumed();
        self.keeper.track_gas(&ctx, gas_used);

        TxOutcome { gas_used, result }
    }

    /// Closes the current block and returns the minimum gas price of the next one.
    pub fn end_block(&mut self) -> gasfuse_fee_model::Result<DecCoin, StoreError<D>> {
        let ctx = ExecutionContext::new(
            self.block_height,
            ExecMode::Deliver,
            InfiniteGasMeter::new(),
        );

        self.keeper.end_block(&ctx)
    }
}
