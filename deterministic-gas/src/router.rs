use {
    crate::{
        config::DeterministicGasConfig,
        metrics::{DETERMINISTIC_GAS_FACTOR, Label, MSG_NAME_LABEL, MetricsSink, NoopMetricsSink},
    },
    gasfuse_shared::{BasicGasMeter, ExecutionContext, Gas, GasMeter, Msg, MsgHandler},
    std::sync::Arc,
};

/// How many times its billed gas a deterministic message handler may consume before it is
/// stopped.
pub const FUSE_GAS_MULTIPLIER: Gas = 5;

/// Wraps a message handler to bill registered message types a deterministic amount of gas.
///
/// For a registered type the transaction meter is charged the required gas plus the fixed gas
/// up front. The wrapped handler then runs against a fresh meter limited to
/// [`FUSE_GAS_MULTIPLIER`] times the required gas, so what it actually consumes never reaches
/// the transaction meter. Unregistered types are passed straight through.
///
/// After a successful delivery the ratio of consumed to required gas is reported to the metrics
/// sink, which shows how far the registered requirements drift from reality.
#[derive(Debug)]
pub struct DeterministicGasRouter<H, S = NoopMetricsSink> {
    base: H,
    config: Arc<DeterministicGasConfig>,
    metrics: S,
}

impl<H, S> DeterministicGasRouter<H, S> {
    pub fn new(base: H, config: Arc<DeterministicGasConfig>, metrics: S) -> Self {
        Self {
            base,
            config,
            metrics,
        }
    }

    pub fn config(&self) -> &DeterministicGasConfig {
        &self.config
    }
}

impl<H, S: MetricsSink> DeterministicGasRouter<H, S> {
    fn report_gas_factor(&self, msg: &impl Msg, gas_required: Gas, gas_consumed: Gas) {
        if gas_required == 0 {
            return;
        }

        let factor = gas_consumed as f64 / gas_required as f64;

        self.metrics.add_sample(
            DETERMINISTIC_GAS_FACTOR,
            factor,
            &[Label::new(MSG_NAME_LABEL, msg.name())],
        );
    }
}

impl<M, H, S> MsgHandler<M> for DeterministicGasRouter<H, S>
where
    M: Msg,
    H: MsgHandler<M>,
    S: MetricsSink,
{
    type Response = H::Response;
    type Error = H::Error;

    fn handle(&self, ctx: &mut ExecutionContext, msg: &M) -> Result<Self::Response, Self::Error> {
        let Some(gas_required) = self.config.gas_required_by_message(msg) else {
            return self.base.handle(ctx, msg);
        };

        let charge = gas_required.saturating_add(self.config.fixed_gas());
        let descriptor = format!(
            "DeterministicGas (gas required: {gas_required}, message type: {})",
            msg.type_url()
        );
        if let Err(e) = ctx.consume_gas(charge, &descriptor) {
            tracing::warn!(
                msg_type = msg.type_url(),
                %e,
                "Transaction cannot pay deterministic gas"
            );
            return Err(e.into());
        }

        let fuse = BasicGasMeter::new(gas_required.saturating_mul(FUSE_GAS_MULTIPLIER));
        let (result, fuse) = ctx.with_gas_meter(Box::new(fuse), |ctx| self.base.handle(ctx, msg));

        tracing::trace!(
            msg_type = msg.type_url(),
            gas_required,
            gas_consumed = fuse.gas_consumed(),
            success = result.is_ok(),
            "Executed message with deterministic gas"
        );

        if result.is_ok() && ctx.mode().is_deliver() {
            self.report_gas_factor(msg, gas_required, fuse.gas_consumed());
        }

        result
    }
}
