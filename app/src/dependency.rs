#[cfg(any(feature = "test-doubles", test))]
pub use test_doubles::{TestDependencies, TestError, TestMsg};

use {
    gasfuse_deterministic_gas::{DeterministicGasRouter, MetricsSink, PrometheusMetricsSink},
    gasfuse_fee_model::{InMemoryTransientStore, Keeper, KvStore, TransientStore},
    gasfuse_shared::{Msg, MsgHandler},
    gasfuse_storage_heed::HeedKvStore,
    std::marker::PhantomData,
};

pub type Response<D> =
    <<D as Dependencies>::MsgHandler as MsgHandler<<D as Dependencies>::Msg>>::Response;
pub type HandlerError<D> =
    <<D as Dependencies>::MsgHandler as MsgHandler<<D as Dependencies>::Msg>>::Error;
pub type StoreError<D> = <<D as Dependencies>::KvStore as KvStore>::Err;

pub struct Application<D: Dependencies> {
    pub keeper: Keeper<D::KvStore, D::TransientStore>,
    pub router: DeterministicGasRouter<D::MsgHandler, D::MetricsSink>,
    pub block_height: u64,
}

impl<D: Dependencies> Application<D> {
    pub fn new(
        keeper: Keeper<D::KvStore, D::TransientStore>,
        router: DeterministicGasRouter<D::MsgHandler, D::MetricsSink>,
    ) -> Self {
        Self {
            keeper,
            router,
            block_height: 0,
        }
    }
}

pub trait Dependencies {
    /// The messages transactions carry.
    type Msg: Msg;
    type KvStore: KvStore;
    type TransientStore: TransientStore;
    /// Dispatches messages to the modules owning them.
    type MsgHandler: MsgHandler<Self::Msg>;
    type MetricsSink: MetricsSink;
}

/// Fee model state in LMDB and metrics in the default Prometheus registry.
pub struct NodeDependencies<M, H>(PhantomData<(M, H)>);

impl<M: Msg, H: MsgHandler<M>> Dependencies for NodeDependencies<M, H> {
    type Msg = M;
    type KvStore = HeedKvStore;
    type TransientStore = InMemoryTransientStore;
    type MsgHandler = H;
    type MetricsSink = &'static PrometheusMetricsSink;
}

#[cfg(any(feature = "test-doubles", test))]
mod test_doubles {
    use {
        super::*,
        gasfuse_deterministic_gas::RecordingMetricsSink,
        gasfuse_fee_model::InMemoryKvStore,
        gasfuse_shared::{ExecutionContext, Gas, OutOfGas},
        std::sync::Arc,
        thiserror::Error,
    };

    pub const SEND: &str = "/cosmos.bank.v1beta1.MsgSend";
    pub const DELEGATE: &str = "/cosmos.staking.v1beta1.MsgDelegate";
    pub const EXECUTE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";

    /// A message that makes its handler consume `work` gas.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TestMsg {
        pub type_url: &'static str,
        pub work: Gas,
        pub reject: bool,
    }

    impl TestMsg {
        pub fn send(work: Gas) -> Self {
            Self::new(SEND, work)
        }

        pub fn delegate(work: Gas) -> Self {
            Self::new(DELEGATE, work)
        }

        pub fn execute_contract(work: Gas) -> Self {
            Self::new(EXECUTE_CONTRACT, work)
        }

        pub fn rejected(mut self) -> Self {
            self.reject = true;
            self
        }

        fn new(type_url: &'static str, work: Gas) -> Self {
            Self {
                type_url,
                work,
                reject: false,
            }
        }
    }

    impl Msg for TestMsg {
        fn type_url(&self) -> &str {
            self.type_url
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum TestError {
        #[error(transparent)]
        OutOfGas(#[from] OutOfGas),
        #[error("Message rejected")]
        Rejected,
    }

    pub struct TestDependencies;

    impl TestDependencies {
        pub fn handle(ctx: &mut ExecutionContext, msg: &TestMsg) -> Result<Gas, TestError> {
            ctx.consume_gas(msg.work, msg.type_url)?;

            if msg.reject {
                return Err(TestError::Rejected);
            }

            Ok(msg.work)
        }
    }

    impl Dependencies for TestDependencies {
        type Msg = TestMsg;
        type KvStore = InMemoryKvStore;
        type TransientStore = InMemoryTransientStore;
        type MsgHandler = fn(&mut ExecutionContext, &TestMsg) -> Result<Gas, TestError>;
        type MetricsSink = Arc<RecordingMetricsSink>;
    }
}
