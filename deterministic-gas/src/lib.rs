//! Deterministic gas accounting.
//!
//! Registered message types are billed a fixed amount of gas no matter how much work their
//! handler actually does. The handler itself runs under a separate "fuse" meter, so a runaway
//! handler still fails instead of executing unbounded work.

pub use {
    config::DeterministicGasConfig,
    error::{Error, Result},
    metrics::{
        DETERMINISTIC_GAS_FACTOR, Label, MSG_NAME_LABEL, MetricsSink, NoopMetricsSink,
        PrometheusMetricsSink,
    },
    router::{DeterministicGasRouter, FUSE_GAS_MULTIPLIER},
};

#[cfg(any(feature = "test-doubles", test))]
pub use metrics::{RecordingMetricsSink, Sample};

mod config;
mod error;
mod metrics;
mod router;
