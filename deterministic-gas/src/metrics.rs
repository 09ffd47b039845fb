use {
    once_cell::sync::Lazy,
    prometheus::{HistogramOpts, HistogramVec, Registry},
    std::{
        collections::{HashMap, hash_map::Entry},
        sync::{Arc, Mutex},
    },
};

/// Ratio of gas consumed by the handler of a deterministic message to the gas billed for it.
pub const DETERMINISTIC_GAS_FACTOR: &str = "deterministic_gas_factor";
pub const MSG_NAME_LABEL: &str = "msg_name";

/// Handlers may use up to five times the billed gas before the fuse blows, values above that
/// never show up.
const GAS_FACTOR_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 4.0, 5.0];

static PROMETHEUS_METRICS_SINK: Lazy<PrometheusMetricsSink> =
    Lazy::new(|| PrometheusMetricsSink::new(prometheus::default_registry().clone()));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Receives observations, e.g. to export them to a monitoring system.
pub trait MetricsSink {
    fn add_sample(&self, key: &str, value: f64, labels: &[Label]);
}

impl<S: MetricsSink + ?Sized> MetricsSink for &S {
    fn add_sample(&self, key: &str, value: f64, labels: &[Label]) {
        (**self).add_sample(key, value, labels)
    }
}

impl<S: MetricsSink + ?Sized> MetricsSink for Arc<S> {
    fn add_sample(&self, key: &str, value: f64, labels: &[Label]) {
        (**self).add_sample(key, value, labels)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn add_sample(&self, _key: &str, _value: f64, _labels: &[Label]) {}
}

/// Records every sample into a histogram named after its key.
///
/// Histograms are created and registered on first use. The label names of a key are fixed by the
/// first sample reported under it. [`DETERMINISTIC_GAS_FACTOR`] is bucketed around the fuse
/// range, other keys use the buckets set with [`Self::with_buckets`] or the Prometheus defaults.
#[derive(Debug)]
pub struct PrometheusMetricsSink {
    registry: Registry,
    buckets: HashMap<String, Vec<f64>>,
    histograms: Mutex<HashMap<String, HistogramVec>>,
}

impl PrometheusMetricsSink {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            buckets: HashMap::new(),
            histograms: Mutex::new(HashMap::new()),
        }
        .with_buckets(DETERMINISTIC_GAS_FACTOR, GAS_FACTOR_BUCKETS.to_vec())
    }

    /// Sets the histogram buckets of samples reported under `key`.
    pub fn with_buckets(mut self, key: impl Into<String>, buckets: Vec<f64>) -> Self {
        self.buckets.insert(key.into(), buckets);
        self
    }

    /// The process wide sink backed by the default Prometheus registry.
    pub fn global() -> &'static Self {
        &PROMETHEUS_METRICS_SINK
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn histogram(
        &self,
        key: &str,
        label_names: &[&str],
    ) -> Result<HistogramVec, prometheus::Error> {
        let mut histograms = self
            .histograms
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match histograms.entry(key.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let buckets = self
                    .buckets
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| prometheus::DEFAULT_BUCKETS.to_vec());
                let opts = HistogramOpts::new(key, format!("Samples of {key}")).buckets(buckets);
                let histogram = HistogramVec::new(opts, label_names)?;

                self.registry.register(Box::new(histogram.clone()))?;

                Ok(entry.insert(histogram).clone())
            }
        }
    }
}

impl MetricsSink for PrometheusMetricsSink {
    fn add_sample(&self, key: &str, value: f64, labels: &[Label]) {
        let label_names: Vec<&str> = labels.iter().map(|label| label.name.as_str()).collect();
        let label_values: Vec<&str> = labels.iter().map(|label| label.value.as_str()).collect();

        match self
            .histogram(key, &label_names)
            .and_then(|histogram| histogram.get_metric_with_label_values(&label_values))
        {
            Ok(histogram) => histogram.observe(value),
            Err(error) => tracing::warn!(key, %error, "Failed to record metric sample"),
        }
    }
}

#[cfg(any(feature = "test-doubles", test))]
pub use test_doubles::{RecordingMetricsSink, Sample};

#[cfg(any(feature = "test-doubles", test))]
mod test_doubles {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Sample {
        pub key: String,
        pub value: f64,
        pub labels: Vec<Label>,
    }

    /// Keeps every sample in memory for inspection.
    #[derive(Debug, Default)]
    pub struct RecordingMetricsSink {
        samples: Mutex<Vec<Sample>>,
    }

    impl RecordingMetricsSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn samples(&self) -> Vec<Sample> {
            self.samples.lock().unwrap().clone()
        }
    }

    impl MetricsSink for RecordingMetricsSink {
        fn add_sample(&self, key: &str, value: f64, labels: &[Label]) {
            self.samples.lock().unwrap().push(Sample {
                key: key.into(),
                value,
                labels: labels.to_vec(),
            });
        }
    }
}
