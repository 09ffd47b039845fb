pub use {
    fee_model::HeedKvStore,
    heed::{self, Env},
};

pub mod fee_model;

/// Names of every database the node keeps in its LMDB environment.
pub const DATABASES: [&str; 1] = [fee_model::DB];
