use {
    gasfuse_fee_model::KvStore,
    heed::{EnvOpenOptions, types::Bytes},
    std::path::Path,
};

pub type Db = heed::Database<Bytes, Bytes>;

pub const DB: &str = "fee_model";

/// A [`KvStore`] kept in a named LMDB database.
///
/// Every write commits its own transaction, so a value is durable as soon as `set` returns.
#[derive(Debug, Clone)]
pub struct HeedKvStore {
    env: heed::Env,
    db: Db,
}

impl HeedKvStore {
    /// Opens the fee model database in `env`, creating it if it does not exist yet.
    pub fn new(env: heed::Env) -> heed::Result<Self> {
        let mut transaction = env.write_txn()?;
        let db: Db = env.create_database(&mut transaction, Some(DB))?;
        transaction.commit()?;

        Ok(Self { env, db })
    }

    /// Opens an environment at `path` with room for all node databases.
    pub fn open(path: impl AsRef<Path>, map_size: usize) -> heed::Result<Self> {
        // SAFETY: The environment is opened once per process and the files are not modified
        // by anything else while it is open.
        let env = unsafe {
            EnvOpenOptions::new()
                .max_dbs(crate::DATABASES.len() as u32)
                .map_size(map_size)
                .open(path)?
        };

        Self::new(env)
    }
}

impl KvStore for HeedKvStore {
    type Err = heed::Error;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Self::Err> {
        let transaction = self.env.read_txn()?;

        let value = self.db.get(&transaction, key)?.map(<[u8]>::to_vec);

        Ok(value)
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), Self::Err> {
        let mut transaction = self.env.write_txn()?;

        self.db.put(&mut transaction, key, value)?;

        transaction.commit()
    }
}
