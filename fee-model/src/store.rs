use std::{collections::HashMap, convert::Infallible, error::Error, fmt::Debug};

/// Durable key/value storage the fee model keeps its state in.
pub trait KvStore: Debug {
    /// The associated error type for the backing storage access operation.
    type Err: Error + Send + Sync + 'static;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Self::Err>;

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), Self::Err>;
}

/// Storage that only lives for the duration of one block.
///
/// Every access names the block height it belongs to. Values written at any other height are
/// invisible, so advancing to the next block clears the store implicitly.
pub trait TransientStore: Debug {
    fn get(&self, block_height: u64, key: &[u8]) -> Option<Vec<u8>>;

    fn set(&mut self, block_height: u64, key: &[u8], value: Vec<u8>);
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryKvStore {
    entries: HashMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for InMemoryKvStore {
    type Err = Infallible;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Self::Err> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), Self::Err> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryTransientStore {
    block_height: u64,
    entries: HashMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryTransientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransientStore for InMemoryTransientStore {
    fn get(&self, block_height: u64, key: &[u8]) -> Option<Vec<u8>> {
        if block_height != self.block_height {
            return None;
        }

        self.entries.get(key).cloned()
    }

    fn set(&mut self, block_height: u64, key: &[u8], value: Vec<u8>) {
        if block_height != self.block_height {
            self.entries.clear();
            self.block_height = block_height;
        }

        self.entries.insert(key.to_vec(), value);
    }
}
