//! Per-block accounting of the gas charged by transactions.

use {
    crate::store::TransientStore,
    gasfuse_shared::{ExecutionContext, Gas},
};

const TRACKED_GAS_KEY: &[u8] = b"tracked_gas";

/// Sums the gas consumed within the current block.
///
/// The total lives in a [`TransientStore`], so it reads as zero as soon as the context moves on
/// to the next block.
#[derive(Debug)]
pub struct GasTracker<T> {
    store: T,
}

impl<T: TransientStore> GasTracker<T> {
    pub fn new(store: T) -> Self {
        Self { store }
    }

    /// Adds `amount` to the block total, saturating at [`Gas::MAX`].
    pub fn track_gas(&mut self, ctx: &ExecutionContext, amount: Gas) {
        let total = self.tracked_gas(ctx).saturating_add(amount);

        self.store
            .set(ctx.block_height(), TRACKED_GAS_KEY, total.to_le_bytes().to_vec());
    }

    pub fn tracked_gas(&self, ctx: &ExecutionContext) -> Gas {
        self.store
            .get(ctx.block_height(), TRACKED_GAS_KEY)
            .and_then(|bytes| bytes.try_into().ok())
            .map(Gas::from_le_bytes)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::store::InMemoryTransientStore,
        gasfuse_shared::{ExecMode, InfiniteGasMeter},
    };

    fn ctx(block_height: u64) -> ExecutionContext {
        ExecutionContext::new(block_height, ExecMode::Deliver, InfiniteGasMeter::new())
    }

    #[test]
    fn test_tracked_gas_accumulates_within_block() {
        let mut tracker = GasTracker::new(InMemoryTransientStore::new());
        let ctx = ctx(1);

        tracker.track_gas(&ctx, 10);
        tracker.track_gas(&ctx, 5);

        assert_eq!(tracker.tracked_gas(&ctx), 15);
    }

    #[test]
    fn test_tracked_gas_starts_from_zero_in_next_block() {
        let mut tracker = GasTracker::new(InMemoryTransientStore::new());
        tracker.track_gas(&ctx(1), 10);

        assert_eq!(tracker.tracked_gas(&ctx(2)), 0);

        tracker.track_gas(&ctx(2), 3);

        assert_eq!(tracker.tracked_gas(&ctx(2)), 3);
    }

    #[test]
    fn test_tracked_gas_saturates() {
        let mut tracker = GasTracker::new(InMemoryTransientStore::new());
        let ctx = ctx(1);

        tracker.track_gas(&ctx, Gas::MAX);
        tracker.track_gas(&ctx, 1);

        assert_eq!(tracker.tracked_gas(&ctx), Gas::MAX);
    }
}
