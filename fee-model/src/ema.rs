//! Smoothed estimate of how congested recent blocks were.
//!
//! Two exponential moving averages of block fullness are kept side by side. The short one reacts
//! to bursts within a few blocks, the long one captures sustained load. Both are fractions of
//! [`ModelParams::max_block_gas`] in `[0, 1]`.

use {
    crate::params::ModelParams,
    gasfuse_shared::{Dec, Gas},
};

/// Fraction of the block capacity consumed by `gas_used`, capped at 1.
pub fn usage_fraction(gas_used: Gas, max_block_gas: Gas) -> Dec {
    Dec::from_ratio(gas_used, max_block_gas)
        .unwrap_or(Dec::ONE)
        .min(Dec::ONE)
}

/// The weight `2 / (block_length + 1)` of the newest sample in an average over `block_length`
/// blocks.
pub fn smoothing_factor(block_length: u32) -> Dec {
    Dec::from_ratio(2, u64::from(block_length) + 1).map_or(Dec::ONE, |alpha| alpha.min(Dec::ONE))
}

/// Folds `sample` into `previous` with weight `alpha`.
///
/// Products truncate, so feeding zeros eventually drives the average to exactly zero.
pub fn calculate_ema(previous: Dec, sample: Dec, alpha: Dec) -> Dec {
    let retained = Dec::ONE.saturating_sub(alpha);

    alpha
        .saturating_mul(sample)
        .saturating_add(retained.saturating_mul(previous))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CongestionEstimate {
    pub short: Dec,
    pub long: Dec,
}

impl CongestionEstimate {
    pub fn new(short: Dec, long: Dec) -> Self {
        Self { short, long }
    }

    /// Moves both averages one block forward.
    pub fn update(self, gas_used: Gas, model: &ModelParams) -> Self {
        let usage = usage_fraction(gas_used, model.max_block_gas);

        Self {
            short: calculate_ema(
                self.short,
                usage,
                smoothing_factor(model.short_ema_block_length),
            ),
            long: calculate_ema(
                self.long,
                usage,
                smoothing_factor(model.long_ema_block_length),
            ),
        }
    }

    /// The more pessimistic of the two averages, capped at 1.
    pub fn congestion(&self) -> Dec {
        self.short.max(self.long).min(Dec::ONE)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    fn dec(s: &str) -> Dec {
        s.parse().unwrap()
    }

    #[test_case(0, 100, "0"; "empty block")]
    #[test_case(25, 100, "0.25"; "quarter full")]
    #[test_case(100, 100, "1"; "full block")]
    #[test_case(250, 100, "1"; "over capacity")]
    #[test_case(1, 0, "1"; "zero capacity")]
    fn test_usage_fraction(gas_used: Gas, max_block_gas: Gas, expected: &str) {
        assert_eq!(usage_fraction(gas_used, max_block_gas), dec(expected));
    }

    #[test_case(1, "1"; "single block")]
    #[test_case(3, "0.5"; "three blocks")]
    #[test_case(9, "0.2"; "nine blocks")]
    fn test_smoothing_factor(block_length: u32, expected: &str) {
        assert_eq!(smoothing_factor(block_length), dec(expected));
    }

    #[test]
    fn test_ema_moves_towards_sample() {
        let actual = calculate_ema(dec("0.5"), Dec::ONE, dec("0.2"));

        assert_eq!(actual, dec("0.6"));
    }

    #[test]
    fn test_empty_blocks_drive_averages_to_exactly_zero() {
        let model = ModelParams::default();
        let mut estimate = CongestionEstimate::new(Dec::ONE, Dec::ONE);

        for _ in 0..200_000 {
            estimate = estimate.update(0, &model);
            if estimate == CongestionEstimate::default() {
                break;
            }
        }

        assert_eq!(estimate, CongestionEstimate::default());
    }

    #[test]
    fn test_full_blocks_converge_towards_one_without_exceeding_it() {
        let model = ModelParams::default();
        let mut estimate = CongestionEstimate::default();

        for _ in 0..100 {
            estimate = estimate.update(model.max_block_gas * 2, &model);
            assert!(estimate.short <= Dec::ONE);
            assert!(estimate.long <= Dec::ONE);
        }

        assert!(estimate.short > dec("0.99"));
        assert!(estimate.long > Dec::ZERO);
        assert!(estimate.long < estimate.short);
    }

    #[test]
    fn test_congestion_is_the_larger_average() {
        let estimate = CongestionEstimate::new(dec("0.1"), dec("0.7"));

        assert_eq!(estimate.congestion(), dec("0.7"));
        assert_eq!(
            CongestionEstimate::new(dec("0.7"), dec("0.1")).congestion(),
            dec("0.7")
        );
    }
}
