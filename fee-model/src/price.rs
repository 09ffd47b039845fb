use {crate::params::ModelParams, gasfuse_shared::Dec};

/// Translates the congestion estimate into the minimum gas price for the next block.
pub trait MinGasPriceModel {
    fn compute_min_gas_price(&self, short_ema: Dec, long_ema: Dec, model: &ModelParams) -> Dec;
}

/// Prices congestion along a curve through three points.
///
/// | congestion                  | price                                  |
/// |-----------------------------|----------------------------------------|
/// | 0                           | `initial_gas_price * (1 - max_discount)` |
/// | `escalation_start_fraction` | `initial_gas_price`                    |
/// | 1                           | `initial_gas_price * max_gas_price_multiplier` |
///
/// Between the points the price is interpolated linearly. Congestion is the larger of the two
/// averages, so a burst raises the price quickly while sustained load keeps it up.
#[derive(Debug, Clone, Copy, Default)]
pub struct PiecewiseLinearGasPrice;

impl MinGasPriceModel for PiecewiseLinearGasPrice {
    fn compute_min_gas_price(&self, short_ema: Dec, long_ema: Dec, model: &ModelParams) -> Dec {
        let congestion = short_ema.max(long_ema).min(Dec::ONE);
        let floor = model.min_gas_price_floor();
        let ceiling = model.max_gas_price();
        let escalation_start = model.escalation_start_fraction;

        let price = if congestion == Dec::ONE {
            ceiling
        } else if congestion <= escalation_start {
            interpolate(
                (Dec::ZERO, floor),
                (escalation_start, model.initial_gas_price),
                congestion,
            )
        } else {
            interpolate(
                (escalation_start, model.initial_gas_price),
                (Dec::ONE, ceiling),
                congestion,
            )
        };

        price.max(floor).min(ceiling)
    }
}

/// `p0 + (p1 - p0) * (x - x0) / (x1 - x0)` for `x0 <= x <= x1` and `p0 <= p1`.
fn interpolate((x0, p0): (Dec, Dec), (x1, p1): (Dec, Dec), x: Dec) -> Dec {
    let rise = p1
        .saturating_sub(p0)
        .checked_mul_div(x.saturating_sub(x0), x1.saturating_sub(x0))
        .unwrap_or(Dec::ZERO);

    p0.saturating_add(rise)
}
