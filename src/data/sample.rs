//! Synthetic daily bars for demos and tests.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::domain::Bar;

/// Generate `num_bars` daily bars following a bounded random walk
///
/// Each close moves from the previous close by a uniform return in
/// `[-volatility, volatility]`; highs and lows extend past the body by a
/// random wick.
pub fn generate_sample_bars<R: Rng>(
    num_bars: usize,
    start_price: f64,
    volatility: f64,
    rng: &mut R,
) -> Vec<Bar> {
    let start_date = NaiveDate::from_ymd_opt(2015, 1, 2).unwrap_or(NaiveDate::MIN);
    let volatility = volatility.abs();
    let mut bars = Vec::with_capacity(num_bars);
    let mut prev_close = start_price.max(0.01);

    for i in 0..num_bars {
        let open = prev_close;
        let change = if volatility > 0.0 {
            rng.gen_range(-volatility..volatility)
        } else {
            0.0
        };
        let close = (open * (1.0 + change)).max(0.01);

        let wick = open.max(close) * rng.gen_range(0.0..=volatility.max(1e-6));
        let high = open.max(close) + wick;
        let low = (open.min(close) - wick).max(0.005);
        let volume = rng.gen_range(100_000.0..5_000_000.0_f64).round();

        bars.push(Bar::new(
            start_date + Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume,
        ));

        prev_close = close;
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceSeries;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_bars_are_valid_series() {
        let mut rng = StdRng::seed_from_u64(5);
        let bars = generate_sample_bars(250, 150.0, 0.03, &mut rng);
        assert_eq!(bars.len(), 250);

        for pair in bars.windows(2) {
            assert!(pair[0].date < pair[1].date);
            assert_eq!(pair[1].open, pair[0].close);
        }
        for bar in &bars {
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
        }

        assert!(PriceSeries::new(bars).is_ok());
    }

    #[test]
    fn test_zero_volatility_is_flat() {
        let mut rng = StdRng::seed_from_u64(6);
        let bars = generate_sample_bars(10, 42.0, 0.0, &mut rng);
        assert!(bars.iter().all(|b| b.open == 42.0 && b.close == 42.0));
    }
}
