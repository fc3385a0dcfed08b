//! Nearest support and resistance from the pivot prices seen so far.

use super::fib::safe_div;
use crate::domain::Pivot;

/// Two nearest pivot prices on each side of the close.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NearestLevels {
    /// Below the close, nearest first.
    pub supports: [Option<f64>; 2],
    /// Above the close, nearest first.
    pub resistances: [Option<f64>; 2],
}

impl NearestLevels {
    /// Distinct pivot prices strictly below/above `close`, sorted by proximity.
    pub fn around(pivots: &[Pivot], close: f64) -> Self {
        let mut prices: Vec<f64> = pivots
            .iter()
            .map(|p| p.price)
            .filter(|p| p.is_finite())
            .collect();
        prices.sort_by(f64::total_cmp);
        prices.dedup();

        let split = prices.partition_point(|&p| p < close);
        let mut below = prices[..split].iter().rev();
        let mut above = prices[split..].iter().filter(|&&p| p > close);

        Self {
            supports: [below.next().copied(), below.next().copied()],
            resistances: [above.next().copied(), above.next().copied()],
        }
    }

    /// `[S1, S2, R1, R2]` as `|price - close| / vol`.
    pub fn distances(&self, close: f64, volatility: f64) -> [Option<f64>; 4] {
        let s = self
            .supports
            .map(|lvl| lvl.and_then(|p| safe_div(close - p, volatility)));
        let r = self
            .resistances
            .map(|lvl| lvl.and_then(|p| safe_div(p - close, volatility)));
        [s[0], s[1], r[0], r[1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pivots(prices: &[f64]) -> Vec<Pivot> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| if i % 2 == 0 { Pivot::low(p, i) } else { Pivot::high(p, i) })
            .collect()
    }

    #[test]
    fn picks_nearest_on_each_side() {
        let lv = NearestLevels::around(&pivots(&[90.0, 120.0, 95.0, 110.0, 80.0]), 100.0);
        assert_eq!(lv.supports, [Some(95.0), Some(90.0)]);
        assert_eq!(lv.resistances, [Some(110.0), Some(120.0)]);
    }

    #[test]
    fn duplicates_and_exact_close_are_ignored() {
        let lv = NearestLevels::around(&pivots(&[95.0, 100.0, 95.0]), 100.0);
        assert_eq!(lv.supports, [Some(95.0), None]);
        assert_eq!(lv.resistances, [None, None]);
    }

    #[test]
    fn distances_are_positive_volatility_units() {
        let lv = NearestLevels::around(&pivots(&[96.0, 104.0]), 100.0);
        let d = lv.distances(100.0, 2.0);
        assert_eq!(d, [Some(2.0), None, Some(2.0), None]);
    }

    #[test]
    fn mirrored_prices_swap_sides() {
        let m = 100.0;
        let prices = [92.0, 113.0, 97.0, 106.0];
        let close = 101.5;
        let mirrored: Vec<f64> = prices.iter().map(|p| 2.0 * m - p).collect();

        let d = NearestLevels::around(&pivots(&prices), close).distances(close, 1.5);
        let dm = NearestLevels::around(&pivots(&mirrored), 2.0 * m - close).distances(2.0 * m - close, 1.5);

        for (a, b) in [(0, 2), (1, 3)] {
            assert!((d[a].unwrap() - dm[b].unwrap()).abs() < 1e-9);
            assert!((d[b].unwrap() - dm[a].unwrap()).abs() < 1e-9);
        }
    }
}
