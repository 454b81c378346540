//! Daily return and exponential moving averages over a price series.

use crate::core::PriceBar;

/// Short EMA span written to [`PriceBar::ema_7`].
pub const EMA_SHORT_SPAN: usize = 7;
/// Long EMA span written to [`PriceBar::ema_21`].
pub const EMA_LONG_SPAN: usize = 21;

/// Simple percentage change between consecutive prices.
///
/// The first element is always `None`, as is any element whose previous price is zero
/// or non-finite.
pub fn daily_returns(prices: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    for (i, &p) in prices.iter().enumerate() {
        if i == 0 {
            out.push(None);
            continue;
        }
        let prev = prices[i - 1];
        if prev == 0.0 || !prev.is_finite() || !p.is_finite() {
            out.push(None);
        } else {
            out.push(Some(p / prev - 1.0));
        }
    }
    out
}

/// Recursive exponential moving average with smoothing factor `2 / (span + 1)`,
/// seeded by the first price.
pub fn ema(prices: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(prices.len());
    let Some(&first) = prices.first() else {
        return out;
    };
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = first;
    out.push(first);
    for &p in &prices[1..] {
        prev = alpha * p + (1.0 - alpha) * prev;
        out.push(prev);
    }
    out
}

/// Fill `daily_return`, `ema_7` and `ema_21` for a chronologically ordered series of
/// one ticker, computed over the adjusted close.
pub fn apply(bars: &mut [PriceBar]) {
    let prices: Vec<f64> = bars.iter().map(|b| b.adj_close).collect();
    let returns = daily_returns(&prices);
    let short = ema(&prices, EMA_SHORT_SPAN);
    let long = ema(&prices, EMA_LONG_SPAN);

    for (i, bar) in bars.iter_mut().enumerate() {
        bar.daily_return = returns[i];
        bar.ema_7 = Some(short[i]);
        bar.ema_21 = Some(long[i]);
    }
}
