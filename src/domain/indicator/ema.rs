//! Exponential Moving Average.
//!
//! k = 2/(n+1), EMA[0] = seed, then EMA[i] = P[i]*k + EMA[i-1]*(1-k).
//! Defined for every index; there is no warmup.

pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

pub fn calculate_ema(prices: &[f64], period: usize, seed: f64) -> Vec<f64> {
    if prices.is_empty() {
        return Vec::new();
    }

    let k = smoothing_factor(period);
    std::iter::once(seed)
        .chain(prices[1..].iter().scan(seed, |prev, &price| {
            *prev = ema_step(price, *prev, k);
            Some(*prev)
        }))
        .collect()
}

/// One step of the recurrence.
pub fn ema_step(price: f64, prev: f64, k: f64) -> f64 {
    price * k + prev * (1.0 - k)
}
