//! Simple Moving Average.
//!
//! SMA[i] = mean(P[i-n+1..=i]). The first (n-1) entries have no value.

pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    (0..prices.len())
        .map(|i| {
            (i + 1 >= period)
                .then(|| prices[i + 1 - period..=i].iter().sum::<f64>() / period as f64)
        })
        .collect()
}
