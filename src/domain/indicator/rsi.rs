//! RSI (Relative Strength Index), trailing-window variant.
//!
//! This is not Wilder's RSI. For index i > n, each of the n prices before i
//! is compared against the *current* price:
//! - change_j = (P[i] - P[j]) / P[j] for j in [i-n, i)
//! - change_j > 0 is a gain, anything else is a loss of |change_j|
//! - avg_gain / avg_loss are plain means of their lists (0 when empty)
//!
//! RS = avg_gain / avg_loss, or 100 when avg_loss == 0.
//! RSI = 100 - 100 / (1 + RS).
//!
//! Indices 0..=n are fixed at the neutral value 50.

pub const NEUTRAL_RSI: f64 = 50.0;

pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<f64> {
    (0..prices.len())
        .map(|i| {
            if i <= period {
                NEUTRAL_RSI
            } else {
                window_rsi(&prices[i - period..i], prices[i])
            }
        })
        .collect()
}

fn window_rsi(window: &[f64], current: f64) -> f64 {
    let (gains, losses): (Vec<f64>, Vec<f64>) = window
        .iter()
        .map(|&past| (current - past) / past)
        .partition(|&change| change > 0.0);

    let losses: Vec<f64> = losses.iter().map(|change| change.abs()).collect();
    let avg_gain = mean(&gains);
    let avg_loss = mean(&losses);

    let rs = if avg_loss == 0.0 { 100.0 } else { avg_gain / avg_loss };
    100.0 - 100.0 / (1.0 + rs)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
