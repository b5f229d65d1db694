//! Pip economics — increment sizes, per-pip monetary value, and the decimal
//! rounding both lean on.

/// Round `value` to `dp` decimal places.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    let scale = 10f64.powi(dp as i32);
    (value * scale).round() / scale
}

/// Size of one pip for a market quoting with the given decimal-place factor.
///
/// Most forex pairs quote the pip in the fourth decimal place: a factor of
/// 0.01 gives a pip of 0.0001 (1% of 1%). Pairs quoted to fewer places carry
/// a different factor.
pub fn pip_size(factor: f64) -> f64 {
    round_dp((1.0 / 100.0) * factor, 5)
}

/// Monetary value of a one-pip move for `lot_size` lots entered at `price`,
/// where one full lot represents `contract_size` notional.
pub fn pip_value(price: f64, pip_size: f64, lot_size: f64, contract_size: f64) -> f64 {
    (pip_size / price) * (lot_size * contract_size)
}
