//! Percentage-change trend helpers
//!
//! All functions here are pure and zero-guarded: a missing or empty baseline
//! yields 0, never a division by zero, NaN, or infinity.

use crate::aggregate::MonthlyCount;

/// Rounded percentage change from `previous` to `current`.
///
/// Returns 0 when `previous` is zero or negative.
pub fn percent_change(current: f64, previous: f64) -> i64 {
    if previous <= 0.0 {
        return 0;
    }

    (((current - previous) / previous) * 100.0).round() as i64
}

/// Growth between the last two entries of a monthly series.
///
/// Fewer than two months of data yields 0 by the same zero-baseline rule.
pub fn month_over_month_growth(series: &[MonthlyCount]) -> i64 {
    if series.len() < 2 {
        return 0;
    }

    let previous = series[series.len() - 2].views;
    let current = series[series.len() - 1].views;
    percent_change(current as f64, previous as f64)
}

/// Daily active sessions compared against the implied average-daily rate of
/// the monthly total.
///
/// The baseline is `monthly_active / 30`, an averaging approximation rather
/// than a true daily series. Keep the formula as is: dashboards calibrated
/// against it expect these exact numbers.
pub fn active_user_growth(daily_active: i64, monthly_active: i64) -> i64 {
    percent_change(daily_active as f64, monthly_active as f64 / 30.0)
}
