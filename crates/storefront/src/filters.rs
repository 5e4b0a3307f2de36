//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use bundle_shop_core::Price;
use chrono::{DateTime, Utc};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(Utc::now().year())
}

/// Formats backend decimal text as cedis, e.g. `GHS 12.50`.
///
/// Text that is not a number is shown unchanged.
///
/// Usage in templates: `{{ bundle.final_price|cedis }}`
#[askama::filter_fn]
pub fn cedis(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_cedis(&value.to_string()))
}

/// Formats epoch milliseconds as a short date and time (UTC).
///
/// Usage in templates: `{{ order.created_at|order_date }}`
#[askama::filter_fn]
pub fn order_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_epoch_millis(&value.to_string()))
}

/// Formats an RFC 3339 timestamp as a short date and time (UTC).
///
/// Usage in templates: `{{ order.created_at|timestamp }}`
#[askama::filter_fn]
pub fn timestamp(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_rfc3339(&value.to_string()))
}

const DATE_FORMAT: &str = "%d %b %Y, %H:%M";

fn format_cedis(raw: &str) -> String {
    Price::parse(raw).map_or_else(|_| raw.to_string(), |price| price.display())
}

fn format_epoch_millis(raw: &str) -> String {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(|| raw.to_string(), |dt| dt.format(DATE_FORMAT).to_string())
}

fn format_rfc3339(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw.trim()).map_or_else(
        |_| raw.to_string(),
        |dt| dt.with_timezone(&Utc).format(DATE_FORMAT).to_string(),
    )
}
