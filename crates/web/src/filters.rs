//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a timestamp as `YYYY-MM-DD HH:MM`.
///
/// Accepts anything whose `Display` output starts with an RFC 3339-style
/// timestamp, which covers `chrono::DateTime<Utc>`.
///
/// Usage in templates: `{{ post.pub_date|fmt_datetime }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn fmt_datetime(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let rendered = value.to_string();
    let mut out: String = rendered.chars().take(16).collect();
    if let Some(sep) = out.find('T') {
        out.replace_range(sep..=sep, " ");
    }
    Ok(out)
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}
