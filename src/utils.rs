use chrono::{DateTime, NaiveDate};

/// Formats an API date as `dd/mm/YYYY`.
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates. Anything else is
/// returned unchanged so the caller always has something to show.
///
/// # Examples
///
/// ```
/// use bookdesk::utils::format_date;
///
/// assert_eq!(format_date("2024-03-09T14:30:00Z"), "09/03/2024");
/// assert_eq!(format_date("2024-03-09"), "09/03/2024");
/// assert_eq!(format_date("yesterday"), "yesterday");
/// ```
#[must_use]
pub fn format_date(raw: &str) -> String {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.format("%d/%m/%Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    raw.to_string()
}

/// Uppercases the first character of `text`
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
