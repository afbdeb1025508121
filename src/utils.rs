// Utility functions
use chrono::NaiveDate;

/// Parses a `YYYY-MM-DD` date, the format the scrapers stamp their output with.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Converts text to kebab-case ("New York" -> "new-york").
pub fn to_kebab_case(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "-")
}

/// Case-insensitive substring test. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
