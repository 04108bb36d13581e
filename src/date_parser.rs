use chrono::NaiveDate;
use regex::Regex;

/// Parses the label/value cells of a patent detail row into a calendar date.
///
/// The registry renders every date as `YYYY-MM-DD`, sometimes with a trailing
/// parenthesized annotation ("2021-05-01 (expected)"). Only that one pattern
/// is accepted; anything else is a miss, not an error.
pub struct DateParser {
    iso_date_regex: Regex,
}

impl DateParser {
    pub fn new() -> Self {
        DateParser {
            // Exact-match gate. chrono alone would also accept unpadded
            // forms like "2021-5-1", which the page never renders.
            iso_date_regex: Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(),
        }
    }

    /// Returns the parsed date, or None when the label is not a date field
    /// or the value does not match the page's date format.
    pub fn parse(&self, label: &str, raw_text: &str) -> Option<NaiveDate> {
        if !label.to_lowercase().contains("date") {
            return None;
        }

        // Keep only the part before any annotation.
        let date_text = raw_text.trim().split('(').next().unwrap_or("").trim();
        if date_text.is_empty() || !self.iso_date_regex.is_match(date_text) {
            return None;
        }

        NaiveDate::parse_from_str(date_text, "%Y-%m-%d").ok()
    }
}
