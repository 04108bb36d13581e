use chrono::NaiveDate;
use log::debug;

use crate::date_parser::DateParser;

/// One self-contained record from the result listing: the rows of its
/// detail table, each row as its cell texts in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultEntry {
    pub rows: Vec<Vec<String>>,
}

/// Insertion-ordered mapping from normalized date label to parsed date.
///
/// Labels are stored trimmed and lowercased, so the mapping can never hold
/// two entries differing only by case. The first occurrence of a label wins;
/// later duplicates are ignored.
#[derive(Debug, Clone, Default)]
pub struct DateMapping {
    entries: Vec<(String, NaiveDate)>,
}

impl DateMapping {
    pub fn new() -> Self {
        DateMapping { entries: Vec::new() }
    }

    /// Inserts label -> date unless the label is already present.
    /// Returns whether the entry was inserted.
    pub fn insert_first(&mut self, label: &str, date: NaiveDate) -> bool {
        let key = label.trim().to_lowercase();
        if key.is_empty() || self.entries.iter().any(|(k, _)| *k == key) {
            return false;
        }
        self.entries.push((key, date));
        true
    }

    pub fn get(&self, label: &str) -> Option<NaiveDate> {
        let key = label.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, date)| *date)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Case-insensitive completeness test against a required label set.
    pub fn contains_all(&self, required: &[&str]) -> bool {
        required.iter().all(|label| self.contains(label))
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate)> {
        self.entries.iter().map(|(label, date)| (label.as_str(), *date))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct DateExtractor {
    parser: DateParser,
}

impl DateExtractor {
    pub fn new() -> Self {
        DateExtractor {
            parser: DateParser::new(),
        }
    }

    /// Walks an entry's rows top to bottom and collects every parseable date
    /// field. Rows with fewer than two cells are skipped. An empty mapping is
    /// a valid result for entries without date rows.
    pub fn extract(&self, entry: &ResultEntry) -> DateMapping {
        let mut dates = DateMapping::new();

        for row in &entry.rows {
            if row.len() < 2 {
                continue;
            }

            let label = row[0].trim().to_lowercase();
            let raw_text = row[1].as_str();

            match self.parser.parse(&label, raw_text) {
                Some(date) => {
                    dates.insert_first(&label, date);
                }
                None => {
                    if label.contains("date") && !raw_text.trim().is_empty() {
                        debug!("Skipping unparseable value '{}' for '{}'", raw_text.trim(), label);
                    }
                }
            }
        }

        dates
    }
}
