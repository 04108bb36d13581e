use log::{debug, info};

use crate::extractor::{DateExtractor, DateMapping, ResultEntry};

/// The three lifecycle dates a result must carry to be usable.
pub const REQUIRED_DATE_LABELS: [&str; 3] = ["filing date", "publication date", "grant date"];

/// What one pass over the result listing produced.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Fully-complete date mappings, in encounter order.
    pub qualifying: Vec<DateMapping>,
    /// Required labels never observed in any examined entry.
    pub missing_labels: Vec<String>,
    /// How many entries were extracted before the scan stopped.
    pub entries_examined: usize,
}

/// Scans result entries in document order and collects the mappings that
/// carry every required label.
///
/// Stops as soon as `stop_after` qualifying entries have been found; the rest
/// of the listing is never examined. Collecting fewer than `stop_after` is a
/// normal outcome the caller must handle, not an error. Requiring two
/// complete results before reporting keeps a single anomalous or placeholder
/// entry from being treated as ground truth; `stop_after = 1` reports the
/// first complete entry as-is.
pub fn scan_entries(
    extractor: &DateExtractor,
    entries: &[ResultEntry],
    required: &[&str],
    stop_after: usize,
) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let mut observed: Vec<String> = Vec::new();

    for entry in entries {
        outcome.entries_examined += 1;
        let dates = extractor.extract(entry);

        for label in dates.labels() {
            if !observed.iter().any(|seen| seen == label) {
                observed.push(label.to_string());
            }
        }

        if dates.contains_all(required) {
            info!("Result {} carries all required dates.", outcome.entries_examined);
            outcome.qualifying.push(dates);
            if outcome.qualifying.len() >= stop_after {
                info!("Found {} complete result(s). Stopping scan.", outcome.qualifying.len());
                break;
            }
        } else {
            debug!(
                "Result {} is incomplete ({} date field(s)).",
                outcome.entries_examined,
                dates.len()
            );
        }
    }

    outcome.missing_labels = required
        .iter()
        .filter(|label| !observed.iter().any(|seen| seen.eq_ignore_ascii_case(label)))
        .map(|label| label.to_string())
        .collect();

    outcome
}
