use std::time::Duration;

use log::{error, info, warn};

use crate::extractor::{DateExtractor, DateMapping, ResultEntry};
use crate::poller::{PollOutcome, WaitPoller};
use crate::reconciler::{self, DateDifferenceReport};
use crate::registry::{RegistryClient, SourceQuery};
use crate::scanner::{self, REQUIRED_DATE_LABELS};

/// Per-run policy knobs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// How many fully-complete results must be seen before the first of
    /// them is reported. Two guards against trusting a lone anomalous
    /// entry; one reports the first complete entry as-is.
    pub stop_after: usize,
    /// How long to wait for the result listing to render.
    pub wait_timeout: Duration,
    /// Fixed pause between listing probes.
    pub poll_interval: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            stop_after: 2,
            wait_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordStatus {
    /// A complete set of dates was found and reconciled.
    ReportProduced,
    /// The listing rendered but held fewer complete results than required.
    InsufficientResults,
    /// No result listing appeared within the wait bound.
    NoListing,
    /// The registry query failed; only this keyword's cycle was abandoned.
    Faulted,
}

/// Everything one keyword's cycle produced, for the reporting layer.
#[derive(Debug)]
pub struct KeywordOutcome {
    pub status: KeywordStatus,
    /// The dates of the first complete result, when one was found.
    pub dates: Option<DateMapping>,
    pub report: Option<DateDifferenceReport>,
    /// Required labels never seen in any examined result.
    pub missing_labels: Vec<String>,
}

impl KeywordOutcome {
    fn without_report(status: KeywordStatus) -> Self {
        KeywordOutcome {
            status,
            dates: None,
            report: None,
            missing_labels: Vec::new(),
        }
    }
}

pub struct DateAudit {
    client: RegistryClient,
    extractor: DateExtractor,
    poller: WaitPoller,
    config: RunConfig,
}

impl DateAudit {
    pub fn new(client: RegistryClient, config: RunConfig) -> Self {
        let poller = WaitPoller::new(config.wait_timeout, config.poll_interval);
        DateAudit {
            client,
            extractor: DateExtractor::new(),
            poller,
            config,
        }
    }

    /// Checks the landing page title. Logged only; a mismatch never stops
    /// the run.
    pub fn verify_title(&self, expected: &str) -> bool {
        match self.client.page_title() {
            SourceQuery::Found(title) => {
                let actual = title.trim();
                if actual == expected {
                    info!("Page title verified: '{}'", expected);
                    true
                } else {
                    warn!("Page title mismatch. Expected: '{}', Actual: '{}'", expected, actual);
                    false
                }
            }
            SourceQuery::NotFound => {
                warn!("Landing page has no title to verify.");
                false
            }
            SourceQuery::Faulted(fault) => {
                error!("Title check failed: {}", fault);
                false
            }
        }
    }

    /// Runs the full search-and-extract cycle for one keyword: wait for the
    /// listing to render, scan it for complete results, reconcile the first
    /// one. A registry fault abandons only this keyword.
    pub fn check_keyword(&self, keyword: &str) -> KeywordOutcome {
        info!("Searching for keyword: '{}'", keyword);

        let mut listing: Option<Vec<ResultEntry>> = None;
        let mut fault: Option<String> = None;

        let waited = self.poller.await_condition(|| match self.client.fetch_listing(keyword) {
            SourceQuery::Found(entries) => {
                listing = Some(entries);
                true
            }
            SourceQuery::NotFound => false,
            SourceQuery::Faulted(message) => {
                fault = Some(message);
                true
            }
        });

        if let Some(message) = fault {
            error!("Keyword '{}' abandoned: {}", keyword, message);
            return KeywordOutcome::without_report(KeywordStatus::Faulted);
        }

        let entries = match listing {
            Some(entries) => entries,
            None => {
                if waited == PollOutcome::TimedOut {
                    warn!(
                        "No result items found for '{}' within {:?}.",
                        keyword, self.config.wait_timeout
                    );
                }
                return KeywordOutcome::without_report(KeywordStatus::NoListing);
            }
        };

        info!("Listing rendered with {} result(s).", entries.len());

        let scan = scanner::scan_entries(
            &self.extractor,
            &entries,
            &REQUIRED_DATE_LABELS,
            self.config.stop_after,
        );

        if !scan.missing_labels.is_empty() {
            warn!("Missing required date(s): {}", scan.missing_labels.join(", "));
        }

        let complete_count = scan.qualifying.len();
        let dates = scan.qualifying.into_iter().next();

        if complete_count < self.config.stop_after {
            info!(
                "Found {} complete result(s) for '{}', need {}.",
                complete_count, keyword, self.config.stop_after
            );
            return KeywordOutcome {
                status: KeywordStatus::InsufficientResults,
                dates,
                report: None,
                missing_labels: scan.missing_labels,
            };
        }

        let report = dates.as_ref().and_then(reconciler::reconcile);
        if let Some(ref dates) = dates {
            log_dates(dates);
        }
        if let Some(ref report) = report {
            log_report(report);
        }

        KeywordOutcome {
            status: if report.is_some() {
                KeywordStatus::ReportProduced
            } else {
                KeywordStatus::InsufficientResults
            },
            dates,
            report,
            missing_labels: scan.missing_labels,
        }
    }
}

fn log_dates(dates: &DateMapping) {
    if let Some(publication) = dates.get("publication date") {
        info!("Publication date: {}", publication);
    }
    if let Some(grant) = dates.get("grant date") {
        info!("Grant date: {}", grant);
    }
    if let Some(filing) = dates.get("filing date") {
        info!("Filing date: {}", filing);
    }
}

fn log_report(report: &DateDifferenceReport) {
    info!(
        "Difference between publication and grant dates: {} days",
        report.publication_to_grant
    );
    info!(
        "Difference between publication and filing dates: {} days",
        report.publication_to_filing
    );
    info!(
        "Difference between grant and filing dates: {} days",
        report.grant_to_filing
    );
}
