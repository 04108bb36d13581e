pub mod date_parser;
pub mod delay_manager;
pub mod extractor;
pub mod input_loader;
pub mod logger;
pub mod pipeline;
pub mod poller;
pub mod reconciler;
pub mod registry;
pub mod resume_manager;
pub mod scanner;

// Exporting types for convenience
pub use date_parser::DateParser;
pub use extractor::{DateExtractor, DateMapping, ResultEntry};
pub use input_loader::KeywordRecord;
pub use pipeline::{DateAudit, KeywordOutcome, KeywordStatus, RunConfig};
pub use poller::{PollOutcome, WaitPoller};
pub use reconciler::DateDifferenceReport;
pub use registry::{RegistryClient, SourceQuery};
pub use resume_manager::ProgressState;
pub use scanner::{scan_entries, ScanOutcome, REQUIRED_DATE_LABELS};
