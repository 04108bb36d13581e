use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;

use chrono::Local;
use log::{error, info, warn};

use patent_scraper_lib::{delay_manager, input_loader, logger};
use patent_scraper_lib::{DateAudit, KeywordStatus, ProgressState, RegistryClient, RunConfig};

const EXPECTED_PAGE_TITLE: &str = "Pat-INFORMED";
const DEFAULT_INPUT_FILE: &str = "keywords.csv";
const DEFAULT_OUTPUT_FILE: &str = "date_report.csv";

const USAGE: &str = "Usage: patent_scraper [KEYWORD]... [--input FILE] [--output FILE] [--stop-after N] [--fresh]";

struct CliArgs {
    keywords: Vec<String>,
    input_file: Option<String>,
    output_file: String,
    stop_after: usize,
    fresh: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut parsed = CliArgs {
        keywords: Vec::new(),
        input_file: None,
        output_file: DEFAULT_OUTPUT_FILE.to_string(),
        stop_after: 2,
        fresh: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| "--input needs a file path".to_string())?;
                parsed.input_file = Some(value.clone());
            }
            "--output" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| "--output needs a file path".to_string())?;
                parsed.output_file = value.clone();
            }
            "--stop-after" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| "--stop-after needs a number".to_string())?;
                let n: usize = value
                    .parse()
                    .map_err(|_| format!("--stop-after needs a number, got '{}'", value))?;
                if n == 0 {
                    return Err("--stop-after must be at least 1".to_string());
                }
                parsed.stop_after = n;
            }
            "--fresh" => parsed.fresh = true,
            other if other.starts_with("--") => {
                return Err(format!("Unknown option: {}", other));
            }
            keyword => parsed.keywords.push(keyword.to_string()),
        }
        i += 1;
    }

    Ok(parsed)
}

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    info!("Starting Pat-INFORMED date checker...");

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    // 1. Resolve keywords: CLI args first, keyword file as fallback
    let mut keywords = args.keywords.clone();
    if keywords.is_empty() {
        let input_file = args
            .input_file
            .clone()
            .unwrap_or_else(|| DEFAULT_INPUT_FILE.to_string());
        keywords = input_loader::load_keywords(&input_file)
            .into_iter()
            .map(|record| record.keyword)
            .collect();
    }
    if keywords.is_empty() {
        error!("No keywords to check. Pass keywords as arguments or provide an input file with a 'Keyword' column.");
        return Ok(());
    }

    // 2. Load Resume State
    let mut progress = if args.fresh {
        ProgressState::default()
    } else {
        ProgressState::load()
    };

    // 3. Initialize the audit pipeline
    let config = RunConfig {
        stop_after: args.stop_after,
        ..RunConfig::default()
    };
    let audit = DateAudit::new(RegistryClient::new(), config);

    audit.verify_title(EXPECTED_PAGE_TITLE);

    // 4. Initialize CSV Writer
    let file_exists = Path::new(&args.output_file).exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.output_file)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    if !file_exists {
        csv_writer.write_record([
            "keyword",
            "status",
            "filing_date",
            "publication_date",
            "grant_date",
            "publication_grant_days",
            "publication_filing_days",
            "grant_filing_days",
            "missing_labels",
            "timestamp",
        ])?;
        csv_writer.flush()?;
    }

    let total = keywords.len();
    let mut processed_count = 0;

    for (i, keyword) in keywords.iter().enumerate() {
        let unique_id = keyword.trim().to_string();

        if progress.contains(&unique_id) {
            continue;
        }

        processed_count += 1;
        info!("Processing {} / {} : {}", i + 1, total, keyword);

        // DELAY between keywords
        if processed_count > 1 {
            delay_manager::random_keyword_delay();
        }

        let outcome = audit.check_keyword(keyword);

        let status_str = match outcome.status {
            KeywordStatus::ReportProduced => "report",
            KeywordStatus::InsufficientResults => "insufficient_results",
            KeywordStatus::NoListing => "no_listing",
            KeywordStatus::Faulted => "faulted",
        };

        if outcome.report.is_none() {
            warn!("No comparable dates found for '{}'.", keyword);
        }

        let date_str = |label: &str| {
            outcome
                .dates
                .as_ref()
                .and_then(|dates| dates.get(label))
                .map(|date| date.to_string())
                .unwrap_or_default()
        };
        let day_str = |days: Option<i64>| days.map(|d| d.to_string()).unwrap_or_default();

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let row = vec![
            keyword.clone(),
            status_str.to_string(),
            date_str("filing date"),
            date_str("publication date"),
            date_str("grant date"),
            day_str(outcome.report.map(|r| r.publication_to_grant)),
            day_str(outcome.report.map(|r| r.publication_to_filing)),
            day_str(outcome.report.map(|r| r.grant_to_filing)),
            outcome.missing_labels.join("; "),
            timestamp,
        ];

        if let Err(e) = csv_writer.write_record(&row) {
            error!("Failed to write report row for {}: {}", keyword, e);
        }
        csv_writer.flush()?;

        // Update Progress
        progress.mark_complete(unique_id);
    }

    info!("Run completed. Processed {} new keyword(s).", processed_count);
    Ok(())
}
