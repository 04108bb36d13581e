use std::fs::File;
use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};
use log::{error, info};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct KeywordRecord {
    #[serde(
        rename = "Keyword",
        alias = "keyword",
        alias = "Search Term",
        alias = "search term",
        alias = "Term",
        alias = "Query"
    )]
    pub keyword: String,
}

/// Loads the keyword list from a CSV or Excel file. A missing file or bad
/// rows are logged and yield an empty or partial list, never a panic.
pub fn load_keywords<P: AsRef<Path>>(filename: P) -> Vec<KeywordRecord> {
    let path_ref = filename.as_ref();

    if !path_ref.exists() {
        error!("Input file {:?} does not exist.", path_ref);
        return Vec::new();
    }

    let is_excel = path_ref
        .extension()
        .map_or(false, |ext| ext == "xlsx" || ext == "xls");

    if is_excel {
        return load_excel(path_ref);
    }

    // Default to CSV
    load_csv(path_ref)
}

fn load_csv(path: &Path) -> Vec<KeywordRecord> {
    let mut records = Vec::new();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            error!("Could not open CSV file: {}", e);
            return records;
        }
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    for result in rdr.deserialize() {
        match result {
            Ok(record) => {
                let record: KeywordRecord = record;
                if !record.keyword.trim().is_empty() {
                    records.push(record);
                }
            }
            Err(e) => {
                error!("Error parsing CSV record: {}", e);
            }
        }
    }
    info!("Loaded {} keyword(s) from CSV {:?}", records.len(), path);
    records
}

fn load_excel(path: &Path) -> Vec<KeywordRecord> {
    let mut records = Vec::new();
    let mut excel: Xlsx<_> = match open_workbook(path) {
        Ok(wb) => wb,
        Err(e) => {
            error!("Could not open Excel file: {}", e);
            return records;
        }
    };

    let worksheets = excel.worksheets();
    if let Some((_name, range)) = worksheets.first() {
        let mut keyword_idx = None;

        for (row_idx, row) in range.rows().enumerate() {
            if row_idx == 0 {
                // Header Row
                for (col_idx, cell) in row.iter().enumerate() {
                    let header = cell.to_string().to_lowercase();
                    if header.contains("keyword") || header.contains("term") || header.contains("query") {
                        keyword_idx = Some(col_idx);
                    }
                }

                if keyword_idx.is_none() {
                    error!("Excel header missing a 'Keyword' column");
                    return records;
                }
                continue;
            }

            // Data Rows
            let keyword = keyword_idx
                .and_then(|i| row.get(i))
                .map(|c| c.to_string())
                .unwrap_or_default();

            if !keyword.trim().is_empty() {
                records.push(KeywordRecord { keyword });
            }
        }
    }

    info!("Loaded {} keyword(s) from Excel {:?}", records.len(), path);
    records
}
