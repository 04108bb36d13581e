use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use log::{error, info};
use serde::{Deserialize, Serialize};

const PROGRESS_FILE: &str = "progress.json";

/// Keywords already checked in earlier runs, so an interrupted multi-keyword
/// run can pick up where it left off.
#[derive(Serialize, Deserialize, Default)]
pub struct ProgressState {
    pub processed_keywords: HashSet<String>,
}

impl ProgressState {
    pub fn load() -> Self {
        if Path::new(PROGRESS_FILE).exists() {
            let mut file = match File::open(PROGRESS_FILE) {
                Ok(f) => f,
                Err(e) => {
                    error!("Failed to open progress file: {}", e);
                    return ProgressState::default();
                }
            };
            let mut content = String::new();
            if let Err(e) = file.read_to_string(&mut content) {
                error!("Failed to read progress file: {}", e);
                return ProgressState::default();
            }
            match serde_json::from_str::<ProgressState>(&content) {
                Ok(state) => {
                    info!(
                        "Resumed previous session: {} keyword(s) already checked.",
                        state.processed_keywords.len()
                    );
                    state
                }
                Err(e) => {
                    error!("Failed to parse progress file: {}. Starting fresh.", e);
                    ProgressState::default()
                }
            }
        } else {
            info!("No progress file found. Starting fresh.");
            ProgressState::default()
        }
    }

    pub fn mark_complete(&mut self, keyword: String) {
        self.processed_keywords.insert(keyword);
        self.save();
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.processed_keywords.contains(keyword)
    }

    fn save(&self) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(j) => j,
            Err(e) => {
                error!("Failed to serialize progress state: {}", e);
                return;
            }
        };

        let mut file = match OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(PROGRESS_FILE)
        {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to open progress file for writing: {}", e);
                return;
            }
        };

        if let Err(e) = file.write_all(json.as_bytes()) {
            error!("Failed to write to progress file: {}", e);
        }
    }
}
