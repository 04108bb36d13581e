use std::time::Duration;

use log::warn;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::{Html, Selector};

use crate::extractor::ResultEntry;

pub const REGISTRY_URL: &str = "https://patinformed.wipo.int";

/// Outcome of one query against the registry page.
///
/// NotFound means the listing has not rendered (yet) and polling may
/// continue; Faulted means this keyword's cycle should be aborted. The
/// distinction keeps expected misses from being conflated with real faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceQuery<T> {
    Found(T),
    NotFound,
    Faulted(String),
}

pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new() -> Self {
        Self::with_base_url(REGISTRY_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        RegistryClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_random_user_agent(&self) -> &str {
        let uas = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
        ];
        use rand::Rng;
        let mut rng = rand::thread_rng();
        uas[rng.gen_range(0..uas.len())]
    }

    /// Fetches the search page for a keyword and parses its result listing.
    pub fn fetch_listing(&self, keyword: &str) -> SourceQuery<Vec<ResultEntry>> {
        let search_url = format!("{}/?q={}", self.base_url, urlencoding::encode(keyword));

        let html = match self.fetch_page(&search_url) {
            Ok(html) => html,
            Err(fault) => return SourceQuery::Faulted(fault),
        };

        let entries = parse_result_listing(&html);
        if entries.is_empty() {
            SourceQuery::NotFound
        } else {
            SourceQuery::Found(entries)
        }
    }

    /// Reads the landing page title, for the post-open sanity check.
    pub fn page_title(&self) -> SourceQuery<String> {
        let html = match self.fetch_page(&format!("{}/", self.base_url)) {
            Ok(html) => html,
            Err(fault) => return SourceQuery::Faulted(fault),
        };

        let document = Html::parse_document(&html);
        let title_selector = Selector::parse("title").unwrap();
        match document.select(&title_selector).next() {
            Some(title) => {
                let text = title.text().collect::<String>().trim().to_string();
                if text.is_empty() {
                    SourceQuery::NotFound
                } else {
                    SourceQuery::Found(text)
                }
            }
            None => SourceQuery::NotFound,
        }
    }

    fn fetch_page(&self, url: &str) -> Result<String, String> {
        let ua = self.get_random_user_agent();
        let resp = match self.client.get(url).header(USER_AGENT, ua).send() {
            Ok(resp) => resp,
            Err(e) => return Err(format!("request to {} failed: {}", url, e)),
        };

        let status = resp.status();
        if status.as_u16() == 403 || status.as_u16() == 429 {
            warn!("Blocked at {}: {}", url, status);
            return Err(format!("blocked with status {}", status));
        }
        if !status.is_success() {
            return Err(format!("{} returned status {}", url, status));
        }

        resp.text().map_err(|e| format!("failed to read {}: {}", url, e))
    }
}

/// Parses the rendered listing into plain row/cell text, one ResultEntry per
/// result box. The selectors mirror the registry page: each result is a
/// `li.result` holding a `table.patentDetails` of label/value rows.
pub fn parse_result_listing(html: &str) -> Vec<ResultEntry> {
    let document = Html::parse_document(html);
    let result_selector = Selector::parse("ul.results > li.result").unwrap();
    let row_selector = Selector::parse("table.patentDetails tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let mut entries = Vec::new();
    for result in document.select(&result_selector) {
        let mut rows = Vec::new();
        for row in result.select(&row_selector) {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<Vec<_>>().join(" ").trim().to_string())
                .collect();
            rows.push(cells);
        }
        entries.push(ResultEntry { rows });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_HTML: &str = r#"
        <html><head><title>Pat-INFORMED</title></head><body>
        <ul class="results">
          <li class="result">
            <h3>Medicine A</h3>
            <table class="patentDetails">
              <tr><td>Filing date</td><td>2019-05-01</td></tr>
              <tr><td>Publication date</td><td>2020-01-01 (pre-grant)</td></tr>
              <tr><td>Status</td><td>Granted</td></tr>
              <tr><td>Note</td></tr>
            </table>
          </li>
          <li class="result">
            <table class="patentDetails">
              <tr><td>Grant date</td><td>2020-06-01</td></tr>
            </table>
          </li>
        </ul>
        </body></html>"#;

    #[test]
    fn parses_listing_into_rows_and_cells() {
        let entries = parse_result_listing(LISTING_HTML);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].rows.len(), 4);
        assert_eq!(
            entries[0].rows[0],
            vec!["Filing date".to_string(), "2019-05-01".to_string()]
        );
        assert_eq!(entries[0].rows[1][1], "2020-01-01 (pre-grant)");
        // Single-cell rows are passed through; the extractor skips them.
        assert_eq!(entries[0].rows[3].len(), 1);
        assert_eq!(entries[1].rows[0][0], "Grant date");
    }

    #[test]
    fn page_without_listing_yields_no_entries() {
        let entries = parse_result_listing("<html><body><p>Loading results...</p></body></html>");
        assert!(entries.is_empty());
    }

    #[test]
    fn result_outside_listing_is_ignored() {
        let html = r#"<div class="result"><table class="patentDetails">
            <tr><td>Filing date</td><td>2019-05-01</td></tr></table></div>"#;
        assert!(parse_result_listing(html).is_empty());
    }
}
