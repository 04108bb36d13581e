// tests/date_flow.rs
//
// End-to-end extraction flow over a plain entry sequence, no network:
// listing parse -> scan -> reconcile.

use patent_scraper_lib::registry::parse_result_listing;
use patent_scraper_lib::{reconciler, scan_entries, DateExtractor, ResultEntry, REQUIRED_DATE_LABELS};

fn entry(rows: &[(&str, &str)]) -> ResultEntry {
    ResultEntry {
        rows: rows
            .iter()
            .map(|(label, value)| vec![label.to_string(), value.to_string()])
            .collect(),
    }
}

#[test]
fn second_and_third_entries_qualify_and_first_of_them_is_reconciled() {
    let entries = vec![
        // Incomplete: missing grant date.
        entry(&[
            ("Filing date", "2019-05-01"),
            ("Publication date", "2020-01-01"),
        ]),
        entry(&[
            ("Filing date", "2019-05-01"),
            ("Publication date", "2020-01-01"),
            ("Grant date", "2020-06-01"),
        ]),
        entry(&[
            ("Filing date", "2018-01-01"),
            ("Publication date", "2018-06-01"),
            ("Grant date", "2018-12-01"),
        ]),
    ];

    let scan = scan_entries(&DateExtractor::new(), &entries, &REQUIRED_DATE_LABELS, 2);

    assert_eq!(scan.qualifying.len(), 2);
    assert_eq!(scan.entries_examined, 3);
    assert!(scan.missing_labels.is_empty());
    assert_eq!(
        scan.qualifying[0].get("grant date").map(|d| d.to_string()),
        Some("2020-06-01".to_string())
    );
    assert_eq!(
        scan.qualifying[1].get("grant date").map(|d| d.to_string()),
        Some("2018-12-01".to_string())
    );

    let report = reconciler::reconcile(&scan.qualifying[0]).unwrap();
    assert_eq!(report.publication_to_grant, 152);
    assert_eq!(report.publication_to_filing, 245);
    assert_eq!(report.grant_to_filing, 397);
}

#[test]
fn listing_with_one_complete_result_is_insufficient_under_the_two_result_gate() {
    let entries = vec![
        entry(&[
            ("Filing date", "2019-05-01"),
            ("Publication date", "2020-01-01"),
            ("Grant date", "2020-06-01"),
        ]),
        entry(&[("Filing date", "2019-05-01")]),
    ];

    let scan = scan_entries(&DateExtractor::new(), &entries, &REQUIRED_DATE_LABELS, 2);

    assert_eq!(scan.qualifying.len(), 1);
    assert_eq!(scan.entries_examined, 2);
    assert!(scan.missing_labels.is_empty());
}

#[test]
fn rendered_page_flows_through_to_a_difference_report() {
    let html = r#"
        <html><body>
        <ul class="results">
          <li class="result">
            <table class="patentDetails">
              <tr><td>Filing date</td><td>2019-05-01</td></tr>
              <tr><td>Publication date</td><td>2020-01-01 (pre-grant)</td></tr>
              <tr><td>Grant date</td><td>2020-06-01</td></tr>
            </table>
          </li>
          <li class="result">
            <table class="patentDetails">
              <tr><td>Filing date</td><td>2018-01-01</td></tr>
              <tr><td>Publication date</td><td>2018-06-01</td></tr>
              <tr><td>Grant date</td><td>2018-12-01</td></tr>
            </table>
          </li>
        </ul>
        </body></html>"#;

    let entries = parse_result_listing(html);
    assert_eq!(entries.len(), 2);

    let scan = scan_entries(&DateExtractor::new(), &entries, &REQUIRED_DATE_LABELS, 2);
    assert_eq!(scan.qualifying.len(), 2);

    let report = reconciler::reconcile(&scan.qualifying[0]).unwrap();
    assert_eq!(report.publication_to_grant, 152);
    assert_eq!(report.publication_to_filing, 245);
    assert_eq!(report.grant_to_filing, 397);
}
