use serde::Serialize;

use crate::extractor::DateMapping;

/// Pairwise absolute day differences between the three lifecycle dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateDifferenceReport {
    pub publication_to_grant: i64,
    pub publication_to_filing: i64,
    pub grant_to_filing: i64,
}

/// Computes the three pairwise day gaps from a complete date mapping.
///
/// Whole-day calendar arithmetic, absolute value only; the direction of a
/// gap is not reported. Returns None when any required date is absent,
/// which cannot happen for mappings that passed the completeness gate.
pub fn reconcile(dates: &DateMapping) -> Option<DateDifferenceReport> {
    let filing = dates.get("filing date")?;
    let publication = dates.get("publication date")?;
    let grant = dates.get("grant date")?;

    Some(DateDifferenceReport {
        publication_to_grant: grant.signed_duration_since(publication).num_days().abs(),
        publication_to_filing: publication.signed_duration_since(filing).num_days().abs(),
        grant_to_filing: grant.signed_duration_since(filing).num_days().abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn mapping(filing: (i32, u32, u32), publication: (i32, u32, u32), grant: (i32, u32, u32)) -> DateMapping {
        let mut dates = DateMapping::new();
        dates.insert_first("filing date", NaiveDate::from_ymd_opt(filing.0, filing.1, filing.2).unwrap());
        dates.insert_first(
            "publication date",
            NaiveDate::from_ymd_opt(publication.0, publication.1, publication.2).unwrap(),
        );
        dates.insert_first("grant date", NaiveDate::from_ymd_opt(grant.0, grant.1, grant.2).unwrap());
        dates
    }

    #[test]
    fn differences_are_absolute_regardless_of_date_order() {
        // Filing after publication, grant after both.
        let report = reconcile(&mapping((2020, 12, 20), (2021, 1, 1), (2021, 1, 11))).unwrap();

        assert_eq!(report.publication_to_grant, 10);
        assert_eq!(report.publication_to_filing, 12);
        assert_eq!(report.grant_to_filing, 22);
    }

    #[test]
    fn same_day_dates_yield_zero_differences() {
        let report = reconcile(&mapping((2021, 3, 15), (2021, 3, 15), (2021, 3, 15))).unwrap();

        assert_eq!(report.publication_to_grant, 0);
        assert_eq!(report.publication_to_filing, 0);
        assert_eq!(report.grant_to_filing, 0);
    }

    #[test]
    fn incomplete_mapping_produces_no_report() {
        let mut dates = DateMapping::new();
        dates.insert_first("filing date", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        dates.insert_first("grant date", NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());

        assert_eq!(reconcile(&dates), None);
    }

    #[test]
    fn extra_labels_are_ignored() {
        let mut dates = mapping((2019, 5, 1), (2020, 1, 1), (2020, 6, 1));
        dates.insert_first("expiry date", NaiveDate::from_ymd_opt(2039, 5, 1).unwrap());

        let report = reconcile(&dates).unwrap();
        assert_eq!(report.publication_to_grant, 152);
        assert_eq!(report.publication_to_filing, 245);
        assert_eq!(report.grant_to_filing, 397);
    }
}
