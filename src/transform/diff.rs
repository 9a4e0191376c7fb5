use std::collections::BTreeMap;

use tracing::warn;

use crate::{parse::RawCaseRecord, transform::DailyValue};

/// Convert cumulative totals into day-over-day deltas, independently per municipality.
///
/// Output is grouped by municipality (codes ascending) and sorted by date within each group;
/// the smoothing stage relies on that layout. The first valid record of a municipality keeps
/// its cumulative total as the delta. Negative deltas are kept. Null records get no delta and
/// do not reset the chain. Totals above `i64::MAX` cannot be differenced and are treated
/// like nulls.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn difference(records: &[RawCaseRecord]) -> Vec<DailyValue> {
    let mut by_municipality: BTreeMap<&str, Vec<&RawCaseRecord>> = BTreeMap::new();
    for r in records {
        by_municipality
            .entry(r.municipality_code.as_str())
            .or_default()
            .push(r);
    }

    let mut out = Vec::with_capacity(records.len());
    for (code, mut rows) in by_municipality {
        // Stable: duplicate dates keep input order.
        rows.sort_by_key(|r| r.report_date);

        let mut prev: Option<i64> = None;
        for r in rows {
            let total = r.cumulative_total.and_then(|total| {
                let signed = i64::try_from(total).ok();
                if signed.is_none() {
                    warn!(
                        municipality = %code,
                        date = %r.report_date,
                        total,
                        "cumulative total out of range"
                    );
                }
                signed
            });
            // Both sides are non-negative, so the subtraction cannot overflow.
            let delta = total.map(|total| {
                let delta = total - prev.unwrap_or(0);
                prev = Some(total);
                delta
            });
            out.push(DailyValue::stub(r.report_date, code, delta));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, day).unwrap()
    }

    fn deltas(values: &[DailyValue], code: &str) -> Vec<Option<i64>> {
        values
            .iter()
            .filter(|v| v.municipality_code == code)
            .map(|v| v.daily_delta)
            .collect()
    }

    #[test]
    fn first_delta_is_the_baseline_and_corrections_stay_negative() {
        let records = vec![
            RawCaseRecord::new(d(3), "GM0003", 100),
            RawCaseRecord::new(d(1), "GM0003", 100),
            RawCaseRecord::new(d(2), "GM0003", 90),
            RawCaseRecord::new(d(1), "GM0001", 10),
        ];
        let out = difference(&records);
        assert_eq!(out.len(), 4);
        assert_eq!(deltas(&out, "GM0003"), [Some(100), Some(-10), Some(10)]);
        assert_eq!(deltas(&out, "GM0001"), [Some(10)]);
        assert_eq!(out[0].municipality_code, "GM0001");
        assert!(out[1..].windows(2).all(|w| w[0].report_date < w[1].report_date));
    }

    #[test]
    fn nulls_are_skipped_in_the_chain() {
        let records = vec![
            RawCaseRecord::new(d(1), "GM0001", 5),
            RawCaseRecord {
                report_date: d(2),
                municipality_code: "GM0001".into(),
                cumulative_total: None,
            },
            RawCaseRecord::new(d(3), "GM0001", 9),
        ];
        assert_eq!(
            deltas(&difference(&records), "GM0001"),
            [Some(5), None, Some(4)]
        );
    }

    #[test]
    fn duplicate_dates_do_not_panic() {
        let records = vec![
            RawCaseRecord::new(d(1), "GM0001", 5),
            RawCaseRecord::new(d(1), "GM0001", 7),
        ];
        assert_eq!(deltas(&difference(&records), "GM0001"), [Some(5), Some(2)]);
    }

    #[test]
    fn oversized_totals_do_not_wrap() {
        let records = vec![
            RawCaseRecord::new(d(1), "GM0001", 5),
            RawCaseRecord::new(d(2), "GM0001", u64::MAX),
            RawCaseRecord::new(d(3), "GM0001", 8),
        ];
        assert_eq!(
            deltas(&difference(&records), "GM0001"),
            [Some(5), None, Some(3)]
        );
        assert_eq!(
            deltas(&difference(&[RawCaseRecord::new(d(1), "GM0001", u64::MAX)]), "GM0001"),
            [None]
        );
    }

    #[test]
    fn deltas_reconstruct_cumulative_totals() {
        let totals = [3u64, 3, 8, 6, 20, 21];
        let records: Vec<_> = totals
            .iter()
            .enumerate()
            .map(|(i, t)| RawCaseRecord::new(d(i as u32 + 1), "GM0001", *t))
            .collect();
        let out = difference(&records);
        let mut running = 0i64;
        for (v, total) in out.iter().zip(totals) {
            running += v.daily_delta.unwrap();
            assert_eq!(running, total as i64);
        }
    }
}
