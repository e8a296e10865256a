use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::models::{Observation, PeriodRow, Series};

pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Read long-form observations (`series_id,date,value`) from a CSV export.
/// Unknown series codes and unparseable values are skipped, matching the
/// acquisition feed where missing observations appear as ".".
pub fn load_observations(csv_path: &Path) -> anyhow::Result<Vec<Observation>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        series_id: String,
        date: NaiveDate,
        value: String,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut observations = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let Some(series) = Series::from_code(&row.series_id) else {
            continue;
        };
        let Ok(value) = row.value.trim().parse::<f64>() else {
            continue;
        };
        observations.push(Observation {
            series,
            date: row.date,
            value,
        });
    }

    Ok(observations)
}

/// Rebase a series so the baseline month's value is 100. Baseline fallback:
/// nearest non-null at-or-before the baseline, else first non-null at-or-after,
/// else first non-null anywhere. A null or zero resolved baseline collapses
/// the whole series to 0.0 rather than erroring on sparse history.
pub fn normalize_index(
    series: &[(NaiveDate, Option<f64>)],
    baseline: NaiveDate,
) -> Vec<(NaiveDate, Option<f64>)> {
    let mut sorted = series.to_vec();
    sorted.sort_by_key(|(date, _)| *date);

    let base = sorted
        .iter()
        .rev()
        .find(|(date, value)| *date <= baseline && value.is_some())
        .or_else(|| {
            sorted
                .iter()
                .find(|(date, value)| *date >= baseline && value.is_some())
        })
        .or_else(|| sorted.iter().find(|(_, value)| value.is_some()))
        .and_then(|(_, value)| *value);

    match base {
        Some(base) if base != 0.0 => sorted
            .iter()
            .map(|(date, value)| (*date, value.map(|v| v / base * 100.0)))
            .collect(),
        _ => sorted.iter().map(|(date, _)| (*date, Some(0.0))).collect(),
    }
}

/// Pivot observations into one row per calendar month, deduplicating by
/// (series, month) with the last-seen value winning, then rebase every series
/// except the unemployment rate to the baseline month.
pub fn build_period_rows(observations: &[Observation], baseline: NaiveDate) -> Vec<PeriodRow> {
    let mut months: BTreeMap<NaiveDate, HashMap<Series, f64>> = BTreeMap::new();
    for obs in observations {
        months
            .entry(month_start(obs.date))
            .or_default()
            .insert(obs.series, obs.value);
    }

    let dates: Vec<NaiveDate> = months.keys().copied().collect();
    let column = |series: Series| -> Vec<(NaiveDate, Option<f64>)> {
        dates
            .iter()
            .map(|date| {
                (
                    *date,
                    months.get(date).and_then(|row| row.get(&series)).copied(),
                )
            })
            .collect()
    };

    // A series with no observations at all stays absent instead of degrading
    // to the all-zero baseline policy.
    let indexed = |series: Series| -> Vec<(NaiveDate, Option<f64>)> {
        let raw = column(series);
        if raw.iter().any(|(_, value)| value.is_some()) {
            normalize_index(&raw, month_start(baseline))
        } else {
            raw
        }
    };

    let unemp = column(Series::UnemploymentRate);
    let openings = indexed(Series::JobOpenings);
    let hires = indexed(Series::Hires);
    let quits = indexed(Series::Quits);
    let cpi = indexed(Series::Cpi);

    dates
        .iter()
        .enumerate()
        .map(|(i, date)| PeriodRow {
            date: *date,
            unemp_rate: unemp[i].1,
            job_openings_index: openings[i].1,
            hires_index: hires[i].1,
            quits_index: quits[i].1,
            cpi_index: cpi[i].1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    #[test]
    fn baseline_month_normalizes_to_exactly_100() {
        let series = vec![
            (date(2020, 1), Some(50.0)),
            (date(2020, 2), Some(75.0)),
            (date(2020, 3), Some(100.0)),
        ];
        let normalized = normalize_index(&series, date(2020, 1));
        assert_eq!(normalized[0].1, Some(100.0));
        assert_eq!(normalized[1].1, Some(150.0));
        assert_eq!(normalized[2].1, Some(200.0));
    }

    #[test]
    fn missing_baseline_falls_back_to_value_before() {
        let series = vec![
            (date(2020, 1), Some(40.0)),
            (date(2020, 2), Some(80.0)),
            (date(2020, 6), Some(120.0)),
        ];
        // Baseline 2020-04 is absent; nearest at-or-before is 2020-02.
        let normalized = normalize_index(&series, date(2020, 4));
        assert_eq!(normalized[1].1, Some(100.0));
        assert_eq!(normalized[2].1, Some(150.0));
    }

    #[test]
    fn baseline_before_series_start_uses_first_value_after() {
        let series = vec![(date(2021, 5), Some(20.0)), (date(2021, 6), Some(30.0))];
        let normalized = normalize_index(&series, date(2019, 12));
        assert_eq!(normalized[0].1, Some(100.0));
        assert_eq!(normalized[1].1, Some(150.0));
    }

    #[test]
    fn zero_baseline_collapses_series_to_zero() {
        let series = vec![(date(2020, 1), Some(0.0)), (date(2020, 2), Some(5.0))];
        let normalized = normalize_index(&series, date(2020, 1));
        assert!(normalized.iter().all(|(_, value)| *value == Some(0.0)));
    }

    #[test]
    fn nulls_are_preserved_not_interpolated() {
        let series = vec![
            (date(2020, 1), Some(50.0)),
            (date(2020, 2), None),
            (date(2020, 3), Some(60.0)),
        ];
        let normalized = normalize_index(&series, date(2020, 1));
        assert_eq!(normalized[1].1, None);
        assert_eq!(normalized[2].1, Some(120.0));
    }

    #[test]
    fn renormalizing_to_the_same_baseline_is_identity() {
        let series = vec![
            (date(2020, 1), Some(50.0)),
            (date(2020, 2), Some(65.0)),
            (date(2020, 3), Some(80.0)),
        ];
        let once = normalize_index(&series, date(2020, 2));
        let twice = normalize_index(&once, date(2020, 2));
        for (a, b) in once.iter().zip(twice.iter()) {
            let (a, b) = (a.1.unwrap(), b.1.unwrap());
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn duplicate_months_keep_last_seen_value() {
        let observations = vec![
            Observation {
                series: Series::UnemploymentRate,
                date: date(2020, 1),
                value: 4.0,
            },
            Observation {
                series: Series::UnemploymentRate,
                date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
                value: 4.2,
            },
        ];
        let rows = build_period_rows(&observations, date(2020, 1));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unemp_rate, Some(4.2));
    }

    #[test]
    fn months_are_sorted_ascending() {
        let observations = vec![
            Observation {
                series: Series::UnemploymentRate,
                date: date(2020, 3),
                value: 4.4,
            },
            Observation {
                series: Series::UnemploymentRate,
                date: date(2020, 1),
                value: 4.0,
            },
        ];
        let rows = build_period_rows(&observations, date(2020, 1));
        assert_eq!(rows[0].date, date(2020, 1));
        assert_eq!(rows[1].date, date(2020, 3));
    }

    #[test]
    fn absent_series_stays_absent_instead_of_zeroed() {
        let observations = vec![Observation {
            series: Series::UnemploymentRate,
            date: date(2020, 1),
            value: 4.0,
        }];
        let rows = build_period_rows(&observations, date(2020, 1));
        assert_eq!(rows[0].job_openings_index, None);
        assert_eq!(rows[0].cpi_index, None);
    }
}
