//! Data handoff to the weight chart renderer.
//!
//! Rendering itself lives outside this crate; the core only assembles the
//! sorted series and the optional goal line the renderer consumes.

use chrono::NaiveDate;

use super::entities::WeightRecord;

/// Everything the line chart needs. An empty series with no target is a valid input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightSeries {
    pub points: Vec<(NaiveDate, f64)>,
    pub target: Option<f64>,
}

/// Assembles the chart input. Duplicate dates are all kept; the sort is stable so same-day
/// entries stay in insertion order.
pub fn weight_series(records: &[WeightRecord], target: Option<f64>) -> WeightSeries {
    let mut points: Vec<_> = records.iter().map(|r| (r.date, r.weight)).collect();
    points.sort_by_key(|(date, _)| *date);
    WeightSeries { points, target }
}

/// Status line shown next to the chart and in the weight list.
pub fn target_label(target: Option<f64>) -> String {
    match target {
        Some(value) => format!("Current target: {value}kg"),
        None => "No target set".into(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use crate::store::entities::WeightRecord;

    use super::{target_label, weight_series, WeightSeries};

    fn record(date: NaiveDate, weight: f64) -> WeightRecord {
        WeightRecord {
            date,
            weight,
            note: String::new(),
            created_time: Utc::now(),
            updated_time: Utc::now(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 7, d).unwrap()
    }

    #[test]
    fn empty_journal_yields_a_valid_empty_series() {
        assert_eq!(weight_series(&[], None), WeightSeries::default());
    }

    #[test]
    fn points_sort_ascending_and_keep_duplicate_dates() {
        let records = [record(day(9), 72.0), record(day(3), 73.5), record(day(9), 71.8)];
        let series = weight_series(&records, Some(70.0));

        assert_eq!(
            series.points,
            vec![(day(3), 73.5), (day(9), 72.0), (day(9), 71.8)]
        );
        assert_eq!(series.target, Some(70.0));
    }

    #[test]
    fn target_labels() {
        assert_eq!(target_label(Some(70.0)), "Current target: 70kg");
        assert_eq!(target_label(None), "No target set");
    }
}
