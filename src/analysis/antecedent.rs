/// Antecedent rainfall aggregation.
///
/// Builds the classifier's input features: for each station, rolling sums of
/// daily rainfall over trailing windows of 1, 2, 3, 15 and 30 days, reported
/// for the station's most recent day on record only. "Antecedent rain before
/// today plus today's rain" — the windows include the current day.
///
/// Windows are record-based over the date-sorted series: a gap in the record
/// shortens the window rather than being zero-filled, because missing input
/// must yield missing (not fabricated) rainfall.

use crate::model::{DailyRecord, FeatureVector};
use crate::resample::StationDaily;

/// Trailing window lengths, in days, in model column order.
pub const ANTECEDENT_WINDOWS: [usize; 5] = [1, 2, 3, 15, 30];

/// Rolling sum of `rain_mm` over the trailing `k` records inclusive of the
/// current one, for every index of a date-sorted series.
///
/// The first `k - 1` positions hold partial sums over whatever history is
/// available (minimum one record) — short history degrades gracefully
/// instead of producing missing features.
pub fn rolling_sums(series: &[DailyRecord], k: usize) -> Vec<f64> {
    assert!(k >= 1, "window length must be at least one day");

    let mut sums = Vec::with_capacity(series.len());
    let mut acc = 0.0;
    for i in 0..series.len() {
        acc += series[i].rain_mm;
        if i >= k {
            acc -= series[i - k].rain_mm;
        }
        sums.push(acc);
    }
    sums
}

/// Computes one `FeatureVector` per station from the per-station daily
/// grouping, using only the most recent day on record for each station.
///
/// The grouping's series are sorted by date ascending, so the last element
/// is the max-date record — the selection is a property of the sorted data,
/// not of input encounter order. Stations with an empty series are skipped.
pub fn compute_features(daily: &StationDaily) -> Vec<FeatureVector> {
    let mut features = Vec::new();

    for (station_id, series) in daily {
        let Some(latest) = series.last() else {
            continue; // no records — skipped, not an error
        };

        let last = series.len() - 1;
        let windows: Vec<f64> = ANTECEDENT_WINDOWS
            .iter()
            .map(|&k| rolling_sums(series, k)[last])
            .collect();

        features.push(FeatureVector {
            station_id: station_id.clone(),
            as_of: latest.day,
            daily_rain: latest.rain_mm,
            window_1: windows[0],
            window_2: windows[1],
            window_3: windows[2],
            window_15: windows[3],
            window_30: windows[4],
        });
    }

    features
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resample::group_daily;
    use chrono::NaiveDate;

    fn daily_run(station: &str, start: (i32, u32, u32), rains: &[f64]) -> Vec<DailyRecord> {
        let first = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        rains
            .iter()
            .enumerate()
            .map(|(i, &mm)| DailyRecord {
                station_id: station.to_string(),
                day: first + chrono::Duration::days(i as i64),
                rain_mm: mm,
            })
            .collect()
    }

    #[test]
    fn test_constant_series_windows_scale_with_length() {
        // 35 consecutive days of 2.5 mm: window_30 must be exactly 30r and
        // window_1 exactly r.
        let records = daily_run("2701", (2024, 10, 1), &[2.5; 35]);
        let features = compute_features(&group_daily(&records));

        assert_eq!(features.len(), 1);
        let fv = &features[0];
        assert!((fv.window_1 - 2.5).abs() < 1e-12);
        assert!((fv.window_2 - 5.0).abs() < 1e-12);
        assert!((fv.window_3 - 7.5).abs() < 1e-12);
        assert!((fv.window_15 - 37.5).abs() < 1e-12);
        assert!((fv.window_30 - 75.0).abs() < 1e-12);
        assert!((fv.daily_rain - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_day_history_fills_every_window() {
        let records = daily_run("2701", (2024, 11, 1), &[7.0]);
        let features = compute_features(&group_daily(&records));

        assert_eq!(features.len(), 1);
        let fv = &features[0];
        for w in [fv.window_1, fv.window_2, fv.window_3, fv.window_15, fv.window_30] {
            assert!((w - 7.0).abs() < 1e-12, "partial windows must equal the single day");
        }
    }

    #[test]
    fn test_partial_window_uses_available_history() {
        // Three days of history: window_15 covers just those three days.
        let records = daily_run("2701", (2024, 11, 1), &[1.0, 2.0, 4.0]);
        let features = compute_features(&group_daily(&records));

        let fv = &features[0];
        assert!((fv.window_3 - 7.0).abs() < 1e-12);
        assert!((fv.window_15 - 7.0).abs() < 1e-12);
        assert!((fv.window_30 - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_only_latest_day_reported_per_station() {
        let records = daily_run("2701", (2024, 11, 1), &[1.0, 2.0, 4.0, 8.0]);
        let features = compute_features(&group_daily(&records));

        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].as_of,
            NaiveDate::from_ymd_opt(2024, 11, 4).unwrap()
        );
        assert!((features[0].daily_rain - 8.0).abs() < 1e-12);
        // window_2 = yesterday + today
        assert!((features[0].window_2 - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_selection_independent_of_input_order() {
        let mut records = daily_run("2701", (2024, 11, 1), &[1.0, 2.0, 4.0]);
        records.reverse();
        let features = compute_features(&group_daily(&records));

        assert_eq!(
            features[0].as_of,
            NaiveDate::from_ymd_opt(2024, 11, 3).unwrap()
        );
        assert!((features[0].window_3 - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_station_with_no_records_is_skipped() {
        let mut daily = group_daily(&daily_run("2701", (2024, 11, 1), &[3.0]));
        daily.insert("ghost".to_string(), Vec::new());

        let features = compute_features(&daily);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].station_id, "2701");
    }

    #[test]
    fn test_multiple_stations_each_get_one_vector() {
        let mut records = daily_run("2701", (2024, 11, 1), &[1.0, 2.0]);
        records.extend(daily_run("2702", (2024, 11, 1), &[5.0]));
        let features = compute_features(&group_daily(&records));

        assert_eq!(features.len(), 2);
    }

    #[test]
    fn test_rolling_sums_window_arithmetic() {
        let records = daily_run("2701", (2024, 11, 1), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(rolling_sums(&records, 2), vec![1.0, 3.0, 5.0, 7.0]);
        assert_eq!(rolling_sums(&records, 1), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(rolling_sums(&records, 10), vec![1.0, 3.0, 6.0, 10.0]);
    }
}
