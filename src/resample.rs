/// Time series resampling: raw readings → hourly totals → daily totals.
///
/// Raw gauge readings arrive at arbitrary sub-hourly intervals, unordered
/// and possibly duplicated. `to_hourly` buckets them into clock hours and
/// `to_daily` rolls hours up into calendar days, both by group-and-sum.
/// Output is always sorted by (station_id, time), so downstream windowing
/// can binary-search or scan without re-sorting.
///
/// `group_hourly` / `group_daily` build the per-station groupings that the
/// antecedent aggregator and threshold evaluator both consume; building the
/// grouping once here keeps the stages from each re-deriving it.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use crate::model::{DailyRecord, HourlyRecord, Reading};

/// Per-station hourly series, each sorted by hour ascending.
pub type StationHourly = BTreeMap<String, Vec<HourlyRecord>>;

/// Per-station daily series, each sorted by day ascending.
pub type StationDaily = BTreeMap<String, Vec<DailyRecord>>;

// ---------------------------------------------------------------------------
// Resampling
// ---------------------------------------------------------------------------

/// Buckets raw readings into hourly totals per station.
///
/// Each timestamp is truncated to the start of its hour; all readings in the
/// same (station, hour) bucket are summed. Input order is irrelevant. The
/// result is sorted by (station_id, hour) and holds at most one record per
/// bucket.
pub fn to_hourly(readings: &[Reading]) -> Vec<HourlyRecord> {
    let mut buckets: BTreeMap<(String, DateTime<Utc>), f64> = BTreeMap::new();

    for reading in readings {
        let hour = truncate_to_hour(reading.timestamp);
        *buckets
            .entry((reading.station_id.clone(), hour))
            .or_insert(0.0) += reading.rainfall_mm;
    }

    buckets
        .into_iter()
        .map(|((station_id, hour), rain_mm)| HourlyRecord {
            station_id,
            hour,
            rain_mm,
        })
        .collect()
}

/// Rolls hourly totals up into daily totals per station.
///
/// The day is the hour bucket's calendar date in the input's own timezone
/// convention — no conversion is applied. Result sorted by (station_id, day),
/// one record per (station, day).
pub fn to_daily(hourly: &[HourlyRecord]) -> Vec<DailyRecord> {
    let mut buckets: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();

    for record in hourly {
        let day = record.hour.date_naive();
        *buckets
            .entry((record.station_id.clone(), day))
            .or_insert(0.0) += record.rain_mm;
    }

    buckets
        .into_iter()
        .map(|((station_id, day), rain_mm)| DailyRecord {
            station_id,
            day,
            rain_mm,
        })
        .collect()
}

fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    // Minutes/seconds/nanos zeroed; hour 0..=23 is always in range, so the
    // with_* chain cannot fail.
    ts.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Groups a flat hourly series into a map keyed by station, each series
/// sorted by hour ascending.
pub fn group_hourly(records: &[HourlyRecord]) -> StationHourly {
    let mut grouped: StationHourly = BTreeMap::new();
    for record in records {
        grouped
            .entry(record.station_id.clone())
            .or_default()
            .push(record.clone());
    }
    for series in grouped.values_mut() {
        series.sort_by_key(|r| r.hour);
    }
    grouped
}

/// Groups a flat daily series into a map keyed by station, each series
/// sorted by day ascending.
pub fn group_daily(records: &[DailyRecord]) -> StationDaily {
    let mut grouped: StationDaily = BTreeMap::new();
    for record in records {
        grouped
            .entry(record.station_id.clone())
            .or_default()
            .push(record.clone());
    }
    for series in grouped.values_mut() {
        series.sort_by_key(|r| r.day);
    }
    grouped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
