/// Rain gauge CSV parser.
///
/// Parses the CSV export format used by the gauge networks feeding this
/// service: one measurement per line, columns
///
///   fecha_hora, P1, Codigo
///   (timestamp,  rainfall in mm, station identifier)
///
/// Timestamps appear either as `2024-11-01 00:02` or `11/1/2024 00:02`,
/// with or without seconds. Rows with an unparseable timestamp or a
/// negative rainfall value are dropped and counted, never fatal — field
/// exports are noisy and a partial run beats no run.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::model::{ForecastError, Reading};

/// Timestamp layouts accepted in gauge exports, tried in order.
const TIMESTAMP_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Result of parsing one CSV payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReadings {
    pub readings: Vec<Reading>,
    /// Rows skipped for an unparseable timestamp, a short line, or a
    /// negative/unparseable rainfall value.
    pub rows_dropped: usize,
}

/// Parses gauge CSV text into readings.
///
/// The first line is treated as a header and skipped. Malformed rows are
/// dropped and counted in `rows_dropped`; the parse itself never fails.
pub fn parse_readings_csv(csv: &str) -> ParsedReadings {
    let mut readings = Vec::new();
    let mut rows_dropped = 0;

    for (i, line) in csv.lines().enumerate() {
        if i == 0 || line.trim().is_empty() {
            continue; // Skip header or empty lines
        }

        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        if fields.len() < 3 {
            rows_dropped += 1;
            continue;
        }

        // InvalidTimestamp is recovered here: the row is dropped and
        // counted, the run continues.
        let timestamp = match parse_timestamp(fields[0]) {
            Ok(ts) => ts,
            Err(_) => {
                rows_dropped += 1;
                continue;
            }
        };

        let rainfall_mm: f64 = match fields[1].parse() {
            Ok(v) if v >= 0.0 => v,
            _ => {
                rows_dropped += 1;
                continue;
            }
        };

        let station_id = fields[2];
        if station_id.is_empty() {
            rows_dropped += 1;
            continue;
        }

        readings.push(Reading {
            station_id: station_id.to_string(),
            timestamp,
            rainfall_mm,
        });
    }

    ParsedReadings {
        readings,
        rows_dropped,
    }
}

/// Tries each accepted layout; gauge exports carry no offset, so naive
/// timestamps are taken as UTC without conversion.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ForecastError> {
    for layout in TIMESTAMP_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Ok(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }
    Err(ForecastError::InvalidTimestamp(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
