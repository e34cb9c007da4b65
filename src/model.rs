/// Core data types for the landslide forecasting service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond simple accessors, no I/O, and no external
/// dependencies besides chrono — only types.

use chrono::{DateTime, NaiveDate, Utc};

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// A single raw rainfall measurement from a gauge station.
///
/// Readings arrive unordered, possibly duplicated, at arbitrary sub-hourly
/// intervals. They are immutable once parsed; all cleanup happens downstream
/// in the resampler.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub station_id: String,
    pub timestamp: DateTime<Utc>,
    pub rainfall_mm: f64,
}

/// Rainfall accumulated over one clock hour at one station.
///
/// `hour` is the timestamp truncated to the start of its hour. The resampler
/// guarantees at most one record per (station_id, hour); `rain_mm` is the sum
/// of all readings falling inside that hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub station_id: String,
    pub hour: DateTime<Utc>,
    pub rain_mm: f64,
}

/// Rainfall accumulated over one calendar day at one station.
///
/// One record per (station_id, day), equal to the sum of that day's
/// `HourlyRecord`s. The day is taken in the input's own timezone convention;
/// no conversion is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub station_id: String,
    pub day: NaiveDate,
    pub rain_mm: f64,
}

// ---------------------------------------------------------------------------
// Feature types
// ---------------------------------------------------------------------------

/// Antecedent-rainfall feature vector for one station, as of its most recent
/// day on record.
///
/// `window_k` is the rainfall sum over the trailing k calendar records
/// inclusive of the current day (partial when the station's history is
/// shorter than k). Produced by `analysis::antecedent::compute_features`,
/// consumed by the probability classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub station_id: String,
    pub as_of: NaiveDate,
    pub daily_rain: f64,
    pub window_1: f64,
    pub window_2: f64,
    pub window_3: f64,
    pub window_15: f64,
    pub window_30: f64,
}

impl FeatureVector {
    /// The five fields the classifier consumes, in model column order.
    ///
    /// `window_2` is computed and reported but is not a model input.
    pub fn model_row(&self) -> [f64; 5] {
        [
            self.daily_rain,
            self.window_1,
            self.window_3,
            self.window_15,
            self.window_30,
        ]
    }
}

/// A classified probability anchored to a station's map coordinate.
///
/// Input to the spatial interpolator. `probability` is in [0, 1] as produced
/// by the classifier; interpolated grid values are not re-clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilitySample {
    pub x: f64,
    pub y: f64,
    pub probability: f64,
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// Soil/season regime selecting which empirical rainfall thresholds apply.
///
/// Chosen once per run by the caller and threaded explicitly through every
/// threshold evaluation — never ambient state. Values outside 1..=3 are
/// rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    One,
    Two,
    Three,
}

impl Scenario {
    pub fn as_u8(&self) -> u8 {
        match self {
            Scenario::One => 1,
            Scenario::Two => 2,
            Scenario::Three => 3,
        }
    }

    /// Soil-regime description shown to operators.
    pub fn description(&self) -> &'static str {
        match self {
            Scenario::One => "Fine soils (silt and clay) in dry periods",
            Scenario::Two => {
                "Fine soils with presence of sand and coarse materials in rainy periods"
            }
            Scenario::Three => "Fine soils in rainy periods",
        }
    }
}

impl TryFrom<u8> for Scenario {
    type Error = ForecastError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Scenario::One),
            2 => Ok(Scenario::Two),
            3 => Ok(Scenario::Three),
            other => Err(ForecastError::InvalidScenario(other)),
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scenario {}: {}", self.as_u8(), self.description())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while building rainfall features or the
/// probability surface.
///
/// Per-row and per-station problems (`InvalidTimestamp`, `EmptySeries`) are
/// recovered locally by skipping the offending row or station; configuration
/// problems (`InvalidScenario`, `InvalidBounds`) are fatal and reported
/// before any computation starts.
#[derive(Debug, PartialEq)]
pub enum ForecastError {
    /// A reading's timestamp could not be parsed. The row is dropped and
    /// counted; the run continues.
    InvalidTimestamp(String),
    /// A station had no records for the requested operation; it is skipped.
    EmptySeries(String),
    /// Interpolation was requested with zero probability samples.
    InsufficientSamples,
    /// Scenario outside 1..=3 supplied by the caller.
    InvalidScenario(u8),
    /// Degenerate or non-finite region bounds / grid resolution.
    InvalidBounds(String),
    /// Interpolation exceeded its soft deadline; no partial grid is returned.
    DeadlineExceeded,
    /// Classifier input shape did not match the model's coefficient count,
    /// or the classifier returned the wrong number of probabilities.
    ModelShape { expected: usize, got: usize },
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::InvalidTimestamp(raw) => {
                write!(f, "Unparseable timestamp: {}", raw)
            }
            ForecastError::EmptySeries(station) => {
                write!(f, "No records for station: {}", station)
            }
            ForecastError::InsufficientSamples => {
                write!(f, "Interpolation requires at least one probability sample")
            }
            ForecastError::InvalidScenario(value) => {
                write!(f, "Invalid scenario {} (expected 1, 2, or 3)", value)
            }
            ForecastError::InvalidBounds(msg) => write!(f, "Invalid bounds: {}", msg),
            ForecastError::DeadlineExceeded => {
                write!(f, "Interpolation deadline exceeded before the grid completed")
            }
            ForecastError::ModelShape { expected, got } => {
                write!(f, "Model shape mismatch: expected {}, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for ForecastError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_try_from_accepts_valid_range() {
        assert_eq!(Scenario::try_from(1).unwrap(), Scenario::One);
        assert_eq!(Scenario::try_from(2).unwrap(), Scenario::Two);
        assert_eq!(Scenario::try_from(3).unwrap(), Scenario::Three);
    }

    #[test]
    fn test_scenario_try_from_rejects_out_of_range() {
        assert_eq!(
            Scenario::try_from(0),
            Err(ForecastError::InvalidScenario(0))
        );
        assert_eq!(
            Scenario::try_from(4),
            Err(ForecastError::InvalidScenario(4))
        );
    }

    #[test]
    fn test_model_row_selects_five_fields_in_order() {
        let fv = FeatureVector {
            station_id: "2701".to_string(),
            as_of: NaiveDate::from_ymd_opt(2022, 7, 13).unwrap(),
            daily_rain: 10.0,
            window_1: 10.0,
            window_2: 17.0,
            window_3: 21.0,
            window_15: 88.0,
            window_30: 140.0,
        };
        // window_2 is intentionally absent from the model input.
        assert_eq!(fv.model_row(), [10.0, 10.0, 21.0, 88.0, 140.0]);
    }

    #[test]
    fn test_scenario_display_includes_number_and_regime() {
        let text = Scenario::Two.to_string();
        assert!(text.starts_with("Scenario 2"));
        assert!(text.contains("rainy periods"));
    }
}
