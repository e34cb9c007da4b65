/// Empirical rainfall threshold evaluation.
///
/// Computes per-station cumulative rainfall curves over the trailing 24
/// hours and 30 days, then checks them against the scenario's empirical
/// threshold lines. The curve is the running sum of rainfall inside the
/// window — the same quantity field teams plot against the thresholds.
///
/// Both windows are anchored at the single latest timestamp/date found
/// across ALL stations, so every station is compared over the same span.
/// The scenario is an explicit argument to the threshold policy; there is
/// no ambient "selected scenario" state anywhere in the crate.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::model::Scenario;
use crate::resample::{StationDaily, StationHourly};

/// Hours in the short-term comparison window.
pub const WINDOW_24H_HOURS: i64 = 24;

/// Days in the long-term comparison window.
pub const WINDOW_30D_DAYS: i64 = 30;

/// Hours/days covered by the "early window" threshold lines (0–15 inclusive).
const EARLY_SPAN: i64 = 16;

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

/// One point of a cumulative hourly curve.
#[derive(Debug, Clone, PartialEq)]
pub struct HourPoint {
    pub at: DateTime<Utc>,
    pub cumulative_mm: f64,
}

/// Cumulative rainfall for one station over the trailing 24-hour window.
///
/// Points exist only where the station actually reported an hour; gaps stay
/// gaps. An empty `points` means the station had no data in the window.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyCurve {
    pub station_id: String,
    pub window_start: DateTime<Utc>,
    pub points: Vec<HourPoint>,
}

/// One point of a cumulative daily curve.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPoint {
    pub day: NaiveDate,
    pub cumulative_mm: f64,
}

/// Cumulative rainfall for one station over the trailing 30-day window.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCurve {
    pub station_id: String,
    pub window_start: NaiveDate,
    pub points: Vec<DayPoint>,
}

/// Cumulative curves over the last 24 hours, ending at the latest hour in
/// the data. Empty input yields an empty vec; stations with no records in
/// the window yield a curve with no points.
pub fn cumulative_24h(hourly: &StationHourly) -> Vec<HourlyCurve> {
    let Some(latest) = hourly
        .values()
        .filter_map(|series| series.last())
        .map(|r| r.hour)
        .max()
    else {
        return Vec::new();
    };
    let window_start = latest - Duration::hours(WINDOW_24H_HOURS - 1);

    hourly
        .iter()
        .map(|(station_id, series)| {
            let mut running = 0.0;
            let points = series
                .iter()
                .filter(|r| r.hour >= window_start && r.hour <= latest)
                .map(|r| {
                    running += r.rain_mm;
                    HourPoint {
                        at: r.hour,
                        cumulative_mm: running,
                    }
                })
                .collect();
            HourlyCurve {
                station_id: station_id.clone(),
                window_start,
                points,
            }
        })
        .collect()
}

/// Cumulative curves over the last 30 days, ending at the latest date in
/// the data. Same shape and edge behavior as `cumulative_24h`.
pub fn cumulative_30d(daily: &StationDaily) -> Vec<DailyCurve> {
    let Some(latest) = daily
        .values()
        .filter_map(|series| series.last())
        .map(|r| r.day)
        .max()
    else {
        return Vec::new();
    };
    let window_start = latest - Duration::days(WINDOW_30D_DAYS - 1);

    daily
        .iter()
        .map(|(station_id, series)| {
            let mut running = 0.0;
            let points = series
                .iter()
                .filter(|r| r.day >= window_start && r.day <= latest)
                .map(|r| {
                    running += r.rain_mm;
                    DayPoint {
                        day: r.day,
                        cumulative_mm: running,
                    }
                })
                .collect();
            DailyCurve {
                station_id: station_id.clone(),
                window_start,
                points,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Threshold policy
// ---------------------------------------------------------------------------

/// How much of the comparison window a threshold line covers, measured from
/// the window start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// The whole 24h/30d window.
    FullWindow,
    /// The leading N hours (24h curves) or days (30d curves).
    First(i64),
}

/// A flat empirical threshold line to compare a cumulative curve against.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdLine {
    pub label: &'static str,
    pub limit_mm: f64,
    pub span: Span,
}

/// Threshold lines for the 24-hour window. Scenario 1 defines none.
pub fn thresholds_24h(scenario: Scenario) -> Vec<ThresholdLine> {
    match scenario {
        Scenario::One => vec![],
        Scenario::Two => vec![
            ThresholdLine {
                label: "30mm (0-15h)",
                limit_mm: 30.0,
                span: Span::First(EARLY_SPAN),
            },
            ThresholdLine {
                label: "60mm (0-15h)",
                limit_mm: 60.0,
                span: Span::First(EARLY_SPAN),
            },
        ],
        Scenario::Three => vec![ThresholdLine {
            label: "40mm (0-15h)",
            limit_mm: 40.0,
            span: Span::First(EARLY_SPAN),
        }],
    }
}

/// Threshold lines for the 30-day window.
pub fn thresholds_30d(scenario: Scenario) -> Vec<ThresholdLine> {
    match scenario {
        Scenario::One => vec![ThresholdLine {
            label: "200mm",
            limit_mm: 200.0,
            span: Span::FullWindow,
        }],
        Scenario::Two => vec![ThresholdLine {
            label: "100mm (0-15 days)",
            limit_mm: 100.0,
            span: Span::First(EARLY_SPAN),
        }],
        Scenario::Three => vec![ThresholdLine {
            label: "150mm (0-15 days)",
            limit_mm: 150.0,
            span: Span::First(EARLY_SPAN),
        }],
    }
}

// ---------------------------------------------------------------------------
// Exceedance
// ---------------------------------------------------------------------------

impl HourlyCurve {
    /// First time at which this station's cumulative rain reaches the line,
    /// restricted to the line's span. `None` if never exceeded.
    pub fn first_exceedance(&self, line: &ThresholdLine) -> Option<DateTime<Utc>> {
        let span_end = match line.span {
            Span::FullWindow => None,
            Span::First(hours) => Some(self.window_start + Duration::hours(hours)),
        };
        self.points
            .iter()
            .filter(|p| span_end.map_or(true, |end| p.at < end))
            .find(|p| p.cumulative_mm >= line.limit_mm)
            .map(|p| p.at)
    }

    pub fn exceeds(&self, line: &ThresholdLine) -> bool {
        self.first_exceedance(line).is_some()
    }
}

impl DailyCurve {
    /// First day on which this station's cumulative rain reaches the line,
    /// restricted to the line's span. `None` if never exceeded.
    pub fn first_exceedance(&self, line: &ThresholdLine) -> Option<NaiveDate> {
        let span_end = match line.span {
            Span::FullWindow => None,
            Span::First(days) => Some(self.window_start + Duration::days(days)),
        };
        self.points
            .iter()
            .filter(|p| span_end.map_or(true, |end| p.day < end))
            .find(|p| p.cumulative_mm >= line.limit_mm)
            .map(|p| p.day)
    }

    pub fn exceeds(&self, line: &ThresholdLine) -> bool {
        self.first_exceedance(line).is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
