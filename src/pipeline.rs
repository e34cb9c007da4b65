/// Forecast pipeline orchestration.
///
/// Chains the stages end to end: raw readings → hourly/daily resampling →
/// antecedent features → standardize + classify → coordinate join →
/// probability surface. The threshold assessment consumes the same
/// resampled series independently, in parallel with classification.
///
/// Every invocation is stateless with respect to prior calls: the same
/// readings, registry, and configuration produce the same report, and no
/// state survives between runs.

use crate::analysis::antecedent::compute_features;
use crate::analysis::thresholds::{
    cumulative_24h, cumulative_30d, thresholds_24h, thresholds_30d, DailyCurve, HourlyCurve,
};
use crate::classify::{feature_matrix, sample_points, Classifier};
use crate::interpolate::{cubic_spline, cubic_spline_padded, idw, Grid, IdwConfig};
use crate::model::{FeatureVector, ForecastError, ProbabilitySample, Reading, Scenario};
use crate::resample::{group_daily, group_hourly, to_daily, to_hourly, StationDaily, StationHourly};
use crate::stations::GaugeRegistry;

// ---------------------------------------------------------------------------
// Resampled input
// ---------------------------------------------------------------------------

/// Hourly and daily series with their per-station groupings, built once and
/// shared by the classification and threshold paths.
#[derive(Debug, Clone)]
pub struct ResampledInput {
    pub hourly_by_station: StationHourly,
    pub daily_by_station: StationDaily,
    pub hourly_count: usize,
    pub daily_count: usize,
}

/// Resamples raw readings and builds the station groupings downstream
/// stages reuse.
pub fn resample_input(readings: &[Reading]) -> ResampledInput {
    let hourly = to_hourly(readings);
    let daily = to_daily(&hourly);
    ResampledInput {
        hourly_count: hourly.len(),
        daily_count: daily.len(),
        hourly_by_station: group_hourly(&hourly),
        daily_by_station: group_daily(&daily),
    }
}

// ---------------------------------------------------------------------------
// Probability surface run
// ---------------------------------------------------------------------------

/// Which estimator builds the probability surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Idw,
    CubicSpline,
    CubicSplinePadded,
}

/// Configuration for one forecast run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub surface: Surface,
    pub idw: IdwConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            surface: Surface::Idw,
            idw: IdwConfig::default(),
        }
    }
}

/// Everything a forecast run produced.
#[derive(Debug, Clone)]
pub struct ForecastOutput {
    pub features: Vec<FeatureVector>,
    pub probabilities: Vec<f64>,
    pub samples: Vec<ProbabilitySample>,
    /// Stations classified but absent from the gauge registry.
    pub stations_skipped: usize,
    pub grid: Grid,
}

/// One forecast invocation: registry + classifier + tuning.
pub struct ForecastRun<'a> {
    registry: &'a GaugeRegistry,
    classifier: &'a dyn Classifier,
    config: RunConfig,
}

impl<'a> ForecastRun<'a> {
    pub fn new(registry: &'a GaugeRegistry, classifier: &'a dyn Classifier) -> Self {
        Self {
            registry,
            classifier,
            config: RunConfig::default(),
        }
    }

    pub fn with_config(
        registry: &'a GaugeRegistry,
        classifier: &'a dyn Classifier,
        config: RunConfig,
    ) -> Self {
        Self {
            registry,
            classifier,
            config,
        }
    }

    /// Runs features → classification → surface over resampled input.
    ///
    /// Stations with no daily records simply produce no feature vector; a
    /// run where nothing survives to the interpolator fails with
    /// `InsufficientSamples` from the surface stage.
    pub fn run(&self, input: &ResampledInput) -> Result<ForecastOutput, ForecastError> {
        let features = compute_features(&input.daily_by_station);

        let matrix = feature_matrix(&features);
        let probabilities = self.classifier.classify(&matrix)?;
        if probabilities.len() != features.len() {
            return Err(ForecastError::ModelShape {
                expected: features.len(),
                got: probabilities.len(),
            });
        }

        let (samples, stations_skipped) =
            sample_points(&features, &probabilities, self.registry)?;

        let bounds = self.registry.bounds();
        let resolution = self.registry.resolution();
        let grid = match self.config.surface {
            Surface::Idw => idw(&samples, bounds, resolution, &self.config.idw)?,
            Surface::CubicSpline => cubic_spline(&samples, bounds, resolution)?,
            Surface::CubicSplinePadded => cubic_spline_padded(&samples, bounds, resolution)?,
        };

        Ok(ForecastOutput {
            features,
            probabilities,
            samples,
            stations_skipped,
            grid,
        })
    }
}

// ---------------------------------------------------------------------------
// Threshold assessment
// ---------------------------------------------------------------------------

/// Which comparison window an exceedance was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Hours24,
    Days30,
}

impl WindowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Hours24 => "24h",
            WindowKind::Days30 => "30d",
        }
    }
}

/// One station crossing one threshold line.
#[derive(Debug, Clone, PartialEq)]
pub struct Exceedance {
    pub station_id: String,
    pub window: WindowKind,
    pub line_label: &'static str,
    pub limit_mm: f64,
    /// First crossing time, formatted for the report.
    pub first_at: String,
}

/// Cumulative curves plus every threshold crossing for one scenario.
#[derive(Debug, Clone)]
pub struct ThresholdAssessment {
    pub scenario: Scenario,
    pub curves_24h: Vec<HourlyCurve>,
    pub curves_30d: Vec<DailyCurve>,
    pub exceedances: Vec<Exceedance>,
}

/// Evaluates both rolling windows against the scenario's threshold lines.
///
/// The scenario arrives validated (`Scenario` cannot hold an out-of-range
/// value), so this never fails: empty input just yields empty curves and
/// no exceedances.
pub fn assess_thresholds(scenario: Scenario, input: &ResampledInput) -> ThresholdAssessment {
    let curves_24h = cumulative_24h(&input.hourly_by_station);
    let curves_30d = cumulative_30d(&input.daily_by_station);

    let mut exceedances = Vec::new();

    for line in &thresholds_24h(scenario) {
        for curve in &curves_24h {
            if let Some(at) = curve.first_exceedance(line) {
                exceedances.push(Exceedance {
                    station_id: curve.station_id.clone(),
                    window: WindowKind::Hours24,
                    line_label: line.label,
                    limit_mm: line.limit_mm,
                    first_at: at.format("%Y-%m-%d %H:%M").to_string(),
                });
            }
        }
    }

    for line in &thresholds_30d(scenario) {
        for curve in &curves_30d {
            if let Some(day) = curve.first_exceedance(line) {
                exceedances.push(Exceedance {
                    station_id: curve.station_id.clone(),
                    window: WindowKind::Days30,
                    line_label: line.label,
                    limit_mm: line.limit_mm,
                    first_at: day.format("%Y-%m-%d").to_string(),
                });
            }
        }
    }

    ThresholdAssessment {
        scenario,
        curves_24h,
        curves_30d,
        exceedances,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
