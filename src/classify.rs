/// Classifier collaborator seam.
///
/// The probability model itself is a pretrained black box: anything
/// implementing `Classifier` can sit behind the seam. What this module owns
/// is the contract around it — the batch standardization the model's
/// training pipeline applied to its inputs, a coefficient-file-backed
/// logistic model as the default implementation, and the join of classifier
/// output with gauge coordinates into probability samples.
///
/// Standardization must match the reference pipeline exactly: per-feature
/// zero mean and unit variance, fit on the same batch being classified,
/// population (1/n) variance, and a zero-variance column divides by 1
/// instead of 0. Substituting anything else shifts the model's input
/// distribution and silently degrades the probabilities.

use serde::Deserialize;
use std::fs;

use crate::model::{FeatureVector, ForecastError, ProbabilitySample};
use crate::stations::GaugeRegistry;

/// Number of model input features: daily rain + four antecedent windows.
pub const MODEL_FEATURES: usize = 5;

// ---------------------------------------------------------------------------
// Standardization
// ---------------------------------------------------------------------------

/// Zero-mean unit-variance scaling fit on the batch itself.
///
/// Column variance is the population variance (1/n); a constant column
/// keeps its values at 0 by dividing by 1. An empty batch passes through
/// unchanged.
pub fn standardize(rows: &[[f64; MODEL_FEATURES]]) -> Vec<[f64; MODEL_FEATURES]> {
    if rows.is_empty() {
        return Vec::new();
    }
    let n = rows.len() as f64;

    let mut means = [0.0; MODEL_FEATURES];
    for row in rows {
        for (c, value) in row.iter().enumerate() {
            means[c] += value;
        }
    }
    for mean in &mut means {
        *mean /= n;
    }

    let mut scales = [0.0; MODEL_FEATURES];
    for row in rows {
        for (c, value) in row.iter().enumerate() {
            let d = value - means[c];
            scales[c] += d * d;
        }
    }
    for scale in &mut scales {
        *scale = (*scale / n).sqrt();
        if *scale == 0.0 {
            *scale = 1.0;
        }
    }

    rows.iter()
        .map(|row| {
            let mut out = [0.0; MODEL_FEATURES];
            for c in 0..MODEL_FEATURES {
                out[c] = (row[c] - means[c]) / scales[c];
            }
            out
        })
        .collect()
}

/// Extracts and standardizes the model matrix from feature vectors.
pub fn feature_matrix(features: &[FeatureVector]) -> Vec<[f64; MODEL_FEATURES]> {
    standardize(&features.iter().map(|f| f.model_row()).collect::<Vec<_>>())
}

// ---------------------------------------------------------------------------
// Classifier seam
// ---------------------------------------------------------------------------

/// A pretrained landslide-probability model, consumed as a black box.
///
/// Implementations receive already-standardized rows and must return one
/// probability in [0, 1] per row.
pub trait Classifier {
    fn classify(&self, rows: &[[f64; MODEL_FEATURES]]) -> Result<Vec<f64>, ForecastError>;
}

/// Logistic model backed by coefficients exported from the trained
/// reference model.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    weights: [f64; MODEL_FEATURES],
    intercept: f64,
}

impl LogisticModel {
    pub fn new(weights: [f64; MODEL_FEATURES], intercept: f64) -> Self {
        Self { weights, intercept }
    }

    /// Loads coefficients from model.toml in the working directory.
    ///
    /// # Panics
    /// Panics on a missing or malformed file, like the gauge registry
    /// loader — a service without its model cannot run.
    pub fn load() -> Self {
        let config_path = "model.toml";

        let contents = fs::read_to_string(config_path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path, e));

        let file: ModelFile = toml::from_str(&contents)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", config_path, e));

        if file.model.weights.len() != MODEL_FEATURES {
            panic!(
                "{} must define exactly {} weights, found {}",
                config_path,
                MODEL_FEATURES,
                file.model.weights.len()
            );
        }

        let mut weights = [0.0; MODEL_FEATURES];
        weights.copy_from_slice(&file.model.weights);
        Self {
            weights,
            intercept: file.model.intercept,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    model: ModelSection,
}

#[derive(Debug, Deserialize)]
struct ModelSection {
    weights: Vec<f64>,
    intercept: f64,
}

impl Classifier for LogisticModel {
    fn classify(&self, rows: &[[f64; MODEL_FEATURES]]) -> Result<Vec<f64>, ForecastError> {
        Ok(rows
            .iter()
            .map(|row| {
                let z: f64 = self
                    .weights
                    .iter()
                    .zip(row.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + self.intercept;
                1.0 / (1.0 + (-z).exp())
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Coordinate join
// ---------------------------------------------------------------------------

/// Joins classifier output with gauge coordinates into probability samples.
///
/// The classifier must have returned one probability per feature vector;
/// a count mismatch is a `ModelShape` error. Stations missing from the
/// registry are skipped and counted — an unregistered gauge has no place
/// on the map, but it must not sink the run.
pub fn sample_points(
    features: &[FeatureVector],
    probabilities: &[f64],
    registry: &GaugeRegistry,
) -> Result<(Vec<ProbabilitySample>, usize), ForecastError> {
    if features.len() != probabilities.len() {
        return Err(ForecastError::ModelShape {
            expected: features.len(),
            got: probabilities.len(),
        });
    }

    let mut samples = Vec::with_capacity(features.len());
    let mut skipped = 0;
    for (feature, &probability) in features.iter().zip(probabilities) {
        match registry.coordinates(&feature.station_id) {
            Some((x, y)) => samples.push(ProbabilitySample { x, y, probability }),
            None => skipped += 1,
        }
    }

    Ok((samples, skipped))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
