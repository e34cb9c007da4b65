/// slidemon_service: rainfall-triggered landslide probability engine.
///
/// # Module structure
///
/// ```text
/// slidemon_service
/// ├── model       — shared data types (Reading, FeatureVector, Scenario, …)
/// ├── config      — gauge registry configuration loader (stations.toml)
/// ├── stations    — gauge lookup layer over the registry (coordinates, region)
/// ├── ingest
/// │   ├── gauge_csv — rain gauge CSV export parsing
/// │   └── fixtures (test only) — representative export payloads
/// ├── resample    — readings → hourly → daily totals + station groupings
/// ├── analysis
/// │   ├── antecedent — trailing-window rainfall features for the classifier
/// │   └── thresholds — cumulative 24h/30d curves + empirical threshold checks
/// ├── classify    — classifier seam: standardization, logistic model, joins
/// ├── interpolate
/// │   ├── idw     — inverse-distance-weighted probability surface (parallel)
/// │   └── spline  — thin-plate smooth surface, hull-masked, padded variant
/// └── pipeline    — forecast run orchestration + threshold assessment
/// ```

/// Public modules
pub mod analysis;
pub mod classify;
pub mod config;
pub mod ingest;
pub mod interpolate;
pub mod model;
pub mod pipeline;
pub mod resample;
pub mod stations;
