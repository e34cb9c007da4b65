/// Rainfall analysis for the landslide forecasting service.
///
/// Both submodules consume the per-station groupings built once by
/// `resample` rather than re-deriving them from flat lists.
///
/// Submodules:
/// - `antecedent` — trailing-window rainfall sums feeding the classifier.
/// - `thresholds` — cumulative 24h/30d curves and empirical threshold checks.

pub mod antecedent;
pub mod thresholds;
