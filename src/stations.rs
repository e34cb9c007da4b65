/// Gauge registry: lookup layer over the stations.toml configuration.
///
/// The registry is the single source of truth for gauge coordinates — the
/// coordinate join and the interpolation region both read from here rather
/// than carrying their own copies of gauge metadata.

use std::collections::HashMap;

use crate::config::{self, GaugeConfig, RegionConfig};
use crate::interpolate::Bounds;

/// Loaded gauge registry plus the interpolation region.
#[derive(Debug, Clone)]
pub struct GaugeRegistry {
    region: RegionConfig,
    gauges: HashMap<String, GaugeConfig>,
}

impl GaugeRegistry {
    /// Loads stations.toml from the working directory. Panics on malformed
    /// configuration, like the underlying loader.
    pub fn load() -> Self {
        let (region, gauges) = config::load_config_map();
        Self { region, gauges }
    }

    /// Builds a registry from already-validated parts. Used by tests and by
    /// callers that source gauge metadata elsewhere.
    pub fn from_parts(region: RegionConfig, gauges: Vec<GaugeConfig>) -> Self {
        let gauges = gauges
            .into_iter()
            .map(|g| (g.station_id.clone(), g))
            .collect();
        Self { region, gauges }
    }

    /// Looks up a gauge by station id. Returns `None` if not registered.
    pub fn find(&self, station_id: &str) -> Option<&GaugeConfig> {
        self.gauges.get(station_id)
    }

    /// Map coordinate of a gauge: (x, y) = (longitude, latitude).
    pub fn coordinates(&self, station_id: &str) -> Option<(f64, f64)> {
        self.find(station_id).map(|g| (g.longitude, g.latitude))
    }

    pub fn bounds(&self) -> Bounds {
        self.region.bounds()
    }

    pub fn resolution(&self) -> (usize, usize) {
        self.region.resolution()
    }

    /// Same registry with the grid resolution overridden, for callers that
    /// want a coarser or finer surface than the configured default.
    pub fn with_resolution(mut self, nx: usize, ny: usize) -> Self {
        self.region.grid_nx = nx;
        self.region.grid_ny = ny;
        self
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    pub fn station_ids(&self) -> Vec<&str> {
        self.gauges.keys().map(|k| k.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
