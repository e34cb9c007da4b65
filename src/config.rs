/// Gauge registry configuration loader - parses stations.toml
///
/// Separates gauge metadata and the interpolation region from code, making
/// it easy to add gauges or adjust the region extent without recompiling
/// the service.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

use crate::interpolate::Bounds;

/// Rain gauge metadata loaded from stations.toml
#[derive(Debug, Clone, Deserialize)]
pub struct GaugeConfig {
    pub station_id: String,
    pub name: String,

    // Geographic location (WGS84); longitude is the x axis of the
    // probability grid, latitude the y axis.
    pub latitude: f64,
    pub longitude: f64,

    // Gauge elevation (optional - not all network exports carry it)
    pub altitude_m: Option<f64>,

    // Administrative area, for operator output only
    pub municipality: Option<String>,
}

/// Interpolation region and grid resolution
#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,

    pub grid_nx: usize,
    pub grid_ny: usize,
}

impl RegionConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        }
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.grid_nx, self.grid_ny)
    }
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RegistryFile {
    region: RegionConfig,
    gauge: Vec<GaugeConfig>,
}

/// Loads the gauge registry from the stations.toml configuration file.
///
/// # Panics
/// Panics if the configuration file is missing, malformed, or contains
/// invalid data (degenerate region, out-of-range coordinates, duplicate
/// gauge ids). This is intentional — the service cannot operate without
/// valid gauge metadata, and configuration errors must surface before any
/// computation starts.
///
/// # File Location
/// Expects `stations.toml` in the current working directory (project root
/// when running via `cargo run`).
pub fn load_config() -> (RegionConfig, Vec<GaugeConfig>) {
    let config_path = "stations.toml";

    let contents = fs::read_to_string(config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path, e));

    let registry: RegistryFile = toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", config_path, e));

    registry
        .region
        .bounds()
        .validate()
        .unwrap_or_else(|e| panic!("Invalid [region] in {}: {}", config_path, e));

    let mut seen = std::collections::HashSet::new();
    for gauge in &registry.gauge {
        if gauge.station_id.is_empty() {
            panic!("Gauge with empty station_id in {}", config_path);
        }
        if !seen.insert(gauge.station_id.clone()) {
            panic!(
                "Duplicate gauge id '{}' in {}",
                gauge.station_id, config_path
            );
        }
        if !(-90.0..=90.0).contains(&gauge.latitude)
            || !(-180.0..=180.0).contains(&gauge.longitude)
        {
            panic!(
                "Gauge '{}' has out-of-range coordinates in {}",
                gauge.station_id, config_path
            );
        }
    }

    (registry.region, registry.gauge)
}

/// Loads the gauge registry and builds a lookup map keyed by station id.
///
/// Useful for O(1) gauge lookups during the coordinate join.
pub fn load_config_map() -> (RegionConfig, HashMap<String, GaugeConfig>) {
    let (region, gauges) = load_config();
    let map = gauges
        .into_iter()
        .map(|g| (g.station_id.clone(), g))
        .collect();
    (region, map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_succeeds() {
        let (_, gauges) = load_config();
        assert!(gauges.len() >= 5, "Should have at least 5 gauges");
    }

    #[test]
    fn test_all_gauges_have_required_fields() {
        let (_, gauges) = load_config();
        for gauge in gauges {
            assert!(!gauge.station_id.is_empty(), "Station id must not be empty");
            assert!(!gauge.name.is_empty(), "Name must not be empty");
            assert!(gauge.latitude >= -90.0 && gauge.latitude <= 90.0);
            assert!(gauge.longitude >= -180.0 && gauge.longitude <= 180.0);
        }
    }

    #[test]
    fn test_region_bounds_are_well_formed() {
        let (region, _) = load_config();
        assert!(region.bounds().validate().is_ok());
        assert!(region.grid_nx >= 2 && region.grid_ny >= 2);
    }

    #[test]
    fn test_gauges_fall_inside_the_region() {
        // A gauge outside the interpolation region would still classify but
        // would anchor the surface from outside the map.
        let (region, gauges) = load_config();
        for gauge in gauges {
            assert!(
                gauge.longitude >= region.min_x && gauge.longitude <= region.max_x,
                "{} longitude outside region",
                gauge.station_id
            );
            assert!(
                gauge.latitude >= region.min_y && gauge.latitude <= region.max_y,
                "{} latitude outside region",
                gauge.station_id
            );
        }
    }

    #[test]
    fn test_config_map_lookup() {
        let (_, map) = load_config_map();
        assert_eq!(map.len(), load_config().1.len());
        for (id, gauge) in &map {
            assert_eq!(id, &gauge.station_id);
        }
    }
}
