//! Landslide Forecasting Service - Forecast Run
//!
//! One-shot pipeline over a rain gauge export:
//! 1. Parses timestamped gauge readings from CSV
//! 2. Resamples to hourly and daily totals per station
//! 3. Builds antecedent rainfall features and classifies landslide probability
//! 4. Interpolates station probabilities onto the region grid
//! 5. Checks cumulative rainfall against the scenario's empirical thresholds
//!
//! Map rendering and model training live outside this service; the run
//! emits a JSON report for downstream tooling instead.
//!
//! Usage:
//!   cargo run --release -- --readings lluvia.csv --scenario 2
//!   cargo run --release -- --readings lluvia.csv --scenario 1 \
//!       --method spline-padded --grid 250x250 --report out.json
//!
//! Configuration:
//!   stations.toml - gauge registry and interpolation region
//!   model.toml    - classifier coefficients

use std::env;
use std::fs;

use serde::Serialize;

use slidemon_service::classify::LogisticModel;
use slidemon_service::ingest::gauge_csv::parse_readings_csv;
use slidemon_service::model::Scenario;
use slidemon_service::pipeline::{
    assess_thresholds, resample_input, ForecastRun, RunConfig, Surface,
};
use slidemon_service::stations::GaugeRegistry;

fn main() {
    println!("⛰  Landslide Forecasting Service");
    println!("=================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut readings_path: Option<String> = None;
    let mut scenario_arg: Option<String> = None;
    let mut method = "idw".to_string();
    let mut grid_override: Option<(usize, usize)> = None;
    let mut report_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--readings" | "--scenario" | "--method" | "--grid" | "--report" => {
                let flag = args[i].clone();
                if i + 1 >= args.len() {
                    eprintln!("Error: {} requires a value", flag);
                    std::process::exit(1);
                }
                let value = args[i + 1].clone();
                match flag.as_str() {
                    "--readings" => readings_path = Some(value),
                    "--scenario" => scenario_arg = Some(value),
                    "--method" => method = value,
                    "--grid" => match parse_grid(&value) {
                        Some(res) => grid_override = Some(res),
                        None => {
                            eprintln!("Error: --grid expects NXxNY, e.g. 500x500");
                            std::process::exit(1);
                        }
                    },
                    "--report" => report_path = Some(value),
                    _ => unreachable!(),
                }
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!(
                    "Usage: {} --readings FILE --scenario 1|2|3 \
                     [--method idw|spline|spline-padded] [--grid NXxNY] [--report FILE]",
                    args[0]
                );
                std::process::exit(1);
            }
        }
    }

    let Some(readings_path) = readings_path else {
        eprintln!("Error: --readings is required");
        std::process::exit(1);
    };

    // Scenario is validated before anything else runs — no silent default.
    let scenario = match scenario_arg.as_deref().map(|s| s.parse::<u8>()) {
        Some(Ok(n)) => match Scenario::try_from(n) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
        Some(Err(_)) => {
            eprintln!("❌ --scenario must be a number in 1..=3");
            std::process::exit(1);
        }
        None => {
            eprintln!("Error: --scenario is required (1, 2, or 3)");
            std::process::exit(1);
        }
    };
    println!("📋 {}\n", scenario);

    let surface = match method.as_str() {
        "idw" => Surface::Idw,
        "spline" => Surface::CubicSpline,
        "spline-padded" => Surface::CubicSplinePadded,
        other => {
            eprintln!("Unknown --method '{}' (idw, spline, spline-padded)", other);
            std::process::exit(1);
        }
    };

    // Load configuration (panics with context on malformed files)
    let mut registry = GaugeRegistry::load();
    let model = LogisticModel::load();
    println!("✓ Loaded {} gauges from stations.toml", registry.len());

    if let Some((nx, ny)) = grid_override {
        registry = registry.with_resolution(nx, ny);
    }

    // Parse readings
    let csv = match fs::read_to_string(&readings_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", readings_path, e);
            std::process::exit(1);
        }
    };
    let parsed = parse_readings_csv(&csv);
    println!("✓ Parsed {} readings", parsed.readings.len());
    if parsed.rows_dropped > 0 {
        eprintln!("   ⚠ {} malformed rows dropped", parsed.rows_dropped);
    }

    // Resample once; both the forecast and the threshold paths reuse it.
    let input = resample_input(&parsed.readings);
    println!(
        "✓ Resampled to {} hourly / {} daily records across {} stations\n",
        input.hourly_count,
        input.daily_count,
        input.daily_by_station.len()
    );

    // Probability surface
    println!("📊 Running forecast ({:?} surface)...", surface);
    let run = ForecastRun::with_config(
        &registry,
        &model,
        RunConfig {
            surface,
            ..RunConfig::default()
        },
    );
    let output = match run.run(&input) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("❌ Forecast failed: {}", e);
            std::process::exit(1);
        }
    };

    for (feature, probability) in output.features.iter().zip(&output.probabilities) {
        println!(
            "   {} {} daily {:.1}mm 30d {:.1}mm → p={:.3}",
            feature.station_id, feature.as_of, feature.daily_rain, feature.window_30, probability
        );
    }
    if output.stations_skipped > 0 {
        eprintln!(
            "   ⚠ {} classified stations missing from the gauge registry",
            output.stations_skipped
        );
    }
    let (nx, ny) = (output.grid.nx(), output.grid.ny());
    match output.grid.value_range() {
        Some((lo, hi)) => println!(
            "✓ {}x{} grid: {} of {} cells defined, range {:.3}..{:.3}\n",
            nx,
            ny,
            output.grid.defined_count(),
            nx * ny,
            lo,
            hi
        ),
        None => println!("✓ {}x{} grid: no defined cells\n", nx, ny),
    }

    // Threshold assessment
    println!("📈 Checking empirical thresholds...");
    let assessment = assess_thresholds(scenario, &input);
    if assessment.exceedances.is_empty() {
        println!("   No threshold exceedances\n");
    } else {
        for e in &assessment.exceedances {
            println!(
                "   ⚠ {} exceeds {} ({}) at {}",
                e.station_id,
                e.line_label,
                e.window.as_str(),
                e.first_at
            );
        }
        println!();
    }

    // JSON report for downstream tooling
    if let Some(path) = report_path {
        let report = build_report(scenario, &output, &assessment);
        match serde_json::to_string_pretty(&report)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&path, json).map_err(|e| e.to_string()))
        {
            Ok(()) => println!("✓ Report written to {}", path),
            Err(e) => {
                eprintln!("❌ Failed to write report {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }
}

fn parse_grid(value: &str) -> Option<(usize, usize)> {
    let (nx, ny) = value.split_once('x')?;
    Some((nx.parse().ok()?, ny.parse().ok()?))
}

// ---------------------------------------------------------------------------
// Report serialization (owned by this caller, not the library)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Report {
    scenario: u8,
    scenario_description: &'static str,
    stations: Vec<StationReport>,
    grid: GridReport,
    exceedances: Vec<ExceedanceReport>,
}

#[derive(Serialize)]
struct StationReport {
    station_id: String,
    as_of: String,
    daily_rain: f64,
    window_1: f64,
    window_2: f64,
    window_3: f64,
    window_15: f64,
    window_30: f64,
    probability: f64,
}

#[derive(Serialize)]
struct GridReport {
    nx: usize,
    ny: usize,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    defined_cells: usize,
    value_min: Option<f64>,
    value_max: Option<f64>,
}

#[derive(Serialize)]
struct ExceedanceReport {
    station_id: String,
    window: &'static str,
    threshold: &'static str,
    limit_mm: f64,
    first_at: String,
}

fn build_report(
    scenario: Scenario,
    output: &slidemon_service::pipeline::ForecastOutput,
    assessment: &slidemon_service::pipeline::ThresholdAssessment,
) -> Report {
    let bounds = output.grid.bounds();
    let range = output.grid.value_range();
    Report {
        scenario: scenario.as_u8(),
        scenario_description: scenario.description(),
        stations: output
            .features
            .iter()
            .zip(&output.probabilities)
            .map(|(f, &p)| StationReport {
                station_id: f.station_id.clone(),
                as_of: f.as_of.to_string(),
                daily_rain: f.daily_rain,
                window_1: f.window_1,
                window_2: f.window_2,
                window_3: f.window_3,
                window_15: f.window_15,
                window_30: f.window_30,
                probability: p,
            })
            .collect(),
        grid: GridReport {
            nx: output.grid.nx(),
            ny: output.grid.ny(),
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            max_x: bounds.max_x,
            max_y: bounds.max_y,
            defined_cells: output.grid.defined_count(),
            value_min: range.map(|(lo, _)| lo),
            value_max: range.map(|(_, hi)| hi),
        },
        exceedances: assessment
            .exceedances
            .iter()
            .map(|e| ExceedanceReport {
                station_id: e.station_id.clone(),
                window: e.window.as_str(),
                threshold: e.line_label,
                limit_mm: e.limit_mm,
                first_at: e.first_at.clone(),
            })
            .collect(),
    }
}
