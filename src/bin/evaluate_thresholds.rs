//! Threshold-only evaluation over a rain gauge export.
//!
//! Skips classification and interpolation entirely: parses readings,
//! resamples, and prints the cumulative 24-hour and 30-day rainfall curves
//! per station together with every scenario threshold crossing. Useful when
//! field teams only need the empirical threshold picture.
//!
//! Usage:
//!   cargo run --bin evaluate_thresholds -- --readings lluvia.csv --scenario 3

use std::env;
use std::fs;

use slidemon_service::ingest::gauge_csv::parse_readings_csv;
use slidemon_service::model::Scenario;
use slidemon_service::pipeline::{assess_thresholds, resample_input};

fn main() {
    println!("📈 Empirical Rainfall Threshold Evaluation");
    println!("==========================================\n");

    let args: Vec<String> = env::args().collect();
    let mut readings_path: Option<String> = None;
    let mut scenario_arg: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--readings" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --readings requires a file path");
                    std::process::exit(1);
                }
                readings_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--scenario" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --scenario requires a number");
                    std::process::exit(1);
                }
                scenario_arg = Some(args[i + 1].clone());
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: {} --readings FILE --scenario 1|2|3", args[0]);
                std::process::exit(1);
            }
        }
    }

    let (Some(readings_path), Some(scenario_arg)) = (readings_path, scenario_arg) else {
        eprintln!("Error: --readings and --scenario are both required");
        std::process::exit(1);
    };

    let scenario = match scenario_arg.parse::<u8>().ok().map(Scenario::try_from) {
        Some(Ok(s)) => s,
        _ => {
            eprintln!("❌ Invalid scenario '{}' (expected 1, 2, or 3)", scenario_arg);
            std::process::exit(1);
        }
    };
    println!("📋 {}\n", scenario);

    let csv = match fs::read_to_string(&readings_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", readings_path, e);
            std::process::exit(1);
        }
    };
    let parsed = parse_readings_csv(&csv);
    if parsed.rows_dropped > 0 {
        eprintln!("⚠ {} malformed rows dropped", parsed.rows_dropped);
    }

    let input = resample_input(&parsed.readings);
    let assessment = assess_thresholds(scenario, &input);

    println!("Cumulative rain, last 24 hours:");
    for curve in &assessment.curves_24h {
        match curve.points.last() {
            Some(last) => println!(
                "   {} — {:.1}mm over {} reporting hours",
                curve.station_id,
                last.cumulative_mm,
                curve.points.len()
            ),
            None => println!("   {} — no data in window", curve.station_id),
        }
    }

    println!("\nCumulative rain, last 30 days:");
    for curve in &assessment.curves_30d {
        match curve.points.last() {
            Some(last) => println!(
                "   {} — {:.1}mm over {} reporting days",
                curve.station_id,
                last.cumulative_mm,
                curve.points.len()
            ),
            None => println!("   {} — no data in window", curve.station_id),
        }
    }

    println!();
    if assessment.exceedances.is_empty() {
        println!("✓ No threshold exceedances under {}", scenario);
    } else {
        for e in &assessment.exceedances {
            println!(
                "⚠ {} exceeds {} ({}) at {}",
                e.station_id,
                e.line_label,
                e.window.as_str(),
                e.first_at
            );
        }
    }
}
