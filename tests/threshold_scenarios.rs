/// Integration tests for scenario threshold evaluation
///
/// These tests verify, over the public API:
/// 1. The scenario → threshold-line table (24h and 30d)
/// 2. Exceedance boundary behavior (≥ crosses, just-below does not)
/// 3. Early-window (0-15h / 0-15 day) span restrictions
/// 4. Scenario validation before any evaluation runs
///
/// Run with: cargo test --test threshold_scenarios

use slidemon_service::analysis::thresholds::{thresholds_24h, thresholds_30d, Span};
use slidemon_service::ingest::gauge_csv::parse_readings_csv;
use slidemon_service::model::{ForecastError, Scenario};
use slidemon_service::pipeline::{assess_thresholds, resample_input, WindowKind};

/// One station reporting `mm_per_hour` every hour for `hours` hours.
fn hourly_export(mm_per_hour: f64, hours: u32) -> String {
    let mut csv = String::from("fecha_hora,P1,Codigo\n");
    for h in 0..hours {
        csv.push_str(&format!(
            "2024-11-{:02} {:02}:00,{},27015090\n",
            1 + h / 24,
            h % 24,
            mm_per_hour
        ));
    }
    csv
}

/// One station reporting `mm_per_day` at noon for `days` days.
fn daily_export(mm_per_day: f64, days: u32) -> String {
    let mut csv = String::from("fecha_hora,P1,Codigo\n");
    for d in 0..days {
        csv.push_str(&format!(
            "2024-10-{:02} 12:00,{},27015090\n",
            1 + d,
            mm_per_day
        ));
    }
    csv
}

#[test]
fn test_scenario_threshold_table() {
    // Scenario 1: nothing on 24h, flat 200 mm over the full 30d window.
    assert!(thresholds_24h(Scenario::One).is_empty());
    let s1_30d = thresholds_30d(Scenario::One);
    assert_eq!(s1_30d.len(), 1);
    assert_eq!(s1_30d[0].limit_mm, 200.0);
    assert_eq!(s1_30d[0].span, Span::FullWindow);

    // Scenario 2: 30 and 60 mm early lines on 24h, 100 mm early on 30d.
    let s2_24h = thresholds_24h(Scenario::Two);
    assert_eq!(
        s2_24h.iter().map(|l| l.limit_mm).collect::<Vec<_>>(),
        vec![30.0, 60.0]
    );
    assert!(s2_24h.iter().all(|l| l.span == Span::First(16)));
    assert_eq!(thresholds_30d(Scenario::Two)[0].limit_mm, 100.0);

    // Scenario 3: 40 mm early on 24h, 150 mm early on 30d.
    assert_eq!(thresholds_24h(Scenario::Three)[0].limit_mm, 40.0);
    assert_eq!(thresholds_30d(Scenario::Three)[0].limit_mm, 150.0);
}

#[test]
fn test_scenario_1_exceeds_at_200mm_not_at_199_99() {
    // 29 days of 5 mm drizzle then a 55 mm storm day: cumulative reaches
    // exactly 200 mm (5 × 29 + 55) on the last day.
    let mut csv = daily_export(5.0, 29);
    csv.push_str("2024-10-30 12:00,55.0,27015090\n");
    let parsed = parse_readings_csv(&csv);
    let input = resample_input(&parsed.readings);
    let assessment = assess_thresholds(Scenario::One, &input);

    assert_eq!(assessment.exceedances.len(), 1);
    assert_eq!(assessment.exceedances[0].window, WindowKind::Days30);
    assert_eq!(assessment.exceedances[0].limit_mm, 200.0);
    assert_eq!(assessment.exceedances[0].first_at, "2024-10-30");

    // Same shape topping out at 199.99 mm: no crossing.
    let mut csv = daily_export(5.0, 29);
    csv.push_str("2024-10-30 12:00,54.99,27015090\n");
    let parsed = parse_readings_csv(&csv);
    let input = resample_input(&parsed.readings);
    let assessment = assess_thresholds(Scenario::One, &input);
    assert!(assessment.exceedances.is_empty());
}

#[test]
fn test_early_window_restriction_on_24h_lines() {
    // 2.5 mm/h for 24 h: 30 mm falls at hour 11 (inside 0-15h) and 40 mm
    // at hour 15 (still inside); 60 mm lands at hour 23, outside the span.
    let parsed = parse_readings_csv(&hourly_export(2.5, 24));
    let input = resample_input(&parsed.readings);

    let s2 = assess_thresholds(Scenario::Two, &input);
    let s2_24h: Vec<f64> = s2
        .exceedances
        .iter()
        .filter(|e| e.window == WindowKind::Hours24)
        .map(|e| e.limit_mm)
        .collect();
    assert_eq!(s2_24h, vec![30.0], "60mm is only reached after the span");

    let s3 = assess_thresholds(Scenario::Three, &input);
    let s3_24h: Vec<f64> = s3
        .exceedances
        .iter()
        .filter(|e| e.window == WindowKind::Hours24)
        .map(|e| e.limit_mm)
        .collect();
    assert_eq!(s3_24h, vec![40.0]);
}

#[test]
fn test_cumulative_curves_are_monotonic() {
    let parsed = parse_readings_csv(&hourly_export(1.25, 36));
    let input = resample_input(&parsed.readings);
    let assessment = assess_thresholds(Scenario::One, &input);

    for curve in &assessment.curves_24h {
        let values: Vec<f64> = curve.points.iter().map(|p| p.cumulative_mm).collect();
        assert!(
            values.windows(2).all(|w| w[1] >= w[0]),
            "24h curve for {} must be non-decreasing",
            curve.station_id
        );
        assert_eq!(values.len(), 24, "36 hourly reports, window keeps 24");
    }
}

#[test]
fn test_scenario_validation_rejects_out_of_range_before_evaluation() {
    for bad in [0u8, 4, 99] {
        assert_eq!(
            Scenario::try_from(bad),
            Err(ForecastError::InvalidScenario(bad))
        );
    }
    // The assessment API only accepts a constructed Scenario, so an invalid
    // number cannot reach evaluation at all.
    let valid = Scenario::try_from(2).unwrap();
    assert_eq!(valid, Scenario::Two);
}

#[test]
fn test_empty_export_yields_empty_assessment() {
    let parsed = parse_readings_csv("fecha_hora,P1,Codigo\n");
    let input = resample_input(&parsed.readings);
    let assessment = assess_thresholds(Scenario::Three, &input);

    assert!(assessment.curves_24h.is_empty());
    assert!(assessment.curves_30d.is_empty());
    assert!(assessment.exceedances.is_empty());
}

#[test]
fn test_station_without_window_data_gets_empty_curve() {
    // Station 27015290 last reported long before 27015090's latest hour;
    // its curve exists but holds no points inside the shared window.
    let mut csv = String::from("fecha_hora,P1,Codigo\n");
    csv.push_str("2024-10-01 08:00,3.0,27015290\n");
    for h in 0..24 {
        csv.push_str(&format!("2024-11-05 {:02}:00,1.0,27015090\n", h % 24));
    }
    let parsed = parse_readings_csv(&csv);
    let input = resample_input(&parsed.readings);
    let assessment = assess_thresholds(Scenario::One, &input);

    let stale = assessment
        .curves_24h
        .iter()
        .find(|c| c.station_id == "27015290")
        .expect("stale station still appears");
    assert!(stale.points.is_empty());

    let active = assessment
        .curves_24h
        .iter()
        .find(|c| c.station_id == "27015090")
        .unwrap();
    assert_eq!(active.points.len(), 24);
}
