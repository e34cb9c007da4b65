/// Test fixtures: representative gauge CSV payloads.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parser and the stages behind it. They reflect
/// the real export layout:
///
///   fecha_hora, P1, Codigo
///     fecha_hora — timestamp, minute resolution, no UTC offset
///     P1         — rainfall since the previous report, mm
///     Codigo     — gauge identifier
///
/// Note: exports interleave stations and are not guaranteed to be sorted;
/// parsers and resamplers must not rely on row order.

/// Two stations, sub-hourly cadence, spanning two clock hours. Station
/// 27015090 reports three times inside 08:00–08:59 (sums to 6.0 mm).
#[cfg(test)]
pub(crate) fn fixture_two_station_csv() -> &'static str {
    "fecha_hora,P1,Codigo\n\
     2022-07-13 08:02,1.5,27015090\n\
     2022-07-13 08:21,3.0,27015090\n\
     2022-07-13 08:47,1.5,27015090\n\
     2022-07-13 08:10,0.5,27015290\n\
     2022-07-13 09:05,2.0,27015090\n\
     2022-07-13 09:40,1.0,27015290\n"
}

/// A malformed export: one unparseable timestamp and one negative rainfall
/// value amid valid rows. Exactly two rows must be dropped.
#[cfg(test)]
pub(crate) fn fixture_noisy_csv() -> &'static str {
    "fecha_hora,P1,Codigo\n\
     2022-07-13 08:02,1.5,27015090\n\
     13-07-2022 08:15,9.9,27015090\n\
     2022-07-13 08:21,-3.0,27015090\n\
     2022-07-13 08:47,1.5,27015090\n"
}

/// Thirty-one days of daily-noon reports for one station, 4.0 mm each —
/// long enough history to fill every antecedent window.
#[cfg(test)]
pub(crate) fn fixture_month_of_rain_csv() -> String {
    let mut csv = String::from("fecha_hora,P1,Codigo\n");
    for day in 1..=31 {
        csv.push_str(&format!("2022-07-{:02} 12:00,4.0,27015090\n", day));
    }
    csv
}
