/// Ingest layer: turns raw gauge exports into `Reading`s.
///
/// File access stays in the binaries; this layer only parses text, so the
/// library itself performs no I/O.
///
/// Submodules:
/// - `gauge_csv` — CSV exports of timestamped rain gauge measurements.
/// - `fixtures` (test only) — representative export payloads.

pub mod fixtures;
pub mod gauge_csv;
