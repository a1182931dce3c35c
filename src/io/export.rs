//! CSV export for dispatch traces.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::dispatch::DispatchTrace;

/// Schema v1 column header for trace export.
const HEADER: &str = "timestamp,clipped_generation_kw,battery_soc_percent,import_kw,export_kw";

/// Exports a dispatch trace to a CSV file at the given path.
///
/// Writes a header row followed by one data row per interval. Output is
/// deterministic for identical traces.
pub fn export_trace_csv(trace: &DispatchTrace, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_trace_csv(trace, buf)
}

/// Writes a dispatch trace as CSV to any writer.
pub fn write_trace_csv(trace: &DispatchTrace, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;
    for i in 0..trace.len() {
        wtr.write_record(&[
            trace.timestamps[i].format("%Y-%m-%dT%H:%M").to_string(),
            format!("{:.4}", trace.clipped_generation_kw[i]),
            format!("{:.4}", trace.battery_soc_percent[i]),
            format!("{:.4}", trace.import_kw[i]),
            format!("{:.4}", trace.export_kw[i]),
        ])?;
    }
    wtr.flush()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};

    use super::*;
    use crate::dispatch::simulate;
    use crate::series::{DemandSeries, GenerationSeries};
    use crate::system::SystemConfig;

    #[test]
    fn csv_has_header_and_one_row_per_interval() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let stamps: Vec<_> = (0..4).map(|i| start + TimeDelta::minutes(30 * i)).collect();
        let demand = DemandSeries::new(stamps, vec![2.0; 4]).unwrap();
        let generation =
            GenerationSeries::for_demand(&demand, vec![0.0, 1.0, 3.0, 0.0]).unwrap();
        let trace = simulate(&demand, &generation, &SystemConfig::grid_tied(5.0, 5.0)).unwrap();

        let mut out = Vec::new();
        write_trace_csv(&trace, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("2025-03-01T10:00,"));
        assert!(lines[1].ends_with("2.0000,0.0000"));
    }
}
