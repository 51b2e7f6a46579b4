use std::path::Path;

use log::info;

use super::table::Table;
use crate::Kinetics::kinetics_error::KinError;

/// Plain decimal in the readable range, shortest round-trip scientific otherwise
pub fn format_value(v: f64) -> String {
    let a = v.abs();
    if v == 0.0 || (1e-3..1e6).contains(&a) {
        format!("{}", v)
    } else {
        format!("{:e}", v)
    }
}

/// Write the table as CSV: header row with units, then one row per sample
pub fn write_csv(table: &Table, path: &Path) -> Result<(), KinError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.headers())?;
    for sample in table.samples() {
        writer.write_record(sample.row().map(format_value))?;
    }
    writer.flush()?;
    info!("saved {} rows to {}", table.len(), path.display());
    Ok(())
}
