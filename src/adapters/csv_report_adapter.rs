//! CSV portfolio export implementing ReportPort.
//!
//! One row per business day: date, price, position, holdings, cash, total,
//! returns. Undefined values are written as empty fields.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::error::CrossoverError;
use crate::domain::pipeline::CrossoverRun;
use crate::ports::report_port::ReportPort;

const HEADER: [&str; 7] = [
    "date", "price", "position", "holdings", "cash", "total", "returns",
];

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn report_err(e: csv::Error) -> CrossoverError {
    CrossoverError::Report {
        reason: format!("CSV write error: {}", e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, run: &CrossoverRun, output_path: &Path) -> Result<(), CrossoverError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut wtr = csv::Writer::from_path(output_path).map_err(report_err)?;
        wtr.write_record(HEADER).map_err(report_err)?;

        for point in &run.portfolio.points {
            wtr.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                optional(point.price),
                point.position.to_string(),
                point.holdings.to_string(),
                point.cash.to_string(),
                point.total.to_string(),
                optional(point.returns),
            ])
            .map_err(report_err)?;
        }

        wtr.flush()?;
        info!(
            path = %output_path.display(),
            rows = run.portfolio.len(),
            "portfolio CSV written"
        );
        Ok(())
    }
}
