//! CSV dump of every sampled portfolio implementing ReportPort.

use std::fs;
use std::path::Path;

use crate::domain::error::FrontierError;
use crate::ports::report_port::{FrontierReport, ReportPort};

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_error(e: impl std::fmt::Display) -> FrontierError {
    FrontierError::Report {
        reason: format!("CSV write error: {}", e),
    }
}

/// Rows of `index,risk,expected_return,<ticker>...,best`, in sampling order.
pub fn render_frontier_csv(report: &FrontierReport<'_>) -> Result<String, FrontierError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = vec![
        "index".to_string(),
        "risk".to_string(),
        "expected_return".to_string(),
    ];
    header.extend(report.tickers.iter().cloned());
    header.push("best".to_string());
    wtr.write_record(&header).map_err(csv_error)?;

    let best = report.result.best.index;
    for (i, sample) in report.result.samples.iter().enumerate() {
        let mut row = vec![
            i.to_string(),
            sample.risk.to_string(),
            sample.expected_return.to_string(),
        ];
        row.extend(sample.weights.iter().map(|w| w.to_string()));
        row.push((i == best).to_string());
        wtr.write_record(&row).map_err(csv_error)?;
    }

    let bytes = wtr.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &FrontierReport<'_>, output_path: &str) -> Result<(), FrontierError> {
        let content = render_frontier_csv(report)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
