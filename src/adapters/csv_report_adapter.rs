//! CSV export of the per-period step table.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::domain::config_validation::DATE_FORMAT;
use crate::domain::error::DcaError;
use crate::domain::request::SimulationRequest;
use crate::domain::simulation::SimulationResult;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Serialize)]
struct StepRow {
    date: String,
    price: f64,
    units_purchased: f64,
    total_investment: f64,
    shares: f64,
    portfolio_value: f64,
}

fn csv_err(e: csv::Error) -> DcaError {
    DcaError::Report {
        reason: format!("CSV write error: {}", e),
    }
}

/// Writes the step table as CSV to any writer.
pub fn write_steps<W: io::Write>(result: &SimulationResult, writer: W) -> Result<(), DcaError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for step in result.steps() {
        wtr.serialize(StepRow {
            date: step.date.format(DATE_FORMAT).to_string(),
            price: step.price,
            units_purchased: step.units_purchased,
            total_investment: step.cumulative_invested,
            shares: step.cumulative_units,
            portfolio_value: step.portfolio_value,
        })
        .map_err(csv_err)?;
    }
    wtr.flush()?;
    Ok(())
}

pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &SimulationResult,
        _request: &SimulationRequest,
        output_path: &str,
    ) -> Result<(), DcaError> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        write_steps(result, file)
    }
}
