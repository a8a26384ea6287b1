//! HTML report adapter implementing ReportPort.
//!
//! Generates a standalone HTML page using an Askama template with the
//! inline SVG chart, the summary figures and the per-period table.

use std::fs;
use std::path::Path;

use askama::Template;

use crate::adapters::chart_svg::generate_dca_chart_svg;
use crate::domain::error::DcaError;
use crate::domain::request::SimulationRequest;
use crate::domain::simulation::{SimulationResult, SimulationStep, SimulationSummary};
use crate::ports::report_port::ReportPort;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    request: &'a SimulationRequest,
    summary: &'a SimulationSummary,
    steps: &'a [SimulationStep],
    chart_svg: String,
    total_units: f64,
    average_cost: f64,
    return_pct: f64,
}

/// Renders the report page to a string.
pub fn render_report(
    result: &SimulationResult,
    request: &SimulationRequest,
) -> Result<String, DcaError> {
    let template = ReportTemplate {
        request,
        summary: result.summary(),
        steps: result.steps(),
        chart_svg: generate_dca_chart_svg(&request.symbol, result),
        total_units: result.total_units(),
        average_cost: result.average_cost(),
        return_pct: result.summary().return_pct() * 100.0,
    };
    template.render().map_err(|e| DcaError::Report {
        reason: e.to_string(),
    })
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(
        &self,
        result: &SimulationResult,
        request: &SimulationRequest,
        output_path: &str,
    ) -> Result<(), DcaError> {
        let html = render_report(result, request)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;
        Ok(())
    }
}
