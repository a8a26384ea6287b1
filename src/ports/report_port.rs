//! Report generation port trait.

use crate::domain::error::DcaError;
use crate::domain::request::SimulationRequest;
use crate::domain::simulation::SimulationResult;

/// Port for writing simulation reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &SimulationResult,
        request: &SimulationRequest,
        output_path: &str,
    ) -> Result<(), DcaError>;
}
