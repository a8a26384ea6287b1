//! Fetch → periodize → simulate, shared by the CLI and the web adapter.

use tracing::{debug, info};

use crate::domain::error::DcaError;
use crate::domain::periodize::periodize;
use crate::domain::price::{validate_series, PricePoint};
use crate::domain::request::SimulationRequest;
use crate::domain::simulation::{simulate_dca, SimulationResult};
use crate::ports::data_port::PriceDataPort;

/// Everything produced by one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub request: SimulationRequest,
    /// Number of points the provider returned.
    pub source_points: usize,
    pub periodized: Vec<PricePoint>,
    pub result: SimulationResult,
}

pub fn run_simulation(
    data_port: &dyn PriceDataPort,
    request: &SimulationRequest,
) -> Result<SimulationRun, DcaError> {
    request.validate()?;

    let series = data_port.fetch_prices(
        &request.symbol,
        request.start_date,
        request.end_date,
        request.interval,
    )?;
    debug!(
        symbol = %request.symbol,
        points = series.len(),
        interval = %request.interval,
        "fetched price series"
    );

    validate_series(&series)?;
    let periodized = periodize(&series, request.period)?;
    let result = simulate_dca(&periodized, request.amount)?;

    info!(
        symbol = %request.symbol,
        periods = periodized.len(),
        amount = request.amount,
        final_value = result.final_portfolio_value(),
        profit = result.total_profit(),
        "simulation complete"
    );

    Ok(SimulationRun {
        request: request.clone(),
        source_points: series.len(),
        periodized,
        result,
    })
}
