//! Dollar-cost averaging simulator.
//!
//! A fixed amount is invested at every point of a periodized series. The
//! running totals are carried unrounded in [`DcaState`]; each emitted
//! [`SimulationStep`] reports money rounded to the cent while the share count
//! keeps full precision, so rounding error never compounds across periods.

use chrono::NaiveDate;

use super::error::DcaError;
use super::price::PricePoint;
use super::rounding::round2;

/// Outcome of one contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationStep {
    pub date: NaiveDate,
    pub price: f64,
    /// Units bought this period (amount / price), rounded to 2 decimals.
    pub units_purchased: f64,
    /// Total contributed so far, rounded to 2 decimals.
    pub cumulative_invested: f64,
    /// Total units held, unrounded.
    pub cumulative_units: f64,
    /// cumulative_units x price, rounded to 2 decimals.
    pub portfolio_value: f64,
}

/// Running totals threaded through the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DcaState {
    pub invested: f64,
    pub units: f64,
}

impl DcaState {
    /// Applies one contribution at `point`, returning the next state and the
    /// reported step.
    pub fn step(self, point: &PricePoint, amount: f64) -> (DcaState, SimulationStep) {
        let units_purchased = amount / point.price;
        let next = DcaState {
            invested: self.invested + amount,
            units: self.units + units_purchased,
        };
        let step = SimulationStep {
            date: point.date,
            price: point.price,
            units_purchased: round2(units_purchased),
            cumulative_invested: round2(next.invested),
            cumulative_units: next.units,
            portfolio_value: round2(next.units * point.price),
        };
        (next, step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSummary {
    pub final_portfolio_value: f64,
    pub total_invested: f64,
    pub total_profit: f64,
}

impl SimulationSummary {
    /// Final value and total invested are rounded independently, then the
    /// profit is the rounded difference of the rounded figures.
    fn from_totals(final_portfolio_value: f64, total_invested: f64) -> Self {
        let final_portfolio_value = round2(final_portfolio_value);
        let total_invested = round2(total_invested);
        Self {
            final_portfolio_value,
            total_invested,
            total_profit: round2(final_portfolio_value - total_invested),
        }
    }

    /// Profit as a fraction of the amount invested.
    pub fn return_pct(&self) -> f64 {
        if self.total_invested > 0.0 {
            self.total_profit / self.total_invested
        } else {
            0.0
        }
    }
}

/// Step table plus summary. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    steps: Vec<SimulationStep>,
    summary: SimulationSummary,
}

impl SimulationResult {
    pub fn steps(&self) -> &[SimulationStep] {
        &self.steps
    }

    pub fn summary(&self) -> &SimulationSummary {
        &self.summary
    }

    pub fn final_portfolio_value(&self) -> f64 {
        self.summary.final_portfolio_value
    }

    pub fn total_invested(&self) -> f64 {
        self.summary.total_invested
    }

    pub fn total_profit(&self) -> f64 {
        self.summary.total_profit
    }

    /// Units held at the end of the simulation.
    pub fn total_units(&self) -> f64 {
        self.steps.last().map_or(0.0, |s| s.cumulative_units)
    }

    /// Average price paid per unit over all contributions.
    pub fn average_cost(&self) -> f64 {
        let units = self.total_units();
        if units > 0.0 {
            self.summary.total_invested / units
        } else {
            0.0
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.steps.iter().map(|s| s.date).collect()
    }

    pub fn invested_series(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.cumulative_invested).collect()
    }

    pub fn value_series(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.portfolio_value).collect()
    }
}

/// Runs the DCA simulation over a periodized series.
///
/// Fails fast: the amount, emptiness and every price are checked before any
/// step is computed, so no partial result is ever produced.
pub fn simulate_dca(series: &[PricePoint], amount: f64) -> Result<SimulationResult, DcaError> {
    if !(amount.is_finite() && amount > 0.0) {
        return Err(DcaError::InvalidAmount { amount });
    }
    if series.is_empty() {
        return Err(DcaError::EmptySeries);
    }
    series.iter().try_for_each(PricePoint::check_price)?;

    let steps: Vec<SimulationStep> = series
        .iter()
        .scan(DcaState::default(), |state, point| {
            let (next, step) = state.step(point, amount);
            *state = next;
            Some(step)
        })
        .collect();

    let summary = match steps.last() {
        Some(last) => {
            SimulationSummary::from_totals(last.portfolio_value, last.cumulative_invested)
        }
        None => return Err(DcaError::EmptySeries),
    };

    Ok(SimulationResult {
        steps,
        summary,
    })
}
