//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Form,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::warn;

use crate::adapters::chart_svg::generate_dca_chart_svg;
use crate::domain::config_validation::DATE_FORMAT;
use crate::domain::period::Interval;
use crate::domain::request::SimulationRequest;
use crate::pipeline::run_simulation;

use super::{page_response, AppState, WebError};

const DEFAULT_SYMBOL: &str = "SPY";
const DEFAULT_START: &str = "2020-01-01";
const DEFAULT_END: &str = "2024-01-01";
const DEFAULT_AMOUNT: &str = "1000";

fn render<T: Template>(template: &T) -> Result<String, WebError> {
    template
        .render()
        .map_err(|e| WebError::internal(format!("Template error: {}", e)))
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let symbols = state.data_port.list_symbols().unwrap_or_else(|e| {
        warn!(error = %e, "could not list symbols for form");
        Vec::new()
    });
    let default = |key: &str, fallback: &str| {
        state
            .config
            .get_string("simulation", key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    };
    let default_symbol = default("symbol", DEFAULT_SYMBOL);
    let default_start = default("start_date", DEFAULT_START);
    let default_end = default("end_date", DEFAULT_END);
    let default_interval = default("interval", Interval::default().as_str());
    let default_amount = default("amount", DEFAULT_AMOUNT);

    let content = render(&super::templates::FormTemplate {
        symbols: &symbols,
        default_symbol: &default_symbol,
        default_start: &default_start,
        default_end: &default_end,
        default_interval: &default_interval,
        default_amount: &default_amount,
    })?;
    Ok(page_response(&headers, "DCA Simulator", content))
}

#[derive(Debug, serde::Deserialize)]
pub struct SimulationFormData {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub interval: String,
    pub amount: String,
}

impl SimulationFormData {
    /// Parses the raw form fields. Range and amount checks are left to the
    /// pipeline so they produce the same errors as the CLI.
    pub fn to_request(&self, state: &AppState) -> Result<SimulationRequest, WebError> {
        let symbol = self.ticker.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(WebError::bad_request("Ticker is required"));
        }
        let start_date = NaiveDate::parse_from_str(self.start_date.trim(), DATE_FORMAT)
            .map_err(|_| WebError::bad_request("Invalid start date format"))?;
        let end_date = NaiveDate::parse_from_str(self.end_date.trim(), DATE_FORMAT)
            .map_err(|_| WebError::bad_request("Invalid end date format"))?;
        let interval = match self.interval.trim() {
            "" => Interval::default(),
            raw => raw
                .parse()
                .map_err(|e: String| WebError::bad_request(e))?,
        };
        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| WebError::bad_request("Invalid amount"))?;

        Ok(SimulationRequest {
            symbol,
            start_date,
            end_date,
            interval,
            period: state.period(),
            amount,
        })
    }
}

pub async fn simulate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<SimulationFormData>,
) -> Result<Response, WebError> {
    let request = form.to_request(&state)?;
    let run = run_simulation(&*state.data_port, &request)?;

    let chart_svg = generate_dca_chart_svg(&request.symbol, &run.result);
    let start_date = request.start_date.format(DATE_FORMAT).to_string();
    let end_date = request.end_date.format(DATE_FORMAT).to_string();
    let summary = run.result.summary();

    let content = render(&super::templates::ResultsTemplate {
        symbol: &request.symbol,
        start_date: &start_date,
        end_date: &end_date,
        periods: run.result.steps().len(),
        final_portfolio_value: summary.final_portfolio_value,
        total_profit: summary.total_profit,
        total_investment: summary.total_invested,
        chart_svg: &chart_svg,
    })?;
    let title = format!("{} DCA Results", request.symbol);
    Ok(page_response(&headers, &title, content))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> impl IntoResponse {
    WebError::not_found("Page not found")
}
