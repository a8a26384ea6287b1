//! Web server adapter.
//!
//! Axum server with an HTMX-friendly form for running DCA simulations and
//! viewing the results page with its chart.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use askama::Template;
use axum::{
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::period::PeriodUnit;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;

pub struct AppState {
    pub data_port: Arc<dyn PriceDataPort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

impl AppState {
    /// Period used for form submissions, from `[simulation] period`.
    pub fn period(&self) -> PeriodUnit {
        self.config
            .get_string("simulation", "period")
            .and_then(|p| p.parse().ok())
            .unwrap_or_default()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::simulate))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}

/// Returns the fragment alone for HTMX requests, else wraps it in the base page.
fn page_response(headers: &HeaderMap, title: &str, content: String) -> Response {
    if is_htmx_request(headers) {
        return Html(content).into_response();
    }
    let page = templates::BasePage {
        title,
        content: &content,
    };
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(_) => Html(content).into_response(),
    }
}
