//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{error, info, warn};

use crate::domain::error::DcaError;

pub const EMPTY_SERIES_MESSAGE: &str = "No price data for this symbol and date range";

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &DcaError) -> StatusCode {
    match err {
        DcaError::EmptySeries => StatusCode::UNPROCESSABLE_ENTITY,
        DcaError::InvalidAmount { .. }
        | DcaError::InvalidPrice { .. }
        | DcaError::UnsortedSeries { .. }
        | DcaError::ConfigMissing { .. }
        | DcaError::ConfigInvalid { .. }
        | DcaError::ConfigParse { .. } => StatusCode::BAD_REQUEST,
        DcaError::Database { .. }
        | DcaError::DatabaseQuery { .. }
        | DcaError::Report { .. }
        | DcaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DcaError> for WebError {
    fn from(err: DcaError) -> Self {
        let status = status_from_error(&err);
        if status.is_server_error() {
            error!(error = %err, "simulation request failed");
            return Self::new(status, "Price data source unavailable");
        }
        if err.is_input_error() {
            info!(error = %err, status = status.as_u16(), "simulation rejected input");
        } else {
            warn!(error = %err, status = status.as_u16(), "simulation request rejected");
        }
        match err {
            DcaError::EmptySeries => Self::new(status, EMPTY_SERIES_MESSAGE),
            other => Self::new(status, other.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let template = super::templates::ErrorTemplate {
            message: &self.message,
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
