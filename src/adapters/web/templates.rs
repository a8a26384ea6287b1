//! HTML templates using Askama.

use askama::Template;

#[derive(Template)]
#[template(path = "base.html")]
pub struct BasePage<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Template)]
#[template(path = "form.html")]
pub struct FormTemplate<'a> {
    pub symbols: &'a [String],
    pub default_symbol: &'a str,
    pub default_start: &'a str,
    pub default_end: &'a str,
    pub default_interval: &'a str,
    pub default_amount: &'a str,
}

#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate<'a> {
    pub symbol: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub periods: usize,
    pub final_portfolio_value: f64,
    pub total_profit: f64,
    pub total_investment: f64,
    pub chart_svg: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
