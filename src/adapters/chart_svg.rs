//! SVG line chart of portfolio value against total investment.

use chrono::NaiveDate;

use crate::domain::simulation::SimulationResult;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;
const PADDING: f64 = 70.0;
const VALUE_COLOR: &str = "#1f77b4";
const INVESTED_COLOR: &str = "#ff7f0e";
const GRID_LINES: usize = 5;

struct Frame {
    min_y: f64,
    max_y: f64,
    count: usize,
}

impl Frame {
    fn plot_width(&self) -> f64 {
        WIDTH - 2.0 * PADDING
    }

    fn plot_height(&self) -> f64 {
        HEIGHT - 2.0 * PADDING
    }

    fn x(&self, i: usize) -> f64 {
        if self.count > 1 {
            PADDING + i as f64 * self.plot_width() / (self.count - 1) as f64
        } else {
            PADDING + self.plot_width() / 2.0
        }
    }

    fn y(&self, value: f64) -> f64 {
        let range = self.max_y - self.min_y;
        let fraction = if range > 0.0 {
            (value - self.min_y) / range
        } else {
            0.0
        };
        HEIGHT - PADDING - fraction * self.plot_height()
    }
}

fn polyline(frame: &Frame, values: &[f64], color: &str) -> String {
    let points: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.1},{:.1}", frame.x(i), frame.y(*v)))
        .collect();
    format!(
        r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
        color,
        points.join(" ")
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn date_ticks(dates: &[NaiveDate]) -> Vec<usize> {
    match dates.len() {
        0 => Vec::new(),
        1 => vec![0],
        n => {
            let ticks = n.min(6);
            let mut idx: Vec<usize> = (0..ticks).map(|t| t * (n - 1) / (ticks - 1)).collect();
            idx.dedup();
            idx
        }
    }
}

/// Renders the chart with a title of `"<SYMBOL> Portfolio Value Over Time"`.
pub fn generate_dca_chart_svg(symbol: &str, result: &SimulationResult) -> String {
    let dates = result.dates();
    let values = result.value_series();
    let invested = result.invested_series();

    if dates.is_empty() {
        return "<p>No simulation data available.</p>".to_string();
    }

    let min_y = values
        .iter()
        .chain(invested.iter())
        .copied()
        .fold(f64::INFINITY, f64::min)
        .min(0.0);
    let max_y = values
        .iter()
        .chain(invested.iter())
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let frame = Frame {
        min_y,
        max_y,
        count: dates.len(),
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="sans-serif" font-size="12">"#,
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str(&format!(
        r#"<rect width="{}" height="{}" fill="white"/>"#,
        WIDTH, HEIGHT
    ));

    for i in 0..=GRID_LINES {
        let value = min_y + (max_y - min_y) * i as f64 / GRID_LINES as f64;
        let y = frame.y(value);
        svg.push_str(&format!(
            r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#dddddd"/><text x="{tx:.1}" y="{ty:.1}" text-anchor="end">{value:.0}</text>"##,
            x1 = PADDING,
            x2 = WIDTH - PADDING,
            tx = PADDING - 6.0,
            ty = y + 4.0,
        ));
    }

    for i in date_ticks(&dates) {
        let x = frame.x(i);
        svg.push_str(&format!(
            r##"<line x1="{x:.1}" y1="{y1:.1}" x2="{x:.1}" y2="{y2:.1}" stroke="#dddddd"/><text x="{x:.1}" y="{ty:.1}" text-anchor="middle">{date}</text>"##,
            y1 = PADDING,
            y2 = HEIGHT - PADDING,
            ty = HEIGHT - PADDING + 18.0,
            date = dates[i].format("%Y-%m"),
        ));
    }

    svg.push_str(&format!(
        r#"<line x1="{p:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black"/><line x1="{p:.1}" y1="{p:.1}" x2="{p:.1}" y2="{b:.1}" stroke="black"/>"#,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING,
    ));

    svg.push_str(&polyline(&frame, &values, VALUE_COLOR));
    svg.push_str(&polyline(&frame, &invested, INVESTED_COLOR));

    svg.push_str(&format!(
        r#"<text x="{:.1}" y="30" text-anchor="middle" font-size="18">{} Portfolio Value Over Time</text>"#,
        WIDTH / 2.0,
        escape(symbol)
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">Date</text>"#,
        WIDTH / 2.0,
        HEIGHT - 20.0
    ));
    svg.push_str(&format!(
        r#"<text x="18" y="{y:.1}" text-anchor="middle" transform="rotate(-90 18 {y:.1})">Portfolio Value (USD)</text>"#,
        y = HEIGHT / 2.0
    ));

    let legend_x = PADDING + 15.0;
    let legend_y = PADDING + 15.0;
    for (i, (label, color)) in [("Portfolio Value", VALUE_COLOR), ("Total Investment", INVESTED_COLOR)]
        .iter()
        .enumerate()
    {
        let y = legend_y + i as f64 * 18.0;
        svg.push_str(&format!(
            r#"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{color}" stroke-width="2"/><text x="{tx:.1}" y="{ty:.1}">{label}</text>"#,
            x1 = legend_x,
            x2 = legend_x + 24.0,
            tx = legend_x + 30.0,
            ty = y + 4.0,
        ));
    }

    svg.push_str("</svg>");
    svg
}
