//! SVG chart adapter implementing ChartPort.
//!
//! Draws the signal chart (price, short/long averages, buy/sell markers) and
//! the portfolio value chart as standalone SVG documents.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::error::CrossoverError;
use crate::domain::pipeline::CrossoverRun;
use crate::domain::signal::{moving_averages, PositionEvent};
use crate::ports::chart_port::ChartPort;

pub const SIGNAL_CHART_FILE: &str = "signals_with_ma.svg";
pub const PORTFOLIO_CHART_FILE: &str = "portfolio.svg";

const BUY_COLOR: &str = "green";
const SELL_COLOR: &str = "red";

pub struct SvgChartAdapter {
    width: f64,
    height: f64,
}

impl SvgChartAdapter {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn write_chart(&self, dir: &Path, file: &str, svg: String) -> Result<PathBuf, CrossoverError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(file);
        fs::write(&path, svg)?;
        info!(path = %path.display(), "chart written");
        Ok(path)
    }

    pub fn signal_chart_svg(&self, run: &CrossoverRun) -> String {
        let cfg = &run.config;
        let prices: Vec<Option<f64>> = run.prices.prices().collect();
        let (short, long) = moving_averages(&run.prices, cfg.short_window, cfg.long_window);
        let short: Vec<Option<f64>> = short.values.iter().map(|p| p.value).collect();
        let long: Vec<Option<f64>> = long.values.iter().map(|p| p.value).collect();

        let mut frame = Frame::new(self.width, self.height, prices.len());
        frame.fit(prices.iter().chain(&short).chain(&long));

        let mut svg = frame.open("Moving average crossover plot with buy and sell signals");
        frame.axes(&mut svg, "Date", "Adjusted closing price");
        frame.date_labels(&mut svg, run);
        frame.line(&mut svg, &prices, "steelblue");
        frame.line(&mut svg, &short, "orange");
        frame.line(&mut svg, &long, "purple");

        // Markers sit on the short average, falling back to price before it is defined.
        for (i, point) in run.signals.transitions() {
            if let Some(v) = short.get(i).copied().flatten().or(prices[i]) {
                frame.marker(&mut svg, i, v, point.event);
            }
        }

        let short_label = format!("{} days moving average", cfg.short_window);
        let long_label = format!("{} days moving average", cfg.long_window);
        frame.legend(
            &mut svg,
            &[
                ("Price", "steelblue"),
                (short_label.as_str(), "orange"),
                (long_label.as_str(), "purple"),
                ("Buy signal", BUY_COLOR),
                ("Sell signal", SELL_COLOR),
            ],
        );
        svg.push_str("</svg>\n");
        svg
    }

    pub fn portfolio_chart_svg(&self, run: &CrossoverRun) -> String {
        let totals: Vec<Option<f64>> = run.portfolio.points.iter().map(|p| Some(p.total)).collect();

        let mut frame = Frame::new(self.width, self.height, totals.len());
        frame.fit(totals.iter());

        let mut svg = frame.open("Portfolio Plot");
        frame.axes(&mut svg, "Date", "Portfolio value");
        frame.date_labels(&mut svg, run);
        frame.line(&mut svg, &totals, "steelblue");
        for (i, point) in run.signals.transitions() {
            if let Some(v) = totals.get(i).copied().flatten() {
                frame.marker(&mut svg, i, v, point.event);
            }
        }
        frame.legend(
            &mut svg,
            &[
                ("Portfolio value", "steelblue"),
                ("Bought", BUY_COLOR),
                ("Sold", SELL_COLOR),
            ],
        );
        svg.push_str("</svg>\n");
        svg
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new(1000.0, 600.0)
    }
}

impl ChartPort for SvgChartAdapter {
    fn render_signal_chart(
        &self,
        run: &CrossoverRun,
        output_dir: &Path,
    ) -> Result<PathBuf, CrossoverError> {
        self.write_chart(output_dir, SIGNAL_CHART_FILE, self.signal_chart_svg(run))
    }

    fn render_portfolio_chart(
        &self,
        run: &CrossoverRun,
        output_dir: &Path,
    ) -> Result<PathBuf, CrossoverError> {
        self.write_chart(output_dir, PORTFOLIO_CHART_FILE, self.portfolio_chart_svg(run))
    }
}

/// Plot area geometry and value scaling.
struct Frame {
    width: f64,
    height: f64,
    padding: f64,
    count: usize,
    min: f64,
    max: f64,
}

impl Frame {
    fn new(width: f64, height: f64, count: usize) -> Self {
        Frame {
            width,
            height,
            padding: 60.0,
            count,
            min: 0.0,
            max: 1.0,
        }
    }

    fn fit<'a>(&mut self, values: impl Iterator<Item = &'a Option<f64>>) {
        let (min, max) = values
            .filter_map(|v| *v)
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min.is_finite() && max.is_finite() {
            self.min = min;
            self.max = max;
        }
    }

    fn x(&self, index: usize) -> f64 {
        let plot_width = self.width - 2.0 * self.padding;
        let scale_x = if self.count > 1 {
            plot_width / (self.count - 1) as f64
        } else {
            0.0
        };
        self.padding + index as f64 * scale_x
    }

    fn y(&self, value: f64) -> f64 {
        let plot_height = self.height - 2.0 * self.padding;
        let range = self.max - self.min;
        let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
        self.height - self.padding - (value - self.min) * scale_y
    }

    fn open(&self, title: &str) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
            self.width / 2.0,
            escape(title)
        );
        svg
    }

    fn axes(&self, svg: &mut String, x_label: &str, y_label: &str) {
        let left = self.padding;
        let right = self.width - self.padding;
        let top = self.padding;
        let bottom = self.height - self.padding;
        let _ = writeln!(
            svg,
            r#"<path d="M{left:.1},{top:.1} L{left:.1},{bottom:.1} L{right:.1},{bottom:.1}" fill="none" stroke="black"/>"#
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
            self.width / 2.0,
            self.height - 12.0,
            escape(x_label)
        );
        let _ = writeln!(
            svg,
            r#"<text x="14" y="{:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 14 {:.1})">{}</text>"#,
            self.height / 2.0,
            self.height / 2.0,
            escape(y_label)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10">{:.2}</text>"#,
            left - 4.0,
            top + 4.0,
            self.max
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10">{:.2}</text>"#,
            left - 4.0,
            bottom,
            self.min
        );
    }

    fn date_labels(&self, svg: &mut String, run: &CrossoverRun) {
        let dates: Vec<_> = run.prices.dates().collect();
        let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
            return;
        };
        let baseline = self.height - self.padding + 16.0;
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{baseline:.1}" text-anchor="start" font-size="10">{first}</text>"#,
            self.x(0)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{baseline:.1}" text-anchor="end" font-size="10">{last}</text>"#,
            self.x(dates.len() - 1)
        );
    }

    /// One polyline per run of defined values.
    fn line(&self, svg: &mut String, values: &[Option<f64>], color: &str) {
        let mut segment: Vec<String> = Vec::new();
        for (i, v) in values.iter().enumerate() {
            match v {
                Some(v) if v.is_finite() => {
                    segment.push(format!("{:.1},{:.1}", self.x(i), self.y(*v)));
                }
                _ => self.flush(svg, &mut segment, color),
            }
        }
        self.flush(svg, &mut segment, color);
    }

    fn flush(&self, svg: &mut String, segment: &mut Vec<String>, color: &str) {
        if segment.is_empty() {
            return;
        }
        let _ = writeln!(
            svg,
            r#"<polyline fill="none" stroke="{color}" stroke-width="1" points="{}"/>"#,
            segment.join(" ")
        );
        segment.clear();
    }

    fn marker(&self, svg: &mut String, index: usize, value: f64, event: Option<PositionEvent>) {
        let x = self.x(index);
        let y = self.y(value);
        // Upward triangle for buys, downward for sells.
        let (tip, base, color) = match event {
            Some(PositionEvent::Buy) => (y - 6.0, y + 4.0, BUY_COLOR),
            Some(PositionEvent::Sell) => (y + 6.0, y - 4.0, SELL_COLOR),
            _ => return,
        };
        let d = format!(
            "M{:.1},{:.1} L{:.1},{:.1} L{:.1},{:.1} Z",
            x,
            tip,
            x - 5.0,
            base,
            x + 5.0,
            base
        );
        let _ = writeln!(svg, r#"<path class="marker" d="{d}" fill="{color}"/>"#);
    }

    fn legend(&self, svg: &mut String, entries: &[(&str, &str)]) {
        let x = self.padding + 10.0;
        for (row, (label, color)) in entries.iter().enumerate() {
            let y = self.padding + 14.0 + row as f64 * 16.0;
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.1}" y="{:.1}" width="10" height="10" fill="{color}"/>"#,
                y - 9.0
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{y:.1}" font-size="11">{}</text>"#,
                x + 14.0,
                escape(label)
            );
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::CrossoverConfig;
    use crate::domain::pipeline::compute;
    use crate::domain::price_series::{PricePoint, PriceSeries};
    use chrono::{Duration, NaiveDate};
    use tempfile::TempDir;

    fn sample_run() -> CrossoverRun {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut closes: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
        closes.extend((0..30).map(|i| 79.0 - 2.0 * i as f64));
        let prices = PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PricePoint {
                    date: start + Duration::days(i as i64),
                    price: if i == 0 { None } else { Some(c) },
                })
                .collect(),
        );
        let config = CrossoverConfig {
            short_window: 3,
            long_window: 8,
            ..CrossoverConfig::new("TEST", start, start + Duration::days(59))
        };
        compute(&config, prices)
    }

    #[test]
    fn signal_chart_contains_series_and_markers() {
        let run = sample_run();
        let svg = SvgChartAdapter::default().signal_chart_svg(&run);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 3);
        assert!(svg.contains("3 days moving average"));
        assert!(svg.contains("8 days moving average"));
        assert_eq!(svg.matches(r#"class="marker""#).count(), 2);
        assert!(svg.contains("2024-01-01"));
    }

    #[test]
    fn portfolio_chart_marks_trades() {
        let run = sample_run();
        let svg = SvgChartAdapter::default().portfolio_chart_svg(&run);

        assert!(svg.contains("Portfolio Plot"));
        assert!(svg.contains("Bought"));
        assert_eq!(svg.matches(r#"fill="green"/>"#).count(), 2); // marker + legend swatch
    }

    #[test]
    fn empty_run_still_renders() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let config = CrossoverConfig {
            short_window: 2,
            long_window: 3,
            ..CrossoverConfig::new("TEST", start, start)
        };
        let run = compute(&config, PriceSeries::default());
        let svg = SvgChartAdapter::default().portfolio_chart_svg(&run);
        assert!(!svg.contains("<polyline"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn adapter_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("charts");
        let run = sample_run();
        let adapter = SvgChartAdapter::default();

        let signal = adapter.render_signal_chart(&run, &out).unwrap();
        let portfolio = adapter.render_portfolio_chart(&run, &out).unwrap();

        assert_eq!(signal, out.join(SIGNAL_CHART_FILE));
        assert_eq!(portfolio, out.join(PORTFOLIO_CHART_FILE));
        assert!(fs::read_to_string(signal).unwrap().contains("<svg"));
        assert!(fs::read_to_string(portfolio).unwrap().contains("<svg"));
    }

    #[test]
    fn escape_markup() {
        assert_eq!(escape("A&B <x>"), "A&amp;B &lt;x&gt;");
    }
}
