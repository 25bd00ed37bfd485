//! SVG line chart of strategy vs buy-and-hold NAV.

use std::path::Path;

use chrono::NaiveDate;

use crate::domain::backtest::RotationResult;
use crate::domain::error::RotatraderError;
use crate::ports::report_port::ReportPort;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 500.0;
const PADDING: f64 = 60.0;

const STRATEGY_COLOR: &str = "#1f77b4";
const BUY_HOLD_COLOR: &str = "#ff7f0e";

pub struct SvgChartAdapter;

fn polyline(curve: &[(NaiveDate, f64)], min: f64, scale_x: f64, scale_y: f64) -> String {
    curve
        .iter()
        .enumerate()
        .map(|(i, (_, value))| {
            let x = PADDING + i as f64 * scale_x;
            let y = HEIGHT - PADDING - (value - min) * scale_y;
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn text(x: f64, y: f64, attrs: &str, body: impl std::fmt::Display) -> String {
    format!(r#"  <text x="{x:.0}" y="{y:.0}"{attrs}>{body}</text>"#)
}

pub fn format_nav_chart(result: &RotationResult) -> String {
    let strategy = result.strategy_curve();
    let buy_hold = result.buy_hold_curve();

    let mut lines = vec![
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}">"#
        ),
        r#"  <rect width="100%" height="100%" fill="white"/>"#.to_string(),
        text(
            WIDTH / 2.0,
            30.0,
            r#" text-anchor="middle" font-size="18""#,
            "Capital Growth Comparison",
        ),
    ];

    if strategy.is_empty() {
        lines.push(text(
            WIDTH / 2.0,
            HEIGHT / 2.0,
            r#" text-anchor="middle""#,
            "No NAV data available.",
        ));
        lines.push("</svg>\n".to_string());
        return lines.join("\n");
    }

    let values = strategy.iter().chain(buy_hold.iter()).map(|(_, v)| *v);
    let min = values.clone().fold(f64::INFINITY, f64::min);
    let max = values.fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if strategy.len() > 1 {
        plot_width / (strategy.len() - 1) as f64
    } else {
        0.0
    };
    let bottom = HEIGHT - PADDING;

    // axes
    lines.push(format!(
        r#"  <line x1="{PADDING:.0}" y1="{PADDING:.0}" x2="{PADDING:.0}" y2="{bottom:.0}" stroke="black"/>"#
    ));
    lines.push(format!(
        r#"  <line x1="{PADDING:.0}" y1="{bottom:.0}" x2="{:.0}" y2="{bottom:.0}" stroke="black"/>"#,
        WIDTH - PADDING
    ));

    let series = [
        (&strategy, STRATEGY_COLOR, "Rotation Strategy"),
        (&buy_hold, BUY_HOLD_COLOR, "Buy &amp; Hold"),
    ];
    for (curve, color, label) in series {
        lines.push(format!(
            r#"  <polyline fill="none" stroke="{color}" stroke-width="2" points="{}"><title>{label}</title></polyline>"#,
            polyline(curve, min, scale_x, scale_y)
        ));
    }

    let value_label = r#" font-size="12" text-anchor="end""#;
    lines.push(text(PADDING - 5.0, PADDING + 4.0, value_label, format!("{max:.0}")));
    lines.push(text(PADDING - 5.0, bottom + 4.0, value_label, format!("{min:.0}")));
    if let (Some((first, _)), Some((last, _))) = (strategy.first(), strategy.last()) {
        lines.push(text(PADDING, bottom + 20.0, r#" font-size="12""#, first));
        lines.push(text(WIDTH - PADDING, bottom + 20.0, value_label, last));
    }

    // legend
    for (i, (_, color, label)) in series.iter().enumerate() {
        let y = PADDING + 10.0 + i as f64 * 18.0;
        lines.push(format!(
            r#"  <line x1="{:.0}" y1="{y:.0}" x2="{:.0}" y2="{y:.0}" stroke="{color}" stroke-width="2"/>"#,
            PADDING + 15.0,
            PADDING + 35.0
        ));
        lines.push(text(PADDING + 40.0, y + 4.0, r#" font-size="12""#, label));
    }

    lines.push("</svg>\n".to_string());
    lines.join("\n")
}

impl ReportPort for SvgChartAdapter {
    fn write(&self, result: &RotationResult, output_path: &Path) -> Result<(), RotatraderError> {
        std::fs::write(output_path, format_nav_chart(result))?;
        tracing::info!(path = %output_path.display(), "wrote NAV chart");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::{run_rotation, RotationConfig};
    use crate::domain::price::{PriceBar, PriceSeries};

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_bars(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PriceBar {
                    date: NaiveDate::from_ymd_opt(2024, i as u32 + 1, 10).unwrap(),
                    open: Some(c),
                    close: Some(c),
                })
                .collect(),
        )
    }

    #[test]
    fn format_empty_result() {
        let svg = format_nav_chart(&RotationResult { rows: vec![] });
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("No NAV data available."));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn format_has_two_series_and_dates() {
        let result = run_rotation(
            &series(&[100.0, 110.0, 105.0, 120.0]),
            &series(&[50.0, 49.0, 52.0, 51.0]),
            &RotationConfig::default(),
        )
        .unwrap();
        let svg = format_nav_chart(&result);

        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("Rotation Strategy"));
        assert!(svg.contains("Buy &amp; Hold"));
        assert!(svg.contains("2024-02-29"));
        assert!(svg.contains("2024-04-30"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn single_month_chart_is_flat() {
        let result = run_rotation(
            &series(&[100.0, 100.0]),
            &series(&[100.0, 100.0]),
            &RotationConfig::default(),
        )
        .unwrap();
        let svg = format_nav_chart(&result);
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nav.svg");
        SvgChartAdapter
            .write(&RotationResult { rows: vec![] }, &path)
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }
}
