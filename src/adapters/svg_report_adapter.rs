//! SVG efficient frontier chart implementing ReportPort.
//!
//! Every sample is a blue dot on risk/return axes; the minimum-risk
//! candidate is drawn as a red cross.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::error::FrontierError;
use crate::ports::report_port::{FrontierReport, ReportPort};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const PADDING: f64 = 60.0;

pub struct SvgReportAdapter;

impl SvgReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear map from `[lo, hi]` onto `[0, span]`; a flat range maps to the middle.
fn scale(value: f64, lo: f64, hi: f64, span: f64) -> f64 {
    let range = hi - lo;
    if range > 0.0 {
        (value - lo) / range * span
    } else {
        span / 2.0
    }
}

pub fn render_frontier_svg(report: &FrontierReport<'_>) -> String {
    let result = report.result;
    let (risk_lo, risk_hi) = result.risk_range();
    let (ret_lo, ret_hi) = result.return_range();

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let to_xy = |risk: f64, ret: f64| {
        (
            PADDING + scale(risk, risk_lo, risk_hi, plot_width),
            HEIGHT - PADDING - scale(ret, ret_lo, ret_hi, plot_height),
        )
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="30" text-anchor="middle" font-size="18">Efficient Frontier</text>"#,
        WIDTH / 2.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="48" text-anchor="middle" font-size="12">{} | {} | {} samples</text>"#,
        WIDTH / 2.0,
        report.tickers.join(", "),
        report.range,
        result.len()
    );

    // axes
    let _ = writeln!(
        svg,
        r#"<line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="black"/>"#,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="black"/>"#,
        p = PADDING,
        b = HEIGHT - PADDING
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" text-anchor="middle" font-size="12">Portfolio Risk (Standard Deviation)</text>"#,
        WIDTH / 2.0,
        HEIGHT - 15.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="15" y="{y:.0}" text-anchor="middle" font-size="12" transform="rotate(-90 15 {y:.0})">Portfolio Return</text>"#,
        y = HEIGHT / 2.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-size="10">{:.2}%</text><text x="{:.0}" y="{:.0}" text-anchor="end" font-size="10">{:.2}%</text>"#,
        PADDING,
        HEIGHT - PADDING + 15.0,
        risk_lo * 100.0,
        WIDTH - PADDING,
        HEIGHT - PADDING + 15.0,
        risk_hi * 100.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" text-anchor="end" font-size="10">{:.2}%</text><text x="{:.0}" y="{:.0}" text-anchor="end" font-size="10">{:.2}%</text>"#,
        PADDING - 5.0,
        HEIGHT - PADDING,
        ret_lo * 100.0,
        PADDING - 5.0,
        PADDING + 5.0,
        ret_hi * 100.0
    );

    let _ = writeln!(svg, r#"<g fill="blue" fill-opacity="0.5">"#);
    for (risk, ret) in result.points() {
        let (x, y) = to_xy(risk, ret);
        let _ = writeln!(svg, r#"<circle cx="{:.1}" cy="{:.1}" r="1.5"/>"#, x, y);
    }
    let _ = writeln!(svg, "</g>");

    let (bx, by) = to_xy(result.best.risk(), result.best.expected_return());
    let _ = writeln!(
        svg,
        r#"<g stroke="red" stroke-width="3"><line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}"/><line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}"/></g>"#,
        bx - 7.0,
        by - 7.0,
        bx + 7.0,
        by + 7.0,
        bx - 7.0,
        by + 7.0,
        bx + 7.0,
        by - 7.0
    );
    let _ = writeln!(svg, "</svg>");
    svg
}

impl ReportPort for SvgReportAdapter {
    fn write(&self, report: &FrontierReport<'_>, output_path: &str) -> Result<(), FrontierError> {
        let svg = render_frontier_svg(report);

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, svg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frontier::{BestCandidate, FrontierResult, PortfolioSample};
    use crate::domain::universe::DateRange;
    use crate::domain::weights::WeightVector;
    use tempfile::TempDir;

    fn sample(risk: f64, ret: f64) -> PortfolioSample {
        PortfolioSample {
            weights: WeightVector::new(vec![0.5, 0.5]),
            expected_return: ret,
            risk,
        }
    }

    fn result() -> FrontierResult {
        let samples = vec![sample(0.02, 0.001), sample(0.01, 0.0005), sample(0.03, 0.002)];
        FrontierResult {
            best: BestCandidate {
                index: 1,
                sample: samples[1].clone(),
            },
            samples,
        }
    }

    fn tickers() -> Vec<String> {
        vec!["AAPL".into(), "MSFT".into()]
    }

    #[test]
    fn renders_one_dot_per_sample_and_a_cross() {
        let result = result();
        let tickers = tickers();
        let report = FrontierReport {
            tickers: &tickers,
            range: DateRange::parse("2024-01-01", "2024-06-30").unwrap(),
            observations: 120,
            result: &result,
        };
        let svg = render_frontier_svg(&report);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("stroke=\"red\""));
        assert!(svg.contains("Efficient Frontier"));
        assert!(svg.contains("AAPL, MSFT"));
        assert!(svg.contains("Portfolio Risk (Standard Deviation)"));
    }

    #[test]
    fn best_cross_sits_at_left_edge() {
        let result = result();
        let tickers = tickers();
        let report = FrontierReport {
            tickers: &tickers,
            range: DateRange::parse("2024-01-01", "2024-06-30").unwrap(),
            observations: 120,
            result: &result,
        };
        let svg = render_frontier_svg(&report);
        // minimum risk maps to x = PADDING, cross spans PADDING ± 7
        assert!(svg.contains(r#"x1="53.0""#));
    }

    #[test]
    fn flat_range_maps_to_middle() {
        assert_eq!(scale(1.0, 1.0, 1.0, 100.0), 50.0);
        assert_eq!(scale(2.0, 1.0, 3.0, 100.0), 50.0);
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested/frontier.svg");
        let result = result();
        let tickers = tickers();
        let report = FrontierReport {
            tickers: &tickers,
            range: DateRange::parse("2024-01-01", "2024-06-30").unwrap(),
            observations: 120,
            result: &result,
        };

        SvgReportAdapter::new()
            .write(&report, out.to_str().unwrap())
            .unwrap();
        let content = fs::read_to_string(out).unwrap();
        assert!(content.contains("<circle"));
    }
}
