//! Charts and formatted metric tables for the demo reports.
//!
//! Charts are SVG documents rendered with `plotters` into a `String`, ready to
//! be inlined into an HTML page or written to disk. All displayed numbers use
//! four decimals.

use crate::error::{Error, Result};
use crate::pipeline::{MultipleReport, SimpleReport, TimeSeriesReport};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

const CHART_SIZE: (u32, u32) = (800, 480);
const FONT: &str = "sans-serif";

pub type MetricRow = (String, String);

pub fn fmt4(value: f64) -> String {
    format!("{:.4}", value)
}

/// R² with the zero-variance sentinel spelled out.
pub fn fmt_r2(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), fmt4)
}

fn row(label: impl Into<String>, value: String) -> MetricRow {
    (label.into(), value)
}

pub fn simple_metrics(report: &SimpleReport) -> Vec<MetricRow> {
    vec![
        row("Learned Slope (Coefficient)", fmt4(report.learned_slope)),
        row("Learned Intercept", fmt4(report.learned_intercept)),
        row("True Slope", fmt4(report.params.true_slope)),
        row("True Intercept", fmt4(report.true_intercept)),
        row("R²", fmt_r2(report.metrics.r2)),
        row("MSE", fmt4(report.metrics.mse)),
        row("MAE", fmt4(report.metrics.mae)),
    ]
}

pub fn multiple_metrics(report: &MultipleReport) -> Vec<MetricRow> {
    let mut rows = vec![
        row("R²", fmt_r2(report.metrics.r2)),
        row("MSE", fmt4(report.metrics.mse)),
        row("MAE", fmt4(report.metrics.mae)),
        row("Learned Intercept", fmt4(report.learned_intercept)),
    ];
    for ((&j, learned), truth) in report
        .selected
        .iter()
        .zip(&report.learned_coefficients)
        .zip(&report.true_coefficients)
    {
        rows.push(row(
            format!("x{} coefficient (true {})", j + 1, fmt4(*truth)),
            fmt4(*learned),
        ));
    }
    if let Some(ranking) = &report.ranking {
        let ranks = ranking
            .iter()
            .enumerate()
            .map(|(j, r)| format!("x{}={}", j + 1, r))
            .collect::<Vec<_>>()
            .join(", ");
        rows.push(row("RFE ranking", ranks));
    }
    rows
}

pub fn timeseries_metrics(report: &TimeSeriesReport) -> Vec<MetricRow> {
    let mut rows = Vec::new();
    for (i, phi) in report.coefficients.iter().enumerate() {
        let truth = report
            .true_coefficients
            .get(i)
            .map_or_else(|| "0".to_string(), |c| fmt4(*c));
        rows.push(row(format!("φ{} (true {})", i + 1, truth), fmt4(*phi)));
    }
    let adf = &report.adf;
    rows.extend([
        row("Intercept", fmt4(report.intercept)),
        row("In-sample R²", fmt_r2(report.metrics.r2)),
        row("In-sample MSE", fmt4(report.metrics.mse)),
        row("In-sample MAE", fmt4(report.metrics.mae)),
        row("ADF Statistic", fmt4(adf.statistic)),
        row("ADF p-value", fmt4(adf.p_value)),
        row("ADF lags used", adf.used_lag.to_string()),
        row("Critical value (1%)", fmt4(adf.critical_values.one_pct)),
        row("Critical value (5%)", fmt4(adf.critical_values.five_pct)),
        row("Critical value (10%)", fmt4(adf.critical_values.ten_pct)),
        row("Conclusion", format!("Series is {}", adf.conclusion())),
    ]);
    rows
}

/// ACF values as `(lag, value)` rows, lag 0 omitted.
pub fn acf_rows(report: &TimeSeriesReport) -> Vec<MetricRow> {
    report
        .acf
        .iter()
        .enumerate()
        .skip(1)
        .map(|(lag, v)| row(format!("lag {}", lag), fmt4(*v)))
        .collect()
}

fn chart_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Numerical(format!("chart rendering failed: {}", e))
}

/// Padded `[min, max]` over the given values; widened when they coincide.
fn bounds<'a>(values: impl IntoIterator<Item = &'a f64>) -> Result<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return Err(Error::Numerical("nothing finite to plot".to_string()));
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    Ok((lo - pad, hi + pad))
}

/// Scatter of the data with the generating and fitted lines.
pub fn simple_chart(report: &SimpleReport) -> Result<String> {
    let (y_lo, y_hi) = bounds(
        report
            .y
            .iter()
            .chain(report.true_line.iter().map(|(_, y)| y))
            .chain(report.fitted_line.iter().map(|(_, y)| y)),
    )?;
    let caption = format!(
        "Linear Regression (a={}, noise={}, points={})",
        report.params.true_slope, report.params.noise_scale, report.params.sample_count
    );

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, (FONT, 20))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(52)
            .build_cartesian_2d(-0.2f64..10.2f64, y_lo..y_hi)
            .map_err(chart_error)?;
        chart
            .configure_mesh()
            .x_desc("X")
            .y_desc("y")
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(
                report
                    .x
                    .iter()
                    .zip(&report.y)
                    .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.mix(0.6).filled())),
            )
            .map_err(chart_error)?
            .label("Data Points")
            .legend(|(x, y)| Circle::new((x, y), 3, BLUE.filled()));

        chart
            .draw_series(DashedLineSeries::new(
                report.true_line.iter().copied(),
                10,
                6,
                GREEN.stroke_width(2),
            ))
            .map_err(chart_error)?
            .label(format!(
                "True Line (y = {}x + {})",
                report.params.true_slope, report.true_intercept
            ))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(2)));

        chart
            .draw_series(LineSeries::new(
                report.fitted_line.iter().copied(),
                RED.stroke_width(2),
            ))
            .map_err(chart_error)?
            .label("Regression Line")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

/// Predicted against actual targets, with the identity line for reference.
pub fn multiple_chart(report: &MultipleReport) -> Result<String> {
    let (lo, hi) = bounds(report.actual.iter().chain(&report.predicted))?;
    let caption = format!(
        "Predicted vs Actual ({} of {} features)",
        report.selected.len(),
        report.params.feature_count
    );

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, (FONT, 20))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(52)
            .build_cartesian_2d(lo..hi, lo..hi)
            .map_err(chart_error)?;
        chart
            .configure_mesh()
            .x_desc("Actual y")
            .y_desc("Predicted y")
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(
                report
                    .actual
                    .iter()
                    .zip(&report.predicted)
                    .map(|(&a, &p)| Circle::new((a, p), 3, BLUE.mix(0.6).filled())),
            )
            .map_err(chart_error)?
            .label("Samples")
            .legend(|(x, y)| Circle::new((x, y), 3, BLUE.filled()));

        chart
            .draw_series(LineSeries::new([(lo, lo), (hi, hi)], RED.stroke_width(2)))
            .map_err(chart_error)?
            .label("Perfect fit")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

/// Observed series, in-sample fit and the forecast continuing past the end.
pub fn timeseries_chart(report: &TimeSeriesReport) -> Result<String> {
    let n = report.series.len();
    let lags = report.lags();
    let horizon = report.forecast.len();
    let (y_lo, y_hi) = bounds(
        report
            .series
            .iter()
            .chain(&report.fitted)
            .chain(&report.forecast),
    )?;
    let caption = format!(
        "AR({}) fit and {}-step forecast",
        report.coefficients.len(),
        horizon
    );

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, (FONT, 20))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(52)
            .build_cartesian_2d(0f64..(n + horizon) as f64, y_lo..y_hi)
            .map_err(chart_error)?;
        chart
            .configure_mesh()
            .x_desc("t")
            .y_desc("value")
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(LineSeries::new(
                report.series.iter().enumerate().map(|(t, &v)| (t as f64, v)),
                BLUE.mix(0.7),
            ))
            .map_err(chart_error)?
            .label("Observed")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .draw_series(LineSeries::new(
                report
                    .fitted
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| ((i + lags) as f64, v)),
                GREEN.mix(0.8),
            ))
            .map_err(chart_error)?
            .label("In-sample fit")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

        // join the forecast to the last observation
        let last = report.series.last().copied().unwrap_or(0.0);
        let forecast = std::iter::once(((n - 1) as f64, last)).chain(
            report
                .forecast
                .iter()
                .enumerate()
                .map(|(i, &v)| ((n + i) as f64, v)),
        );
        chart
            .draw_series(LineSeries::new(forecast, RED.stroke_width(2)))
            .map_err(chart_error)?
            .label("Forecast")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{MultipleParams, SimpleParams, TimeSeriesParams};
    use crate::pipeline::{run_multiple, run_simple, run_timeseries};

    #[test]
    fn test_fmt4() {
        assert_eq!(fmt4(2.0), "2.0000");
        assert_eq!(fmt4(-0.123456), "-0.1235");
        assert_eq!(fmt_r2(None), "undefined");
        assert_eq!(fmt_r2(Some(0.98765)), "0.9877");
    }

    #[test]
    fn test_simple_chart_is_svg() {
        let report = run_simple(&SimpleParams {
            seed: Some(1),
            ..SimpleParams::default()
        })
        .unwrap();

        let svg = simple_chart(&report).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Regression Line"));
        // the true line is drawn as many short green dashes
        assert!(svg.matches("#00FF00").count() > 5);
        assert_eq!(simple_metrics(&report).len(), 7);
    }

    #[test]
    fn test_multiple_chart_and_rows() {
        let report = run_multiple(&MultipleParams {
            use_feature_selection: true,
            features_to_keep: 2,
            seed: Some(2),
            ..MultipleParams::default()
        })
        .unwrap();

        assert!(multiple_chart(&report).unwrap().contains("<svg"));
        let rows = multiple_metrics(&report);
        assert!(rows.iter().any(|(label, _)| label == "RFE ranking"));
        assert_eq!(rows.len(), 4 + 2 + 1);
    }

    #[test]
    fn test_timeseries_chart_and_rows() {
        let report = run_timeseries(&TimeSeriesParams {
            seed: Some(3),
            ..TimeSeriesParams::default()
        })
        .unwrap();

        assert!(timeseries_chart(&report).unwrap().contains("Forecast"));
        let rows = timeseries_metrics(&report);
        assert_eq!(rows[0].0, "φ1 (true 0.6000)");
        assert!(rows.iter().any(|(_, v)| v.starts_with("Series is")));
        assert_eq!(acf_rows(&report).len(), 20);
    }

    #[test]
    fn test_bounds_widen_constant_values() {
        let (lo, hi) = bounds(&[3.0, 3.0]).unwrap();
        assert_eq!((lo, hi), (2.0, 4.0));
        assert!(bounds(&[]).is_err());
    }
}
