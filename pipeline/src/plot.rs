//! Diagnostic plot of the cross-validation curve

use std::path::Path;

use plotters::prelude::*;

use cuvee_elasticnet::CvCurve;

use crate::error::{PipelineError, Result};

/// Render the cross-validation curve of a run to a PNG file
///
/// Draws the mean validation error against `log10(lambda)` with one
/// whisker per candidate spanning one standard error in both directions,
/// plus vertical markers at the minimizing penalty and at the selected
/// one-standard-error penalty.
pub fn cv_curve(curve: &CvCurve<f64>, file_name: &Path) -> Result<()> {
    let points = curve
        .lambdas()
        .iter()
        .zip(curve.mean_mse().iter())
        .zip(curve.std_error().iter())
        .filter(|((_, mean), _)| mean.is_finite())
        .map(|((&lambda, &mean), &se)| (lambda.log10(), mean, se))
        .collect::<Vec<_>>();

    if points.is_empty() {
        return Err(PipelineError::Plot(
            "cross-validation curve has no finite points".into(),
        ));
    }

    let x_min = points.iter().map(|(x, ..)| *x).fold(f64::INFINITY, f64::min);
    let x_max = points
        .iter()
        .map(|(x, ..)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    let y_min = points
        .iter()
        .map(|(_, mean, se)| mean - se)
        .fold(f64::INFINITY, f64::min);
    let y_max = points
        .iter()
        .map(|(_, mean, se)| mean + se)
        .fold(f64::NEG_INFINITY, f64::max);

    let x_pad = ((x_max - x_min) * 0.05).max(0.05);
    let y_pad = ((y_max - y_min) * 0.05).max(1e-6);

    let root = BitMapBackend::new(file_name, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(
            x_min - x_pad..x_max + x_pad,
            (y_min - y_pad).max(0.0)..y_max + y_pad,
        )
        .map_err(draw_error)?;

    // one-standard-error whiskers
    chart
        .draw_series(points.iter().map(|&(x, mean, se)| {
            PathElement::new(vec![(x, mean - se), (x, mean + se)], BLUE.mix(0.4))
        }))
        .map_err(draw_error)?;

    // mean validation error
    chart
        .draw_series(LineSeries::new(
            points.iter().map(|&(x, mean, _)| (x, mean)),
            &BLUE,
        ))
        .map_err(draw_error)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, mean, _)| Circle::new((x, mean), 2, BLUE.filled())),
        )
        .map_err(draw_error)?;

    // selected penalties
    for (lambda, style) in [
        (curve.lambda_min(), BLACK.mix(0.6)),
        (curve.lambda_1se(), RED.mix(0.8)),
    ] {
        let x = lambda.log10();
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, (y_min - y_pad).max(0.0)), (x, y_max + y_pad)],
                style,
            )))
            .map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;

    Ok(())
}

fn draw_error<E: std::error::Error>(err: E) -> PipelineError {
    PipelineError::Plot(err.to_string())
}
