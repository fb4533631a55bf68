//! Scatter plot of association results
//!
//! x = log-odds ratio, y = −log10(chi-square p-value), one color per label.
//! Non-significant verbs are left out. The highest-scoring verbs of each
//! label are annotated with a small random offset so overlapping names stay
//! readable; the offset only affects the figure.

use crate::analyzer::AssociationResult;
use crate::error::PlotError;
use crate::label::{AssociationLabel, SIGNIFICANCE_LEVEL};
use crate::output::staging_file;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tempfile::NamedTempFile;

/// Maximum offset applied to annotation coordinates
pub const JITTER: f64 = 0.5;

const REFERENCE_COLOR: RGBColor = RGBColor(255, 165, 0);

#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub title: String,
    /// Verbs annotated per label
    pub label_top_n: usize,
    /// Seed for annotation jitter; None draws from OS entropy
    pub seed: Option<u64>,
    pub size: (u32, u32),
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: "COS Verbs DCA".to_string(),
            label_top_n: 8,
            seed: None,
            size: (900, 700),
        }
    }
}

/// Color of each significant label
pub fn label_color(label: AssociationLabel) -> RGBColor {
    match label {
        AssociationLabel::StrongAttractor => RGBColor(255, 0, 0),
        AssociationLabel::WeakAttractor => RGBColor(255, 215, 0),
        AssociationLabel::Neutral => RGBColor(128, 128, 128),
        AssociationLabel::SlightRepeller => RGBColor(135, 206, 250),
        AssociationLabel::StrongRepeller => RGBColor(0, 0, 255),
        AssociationLabel::NotSignificant => RGBColor(0, 0, 0),
    }
}

/// A plotted verb
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint<'a> {
    pub verb: &'a str,
    pub x: f64,
    pub y: f64,
    pub chi2_statistic: f64,
    pub label: AssociationLabel,
}

/// −log10(p), with p = 0 clamped to the smallest positive f64
#[inline]
pub fn neg_log10(p: f64) -> f64 {
    -p.max(f64::MIN_POSITIVE).log10()
}

/// Significant results as plot coordinates
pub fn plot_points(results: &[AssociationResult]) -> Vec<PlotPoint<'_>> {
    results
        .iter()
        .filter(|r| r.label.is_significant())
        .map(|r| PlotPoint {
            verb: &r.verb,
            x: r.log_odds_ratio,
            y: neg_log10(r.p_value_chi2),
            chi2_statistic: r.chi2_statistic,
            label: r.label,
        })
        .collect()
}

/// Up to `top_n` points per label with the largest chi-square statistic
pub fn annotation_targets<'a, 'b>(
    points: &'b [PlotPoint<'a>],
    top_n: usize,
) -> Vec<&'b PlotPoint<'a>> {
    let mut selected = Vec::new();
    for label in AssociationLabel::ALL {
        let mut group: Vec<&PlotPoint> = points.iter().filter(|p| p.label == label).collect();
        group.sort_by(|a, b| b.chi2_statistic.total_cmp(&a.chi2_statistic));
        selected.extend(group.into_iter().take(top_n));
    }
    selected
}

fn axis_ranges(points: &[PlotPoint]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let threshold = neg_log10(SIGNIFICANCE_LEVEL);
    let (x_min, x_max, y_max) = points.iter().fold(
        (0.0f64, 0.0f64, threshold),
        |(x_min, x_max, y_max), p| (x_min.min(p.x), x_max.max(p.x), y_max.max(p.y)),
    );
    (
        (x_min - 1.0)..(x_max + 1.0),
        0.0..(y_max * 1.1 + JITTER),
    )
}

fn drawing<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Render the scatter plot to a temporary file next to `path`
///
/// Nothing appears at `path` until [`commit_plot`] is called.
pub fn stage_plot(
    path: &Path,
    results: &[AssociationResult],
    options: &PlotOptions,
) -> Result<NamedTempFile, PlotError> {
    let tmp = staging_file(path)?;
    draw_plot(tmp.path(), results, options)?;
    Ok(tmp)
}

/// Move a staged plot into place at `path`
pub fn commit_plot(tmp: NamedTempFile, path: &Path) -> Result<(), PlotError> {
    tmp.persist(path).map_err(|e| PlotError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    log::info!("Wrote plot to {}", path.display());
    Ok(())
}

/// Render the scatter plot as SVG to `path`
pub fn render_plot(
    path: &Path,
    results: &[AssociationResult],
    options: &PlotOptions,
) -> Result<(), PlotError> {
    let tmp = stage_plot(path, results, options)?;
    commit_plot(tmp, path)
}

fn draw_plot(
    path: &Path,
    results: &[AssociationResult],
    options: &PlotOptions,
) -> Result<(), PlotError> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let points = plot_points(results);
    let (x_range, y_range) = axis_ranges(&points);
    let (y_lo, y_hi) = (y_range.start, y_range.end);
    let (x_lo, x_hi) = (x_range.start, x_range.end);

    let root = SVGBackend::new(path, options.size).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)
        .map_err(drawing)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Log Odds Ratio (Causative vs Intransitive)")
        .y_desc("-log10(p-value)")
        .draw()
        .map_err(drawing)?;

    for label in AssociationLabel::ALL.into_iter().filter(|l| l.is_significant()) {
        let color = label_color(label);
        let group: Vec<(f64, f64)> = points
            .iter()
            .filter(|p| p.label == label)
            .map(|p| (p.x, p.y))
            .collect();
        if group.is_empty() {
            continue;
        }

        chart
            .draw_series(group.into_iter().map(move |coord| {
                EmptyElement::at(coord)
                    + Circle::new((0, 0), 4, color.mix(0.8).filled())
                    + Circle::new((0, 0), 4, BLACK.stroke_width(1))
            }))
            .map_err(drawing)?
            .label(label.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    let threshold = neg_log10(SIGNIFICANCE_LEVEL);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(0.0, y_lo), (0.0, y_hi)],
            6,
            4,
            REFERENCE_COLOR.stroke_width(1),
        ))
        .map_err(drawing)?;
    chart
        .draw_series(DashedLineSeries::new(
            vec![(x_lo, threshold), (x_hi, threshold)],
            6,
            4,
            REFERENCE_COLOR.stroke_width(1),
        ))
        .map_err(drawing)?;

    let annotations = annotation_targets(&points, options.label_top_n);
    chart
        .draw_series(annotations.iter().map(|p| {
            let x = p.x + rng.gen_range(-JITTER..=JITTER);
            let y = p.y + rng.gen_range(-JITTER..=JITTER);
            Text::new(p.verb.to_string(), (x, y), ("sans-serif", 11).into_font())
        }))
        .map_err(drawing)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    log::debug!(
        "Plotted {} verbs, {} annotated",
        points.len(),
        annotations.len()
    );
    Ok(())
}
