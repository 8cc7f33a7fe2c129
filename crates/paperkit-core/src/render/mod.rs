//! # Render Module
//!
//! SVG figures for the workflow reports, drawn with `plotters`. Layouts are
//! fixed per figure; the data decides only what is drawn.
//!
//! - **Thermodynamics** ([`thermo`]) - Six curves-per-method figures for a system
//! - **Triplet Correlation** ([`triplet`]) - 2-D field panel plus path panel, or a warning figure

pub mod thermo;
pub mod triplet;

use crate::core::styles::{LineStyle, PlotStyle};
use crate::engine::error::EngineError;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};

pub(crate) type DrawResult<T> = Result<T, Box<dyn Error>>;

pub(crate) const CAPTION_FONT: (&str, u32) = ("sans-serif", 20);

pub(crate) fn svg_path(figs_dir: &Path, stem: &str) -> PathBuf {
    figs_dir.join(format!("{}.svg", stem))
}

pub(crate) fn render_error(path: &Path, e: Box<dyn Error>) -> EngineError {
    EngineError::Render(format!("{}: {}", path.display(), e))
}

pub(crate) fn rgb(color: (u8, u8, u8)) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Stroke of a method's line; methods without an assigned color take the
/// `index`-th palette color.
pub(crate) fn stroke(style: &PlotStyle, index: usize) -> ShapeStyle {
    match style.color {
        Some(color) => rgb(color.rgb()).stroke_width(2),
        None => Palette99::pick(index).stroke_width(2),
    }
}

/// Draws one labelled curve in the requested line style.
pub(crate) fn draw_line<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: Vec<(f64, f64)>,
    line: LineStyle,
    style: ShapeStyle,
    label: Option<&str>,
) -> DrawResult<()>
where
    DB::ErrorType: 'static,
{
    let anno = match line {
        LineStyle::Solid => chart.draw_series(LineSeries::new(points, style))?,
        LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(points, 8, 5, style))?,
        LineStyle::Dotted => chart.draw_series(DashedLineSeries::new(points, 2, 4, style))?,
    };
    if let Some(label) = label {
        anno.label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }
    Ok(())
}

/// Large-type warning figure standing in for a plot whose data is missing.
pub fn render_missing_data(figs_dir: &Path, stem: &str) -> Result<PathBuf, EngineError> {
    let path = svg_path(figs_dir, stem);
    draw_missing_data(&path).map_err(|e| render_error(&path, e))?;
    Ok(path)
}

fn draw_missing_data(path: &Path) -> DrawResult<()> {
    let root = SVGBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let area: DrawingArea<_, Shift> = root.titled(
        "!!!!WARNING!!!!! There is data missing from this plot!",
        ("sans-serif", 25),
    )?;
    let mut chart = ChartBuilder::on(&area)
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..9.0, -1.0..1.0)?;
    chart.configure_mesh().draw()?;
    chart.draw_series(LineSeries::new((0..10).map(|i| (i as f64, 0.0)), &BLACK))?;
    root.present()?;
    Ok(())
}
