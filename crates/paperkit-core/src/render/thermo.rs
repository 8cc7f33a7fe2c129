use super::{CAPTION_FONT, DrawResult, draw_line, render_error, stroke, svg_path};
use crate::core::io::g;
use crate::core::styles;
use crate::core::thermo::Thermodynamics;
use crate::engine::error::EngineError;
use crate::workflows::thermo::ThermoReport;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
enum YRange {
    Auto,
    FromZero,
    Fixed(f64, f64),
}

struct FigureLayout {
    suffix: &'static str,
    title: &'static str,
    y_desc: &'static str,
    errors: bool,
    y_range: YRange,
    series: fn(&Thermodynamics) -> &[f64],
}

fn internal_energy(t: &Thermodynamics) -> &[f64] {
    &t.internal_energy
}

fn heat_capacity(t: &Thermodynamics) -> &[f64] {
    &t.heat_capacity
}

fn entropy(t: &Thermodynamics) -> &[f64] {
    &t.entropy
}

const FIGURES: [FigureLayout; 6] = [
    FigureLayout {
        suffix: "u",
        title: "Specific internal energy",
        y_desc: "U/Nε",
        errors: false,
        y_range: YRange::Auto,
        series: internal_energy,
    },
    FigureLayout {
        suffix: "hc",
        title: "Specific heat capacity",
        y_desc: "C_V/Nk",
        errors: false,
        y_range: YRange::FromZero,
        series: heat_capacity,
    },
    FigureLayout {
        suffix: "S",
        title: "Configurational entropy",
        y_desc: "S_config/Nk",
        errors: false,
        y_range: YRange::Auto,
        series: entropy,
    },
    FigureLayout {
        suffix: "u_err",
        title: "Error in specific internal energy",
        y_desc: "ΔU/Nε",
        errors: true,
        y_range: YRange::Fixed(-0.04, 0.04),
        series: internal_energy,
    },
    FigureLayout {
        suffix: "hc_err",
        title: "Error in specific heat capacity",
        y_desc: "ΔC_V/Nk",
        errors: true,
        y_range: YRange::Fixed(-1.2, 1.2),
        series: heat_capacity,
    },
    FigureLayout {
        suffix: "s_err",
        title: "Error in configurational entropy",
        y_desc: "ΔS_config/Nk",
        errors: true,
        y_range: YRange::Fixed(-0.1, 0.1),
        series: entropy,
    },
];

struct Curve<'a> {
    method: &'a str,
    temperatures: &'a [f64],
    values: &'a [f64],
}

/// Writes the six `{figure_stem}-{u,hc,S,u_err,hc_err,s_err}.svg` figures.
pub fn render(report: &ThermoReport, figs_dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let stem = report.system.figure_stem();
    let mut written = Vec::with_capacity(FIGURES.len());

    for layout in &FIGURES {
        let curves: Vec<Curve> = if layout.errors {
            report
                .methods
                .iter()
                .map(|m| Curve {
                    method: &m.method,
                    temperatures: &m.error.temperatures,
                    values: (layout.series)(&m.error),
                })
                .collect()
        } else {
            report
                .methods
                .iter()
                .map(|m| (m.method.as_str(), &m.values))
                .chain(std::iter::once((
                    report.reference.as_str(),
                    &report.reference_values,
                )))
                .map(|(method, values)| Curve {
                    method,
                    temperatures: &values.temperatures,
                    values: (layout.series)(values),
                })
                .collect()
        };

        let title = format!(
            "{} for λ={}, η={}, and N={}",
            layout.title,
            g(report.system.ww),
            g(report.system.ff),
            report.system.n
        );
        let path = svg_path(figs_dir, &format!("{}-{}", stem, layout.suffix));
        draw_figure(&path, &title, layout, &curves).map_err(|e| render_error(&path, e))?;
        written.push(path);
    }
    Ok(written)
}

fn y_bounds(range: YRange, curves: &[Curve]) -> (f64, f64) {
    let (lo, hi) = curves
        .iter()
        .flat_map(|c| c.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let (lo, hi) = if lo.is_finite() && hi > lo {
        (lo, hi)
    } else {
        (-1.0, 1.0)
    };
    let pad = 0.05 * (hi - lo);
    match range {
        YRange::Auto => (lo - pad, hi + pad),
        YRange::FromZero => (0.0, hi.max(0.0) + pad),
        YRange::Fixed(lo, hi) => (lo, hi),
    }
}

fn draw_figure(
    path: &Path,
    title: &str,
    layout: &FigureLayout,
    curves: &[Curve],
) -> DrawResult<()> {
    let root = SVGBackend::new(path, (900, 650)).into_drawing_area();
    root.fill(&WHITE)?;

    let t_max = curves
        .iter()
        .filter_map(|c| c.temperatures.last().copied())
        .fold(0.0, f64::max)
        .max(1e-6);
    let (y_lo, y_hi) = y_bounds(layout.y_range, curves);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..t_max, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("kT/ε")
        .y_desc(layout.y_desc)
        .draw()?;

    for (i, curve) in curves.iter().enumerate() {
        let style = styles::plot(curve.method);
        let points: Vec<(f64, f64)> = curve
            .temperatures
            .iter()
            .copied()
            .zip(curve.values.iter().copied())
            .filter(|(_, v)| v.is_finite())
            .map(|(t, v)| (t, v.clamp(y_lo, y_hi)))
            .collect();
        draw_line(
            &mut chart,
            points,
            style.line,
            stroke(&style, i),
            Some(styles::title(curve.method).as_str()),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
