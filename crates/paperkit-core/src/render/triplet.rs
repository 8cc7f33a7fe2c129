use super::{CAPTION_FONT, DrawResult, render_error, render_missing_data, rgb, svg_path};
use crate::core::io::g;
use crate::core::triplet::{PathAxis, SegmentedColormap};
use crate::engine::error::EngineError;
use crate::workflows::triplet::{TripletFigure, TripletPanels};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const SPHERE_COLOR: RGBColor = RGBColor(112, 128, 144);
const COLORBAR_STEPS: usize = 100;

pub fn render(figure: &TripletFigure, figs_dir: &Path) -> Result<PathBuf, EngineError> {
    match figure {
        TripletFigure::Missing { output_stem, .. } => render_missing_data(figs_dir, output_stem),
        TripletFigure::Complete(panels) => {
            let path = svg_path(figs_dir, &panels.output_stem);
            draw_panels(&path, panels).map_err(|e| render_error(&path, e))?;
            Ok(path)
        }
    }
}

fn draw_panels(path: &Path, panels: &TripletPanels) -> DrawResult<()> {
    let root = SVGBackend::new(path, (1400, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(760);
    let (field_area, bar_area) = left.split_horizontally(670);

    draw_field(&field_area, panels)?;
    draw_colorbar(&bar_area, &panels.colormap, panels.field.g_max(), &panels.colorbar_ticks)?;
    draw_paths(&right, panels)?;

    root.present()?;
    Ok(())
}

/// Circle outline in data coordinates, squeezed into the visible `z` range.
fn sphere(center_z: f64, z_range: (f64, f64)) -> Vec<(f64, f64)> {
    (0..64)
        .map(|k| {
            let phi = k as f64 * std::f64::consts::TAU / 64.0;
            let z = (center_z + phi.cos()).clamp(z_range.0, z_range.1);
            (z, phi.sin())
        })
        .collect()
}

fn draw_field(area: &DrawingArea<SVGBackend, Shift>, panels: &TripletPanels) -> DrawResult<()> {
    let geo = panels.field.geometry;
    let g_max = panels.field.g_max();
    let z_range = (geo.z_min, geo.z_max);

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("g(3)(<0,0,0>, <0,0,2σ>, r2) at η = {}", g(panels.ff)),
            CAPTION_FONT,
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(geo.z_min..geo.z_max, -geo.r_max..geo.r_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("z2")
        .y_desc("x2")
        .draw()?;

    chart.draw_series(panels.field.cells().map(|(z, x, value)| {
        let color = rgb(panels.colormap.rgb(value / g_max));
        Rectangle::new(
            [(z, x), ((z + geo.dx).min(geo.z_max), (x + geo.dx).min(geo.r_max))],
            color.filled(),
        )
    }))?;

    for center in [0.0, 4.0] {
        chart.draw_series(std::iter::once(Polygon::new(
            sphere(center, z_range),
            SPHERE_COLOR.filled(),
        )))?;
    }

    let clip = |points: &[(f64, f64)]| -> Vec<(f64, f64)> {
        points
            .iter()
            .filter(|(z, x)| (geo.z_min..=geo.z_max).contains(z) && x.abs() <= geo.r_max)
            .copied()
            .collect()
    };
    let mc = clip(&panels.mc_overlay);
    chart.draw_series(LineSeries::new(mc.clone(), WHITE.stroke_width(3)))?;
    chart.draw_series(DashedLineSeries::new(mc, 8, 5, BLACK.stroke_width(3)))?;
    chart.draw_series(DashedLineSeries::new(
        clip(&panels.dft_overlay),
        8,
        5,
        CYAN.stroke_width(3),
    ))?;
    Ok(())
}

fn draw_colorbar(
    area: &DrawingArea<SVGBackend, Shift>,
    colormap: &SegmentedColormap,
    g_max: f64,
    ticks: &[f64],
) -> DrawResult<()> {
    let mut chart = ChartBuilder::on(area)
        .margin_top(45)
        .margin_bottom(50)
        .margin_right(10)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..1.0, 0.0..g_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(ticks.len())
        .y_label_formatter(&|v| format!("{:.1}", v))
        .draw()?;

    let step = g_max / COLORBAR_STEPS as f64;
    chart.draw_series((0..COLORBAR_STEPS).map(|k| {
        let lo = k as f64 * step;
        let color = rgb(colormap.rgb((lo + 0.5 * step) / g_max));
        Rectangle::new([(0.0, lo), (1.0, lo + step)], color.filled())
    }))?;
    Ok(())
}

fn draw_paths(area: &DrawingArea<SVGBackend, Shift>, panels: &TripletPanels) -> DrawResult<()> {
    let segments: Vec<_> = panels
        .paths
        .iter()
        .map(|p| (p.source, p.segments.on_path_axis()))
        .collect();
    let g_top = segments
        .iter()
        .flat_map(|(_, (xs, zs))| xs.iter().chain(zs.iter()).map(|&(_, g)| g))
        .filter(|g| g.is_finite())
        .fold(1.0, f64::max)
        * 1.1;

    let (s_lo, s_hi) = PathAxis::RANGE;
    let mut chart = ChartBuilder::on(area)
        .caption("Pair distribution along the path", CAPTION_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(s_lo..s_hi, 0.0..g_top)?;

    chart
        .configure_mesh()
        .x_labels(PathAxis::TICKS.len())
        .x_label_formatter(&|s| PathAxis::label(*s))
        .x_desc("x                    z")
        .y_desc("g(2)(<0,0,0>, r2)")
        .draw()?;

    for guide in PathAxis::GUIDES {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(guide, 0.0), (guide, g_top)],
            BLACK,
        )))?;
    }

    for (source, (x_leg, z_leg)) in segments {
        let style = rgb(source.color().rgb()).stroke_width(2);
        if !x_leg.is_empty() {
            chart.draw_series(LineSeries::new(x_leg, style))?;
        }
        chart
            .draw_series(LineSeries::new(z_leg, style))?
            .label(source.title())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::triplet::{
        FieldGeometry, PathSegments, PathSource, TripletField, colorbar_ticks,
    };
    use crate::workflows::triplet::SourcePath;
    use nalgebra::DMatrix;
    use tempfile::tempdir;

    fn panels() -> TripletPanels {
        let geometry = FieldGeometry {
            dx: 1.0,
            r_max: 2.0,
            z_min: 1.0,
            z_max: 3.0,
        };
        let values = DMatrix::from_fn(6, 2, |i, j| 0.5 + 0.3 * (i + j) as f64);
        let field = TripletField { values, geometry };
        let g_max = field.g_max();
        let paths = PathSource::ALL
            .iter()
            .map(|&source| SourcePath {
                source,
                segments: PathSegments {
                    x_segment: vec![(4.0, 1.2), (2.0, 1.5), (0.0, 2.0)],
                    z_segment: vec![(3.0, 1.8), (5.0, 1.1), (8.0, 1.0)],
                },
            })
            .collect();

        TripletPanels {
            ff: 0.3,
            paths,
            colormap: SegmentedColormap::triplet(g_max).unwrap(),
            colorbar_ticks: colorbar_ticks(g_max),
            field,
            mc_overlay: vec![(2.0, 0.0), (2.0, 1.0), (2.5, 1.5)],
            dft_overlay: vec![(2.0, 0.0), (2.0, -1.0)],
            output_stem: "triplet-correlation-pretty-inbetween-3".to_string(),
        }
    }

    #[test]
    fn writes_the_two_panel_figure() {
        let figs = tempdir().unwrap();
        let figure = TripletFigure::Complete(Box::new(panels()));

        let path = render(&figure, figs.path()).unwrap();

        assert_eq!(path, figs.path().join("triplet-correlation-pretty-inbetween-3.svg"));
        assert!(path.is_file());
    }

    #[test]
    fn missing_paths_produce_a_warning_figure() {
        let figs = tempdir().unwrap();
        let figure = TripletFigure::Missing {
            missing: figs.path().join("triplet-path-inbetween-fischer-0.30.dat"),
            output_stem: "pair-correlation-path-3".to_string(),
        };

        let path = render(&figure, figs.path()).unwrap();

        assert_eq!(path, figs.path().join("pair-correlation-path-3.svg"));
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("WARNING"));
    }

    #[test]
    fn spheres_are_squeezed_into_the_panel() {
        let points = sphere(0.0, (1.0, 9.0));
        assert_eq!(points.len(), 64);
        assert!(points.iter().all(|&(z, _)| (1.0..=9.0).contains(&z)));

        let inside = sphere(4.0, (1.0, 9.0));
        assert!((inside[0].0 - 5.0).abs() < 1e-12);
        assert!((inside[32].0 - 3.0).abs() < 1e-12);
    }
}
