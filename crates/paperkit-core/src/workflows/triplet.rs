use crate::core::triplet::{
    PathSegments, PathSource, SegmentedColormap, TripletField, TripletPath, colorbar_ticks,
    field_file,
};
use crate::engine::config::TripletConfig;
use crate::engine::error::EngineError;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct SourcePath {
    pub source: PathSource,
    pub segments: PathSegments,
}

/// Everything needed to draw the two-panel triplet figure.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletPanels {
    pub ff: f64,
    pub paths: Vec<SourcePath>,
    pub field: TripletField,
    pub colormap: SegmentedColormap,
    pub colorbar_ticks: Vec<f64>,
    /// `(z, x)` of the Monte-Carlo path.
    pub mc_overlay: Vec<(f64, f64)>,
    /// `(z, x)` of the path computed in this work.
    pub dft_overlay: Vec<(f64, f64)>,
    pub output_stem: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TripletFigure {
    Complete(Box<TripletPanels>),
    /// A path file was missing; a warning figure replaces the real one.
    Missing {
        missing: PathBuf,
        output_stem: String,
    },
}

/// `int(10 ff)`, the integer tag figures of one filling fraction share.
pub fn ff_tag(ff: f64) -> i64 {
    (ff * 10.0) as i64
}

#[instrument(skip_all, name = "triplet_workflow")]
pub fn run(config: &TripletConfig) -> Result<TripletFigure, EngineError> {
    let ff = config.ff;

    // === Phase 1: Paths from every source ===
    let mut paths = Vec::with_capacity(PathSource::ALL.len());
    let mut mc_overlay = Vec::new();
    let mut dft_overlay = Vec::new();
    for source in PathSource::ALL {
        let file = source.path_file(&config.figs_dir, ff);
        if !file.exists() {
            warn!("Missing triplet path for {}: {:?}", source.title(), file);
            return Ok(TripletFigure::Missing {
                missing: file,
                output_stem: format!("pair-correlation-path-{}", ff_tag(ff)),
            });
        }
        let path = TripletPath::load(&file, source)?;
        match source {
            PathSource::MonteCarlo => mc_overlay = path.planar_points(),
            PathSource::ThisWork => dft_overlay = path.planar_points(),
            _ => {}
        }
        paths.push(SourcePath {
            source,
            segments: path.segments(source),
        });
    }

    // === Phase 2: Two-dimensional field ===
    let field = TripletField::load(&field_file(&config.figs_dir, ff), config.geometry)?;
    let g_max = field.g_max();
    let colormap = SegmentedColormap::triplet(g_max)?;
    info!("Triplet field for ff={} peaks at g={:.3}", ff, g_max);

    Ok(TripletFigure::Complete(Box::new(TripletPanels {
        ff,
        paths,
        field,
        colormap,
        colorbar_ticks: colorbar_ticks(g_max),
        mc_overlay,
        dft_overlay,
        output_stem: format!("triplet-correlation-pretty-inbetween-{}", ff_tag(ff)),
    })))
}
