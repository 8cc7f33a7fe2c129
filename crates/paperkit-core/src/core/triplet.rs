use super::io::{Table, TableError};
use super::styles::PlotColor;
use nalgebra::DMatrix;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Distance between the two fixed spheres' contact shell and the Monte-Carlo
/// path origin; MC paths are recorded relative to the box edge.
const MC_PATH_OFFSET: f64 = 4.995;

/// Fischer et al. only predict the pair distribution in contact with the
/// second sphere: points within this radius of `(x, z) = (0, 4.1)`.
const FISCHER_CONTACT_CENTER_Z: f64 = 4.1;
const FISCHER_CONTACT_RADIUS: f64 = 2.11;

#[derive(Debug, Error)]
pub enum TripletError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("Path table needs 4 columns, found {0}")]
    TooFewColumns(usize),
    #[error("Path table is empty")]
    EmptyPath,
    #[error("Correlation grid is {rows}x{cols}, need at least {min_rows}x{min_cols}")]
    GridTooSmall {
        rows: usize,
        cols: usize,
        min_rows: usize,
        min_cols: usize,
    },
    #[error("Invalid colormap: {0}")]
    InvalidColormap(String),
}

/// Where a triplet-correlation path comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSource {
    MonteCarlo,
    ThisWork,
    Fischer,
    Sokolowski,
}

impl PathSource {
    pub const ALL: [PathSource; 4] = [
        PathSource::MonteCarlo,
        PathSource::ThisWork,
        PathSource::Fischer,
        PathSource::Sokolowski,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PathSource::MonteCarlo => "mc",
            PathSource::ThisWork => "this-work",
            PathSource::Fischer => "fischer",
            PathSource::Sokolowski => "sokolowski",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PathSource::MonteCarlo => "Monte Carlo",
            PathSource::ThisWork => "this work",
            PathSource::Fischer => "Fischer et al.",
            PathSource::Sokolowski => "Sokolowski et al.",
        }
    }

    pub fn color(&self) -> PlotColor {
        match self {
            PathSource::MonteCarlo => PlotColor::Black,
            PathSource::ThisWork => PlotColor::Blue,
            PathSource::Fischer => PlotColor::Green,
            PathSource::Sokolowski => PlotColor::Red,
        }
    }

    pub fn path_file(&self, figs_dir: &Path, ff: f64) -> PathBuf {
        match self {
            PathSource::MonteCarlo => figs_dir
                .join("mc")
                .join("triplet")
                .join(format!("tripletMC-{:03.1}-path2-trimmed.dat", ff)),
            _ => figs_dir.join(format!(
                "triplet-path-inbetween-{}-{:4.2}.dat",
                self.key(),
                ff
            )),
        }
    }
}

/// Monte-Carlo `g(r, z)` grid around the two fixed spheres.
pub fn field_file(figs_dir: &Path, ff: f64) -> PathBuf {
    figs_dir
        .join("mc")
        .join("triplet")
        .join(format!("tripletMC-{:3.1}-04.05-trimmed.dat", ff))
}

/// `g` along a path through the fluid around the two fixed spheres.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TripletPath {
    pub g: Vec<f64>,
    pub z: Vec<f64>,
    pub x: Vec<f64>,
}

impl TripletPath {
    /// Builds a path from a `[_, g, z, x, ...]` table. Monte-Carlo tables are
    /// stored end-to-start and offset, so they are flipped and shifted first.
    pub fn from_table(table: Table, source: PathSource) -> Result<Self, TripletError> {
        if table.is_empty() {
            return Err(TripletError::EmptyPath);
        }
        if table.cols() < 4 {
            return Err(TripletError::TooFewColumns(table.cols()));
        }
        let mut table = table.truncate_columns(4)?;
        if source == PathSource::MonteCarlo {
            table = table.flip_rows();
            table.map_column(0, |v| v - MC_PATH_OFFSET)?;
        }
        Ok(Self {
            g: table.column(1)?,
            z: table.column(2)?,
            x: table.column(3)?,
        })
    }

    pub fn load(path: &Path, source: PathSource) -> Result<Self, TripletError> {
        Self::from_table(Table::load(path)?, source)
    }

    pub fn z_contact(&self) -> f64 {
        self.z.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Splits the path into the leg along the contact plane, plotted against
    /// `x`, and the leg away from it, plotted against `z`.
    pub fn segments(&self, source: PathSource) -> PathSegments {
        let points = || self.x.iter().zip(&self.z).zip(&self.g).map(|((&x, &z), &g)| (x, z, g));

        if source == PathSource::Fischer {
            let z_segment = points()
                .filter(|&(x, z, _)| {
                    x * x + (z - FISCHER_CONTACT_CENTER_Z).powi(2) < FISCHER_CONTACT_RADIUS.powi(2)
                })
                .map(|(_, z, g)| (z, g))
                .collect();
            return PathSegments {
                x_segment: Vec::new(),
                z_segment,
            };
        }

        let z_contact = self.z_contact();
        PathSegments {
            x_segment: points()
                .filter(|&(_, z, _)| z == z_contact)
                .map(|(x, _, g)| (x, g))
                .collect(),
            z_segment: points()
                .filter(|&(_, z, _)| z > z_contact)
                .map(|(_, z, g)| (z, g))
                .collect(),
        }
    }

    /// `(z, x)` points for overlaying the path on the 2-D field.
    pub fn planar_points(&self) -> Vec<(f64, f64)> {
        self.z.iter().copied().zip(self.x.iter().copied()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathSegments {
    /// `(x, g)` points.
    pub x_segment: Vec<(f64, f64)>,
    /// `(z, g)` points.
    pub z_segment: Vec<(f64, f64)>,
}

impl PathSegments {
    /// Both legs on the shared path axis.
    pub fn on_path_axis(&self) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
        (
            self.x_segment
                .iter()
                .map(|&(x, g)| (PathAxis::from_x(x), g))
                .collect(),
            self.z_segment
                .iter()
                .map(|&(z, g)| (PathAxis::from_z(z), g))
                .collect(),
        )
    }
}

/// Horizontal axis of the path panel. The x leg runs right-to-left from
/// `x = 6` to `x = -8` and the z leg left-to-right from `z = -4` to `z = 10`,
/// so both share one coordinate `s ∈ [0, 14]`.
pub struct PathAxis;

impl PathAxis {
    pub const RANGE: (f64, f64) = (0.0, 14.0);
    /// Tick positions and labels; the `0 2` tick is where the two legs meet.
    pub const TICKS: [(f64, &'static str); 8] = [
        (0.0, "-6"),
        (2.0, "-4"),
        (4.0, "-2"),
        (6.0, "0 2"),
        (8.0, "4"),
        (10.0, "6"),
        (12.0, "8"),
        (14.0, "10"),
    ];
    /// `x = 0` on the x leg and `z = 6` on the z leg.
    pub const GUIDES: [f64; 2] = [6.0, 10.0];

    pub fn from_x(x: f64) -> f64 {
        6.0 - x
    }

    pub fn from_z(z: f64) -> f64 {
        z + 4.0
    }

    pub fn label(s: f64) -> String {
        Self::TICKS
            .iter()
            .find(|(pos, _)| (pos - s).abs() < 1e-9)
            .map(|(_, label)| label.to_string())
            .unwrap_or_default()
    }
}

/// Bin layout of the reconstructed field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGeometry {
    pub dx: f64,
    pub r_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            dx: 0.1,
            r_max: 4.1,
            z_min: 1.0,
            z_max: 9.0,
        }
    }
}

impl FieldGeometry {
    pub fn r_bins(&self) -> usize {
        (2.0 * self.r_max / self.dx).round() as usize + 2
    }

    pub fn z_min_bin(&self) -> usize {
        (self.z_min / self.dx).round() as usize
    }

    pub fn z_max_bin(&self) -> usize {
        (self.z_max / self.dx).round() as usize + 1
    }

    pub fn z_bins(&self) -> usize {
        self.z_max_bin() - self.z_min_bin()
    }
}

/// `g(x, z)` on a full `(x, z)` plane, mirrored from the half-plane grid the
/// Monte-Carlo run records.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletField {
    /// Rows run over `x` from `-r_max`, columns over `z` from `z_min`.
    pub values: DMatrix<f64>,
    pub geometry: FieldGeometry,
}

impl TripletField {
    pub fn reconstruct(
        source: &DMatrix<f64>,
        geometry: FieldGeometry,
    ) -> Result<Self, TripletError> {
        let r_bins = geometry.r_bins();
        let half = r_bins / 2;
        let z_lo = geometry.z_min_bin();
        let z_bins = geometry.z_bins();

        if source.nrows() < half || source.ncols() < geometry.z_max_bin() {
            return Err(TripletError::GridTooSmall {
                rows: source.nrows(),
                cols: source.ncols(),
                min_rows: half,
                min_cols: geometry.z_max_bin(),
            });
        }

        let mut values = DMatrix::zeros(r_bins, z_bins);
        for i in 0..half {
            for j in 0..z_bins {
                let g = source[(i, z_lo + j)];
                values[(half + i, j)] = g;
                values[(half - 1 - i, j)] = g;
            }
        }

        Ok(Self { values, geometry })
    }

    pub fn load(path: &Path, geometry: FieldGeometry) -> Result<Self, TripletError> {
        Self::reconstruct(&Table::load(path)?.to_matrix(), geometry)
    }

    pub fn g_max(&self) -> f64 {
        self.values.max()
    }

    /// Lower-left corner `(z, x)` of every cell with its value.
    pub fn cells(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        let geo = self.geometry;
        (0..self.values.nrows()).flat_map(move |i| {
            (0..self.values.ncols()).map(move |j| {
                (
                    geo.z_min + j as f64 * geo.dx,
                    -geo.r_max + i as f64 * geo.dx,
                    self.values[(i, j)],
                )
            })
        })
    }
}

/// Colorbar ticks `0, 0.5, …` up to `floor(2 g_max) / 2`.
pub fn colorbar_ticks(g_max: f64) -> Vec<f64> {
    let n = (2.0 * g_max).floor().max(0.0) as usize;
    (0..=n).map(|i| i as f64 * 0.5).collect()
}

/// Piecewise-linear colormap; each channel is a list of `(x, left, right)`
/// anchors, interpolating from `right` at one anchor to `left` at the next.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedColormap {
    red: Vec<(f64, f64, f64)>,
    green: Vec<(f64, f64, f64)>,
    blue: Vec<(f64, f64, f64)>,
}

impl SegmentedColormap {
    pub fn new(
        red: Vec<(f64, f64, f64)>,
        green: Vec<(f64, f64, f64)>,
        blue: Vec<(f64, f64, f64)>,
    ) -> Result<Self, TripletError> {
        for (name, channel) in [("red", &red), ("green", &green), ("blue", &blue)] {
            Self::validate(name, channel)?;
        }
        Ok(Self { red, green, blue })
    }

    fn validate(name: &str, anchors: &[(f64, f64, f64)]) -> Result<(), TripletError> {
        let first = anchors.first().map(|a| a.0);
        let last = anchors.last().map(|a| a.0);
        if anchors.len() < 2 || first != Some(0.0) || last != Some(1.0) {
            return Err(TripletError::InvalidColormap(format!(
                "{} channel must start at 0 and end at 1",
                name
            )));
        }
        if anchors.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(TripletError::InvalidColormap(format!(
                "{} channel anchors must increase",
                name
            )));
        }
        Ok(())
    }

    /// Black below 85% of the ideal-gas value, white around 1, blue just
    /// above, then rising through black to yellow at the maximum.
    pub fn triplet(g_max: f64) -> Result<Self, TripletError> {
        let lo = 0.85 / g_max;
        let one = 1.0 / g_max;
        let hi = 1.15 / g_max;
        let higher = (1.0 + hi) / 2.0;

        Self::new(
            vec![
                (0.0, 0.0, 0.0),
                (lo, 1.0, 1.0),
                (one, 1.0, 1.0),
                (hi, 0.0, 0.0),
                (higher, 0.0, 0.0),
                (1.0, 1.0, 1.0),
            ],
            vec![
                (0.0, 0.0, 0.0),
                (lo, 0.1, 0.1),
                (one, 1.0, 1.0),
                (hi, 0.0, 0.0),
                (higher, 1.0, 1.0),
                (1.0, 1.0, 1.0),
            ],
            vec![
                (0.0, 0.0, 0.0),
                (lo, 0.1, 0.1),
                (one, 1.0, 1.0),
                (hi, 1.0, 1.0),
                (higher, 0.0, 0.0),
                (1.0, 0.0, 0.0),
            ],
        )
    }

    fn channel(anchors: &[(f64, f64, f64)], t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        for w in anchors.windows(2) {
            let (x0, _, right) = w[0];
            let (x1, left, _) = w[1];
            if t <= x1 {
                let frac = (t - x0) / (x1 - x0);
                return right + frac * (left - right);
            }
        }
        anchors.last().map_or(0.0, |a| a.1)
    }

    /// Color at normalized position `t ∈ [0, 1]` as 8-bit RGB.
    pub fn rgb(&self, t: f64) -> (u8, u8, u8) {
        let to_byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (
            to_byte(Self::channel(&self.red, t)),
            to_byte(Self::channel(&self.green, t)),
            to_byte(Self::channel(&self.blue, t)),
        )
    }
}
