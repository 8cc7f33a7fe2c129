use super::io::g;
use phf::{Map, phf_map};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotColor {
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
    Black,
    White,
}

impl PlotColor {
    /// RGB triplet of the classic single-letter plotting colors.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            PlotColor::Red => (255, 0, 0),
            PlotColor::Green => (0, 128, 0),
            PlotColor::Blue => (0, 0, 255),
            PlotColor::Cyan => (0, 191, 191),
            PlotColor::Magenta => (191, 0, 191),
            PlotColor::Yellow => (191, 191, 0),
            PlotColor::Black => (0, 0, 0),
            PlotColor::White => (255, 255, 255),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Plus,
    Dot,
}

/// Line appearance of a method. `color` is `None` when the method has no
/// assigned color and the renderer's default applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotStyle {
    pub color: Option<PlotColor>,
    pub line: LineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub color: Option<PlotColor>,
    pub marker: Marker,
}

#[rustfmt::skip]
static COLORS: Map<&'static str, PlotColor> = phf_map! {
    "nw" => PlotColor::Red,
    "kT0.4" => PlotColor::Cyan,
    "kT0.5" => PlotColor::Magenta,
    "kT1" => PlotColor::Green,
    "tmmc" => PlotColor::Black,
    "oetmmc" => PlotColor::Blue,
    "wang_landau" => PlotColor::Green,
    "vanilla_wang_landau" => PlotColor::Blue,
    "simple_flat" => PlotColor::Red,
    "optimized_ensemble" => PlotColor::Yellow,
};

#[rustfmt::skip]
static LINES: Map<&'static str, LineStyle> = phf_map! {
    "nw" => LineStyle::Dashed,
    "tmmc" => LineStyle::Dotted,
};

#[rustfmt::skip]
static TITLES: Map<&'static str, &'static str> = phf_map! {
    "nw" => "kT/ε = ∞ sim.",
    "tmmc" => "tmmc",
    "oetmmc" => "oetmmc",
    "wang_landau" => "Wang-Landau",
    "vanilla_wang_landau" => "Vanilla Wang-Landau",
    "simple_flat" => "simple flat",
    "optimized_ensemble" => "optimized ensemble",
};

fn fixed_temperature(method: &str) -> Option<&str> {
    method.strip_prefix("kT")
}

pub fn color(method: &str) -> PlotColor {
    COLORS.get(method).copied().unwrap_or(PlotColor::Blue)
}

pub fn line(method: &str) -> LineStyle {
    if fixed_temperature(method).is_some() {
        return LineStyle::Dashed;
    }
    LINES.get(method).copied().unwrap_or(LineStyle::Solid)
}

pub fn title(method: &str) -> String {
    if let Some(title) = TITLES.get(method) {
        return title.to_string();
    }
    if let Some(temperature) = fixed_temperature(method).and_then(|t| t.parse::<f64>().ok()) {
        return format!("kT/ε = {} sim.", g(temperature));
    }
    "unrecognized method".to_string()
}

pub fn plot(method: &str) -> PlotStyle {
    PlotStyle {
        color: COLORS.get(method).copied(),
        line: line(method),
    }
}

pub fn dots(method: &str) -> MarkerStyle {
    let marker = match method {
        "wang_landau" | "vanilla_wang_landau" | "simple_flat" => Marker::Plus,
        _ => Marker::Dot,
    };
    MarkerStyle {
        color: COLORS.get(method).copied(),
        marker,
    }
}
