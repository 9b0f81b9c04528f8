//! Chart configuration model: labels, series and view settings

pub(crate) mod color;
pub(crate) mod palette;
pub(crate) mod parse;

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::config::Defaults;
use color::{Rgba, fill_and_stroke};
pub(crate) use parse::normalize_series_length;

/// Supported chart types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub(crate) enum ChartType {
    #[value(name = "bar")]
    Bar,
    #[value(name = "bar-stacked")]
    StackedBar,
    #[value(name = "line")]
    Line,
    #[value(name = "area")]
    Area,
    #[value(name = "area-stacked")]
    StackedArea,
    #[value(name = "bar-line")]
    BarLine,
    #[value(name = "pie")]
    Pie,
    #[value(name = "donut")]
    Donut,
    #[value(name = "radar")]
    Radar,
    #[value(name = "histogram")]
    Histogram,
    #[value(name = "streamgraph")]
    Streamgraph,
    #[value(name = "treemap")]
    Treemap,
}

/// Which rendering backend draws a chart type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Backend {
    Canvas,
    Svg,
}

impl ChartType {
    pub(crate) const ALL: [ChartType; 12] = [
        ChartType::Bar,
        ChartType::StackedBar,
        ChartType::Line,
        ChartType::Area,
        ChartType::StackedArea,
        ChartType::BarLine,
        ChartType::Pie,
        ChartType::Donut,
        ChartType::Radar,
        ChartType::Histogram,
        ChartType::Streamgraph,
        ChartType::Treemap,
    ];

    pub(crate) fn key(self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::StackedBar => "bar-stacked",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::StackedArea => "area-stacked",
            ChartType::BarLine => "bar-line",
            ChartType::Pie => "pie",
            ChartType::Donut => "donut",
            ChartType::Radar => "radar",
            ChartType::Histogram => "histogram",
            ChartType::Streamgraph => "streamgraph",
            ChartType::Treemap => "treemap",
        }
    }

    /// Types that visualize exactly one selected series
    pub(crate) fn is_single_series(self) -> bool {
        matches!(
            self,
            ChartType::Pie | ChartType::Donut | ChartType::Histogram | ChartType::Treemap
        )
    }

    /// Types with a category axis and a value axis
    pub(crate) fn is_cartesian(self) -> bool {
        matches!(
            self,
            ChartType::Bar
                | ChartType::StackedBar
                | ChartType::Line
                | ChartType::Area
                | ChartType::StackedArea
                | ChartType::BarLine
                | ChartType::Histogram
        )
    }

    pub(crate) fn backend(self) -> Backend {
        match self {
            ChartType::Streamgraph | ChartType::Treemap => Backend::Svg,
            _ => Backend::Canvas,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| format!("unknown chart type '{}'", s))
    }
}

/// Category axis placement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum Orientation {
    /// Categories along x
    #[default]
    Vertical,
    /// Categories along y
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum AxisBinding {
    #[default]
    Left,
    Right,
}

/// Per-series kind in the bar/line mix
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MixKind {
    Bar,
    Line,
}

impl MixKind {
    /// Default for a series with no stored preference: alternate by index
    pub(crate) fn alternating(index: usize) -> Self {
        if index % 2 == 0 {
            MixKind::Bar
        } else {
            MixKind::Line
        }
    }

    pub(crate) fn key(self) -> &'static str {
        match self {
            MixKind::Bar => "bar",
            MixKind::Line => "line",
        }
    }
}

impl FromStr for MixKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(MixKind::Bar),
            "line" => Ok(MixKind::Line),
            other => Err(format!("unknown series kind '{}'", other)),
        }
    }
}

/// Point marker for line series in the bar/line mix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum MarkerShape {
    #[default]
    Circle,
    Rect,
    Triangle,
    Cross,
    Star,
    Line,
    Dash,
}

impl MarkerShape {
    pub(crate) const ALL: [MarkerShape; 7] = [
        MarkerShape::Circle,
        MarkerShape::Rect,
        MarkerShape::Triangle,
        MarkerShape::Cross,
        MarkerShape::Star,
        MarkerShape::Line,
        MarkerShape::Dash,
    ];

    pub(crate) fn key(self) -> &'static str {
        match self {
            MarkerShape::Circle => "circle",
            MarkerShape::Rect => "rect",
            MarkerShape::Triangle => "triangle",
            MarkerShape::Cross => "cross",
            MarkerShape::Star => "star",
            MarkerShape::Line => "line",
            MarkerShape::Dash => "dash",
        }
    }
}

impl FromStr for MarkerShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarkerShape::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| format!("unknown marker shape '{}'", s))
    }
}

pub(crate) const MIN_STROKE_WIDTH: u32 = 1;
pub(crate) const MAX_STROKE_WIDTH: u32 = 8;

/// Styling consulted only by the bar/line mix
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RenderStyle {
    /// `None` until the user picks a kind for this series
    pub(crate) kind: Option<MixKind>,
    pub(crate) marker: MarkerShape,
    pub(crate) stroke_width: u32,
    pub(crate) area_fill: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            kind: None,
            marker: MarkerShape::Circle,
            stroke_width: 2,
            area_fill: false,
        }
    }
}

/// One labeled sequence of values
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Series {
    pub(crate) label: String,
    pub(crate) data: Vec<f64>,
    pub(crate) fill: Rgba,
    pub(crate) stroke: Rgba,
    pub(crate) axis: AxisBinding,
    pub(crate) style: RenderStyle,
}

impl Series {
    pub(crate) fn new(label: impl Into<String>, data: Vec<f64>, color: Rgba) -> Self {
        let (fill, stroke) = fill_and_stroke(color);
        Self {
            label: label.into(),
            data,
            fill,
            stroke,
            axis: AxisBinding::Left,
            style: RenderStyle::default(),
        }
    }

    /// Recolor from a picked hue, keeping the fill translucent
    pub(crate) fn set_color(&mut self, color: Rgba) {
        let (fill, stroke) = fill_and_stroke(color);
        self.fill = fill;
        self.stroke = stroke;
    }

    /// Label shown in selectors and legends
    pub(crate) fn display_label(&self, index: usize) -> String {
        if self.label.is_empty() {
            format!("Series {}", index + 1)
        } else {
            self.label.clone()
        }
    }
}

/// Chart-wide view settings
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ViewSettings {
    pub(crate) chart_type: ChartType,
    pub(crate) orientation: Orientation,
    pub(crate) palette_key: String,
    pub(crate) chart_title: String,
    pub(crate) x_axis_title: String,
    pub(crate) y_axis_left_title: String,
    pub(crate) y_axis_right_title: String,
    /// Only consulted by single-series chart types
    pub(crate) single_series_index: usize,
    pub(crate) donut_cutout_pct: u32,
    pub(crate) pie_radius_pct: u32,
    pub(crate) area_opacity_pct: u32,
    pub(crate) hist_bins: u32,
}

impl ViewSettings {
    pub(crate) fn from_defaults(defaults: &Defaults) -> Self {
        Self {
            chart_type: defaults.chart_type,
            orientation: Orientation::Vertical,
            palette_key: defaults.palette_key.clone(),
            chart_title: defaults.chart_title.clone(),
            x_axis_title: String::new(),
            y_axis_left_title: String::new(),
            y_axis_right_title: String::new(),
            single_series_index: 0,
            donut_cutout_pct: defaults.donut_cutout_pct,
            pie_radius_pct: defaults.pie_radius_pct,
            area_opacity_pct: defaults.area_opacity_pct,
            hist_bins: defaults.hist_bins,
        }
    }
}

/// The whole editable chart state
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ChartConfig {
    pub(crate) labels: Vec<String>,
    pub(crate) datasets: Vec<Series>,
    pub(crate) view: ViewSettings,
}

impl ChartConfig {
    /// Fixed sample state used at startup and on reset
    pub(crate) fn seed(defaults: &Defaults) -> Self {
        Self {
            labels: (1..=5).map(|i| format!("Point {}", i)).collect(),
            datasets: vec![
                Series::new(
                    "Series 1",
                    vec![12.0, 19.0, 3.0, 5.0, 2.0],
                    Rgba::opaque(255, 107, 107),
                ),
                Series::new(
                    "Series 2",
                    vec![7.0, 11.0, 5.0, 8.0, 3.0],
                    Rgba::opaque(78, 205, 196),
                ),
            ],
            view: ViewSettings::from_defaults(defaults),
        }
    }

    pub(crate) fn resolve_axis_binding(&self, series_index: usize) -> AxisBinding {
        self.datasets
            .get(series_index)
            .map(|s| s.axis)
            .unwrap_or_default()
    }

    /// Stored single-series selection, clamped to 0 when stale
    pub(crate) fn resolve_single_series_index(&self) -> usize {
        let idx = self.view.single_series_index;
        if idx < self.datasets.len() { idx } else { 0 }
    }

    pub(crate) fn selected_series(&self) -> Option<&Series> {
        self.datasets.get(self.resolve_single_series_index())
    }

    pub(crate) fn has_right_axis(&self) -> bool {
        self.datasets.iter().any(|s| s.axis == AxisBinding::Right)
    }

    /// Append a zero-filled series; returns its index
    pub(crate) fn add_series(&mut self, color: Rgba) -> usize {
        let index = self.datasets.len();
        self.datasets.push(Series::new(
            format!("Series {}", index + 1),
            vec![0.0; self.labels.len()],
            color,
        ));
        index
    }

    /// Pop the last series unless it is the only one
    pub(crate) fn remove_last_series(&mut self) -> bool {
        if self.datasets.len() <= 1 {
            return false;
        }
        self.datasets.pop();
        true
    }

    /// Replace labels; an empty list keeps the current labels
    pub(crate) fn set_labels(&mut self, labels: Vec<String>) {
        if !labels.is_empty() {
            self.labels = labels;
        }
    }

    /// Fit every series to the label count
    pub(crate) fn normalize_all(&mut self) {
        let target = self.labels.len();
        for series in &mut self.datasets {
            series.data = normalize_series_length(&series.data, target);
        }
    }

    /// Recolor every series from a palette, cycling through it
    pub(crate) fn apply_palette(&mut self, scheme: &[Rgba]) {
        if scheme.is_empty() {
            return;
        }
        for (i, series) in self.datasets.iter_mut().enumerate() {
            series.set_color(scheme[i % scheme.len()]);
        }
    }
}

#[cfg(test)]
mod tests;
