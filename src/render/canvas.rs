//! Per-type reshaping of the chart model into a canvas chart description

use super::RenderError;
use super::histogram::bucketize;
use super::theme::ThemeColors;
use crate::model::color::{Rgba, segment_ramp};
use crate::model::palette::{colors_for_count, palette};
use crate::model::{AxisBinding, ChartConfig, ChartType, MarkerShape, MixKind, Orientation, Series};

/// Line series corner smoothing
pub(crate) const LINE_TENSION: f64 = 0.3;
const LINE_WIDTH: u32 = 2;

/// How one series is drawn on a cartesian grid
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MarkKind {
    Bar,
    Line {
        smooth: bool,
        marker: Option<MarkerShape>,
        width: u32,
        /// Area under the line, if filled
        area: Option<Rgba>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Mark {
    pub(crate) name: String,
    pub(crate) values: Vec<f64>,
    pub(crate) kind: MarkKind,
    pub(crate) fill: Rgba,
    pub(crate) stroke: Rgba,
    pub(crate) axis: AxisBinding,
}

/// Category axis plus one or two value axes
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CartesianSpec {
    pub(crate) categories: Vec<String>,
    pub(crate) orientation: Orientation,
    pub(crate) stacked: bool,
    /// Title of the horizontal axis
    pub(crate) x_title: Option<String>,
    /// Title of the vertical (left) axis
    pub(crate) y_left_title: Option<String>,
    pub(crate) y_right_title: Option<String>,
    /// Materialized only when some series is bound right
    pub(crate) right_axis: bool,
    pub(crate) marks: Vec<Mark>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Slice {
    pub(crate) label: String,
    pub(crate) value: f64,
    pub(crate) color: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PieSpec {
    pub(crate) series_name: String,
    pub(crate) slices: Vec<Slice>,
    pub(crate) border: Rgba,
    /// Inner and outer radius as a percentage of the available space
    pub(crate) inner_pct: f64,
    pub(crate) outer_pct: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RadarArea {
    pub(crate) name: String,
    pub(crate) values: Vec<f64>,
    pub(crate) stroke: Rgba,
    pub(crate) fill: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RadarSpec {
    /// Spoke name and its maximum
    pub(crate) indicators: Vec<(String, f64)>,
    pub(crate) areas: Vec<RadarArea>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum CanvasBody {
    Cartesian(CartesianSpec),
    Pie(PieSpec),
    Radar(RadarSpec),
}

/// Backend-neutral description of a canvas chart
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CanvasSpec {
    pub(crate) chart_type: ChartType,
    pub(crate) title: String,
    /// Chrome colors of the theme the description was built under
    pub(crate) colors: ThemeColors,
    pub(crate) body: CanvasBody,
}

/// Build the canvas description for a canvas-backed chart type
pub(crate) fn build_canvas_spec(
    config: &ChartConfig,
    colors: ThemeColors,
) -> Result<CanvasSpec, RenderError> {
    if config.datasets.is_empty() {
        return Err(RenderError::NoSeries);
    }
    if config.labels.is_empty() {
        return Err(RenderError::NoLabels);
    }
    let chart_type = config.view.chart_type;
    let body = match chart_type {
        ChartType::Bar => bar(config, false),
        ChartType::StackedBar => bar(config, true),
        ChartType::Line => line(config),
        ChartType::Area => area(config, false),
        ChartType::StackedArea => area(config, true),
        ChartType::BarLine => bar_line(config),
        ChartType::Pie => pie(config, false)?,
        ChartType::Donut => pie(config, true)?,
        ChartType::Radar => radar(config),
        ChartType::Histogram => histogram(config)?,
        ChartType::Streamgraph | ChartType::Treemap => {
            return Err(RenderError::WrongBackend(chart_type));
        }
    };
    Ok(CanvasSpec {
        chart_type,
        title: config.view.chart_title.clone(),
        colors,
        body,
    })
}

fn non_empty(title: &str) -> Option<String> {
    (!title.is_empty()).then(|| title.to_string())
}

/// Shared cartesian frame: categories, axis titles and the right-axis rule
fn cartesian(config: &ChartConfig, stacked: bool, marks: Vec<Mark>) -> CanvasBody {
    let view = &config.view;
    let right_axis = config.has_right_axis();
    CanvasBody::Cartesian(CartesianSpec {
        categories: config.labels.clone(),
        orientation: view.orientation,
        stacked,
        x_title: non_empty(&view.x_axis_title),
        y_left_title: non_empty(&view.y_axis_left_title),
        y_right_title: if right_axis {
            non_empty(&view.y_axis_right_title)
        } else {
            None
        },
        right_axis,
        marks,
    })
}

fn mark(index: usize, series: &Series, kind: MarkKind) -> Mark {
    Mark {
        name: series.display_label(index),
        values: series.data.clone(),
        kind,
        fill: series.fill,
        stroke: series.stroke,
        axis: series.axis,
    }
}

fn bar(config: &ChartConfig, stacked: bool) -> CanvasBody {
    let marks = config
        .datasets
        .iter()
        .enumerate()
        .map(|(i, s)| mark(i, s, MarkKind::Bar))
        .collect();
    cartesian(config, stacked, marks)
}

fn line(config: &ChartConfig) -> CanvasBody {
    let marks = config
        .datasets
        .iter()
        .enumerate()
        .map(|(i, s)| {
            mark(
                i,
                s,
                MarkKind::Line {
                    smooth: true,
                    marker: Some(MarkerShape::Circle),
                    width: LINE_WIDTH,
                    area: None,
                },
            )
        })
        .collect();
    cartesian(config, false, marks)
}

/// Fill derived from the stroke at the configured opacity
fn area_fill(stroke: Rgba, opacity_pct: u32) -> Rgba {
    stroke.with_alpha(opacity_pct.min(100) as f64 / 100.0)
}

fn area(config: &ChartConfig, stacked: bool) -> CanvasBody {
    let opacity = config.view.area_opacity_pct;
    let marks = config
        .datasets
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut m = mark(
                i,
                s,
                MarkKind::Line {
                    smooth: true,
                    marker: Some(MarkerShape::Circle),
                    width: LINE_WIDTH,
                    area: Some(area_fill(s.stroke, opacity)),
                },
            );
            m.stroke = s.stroke.with_alpha(1.0);
            m
        })
        .collect();
    cartesian(config, stacked, marks)
}

fn bar_line(config: &ChartConfig) -> CanvasBody {
    let marks = config
        .datasets
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let kind = match s.style.kind.unwrap_or_else(|| MixKind::alternating(i)) {
                MixKind::Bar => MarkKind::Bar,
                MixKind::Line => MarkKind::Line {
                    smooth: true,
                    marker: Some(s.style.marker),
                    width: s.style.stroke_width,
                    area: s.style.area_fill.then_some(s.fill),
                },
            };
            mark(i, s, kind)
        })
        .collect();
    cartesian(config, false, marks)
}

fn selected(config: &ChartConfig) -> Result<(usize, &Series), RenderError> {
    let index = config.resolve_single_series_index();
    config
        .datasets
        .get(index)
        .map(|s| (index, s))
        .ok_or(RenderError::NoSeries)
}

fn pie(config: &ChartConfig, donut: bool) -> Result<CanvasBody, RenderError> {
    let (index, series) = selected(config)?;
    let count = config.labels.len();
    let colors = match palette(&config.view.palette_key) {
        Some(scheme) if !scheme.is_empty() => colors_for_count(&scheme, count),
        _ => segment_ramp(series.fill, count),
    };
    let slices = config
        .labels
        .iter()
        .zip(series.data.iter())
        .zip(colors)
        .map(|((label, &value), color)| Slice {
            label: label.clone(),
            value,
            color,
        })
        .collect();

    let outer = config.view.pie_radius_pct as f64;
    // cutout is relative to the outer radius
    let cutout = if donut {
        config.view.donut_cutout_pct as f64
    } else {
        0.0
    };
    Ok(CanvasBody::Pie(PieSpec {
        series_name: series.display_label(index),
        slices,
        border: series.stroke,
        inner_pct: outer * cutout / 100.0,
        outer_pct: outer,
    }))
}

fn radar(config: &ChartConfig) -> CanvasBody {
    let opacity = config.view.area_opacity_pct;
    let peak = config
        .datasets
        .iter()
        .flat_map(|s| s.data.iter().copied())
        .fold(0.0_f64, f64::max);
    let max = if peak > 0.0 { peak } else { 1.0 };
    let indicators = config.labels.iter().map(|l| (l.clone(), max)).collect();
    let areas = config
        .datasets
        .iter()
        .enumerate()
        .map(|(i, s)| RadarArea {
            name: s.display_label(i),
            values: s.data.clone(),
            stroke: s.stroke.with_alpha(1.0),
            fill: area_fill(s.stroke, opacity),
        })
        .collect();
    CanvasBody::Radar(RadarSpec { indicators, areas })
}

fn histogram(config: &ChartConfig) -> Result<CanvasBody, RenderError> {
    let (index, series) = selected(config)?;
    let bins = bucketize(&series.data, config.view.hist_bins);
    let view = &config.view;
    Ok(CanvasBody::Cartesian(CartesianSpec {
        categories: bins.iter().map(|b| b.label.clone()).collect(),
        orientation: Orientation::Vertical,
        stacked: false,
        x_title: non_empty(&view.x_axis_title),
        y_left_title: non_empty(&view.y_axis_left_title),
        y_right_title: None,
        right_axis: false,
        marks: vec![Mark {
            name: format!("{} histogram", series.display_label(index)),
            values: bins.iter().map(|b| b.count as f64).collect(),
            kind: MarkKind::Bar,
            fill: series.fill,
            stroke: series.stroke,
            axis: AxisBinding::Left,
        }],
    }))
}
