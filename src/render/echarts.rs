//! Translate a canvas description into an ECharts option via charming

use std::path::Path;

use charming::{
    Chart, ImageRenderer,
    component::{Axis, Grid, Legend, RadarCoordinate, RadarIndicator, Title},
    datatype::DataPointItem,
    element::{
        AreaStyle, AxisLabel, AxisType, Color, ItemStyle, LineStyle, SplitLine, Symbol, TextStyle,
    },
    renderer::ImageFormat,
    series::{Bar, Line, Pie, Radar},
};

use super::RenderError;
use super::canvas::{CanvasBody, CanvasSpec, CartesianSpec, LINE_TENSION, Mark, MarkKind, PieSpec, RadarSpec};
use super::theme::ThemeColors;
use crate::model::{AxisBinding, MarkerShape, Orientation};

const TITLE_FONT_SIZE: f64 = 20.0;
const AXIS_TITLE_FONT_SIZE: f64 = 14.0;
const SYMBOL_SIZE: f64 = 6.0;

/// Build the charming chart for `spec`, drawn over `background`
pub(crate) fn to_chart(spec: &CanvasSpec, background: &str) -> Chart {
    let colors = spec.colors;
    let chart = Chart::new()
        .background_color(Color::Value(background.to_string()))
        .title(
            Title::new()
                .text(spec.title.as_str())
                .left("center")
                .top("2%")
                .text_style(
                    TextStyle::new()
                        .color(colors.text)
                        .font_size(TITLE_FONT_SIZE)
                        .font_weight("bold"),
                ),
        )
        .legend(
            Legend::new()
                .bottom("2%")
                .text_style(TextStyle::new().color(colors.text)),
        );

    match &spec.body {
        CanvasBody::Cartesian(cartesian) => cartesian_chart(chart, cartesian, colors),
        CanvasBody::Pie(pie) => pie_chart(chart, pie),
        CanvasBody::Radar(radar) => radar_chart(chart, radar),
    }
}

fn category_axis(spec: &CartesianSpec, colors: ThemeColors) -> Axis {
    Axis::new()
        .type_(AxisType::Category)
        .data(spec.categories.clone())
        .axis_label(AxisLabel::new().color(colors.text))
}

fn value_axis(colors: ThemeColors, with_grid: bool) -> Axis {
    let axis = Axis::new()
        .type_(AxisType::Value)
        .axis_label(AxisLabel::new().color(colors.text));
    if with_grid {
        axis.split_line(SplitLine::new().line_style(LineStyle::new().width(0.5).color(colors.grid)))
    } else {
        axis.split_line(SplitLine::new().show(false))
    }
}

fn titled(axis: Axis, title: Option<&String>, colors: ThemeColors) -> Axis {
    match title {
        Some(text) => axis
            .name(text.as_str())
            .name_text_style(
                TextStyle::new()
                    .color(colors.text)
                    .font_size(AXIS_TITLE_FONT_SIZE)
                    .font_weight("bold"),
            ),
        None => axis,
    }
}

fn cartesian_chart(chart: Chart, spec: &CartesianSpec, colors: ThemeColors) -> Chart {
    let mut chart = chart.grid(
        Grid::new()
            .left("5%")
            .right("5%")
            .bottom("12%")
            .top("14%")
            .contain_label(true),
    );

    let mut value_axes = vec![value_axis(colors, true)];
    if spec.right_axis {
        value_axes.push(titled(
            value_axis(colors, false),
            spec.y_right_title.as_ref(),
            colors,
        ));
    }

    // Titles stay on their physical axes when the orientation flips
    match spec.orientation {
        Orientation::Vertical => {
            chart = chart.x_axis(titled(category_axis(spec, colors), spec.x_title.as_ref(), colors));
            for (i, axis) in value_axes.into_iter().enumerate() {
                let axis = if i == 0 {
                    titled(axis, spec.y_left_title.as_ref(), colors)
                } else {
                    axis
                };
                chart = chart.y_axis(axis);
            }
        }
        Orientation::Horizontal => {
            chart = chart.y_axis(titled(
                category_axis(spec, colors),
                spec.y_left_title.as_ref(),
                colors,
            ));
            for (i, axis) in value_axes.into_iter().enumerate() {
                let axis = if i == 0 {
                    titled(axis, spec.x_title.as_ref(), colors)
                } else {
                    axis
                };
                chart = chart.x_axis(axis);
            }
        }
    }

    for mark in &spec.marks {
        let axis_index = match mark.axis {
            AxisBinding::Right if spec.right_axis => 1.0,
            _ => 0.0,
        };
        chart = match &mark.kind {
            MarkKind::Bar => chart.series(bar_series(mark, spec, axis_index)),
            MarkKind::Line { .. } => chart.series(line_series(mark, spec, axis_index)),
        };
    }
    chart
}

fn bar_series(mark: &Mark, spec: &CartesianSpec, axis_index: f64) -> Bar {
    let mut bar = Bar::new()
        .name(mark.name.as_str())
        .data(mark.values.clone())
        .item_style(
            ItemStyle::new()
                .color(mark.fill.to_string())
                .border_color(mark.stroke.to_string())
                .border_width(1),
        );
    if spec.stacked {
        bar = bar.stack("total");
    }
    match spec.orientation {
        Orientation::Vertical => bar.y_axis_index(axis_index),
        Orientation::Horizontal => bar.x_axis_index(axis_index),
    }
}

fn line_series(mark: &Mark, spec: &CartesianSpec, axis_index: f64) -> Line {
    let MarkKind::Line {
        smooth,
        marker,
        width,
        area,
    } = &mark.kind
    else {
        return Line::new();
    };
    let mut line = Line::new()
        .name(mark.name.as_str())
        .data(mark.values.clone())
        .symbol(marker.map(symbol).unwrap_or(Symbol::None))
        .symbol_size(SYMBOL_SIZE)
        .line_style(LineStyle::new().width(*width as f64).color(mark.stroke.to_string()))
        .item_style(ItemStyle::new().color(mark.stroke.to_string()));
    if *smooth {
        line = line.smooth(LINE_TENSION);
    }
    if let Some(fill) = area {
        line = line.area_style(AreaStyle::new().color(fill.to_string()));
    }
    if spec.stacked {
        line = line.stack("total");
    }
    match spec.orientation {
        Orientation::Vertical => line.y_axis_index(axis_index),
        Orientation::Horizontal => line.x_axis_index(axis_index),
    }
}

/// Nearest ECharts symbol for each marker shape
fn symbol(marker: MarkerShape) -> Symbol {
    match marker {
        MarkerShape::Circle => Symbol::Circle,
        MarkerShape::Rect => Symbol::Rect,
        MarkerShape::Triangle => Symbol::Triangle,
        MarkerShape::Cross => Symbol::Diamond,
        MarkerShape::Star => Symbol::Pin,
        MarkerShape::Line => Symbol::Arrow,
        MarkerShape::Dash => Symbol::RoundRect,
    }
}

fn pie_chart(chart: Chart, spec: &PieSpec) -> Chart {
    let data: Vec<DataPointItem> = spec
        .slices
        .iter()
        .map(|slice| {
            DataPointItem::new(slice.value)
                .name(slice.label.as_str())
                .item_style(
                    ItemStyle::new()
                        .color(slice.color.to_string())
                        .border_color(spec.border.to_string())
                        .border_width(1),
                )
        })
        .collect();
    chart.series(
        Pie::new()
            .name(spec.series_name.as_str())
            .radius(vec![
                format!("{}%", spec.inner_pct),
                format!("{}%", spec.outer_pct),
            ])
            .center(vec!["50%", "52%"])
            .data(data),
    )
}

fn radar_chart(chart: Chart, spec: &RadarSpec) -> Chart {
    let indicators: Vec<RadarIndicator> = spec
        .indicators
        .iter()
        .map(|(name, max)| RadarIndicator::new().name(name.as_str()).max(*max))
        .collect();
    let mut chart = chart.radar(RadarCoordinate::new().indicator(indicators));
    for area in &spec.areas {
        chart = chart.series(
            Radar::new()
                .name(area.name.as_str())
                .item_style(ItemStyle::new().color(area.stroke.to_string()))
                .line_style(LineStyle::new().width(2).color(area.stroke.to_string()))
                .area_style(AreaStyle::new().color(area.fill.to_string()))
                .data(vec![(area.values.clone(), area.name.as_str())]),
        );
    }
    chart
}

/// Rasterize to a PNG file at `width x height` pixels
pub(crate) fn save_png(chart: &Chart, width: u32, height: u32, path: &Path) -> Result<(), RenderError> {
    let mut renderer = ImageRenderer::new(width, height);
    renderer
        .save_format(ImageFormat::Png, chart, path)
        .map_err(|e| RenderError::Backend(format!("Failed to save chart: {}", e)))
}

/// Serialize to an SVG file at `width x height`
pub(crate) fn save_svg(chart: &Chart, width: u32, height: u32, path: &Path) -> Result<(), RenderError> {
    let mut renderer = ImageRenderer::new(width, height);
    renderer
        .save(chart, path)
        .map_err(|e| RenderError::Backend(format!("Failed to save chart: {}", e)))
}
