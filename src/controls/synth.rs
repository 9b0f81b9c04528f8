//! Control synthesis: regenerate per-series controls from the model
//!
//! Every call is a full rebuild of the affected part of the tree. The only
//! state carried across a rebuild is the single-series selection, matched by
//! option value.

use tracing::debug;

use super::{ControlTree, LineControls, MixedRow, SelectOption, SeriesCard, SingleSeriesSelect};
use crate::model::parse::format_numbers;
use crate::model::{AxisBinding, ChartConfig, ChartType, MixKind};

/// Rebuild every series card and the single-series selector options
pub(crate) fn synthesize_series_controls(tree: &mut ControlTree, config: &ChartConfig) {
    tree.cards = config
        .datasets
        .iter()
        .enumerate()
        .map(|(index, series)| SeriesCard {
            index,
            name: series.label.clone(),
            color: series.fill.to_hex(),
            data: format_numbers(&series.data),
            right_axis: series.axis == AxisBinding::Right,
        })
        .collect();
    refresh_single_series_options(&mut tree.single_series, config);
    tree.generation += 1;
    debug!(
        cards = tree.cards.len(),
        generation = tree.generation,
        "synthesized series controls"
    );
}

/// Rebuild the option list, keeping the previous selection if it still exists
pub(crate) fn refresh_single_series_options(select: &mut SingleSeriesSelect, config: &ChartConfig) {
    let previous = select.value.take();
    select.options = config
        .datasets
        .iter()
        .enumerate()
        .map(|(i, series)| SelectOption {
            value: i.to_string(),
            label: series.display_label(i),
        })
        .collect();
    select.value = previous
        .filter(|prev| select.options.iter().any(|o| &o.value == prev))
        .or_else(|| select.options.first().map(|o| o.value.clone()));
}

/// Rebuild the bar/line mix panel; cleared and hidden for other chart types
pub(crate) fn synthesize_mixed_type_controls(tree: &mut ControlTree, config: &ChartConfig) {
    tree.mixed.rows.clear();
    tree.mixed.hidden = config.view.chart_type != ChartType::BarLine;
    tree.generation += 1;
    if tree.mixed.hidden {
        return;
    }
    tree.mixed.rows = config
        .datasets
        .iter()
        .enumerate()
        .map(|(index, series)| {
            let style = series.style;
            let kind = style.kind.unwrap_or_else(|| MixKind::alternating(index));
            let seeded = LineControls {
                marker: style.marker,
                stroke_width: style.stroke_width,
                area_fill: style.area_fill,
            };
            MixedRow {
                index,
                title: series.display_label(index),
                kind,
                line: (kind == MixKind::Line).then_some(seeded),
                line_memory: seeded,
            }
        })
        .collect();
}
