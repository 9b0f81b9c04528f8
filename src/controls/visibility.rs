//! Which control groups are shown for each chart type

use bitflags::bitflags;

use crate::model::ChartType;

bitflags! {
    /// Groups of controls that are shown or hidden together
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct ControlGroups: u16 {
        /// Vertical/horizontal toggle
        const ORIENTATION   = 1 << 0;
        /// Single-series selector
        const SINGLE_SERIES = 1 << 1;
        const DONUT_CUTOUT  = 1 << 2;
        /// Pie/donut radius slider
        const PIE_RADIUS    = 1 << 3;
        const HIST_BINS     = 1 << 4;
        /// Fill opacity for area and radar charts
        const AREA_OPACITY  = 1 << 5;
        /// Bar/line mix panel
        const MIXED_TYPES   = 1 << 6;
        /// X, left-Y and right-Y title inputs
        const AXIS_TITLES   = 1 << 7;
    }
}

const CARTESIAN: ControlGroups = ControlGroups::ORIENTATION.union(ControlGroups::AXIS_TITLES);

const VISIBILITY: [(ChartType, ControlGroups); 12] = [
    (ChartType::Bar, CARTESIAN),
    (ChartType::StackedBar, CARTESIAN),
    (ChartType::Line, CARTESIAN),
    (
        ChartType::Area,
        CARTESIAN.union(ControlGroups::AREA_OPACITY),
    ),
    (
        ChartType::StackedArea,
        CARTESIAN.union(ControlGroups::AREA_OPACITY),
    ),
    (
        ChartType::BarLine,
        CARTESIAN.union(ControlGroups::MIXED_TYPES),
    ),
    (
        ChartType::Pie,
        ControlGroups::AXIS_TITLES
            .union(ControlGroups::SINGLE_SERIES)
            .union(ControlGroups::PIE_RADIUS),
    ),
    (
        ChartType::Donut,
        ControlGroups::AXIS_TITLES
            .union(ControlGroups::SINGLE_SERIES)
            .union(ControlGroups::PIE_RADIUS)
            .union(ControlGroups::DONUT_CUTOUT),
    ),
    (
        ChartType::Radar,
        ControlGroups::AXIS_TITLES.union(ControlGroups::AREA_OPACITY),
    ),
    (
        ChartType::Histogram,
        ControlGroups::AXIS_TITLES
            .union(ControlGroups::SINGLE_SERIES)
            .union(ControlGroups::HIST_BINS),
    ),
    (ChartType::Streamgraph, ControlGroups::AXIS_TITLES),
    (ChartType::Treemap, ControlGroups::SINGLE_SERIES),
];

/// Control groups to show for `chart_type`
pub(crate) fn compute_visibility(chart_type: ChartType) -> ControlGroups {
    VISIBILITY
        .iter()
        .find(|(t, _)| *t == chart_type)
        .map(|(_, groups)| *groups)
        .unwrap_or(CARTESIAN)
}
