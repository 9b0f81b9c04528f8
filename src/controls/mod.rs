//! Headless control tree mirroring the dashboard's form inputs

pub(crate) mod synth;
pub(crate) mod visibility;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config::Defaults;
use crate::export::ExportFormat;
use crate::model::color::Rgba;
use crate::model::{ChartConfig, ChartType, MarkerShape, MixKind, Orientation};
use crate::model::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};
use crate::model::palette;
use crate::render::theme::Theme;
pub(crate) use synth::{
    refresh_single_series_options, synthesize_mixed_type_controls, synthesize_series_controls,
};
pub(crate) use visibility::{ControlGroups, compute_visibility};

/// Identity of a control. Displays as the element id used in event scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ControlKey {
    SeriesName(usize),
    SeriesNameDone(usize),
    SeriesColor(usize),
    SeriesData(usize),
    SeriesRightAxis(usize),
    MixedType(usize),
    MixedMarker(usize),
    MixedWidth(usize),
    MixedFill(usize),
    LabelsInput,
    ChartTitle,
    XAxisTitle,
    YAxisLeftTitle,
    YAxisRightTitle,
    AxisSwap,
    ChartType,
    OrientationVertical,
    OrientationHorizontal,
    PaletteSelect,
    ApplyPalette,
    SingleSeries,
    DonutCutout,
    PieRadius,
    AreaOpacity,
    HistBins,
    AddDataset,
    RemoveDataset,
    ThemeLight,
    ThemeDark,
    Reset,
    ExportType,
    ExportScale,
    ExportBackground,
    ExportImage,
}

/// Fixed (non-indexed) controls and their ids
const STATIC_KEYS: [(ControlKey, &str); 25] = [
    (ControlKey::LabelsInput, "labels-input"),
    (ControlKey::ChartTitle, "chart-title"),
    (ControlKey::XAxisTitle, "x-axis-title"),
    (ControlKey::YAxisLeftTitle, "y-axis-left-title"),
    (ControlKey::YAxisRightTitle, "y-axis-right-title"),
    (ControlKey::AxisSwap, "axis-swap-btn"),
    (ControlKey::ChartType, "chart-type"),
    (ControlKey::OrientationVertical, "orientation-vertical"),
    (ControlKey::OrientationHorizontal, "orientation-horizontal"),
    (ControlKey::PaletteSelect, "palette-select"),
    (ControlKey::ApplyPalette, "apply-palette"),
    (ControlKey::SingleSeries, "single-series-select"),
    (ControlKey::DonutCutout, "donut-cutout"),
    (ControlKey::PieRadius, "pie-radius"),
    (ControlKey::AreaOpacity, "area-opacity"),
    (ControlKey::HistBins, "hist-bins"),
    (ControlKey::AddDataset, "add-dataset"),
    (ControlKey::RemoveDataset, "remove-dataset"),
    (ControlKey::ThemeLight, "theme-light"),
    (ControlKey::ThemeDark, "theme-dark"),
    (ControlKey::Reset, "reset-dashboard"),
    (ControlKey::ExportType, "export-type"),
    (ControlKey::ExportScale, "export-scale"),
    (ControlKey::ExportBackground, "export-bg"),
    (ControlKey::ExportImage, "export-image"),
];

/// Indexed (per-series) controls: id prefix and constructor
const INDEXED_KEYS: [(&str, fn(usize) -> ControlKey); 9] = [
    ("dataset-name-done-", ControlKey::SeriesNameDone),
    ("dataset-name-", ControlKey::SeriesName),
    ("dataset-color-", ControlKey::SeriesColor),
    ("dataset-data-", ControlKey::SeriesData),
    ("dataset-right-", ControlKey::SeriesRightAxis),
    ("mixed-type-", ControlKey::MixedType),
    ("mixed-point-", ControlKey::MixedMarker),
    ("mixed-width-", ControlKey::MixedWidth),
    ("mixed-fill-", ControlKey::MixedFill),
];

impl ControlKey {
    /// All non-indexed controls
    pub(crate) fn statics() -> impl Iterator<Item = ControlKey> {
        STATIC_KEYS.iter().map(|(key, _)| *key)
    }

    fn indexed(self) -> Option<(&'static str, usize)> {
        let (prefix, idx) = match self {
            ControlKey::SeriesName(i) => ("dataset-name-", i),
            ControlKey::SeriesNameDone(i) => ("dataset-name-done-", i),
            ControlKey::SeriesColor(i) => ("dataset-color-", i),
            ControlKey::SeriesData(i) => ("dataset-data-", i),
            ControlKey::SeriesRightAxis(i) => ("dataset-right-", i),
            ControlKey::MixedType(i) => ("mixed-type-", i),
            ControlKey::MixedMarker(i) => ("mixed-point-", i),
            ControlKey::MixedWidth(i) => ("mixed-width-", i),
            ControlKey::MixedFill(i) => ("mixed-fill-", i),
            _ => return None,
        };
        Some((prefix, idx))
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((prefix, idx)) = self.indexed() {
            return write!(f, "{}{}", prefix, idx);
        }
        let id = STATIC_KEYS
            .iter()
            .find(|(key, _)| key == self)
            .map(|(_, id)| *id)
            .unwrap_or("unknown");
        f.write_str(id)
    }
}

impl FromStr for ControlKey {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((key, _)) = STATIC_KEYS.iter().find(|(_, id)| *id == s) {
            return Ok(*key);
        }
        // Longest prefixes first so `dataset-name-done-` wins over `dataset-name-`
        for (prefix, make) in INDEXED_KEYS {
            if let Some(rest) = s.strip_prefix(prefix)
                && let Ok(idx) = rest.parse::<usize>()
            {
                return Ok(make(idx));
            }
        }
        Err(ControlError::UnknownControl(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ControlError {
    #[error("unknown control '{0}'")]
    UnknownControl(String),
    #[error("control '{0}' is not present")]
    Missing(ControlKey),
    #[error("invalid value '{value}' for control '{key}': {reason}")]
    InvalidValue {
        key: ControlKey,
        value: String,
        reason: String,
    },
    #[error("control '{0}' does not take a value")]
    NotEditable(ControlKey),
}

/// How a raw UI event reaches a control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Trigger {
    /// Value changes continuously (typing, dragging, picking)
    Input,
    /// Value committed (selects, toggles)
    Change,
    /// Focus lost
    Blur,
    Click,
}

impl FromStr for Trigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Trigger::Input),
            "change" => Ok(Trigger::Change),
            "blur" => Ok(Trigger::Blur),
            "click" => Ok(Trigger::Click),
            other => Err(format!("unknown trigger '{}'", other)),
        }
    }
}

/// Editor card for one series
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SeriesCard {
    pub(crate) index: usize,
    pub(crate) name: String,
    /// `#RRGGBB` as a color picker reports it
    pub(crate) color: String,
    pub(crate) data: String,
    pub(crate) right_axis: bool,
}

/// Line-only sub-controls of a mixed-type row
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LineControls {
    pub(crate) marker: MarkerShape,
    pub(crate) stroke_width: u32,
    pub(crate) area_fill: bool,
}

/// Per-series row in the bar/line mix panel
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MixedRow {
    pub(crate) index: usize,
    pub(crate) title: String,
    pub(crate) kind: MixKind,
    /// Present only while `kind` is line
    pub(crate) line: Option<LineControls>,
    /// Last line settings, kept so toggling bar/line does not lose them
    pub(crate) line_memory: LineControls,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MixedTypePanel {
    pub(crate) hidden: bool,
    pub(crate) rows: Vec<MixedRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SelectOption {
    pub(crate) value: String,
    pub(crate) label: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SingleSeriesSelect {
    pub(crate) options: Vec<SelectOption>,
    pub(crate) value: Option<String>,
}

impl SingleSeriesSelect {
    pub(crate) fn selected_index(&self) -> usize {
        self.value
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

/// Controls that exist for the whole session (never resynthesized)
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GlobalControls {
    pub(crate) labels: String,
    pub(crate) chart_title: String,
    pub(crate) x_axis_title: String,
    pub(crate) y_axis_left_title: String,
    pub(crate) y_axis_right_title: String,
    pub(crate) chart_type: ChartType,
    pub(crate) orientation: Orientation,
    pub(crate) palette: String,
    pub(crate) donut_cutout: u32,
    pub(crate) pie_radius: u32,
    pub(crate) area_opacity: u32,
    pub(crate) hist_bins: u32,
    pub(crate) theme: Theme,
    pub(crate) export_format: ExportFormat,
    pub(crate) export_scale: u32,
    /// Unset until picked; export then uses the theme background
    pub(crate) export_background: Option<String>,
}

impl GlobalControls {
    pub(crate) fn from_config(config: &ChartConfig, defaults: &Defaults) -> Self {
        let view = &config.view;
        Self {
            labels: config.labels.join(", "),
            chart_title: view.chart_title.clone(),
            x_axis_title: view.x_axis_title.clone(),
            y_axis_left_title: view.y_axis_left_title.clone(),
            y_axis_right_title: view.y_axis_right_title.clone(),
            chart_type: view.chart_type,
            orientation: view.orientation,
            palette: view.palette_key.clone(),
            donut_cutout: view.donut_cutout_pct,
            pie_radius: view.pie_radius_pct,
            area_opacity: view.area_opacity_pct,
            hist_bins: view.hist_bins,
            theme: defaults.theme,
            export_format: defaults.export_format,
            export_scale: defaults.export_scale,
            export_background: defaults.export_background.clone(),
        }
    }
}

/// Slider ranges: (min, max)
pub(crate) const DONUT_CUTOUT_RANGE: (u32, u32) = (0, 90);
pub(crate) const PIE_RADIUS_RANGE: (u32, u32) = (10, 100);
pub(crate) const AREA_OPACITY_RANGE: (u32, u32) = (0, 100);
pub(crate) const HIST_BINS_RANGE: (u32, u32) = (1, 50);
pub(crate) const EXPORT_SCALE_RANGE: (u32, u32) = (1, crate::config::MAX_EXPORT_SCALE);

/// Every live control of the dashboard
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ControlTree {
    pub(crate) cards: Vec<SeriesCard>,
    pub(crate) single_series: SingleSeriesSelect,
    pub(crate) mixed: MixedTypePanel,
    pub(crate) globals: GlobalControls,
    pub(crate) visible: ControlGroups,
    /// Bumped by every synthesis; listeners bound to an older generation are stale
    pub(crate) generation: u64,
}

impl ControlTree {
    /// Build a full tree for `config`
    pub(crate) fn new(config: &ChartConfig, defaults: &Defaults) -> Self {
        let mut tree = Self {
            cards: Vec::new(),
            single_series: SingleSeriesSelect::default(),
            mixed: MixedTypePanel::default(),
            globals: GlobalControls::from_config(config, defaults),
            visible: compute_visibility(config.view.chart_type),
            generation: 0,
        };
        tree.single_series.value = Some(config.view.single_series_index.to_string());
        synthesize_series_controls(&mut tree, config);
        synthesize_mixed_type_controls(&mut tree, config);
        tree
    }

    pub(crate) fn card(&self, index: usize) -> Option<&SeriesCard> {
        self.cards.get(index)
    }

    /// Whether `key` currently exists in the tree
    pub(crate) fn contains(&self, key: ControlKey) -> bool {
        match key {
            ControlKey::SeriesName(i)
            | ControlKey::SeriesNameDone(i)
            | ControlKey::SeriesColor(i)
            | ControlKey::SeriesData(i)
            | ControlKey::SeriesRightAxis(i) => i < self.cards.len(),
            ControlKey::MixedType(i) => !self.mixed.hidden && i < self.mixed.rows.len(),
            ControlKey::MixedMarker(i) | ControlKey::MixedWidth(i) | ControlKey::MixedFill(i) => {
                !self.mixed.hidden && self.mixed.rows.get(i).is_some_and(|r| r.line.is_some())
            }
            _ => true,
        }
    }

    /// Every live control key, statics first
    pub(crate) fn keys(&self) -> Vec<ControlKey> {
        let mut keys: Vec<ControlKey> = ControlKey::statics().collect();
        for card in &self.cards {
            let i = card.index;
            keys.extend([
                ControlKey::SeriesName(i),
                ControlKey::SeriesNameDone(i),
                ControlKey::SeriesColor(i),
                ControlKey::SeriesData(i),
                ControlKey::SeriesRightAxis(i),
            ]);
        }
        if !self.mixed.hidden {
            for row in &self.mixed.rows {
                keys.push(ControlKey::MixedType(row.index));
                if row.line.is_some() {
                    keys.extend([
                        ControlKey::MixedMarker(row.index),
                        ControlKey::MixedWidth(row.index),
                        ControlKey::MixedFill(row.index),
                    ]);
                }
            }
        }
        keys
    }

    /// Write a raw UI value into a control, as the browser would
    pub(crate) fn set_value(&mut self, key: ControlKey, value: &str) -> Result<(), ControlError> {
        if !self.contains(key) {
            return Err(ControlError::Missing(key));
        }
        let invalid = |reason: &str| ControlError::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        };
        match key {
            ControlKey::SeriesName(i) => self.cards[i].name = value.to_string(),
            ControlKey::SeriesData(i) => self.cards[i].data = value.to_string(),
            ControlKey::SeriesColor(i) => {
                let color = Rgba::parse(value).ok_or_else(|| invalid("expected a color"))?;
                self.cards[i].color = color.to_hex();
            }
            ControlKey::SeriesRightAxis(i) => {
                self.cards[i].right_axis = parse_bool(value).ok_or_else(|| invalid("expected true/false"))?;
            }
            ControlKey::MixedType(i) => {
                let kind: MixKind = value.parse().map_err(|e: String| invalid(&e))?;
                let row = &mut self.mixed.rows[i];
                row.kind = kind;
                row.line = (kind == MixKind::Line).then_some(row.line_memory);
                // line sub-controls appeared or vanished
                self.generation += 1;
            }
            ControlKey::MixedMarker(i) => {
                let marker: MarkerShape = value.parse().map_err(|e: String| invalid(&e))?;
                self.update_line(i, |line| line.marker = marker);
            }
            ControlKey::MixedWidth(i) => {
                let width = parse_clamped(value, (MIN_STROKE_WIDTH, MAX_STROKE_WIDTH))
                    .ok_or_else(|| invalid("expected a number"))?;
                self.update_line(i, |line| line.stroke_width = width);
            }
            ControlKey::MixedFill(i) => {
                let fill = parse_bool(value).ok_or_else(|| invalid("expected true/false"))?;
                self.update_line(i, |line| line.area_fill = fill);
            }
            ControlKey::LabelsInput => self.globals.labels = value.to_string(),
            ControlKey::ChartTitle => self.globals.chart_title = value.to_string(),
            ControlKey::XAxisTitle => self.globals.x_axis_title = value.to_string(),
            ControlKey::YAxisLeftTitle => self.globals.y_axis_left_title = value.to_string(),
            ControlKey::YAxisRightTitle => self.globals.y_axis_right_title = value.to_string(),
            ControlKey::ChartType => {
                self.globals.chart_type = value.parse().map_err(|e: String| invalid(&e))?;
            }
            ControlKey::PaletteSelect => {
                if !palette::is_known(value) {
                    return Err(invalid("unknown palette"));
                }
                self.globals.palette = value.to_string();
            }
            ControlKey::SingleSeries => {
                if !self.single_series.options.iter().any(|o| o.value == value) {
                    return Err(invalid("no such option"));
                }
                self.single_series.value = Some(value.to_string());
            }
            ControlKey::DonutCutout => {
                self.globals.donut_cutout =
                    parse_clamped(value, DONUT_CUTOUT_RANGE).ok_or_else(|| invalid("expected a number"))?;
            }
            ControlKey::PieRadius => {
                self.globals.pie_radius =
                    parse_clamped(value, PIE_RADIUS_RANGE).ok_or_else(|| invalid("expected a number"))?;
            }
            ControlKey::AreaOpacity => {
                self.globals.area_opacity =
                    parse_clamped(value, AREA_OPACITY_RANGE).ok_or_else(|| invalid("expected a number"))?;
            }
            ControlKey::HistBins => {
                self.globals.hist_bins =
                    parse_clamped(value, HIST_BINS_RANGE).ok_or_else(|| invalid("expected a number"))?;
            }
            ControlKey::ExportType => {
                self.globals.export_format = value.parse().map_err(|e: String| invalid(&e))?;
            }
            ControlKey::ExportScale => {
                self.globals.export_scale =
                    parse_clamped(value, EXPORT_SCALE_RANGE).ok_or_else(|| invalid("expected a number"))?;
            }
            ControlKey::ExportBackground => {
                let color = Rgba::parse(value).ok_or_else(|| invalid("expected a color"))?;
                self.globals.export_background = Some(color.to_hex());
            }
            ControlKey::SeriesNameDone(_)
            | ControlKey::AxisSwap
            | ControlKey::OrientationVertical
            | ControlKey::OrientationHorizontal
            | ControlKey::ApplyPalette
            | ControlKey::AddDataset
            | ControlKey::RemoveDataset
            | ControlKey::ThemeLight
            | ControlKey::ThemeDark
            | ControlKey::Reset
            | ControlKey::ExportImage => return Err(ControlError::NotEditable(key)),
        }
        Ok(())
    }

    fn update_line(&mut self, index: usize, edit: impl FnOnce(&mut LineControls)) {
        let row = &mut self.mixed.rows[index];
        if let Some(line) = row.line.as_mut() {
            edit(line);
            row.line_memory = *line;
        }
    }

    /// Swap the x and left-y axis title inputs
    pub(crate) fn swap_axis_titles(&mut self) {
        std::mem::swap(
            &mut self.globals.x_axis_title,
            &mut self.globals.y_axis_left_title,
        );
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "on" | "1" | "checked" => Some(true),
        "false" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Parse an integer slider value and clamp it to the slider's range
fn parse_clamped(value: &str, (min, max): (u32, u32)) -> Option<u32> {
    let v = value.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some((v.round().max(0.0) as u32).clamp(min, max))
}
