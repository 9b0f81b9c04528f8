//! The dashboard: owns the model, the controls and the live surface

use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::binder::{Action, Binder, Debouncer, Timing};
use crate::config::Defaults;
use crate::controls::{
    ControlError, ControlKey, ControlTree, Trigger, compute_visibility,
    refresh_single_series_options, synthesize_mixed_type_controls, synthesize_series_controls,
};
use crate::export::{ExportError, ExportSettings, export_chart};
use crate::model::color::{Rgba, random_color};
use crate::model::palette::{DEFAULT_PALETTE, palette};
use crate::model::parse::{parse_delimited_numbers, parse_labels};
use crate::model::{AxisBinding, ChartConfig, Orientation};
use crate::render::theme::Theme;
use crate::render::{Dispatcher, RenderContext, RenderOutput};

/// One raw UI event aimed at a control id
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct UiEvent {
    pub(crate) target: String,
    pub(crate) trigger: Trigger,
    /// New control value for input/change events
    pub(crate) value: Option<String>,
}

impl UiEvent {
    pub(crate) fn new(target: impl Into<String>, trigger: Trigger, value: Option<&str>) -> Self {
        Self {
            target: target.into(),
            trigger,
            value: value.map(str::to_string),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum DashboardError {
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

pub(crate) struct Dashboard {
    defaults: Defaults,
    config: ChartConfig,
    controls: ControlTree,
    binder: Binder,
    debouncer: Debouncer,
    dispatcher: Dispatcher,
    theme: Theme,
    rng: StdRng,
    export_dir: PathBuf,
    exports: Vec<PathBuf>,
}

impl Dashboard {
    /// Build the seeded dashboard and draw it once
    pub(crate) fn new(defaults: Defaults, seed: Option<u64>, export_dir: &Path) -> Self {
        let config = ChartConfig::seed(&defaults);
        let controls = ControlTree::new(&config, &defaults);
        let mut binder = Binder::new();
        binder.bind(&controls);
        let mut dashboard = Self {
            debouncer: Debouncer::new(defaults.debounce),
            theme: defaults.theme,
            rng: StdRng::seed_from_u64(seed.unwrap_or_else(rand::random)),
            defaults,
            config,
            controls,
            binder,
            dispatcher: Dispatcher::new(),
            export_dir: export_dir.to_path_buf(),
            exports: Vec::new(),
        };
        dashboard.render();
        dashboard
    }

    pub(crate) fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub(crate) fn controls(&self) -> &ControlTree {
        &self.controls
    }

    pub(crate) fn current(&self) -> Option<&RenderOutput> {
        self.dispatcher.current()
    }

    pub(crate) fn render_count(&self) -> u64 {
        self.dispatcher.render_count()
    }

    pub(crate) fn theme(&self) -> Theme {
        self.theme
    }

    pub(crate) fn exports(&self) -> &[PathBuf] {
        &self.exports
    }

    pub(crate) fn has_pending_update(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn render_context(&self) -> RenderContext {
        RenderContext {
            theme: self.theme,
            width: self.defaults.width,
            height: self.defaults.height,
        }
    }

    fn render(&mut self) {
        let ctx = self.render_context();
        self.dispatcher.render(&self.config, ctx);
    }

    fn rebind_if_stale(&mut self) {
        if self.binder.is_stale(&self.controls) {
            self.binder.bind(&self.controls);
        }
    }

    /// Full rebuild of the per-series controls, then a fresh bind
    fn resynthesize(&mut self) {
        synthesize_series_controls(&mut self.controls, &self.config);
        synthesize_mixed_type_controls(&mut self.controls, &self.config);
        self.binder.bind(&self.controls);
    }

    /// Dispatch one UI event at time `now`.
    ///
    /// Unknown or absent controls are ignored. An invalid value is rejected
    /// before any listener runs.
    pub(crate) fn handle(&mut self, event: &UiEvent, now: Instant) -> Result<(), DashboardError> {
        self.tick(now);

        let key: ControlKey = match event.target.parse() {
            Ok(key) => key,
            Err(e) => {
                debug!(error = %e, "ignoring event");
                return Ok(());
            }
        };
        if !self.controls.contains(key) {
            debug!(control = %key, "ignoring event for absent control");
            return Ok(());
        }
        if let Some(value) = &event.value {
            self.controls.set_value(key, value)?;
            self.rebind_if_stale();
        }

        let Some(listener) = self.binder.listener(key, event.trigger) else {
            debug!(control = %key, trigger = ?event.trigger, "no listener");
            return Ok(());
        };
        debug!(control = %key, action = ?listener.action, "dispatch");
        self.run(listener.action)?;
        if listener.timing == Timing::Debounced {
            self.debouncer.start(now);
        }
        Ok(())
    }

    /// Run the debounced update if its deadline has passed
    pub(crate) fn tick(&mut self, now: Instant) -> bool {
        if self.debouncer.fire_due(now) {
            self.debounced_update();
            true
        } else {
            false
        }
    }

    /// Run any pending debounced update immediately
    pub(crate) fn flush(&mut self) -> bool {
        if self.debouncer.is_pending() {
            self.debouncer.cancel();
            self.debounced_update();
            true
        } else {
            false
        }
    }

    fn debounced_update(&mut self) {
        debug!("debounced update");
        self.apply_settings();
        self.render();
    }

    fn run(&mut self, action: Action) -> Result<(), DashboardError> {
        match action {
            Action::CommitSettings { rebuild } => {
                self.apply_settings();
                if rebuild {
                    self.resynthesize();
                }
                self.render();
            }
            Action::CommitColor(index) => {
                if let Some(color) = self.controls.card(index).and_then(|c| Rgba::from_hex(&c.color))
                    && let Some(series) = self.config.datasets.get_mut(index)
                {
                    series.set_color(color);
                    self.render();
                }
            }
            Action::SetAxisBinding(index) => {
                let right = self.controls.card(index).is_some_and(|c| c.right_axis);
                if let Some(series) = self.config.datasets.get_mut(index) {
                    series.axis = if right {
                        AxisBinding::Right
                    } else {
                        AxisBinding::Left
                    };
                }
            }
            Action::ChartTypeChanged => self.sync_chart_type(),
            Action::SetOrientation(orientation) => self.set_orientation(orientation),
            Action::Refresh => {}
            Action::AddSeries => {
                self.apply_settings();
                let color = random_color(&mut self.rng);
                let index = self.config.add_series(color);
                info!(index, color = %color.to_hex(), "added series");
                self.resynthesize();
                self.render();
            }
            Action::RemoveSeries => {
                if self.config.remove_last_series() {
                    info!(remaining = self.config.datasets.len(), "removed series");
                    self.resynthesize();
                    self.render();
                }
            }
            Action::ApplyPalette => self.apply_palette(),
            Action::SwapAxisTitles => {
                self.controls.swap_axis_titles();
                self.apply_settings();
                self.render();
            }
            Action::SetTheme(theme) => self.set_theme(theme),
            Action::Reset => self.reset(),
            Action::Export => {
                self.flush();
                self.export()?;
            }
        }
        Ok(())
    }

    /// Read every control into the model and fit series to the labels
    pub(crate) fn apply_settings(&mut self) {
        let globals = &self.controls.globals;
        self.config.set_labels(parse_labels(&globals.labels));

        for (index, series) in self.config.datasets.iter_mut().enumerate() {
            let Some(card) = self.controls.cards.get(index) else {
                continue;
            };
            if !card.name.is_empty() {
                series.label = card.name.clone();
            }
            if let Some(color) = Rgba::from_hex(&card.color) {
                series.set_color(color);
            }
            series.data = parse_delimited_numbers(&card.data);
            series.axis = if card.right_axis {
                AxisBinding::Right
            } else {
                AxisBinding::Left
            };
        }
        self.config.normalize_all();

        if !self.controls.mixed.hidden {
            for row in &self.controls.mixed.rows {
                if let Some(series) = self.config.datasets.get_mut(row.index) {
                    series.style.kind = Some(row.kind);
                    if let Some(line) = row.line {
                        series.style.marker = line.marker;
                        series.style.stroke_width = line.stroke_width;
                        series.style.area_fill = line.area_fill;
                    }
                }
            }
        }

        let view = &mut self.config.view;
        view.orientation = globals.orientation;
        view.chart_title = globals.chart_title.clone();
        view.x_axis_title = globals.x_axis_title.clone();
        view.y_axis_left_title = globals.y_axis_left_title.clone();
        view.y_axis_right_title = globals.y_axis_right_title.clone();
        view.single_series_index = self.controls.single_series.selected_index();
        view.donut_cutout_pct = globals.donut_cutout;
        view.pie_radius_pct = globals.pie_radius;
        view.area_opacity_pct = globals.area_opacity;
        view.hist_bins = globals.hist_bins;

        // names may have changed
        refresh_single_series_options(&mut self.controls.single_series, &self.config);
        for card in &mut self.controls.cards {
            if let Some(series) = self.config.datasets.get(card.index) {
                card.name = series.label.clone();
            }
        }

        if self.config.view.chart_type != self.controls.globals.chart_type {
            self.sync_chart_type();
        }
    }

    /// Adopt the chart type select: visibility and the mix panel follow it
    fn sync_chart_type(&mut self) {
        let chart_type = self.controls.globals.chart_type;
        self.config.view.chart_type = chart_type;
        self.controls.visible = compute_visibility(chart_type);
        synthesize_mixed_type_controls(&mut self.controls, &self.config);
        self.binder.bind(&self.controls);
        debug!(chart_type = %chart_type, "chart type synced");
    }

    /// Toggle orientation; cartesian charts swap x and left-y titles with it
    fn set_orientation(&mut self, orientation: Orientation) {
        if self.controls.globals.orientation == orientation {
            return;
        }
        self.controls.globals.orientation = orientation;
        if self.controls.globals.chart_type.is_cartesian() {
            self.controls.swap_axis_titles();
        }
    }

    /// Recolor every series from the selected palette
    pub(crate) fn apply_palette(&mut self) {
        self.apply_settings();
        let key = self.controls.globals.palette.clone();
        let (key, scheme) = match palette(&key) {
            Some(scheme) => (key, scheme),
            None => {
                warn!(palette = %key, "unknown palette, using default");
                let fallback = palette(DEFAULT_PALETTE).unwrap_or_default();
                (DEFAULT_PALETTE.to_string(), fallback)
            }
        };
        self.config.view.palette_key = key;
        self.config.apply_palette(&scheme);
        self.resynthesize();
        self.render();
    }

    pub(crate) fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.controls.globals.theme = theme;
        self.render();
    }

    /// Back to the seed state with default globals
    pub(crate) fn reset(&mut self) {
        self.debouncer.cancel();
        self.config = ChartConfig::seed(&self.defaults);
        self.theme = self.defaults.theme;
        self.controls = ControlTree::new(&self.config, &self.defaults);
        self.binder.bind(&self.controls);
        info!("dashboard reset");
        self.render();
    }

    /// Export the live surface with the export controls' settings
    pub(crate) fn export(&mut self) -> Result<PathBuf, ExportError> {
        let globals = &self.controls.globals;
        let settings = ExportSettings {
            format: globals.export_format,
            scale: globals.export_scale,
            background: globals
                .export_background
                .clone()
                .unwrap_or_else(|| self.theme.colors().background.to_string()),
        };
        if self.dispatcher.current().is_none() {
            self.render();
        }
        let ctx = self.render_context();
        let path = match self.dispatcher.current() {
            Some(output) => export_chart(output, &settings, ctx, &self.export_dir)?,
            None => {
                return Err(ExportError::NothingToExport(
                    "no chart has been drawn".to_string(),
                ));
            }
        };
        self.exports.push(path.clone());
        Ok(path)
    }
}
