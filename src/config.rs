//! Startup defaults, folded from the command line

use std::time::Duration;

use crate::export::ExportFormat;
use crate::model::ChartType;
use crate::model::palette::DEFAULT_PALETTE;
use crate::render::theme::Theme;

/// Default debounce window for high-frequency controls
pub(crate) const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Preview surface size in CSS pixels (export multiplies by scale)
pub(crate) const DEFAULT_WIDTH: u32 = 960;
pub(crate) const DEFAULT_HEIGHT: u32 = 540;

pub(crate) const MAX_EXPORT_SCALE: u32 = 8;

/// Initial values for every configurable knob.
///
/// These are configuration rather than contract; reset restores them.
#[derive(Clone, Debug)]
pub(crate) struct Defaults {
    pub(crate) chart_type: ChartType,
    pub(crate) chart_title: String,
    pub(crate) palette_key: String,
    pub(crate) theme: Theme,
    pub(crate) donut_cutout_pct: u32,
    pub(crate) pie_radius_pct: u32,
    pub(crate) area_opacity_pct: u32,
    pub(crate) hist_bins: u32,
    pub(crate) debounce: Duration,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) export_format: ExportFormat,
    pub(crate) export_scale: u32,
    /// `None` follows the active theme's background
    pub(crate) export_background: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            chart_type: ChartType::Bar,
            chart_title: "My Chart".to_string(),
            palette_key: DEFAULT_PALETTE.to_string(),
            theme: Theme::Light,
            donut_cutout_pct: 50,
            pie_radius_pct: 65,
            area_opacity_pct: 35,
            hist_bins: 10,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            export_format: ExportFormat::Png,
            export_scale: 2,
            export_background: None,
        }
    }
}
