//! Render dispatch: one canvas description or SVG scene per chart type

pub(crate) mod canvas;
pub(crate) mod echarts;
pub(crate) mod histogram;
pub(crate) mod stream;
pub(crate) mod svg;
pub(crate) mod theme;
pub(crate) mod treemap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Backend, ChartConfig, ChartType};
use canvas::{CanvasSpec, build_canvas_spec};
use svg::SvgScene;
use theme::Theme;

#[derive(Debug, Error, PartialEq)]
pub(crate) enum RenderError {
    #[error("chart has no series")]
    NoSeries,
    #[error("chart has no labels")]
    NoLabels,
    #[error("'{0}' is not drawn by this backend")]
    WrongBackend(ChartType),
    #[error("{0}")]
    Backend(String),
}

/// Surface size and theme shared by every render
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RenderContext {
    pub(crate) theme: Theme,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// The one live drawing surface
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Surface {
    Canvas(CanvasSpec),
    Svg(SvgScene),
    /// Shown instead of a chart when rendering failed
    Placeholder(String),
}

impl Surface {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Surface::Canvas(_) => "canvas",
            Surface::Svg(_) => "svg",
            Surface::Placeholder(_) => "placeholder",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RenderOutput {
    pub(crate) chart_type: ChartType,
    pub(crate) surface: Surface,
    /// "Current series: ..." for single-series chart types
    pub(crate) note: Option<String>,
}

/// Owns the current surface and replaces it on every render
#[derive(Debug, Default)]
pub(crate) struct Dispatcher {
    current: Option<RenderOutput>,
    renders: u64,
}

impl Dispatcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn current(&self) -> Option<&RenderOutput> {
        self.current.as_ref()
    }

    /// Completed renders, placeholders included
    pub(crate) fn render_count(&self) -> u64 {
        self.renders
    }

    /// Drop the live surface
    pub(crate) fn teardown(&mut self) {
        if let Some(old) = self.current.take() {
            debug!(surface = old.surface.kind(), "tore down surface");
        }
    }

    /// Tear down the previous surface and draw `config` from scratch.
    ///
    /// A failure paints a placeholder; the dispatcher stays usable.
    pub(crate) fn render(&mut self, config: &ChartConfig, ctx: RenderContext) -> &RenderOutput {
        self.teardown();
        let chart_type = config.view.chart_type;
        let surface = match draw(config, ctx) {
            Ok(surface) => surface,
            Err(e) => {
                warn!(chart_type = %chart_type, error = %e, "render failed");
                Surface::Placeholder(format!("Unable to draw chart: {}", e))
            }
        };
        let note = chart_type
            .is_single_series()
            .then(|| config.selected_series().map(|s| format!("Current series: {}", s.label)))
            .flatten();
        self.renders += 1;
        debug!(chart_type = %chart_type, surface = surface.kind(), "rendered");
        self.current.insert(RenderOutput {
            chart_type,
            surface,
            note,
        })
    }
}

fn draw(config: &ChartConfig, ctx: RenderContext) -> Result<Surface, RenderError> {
    match config.view.chart_type.backend() {
        Backend::Canvas => build_canvas_spec(config, ctx.theme.colors()).map(Surface::Canvas),
        Backend::Svg => draw_svg(config, ctx).map(Surface::Svg),
    }
}

fn draw_svg(config: &ChartConfig, ctx: RenderContext) -> Result<SvgScene, RenderError> {
    if config.datasets.is_empty() {
        return Err(RenderError::NoSeries);
    }
    if config.labels.is_empty() {
        return Err(RenderError::NoLabels);
    }
    let (width, height) = (ctx.width as f64, ctx.height as f64);
    match config.view.chart_type {
        ChartType::Streamgraph => Ok(stream::streamgraph_scene(
            config,
            width,
            height,
            ctx.theme.colors(),
        )),
        ChartType::Treemap => Ok(treemap::treemap_scene(config, width, height)),
        other => Err(RenderError::WrongBackend(other)),
    }
}

#[cfg(test)]
mod tests;
