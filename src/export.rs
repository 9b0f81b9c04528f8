//! Image export for the current surface

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;
use clap::ValueEnum;
use thiserror::Error;
use tracing::info;

use crate::render::echarts::{save_png, save_svg, to_chart};
use crate::render::svg;
use crate::render::{RenderContext, RenderError, RenderOutput, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum ExportFormat {
    #[default]
    Png,
    Svg,
}

impl ExportFormat {
    pub(crate) fn key(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// Values read from the export controls at click time
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ExportSettings {
    pub(crate) format: ExportFormat,
    pub(crate) scale: u32,
    pub(crate) background: String,
}

#[derive(Debug, Error)]
pub(crate) enum ExportError {
    #[error("{width}x{height} at {scale}x is too large to export")]
    TooLarge { width: u32, height: u32, scale: u32 },
    #[error("nothing to export: {0}")]
    NothingToExport(String),
    #[error("output directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// `chart-<timestamp>@<scale>x.png` or `chart-<timestamp>.svg`
pub(crate) fn export_file_name(format: ExportFormat, scale: u32) -> String {
    let stamp = Local::now().format("%Y%m%d-%H%M%S%3f");
    match format {
        ExportFormat::Png => format!("chart-{}@{}x.png", stamp, scale),
        ExportFormat::Svg => format!("chart-{}.svg", stamp),
    }
}

/// Write the current surface into `dir`; returns the written file
pub(crate) fn export_chart(
    output: &RenderOutput,
    settings: &ExportSettings,
    ctx: RenderContext,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    if !dir.is_dir() {
        return Err(ExportError::MissingDirectory(dir.to_path_buf()));
    }
    let scale = settings.scale.max(1);
    let (width, height) = match (ctx.width.checked_mul(scale), ctx.height.checked_mul(scale)) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            return Err(ExportError::TooLarge {
                width: ctx.width,
                height: ctx.height,
                scale,
            });
        }
    };
    let path = dir.join(export_file_name(settings.format, scale));

    match (&output.surface, settings.format) {
        (Surface::Placeholder(reason), _) => {
            return Err(ExportError::NothingToExport(reason.clone()));
        }
        (Surface::Canvas(spec), format) => {
            let chart = to_chart(spec, &settings.background);
            match format {
                ExportFormat::Png => save_png(&chart, width, height, &path)?,
                ExportFormat::Svg => save_svg(&chart, width, height, &path)?,
            }
        }
        (Surface::Svg(scene), format) => {
            let markup = scene.to_svg_string(Some(&settings.background), scale as f64);
            match format {
                ExportFormat::Png => {
                    svg::save_png(&markup, &path)?;
                }
                ExportFormat::Svg => {
                    std::fs::write(&path, markup).map_err(|source| ExportError::Write {
                        path: path.clone(),
                        source,
                    })?;
                }
            }
        }
    }

    info!(path = %path.display(), format = %settings.format, scale, "exported chart");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::config::Defaults;
    use crate::model::{ChartConfig, ChartType};
    use crate::render::Dispatcher;
    use crate::render::theme::Theme;

    fn ctx() -> RenderContext {
        RenderContext {
            theme: Theme::Light,
            width: 400,
            height: 300,
        }
    }

    fn rendered(chart_type: ChartType) -> RenderOutput {
        let mut config = ChartConfig::seed(&Defaults::default());
        config.view.chart_type = chart_type;
        Dispatcher::new().render(&config, ctx()).clone()
    }

    fn settings(format: ExportFormat) -> ExportSettings {
        ExportSettings {
            format,
            scale: 2,
            background: "#FAFAFA".to_string(),
        }
    }

    #[test]
    fn test_file_names() {
        let png = export_file_name(ExportFormat::Png, 3);
        assert!(png.starts_with("chart-"), "{}", png);
        assert!(png.ends_with("@3x.png"), "{}", png);
        let svg = export_file_name(ExportFormat::Svg, 3);
        assert!(svg.ends_with(".svg") && !svg.contains('@'), "{}", svg);
    }

    #[test]
    fn test_svg_scene_export_has_background_and_scale() {
        let dir = TempDir::new().unwrap();
        let path = export_chart(
            &rendered(ChartType::Treemap),
            &settings(ExportFormat::Svg),
            ctx(),
            dir.path(),
        )
        .unwrap();
        let markup = std::fs::read_to_string(&path).unwrap();
        assert!(markup.contains(r#"width="800" height="600""#));
        assert!(markup.contains(r##"fill="#FAFAFA""##));
    }

    /// Width and height from a PNG's IHDR chunk
    fn png_size(path: &Path) -> (u32, u32) {
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let be = |at: usize| u32::from_be_bytes(bytes[at..at + 4].try_into().unwrap());
        (be(16), be(20))
    }

    #[test]
    fn test_png_of_svg_scene_is_scaled() {
        let dir = TempDir::new().unwrap();
        let path = export_chart(
            &rendered(ChartType::Streamgraph),
            &settings(ExportFormat::Png),
            ctx(),
            dir.path(),
        )
        .unwrap();
        assert!(path.to_string_lossy().ends_with("@2x.png"));
        assert_eq!(png_size(&path), (800, 600));
    }

    #[test]
    fn test_treemap_png_at_scale_three() {
        let dir = TempDir::new().unwrap();
        let mut three = settings(ExportFormat::Png);
        three.scale = 3;
        let path = export_chart(&rendered(ChartType::Treemap), &three, ctx(), dir.path()).unwrap();
        assert_eq!(png_size(&path), (1200, 900));
    }

    #[test]
    fn test_oversized_export_is_refused() {
        let dir = TempDir::new().unwrap();
        let huge = RenderContext {
            width: u32::MAX / 2,
            ..ctx()
        };
        let err = export_chart(
            &rendered(ChartType::Treemap),
            &settings(ExportFormat::Svg),
            huge,
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::TooLarge { scale: 2, .. }), "{}", err);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_placeholder_is_not_exported() {
        let dir = TempDir::new().unwrap();
        let mut output = rendered(ChartType::Bar);
        output.surface = Surface::Placeholder("broken".to_string());
        let err = export_chart(&output, &settings(ExportFormat::Png), ctx(), dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport(_)));
    }

    #[test]
    fn test_missing_directory() {
        let err = export_chart(
            &rendered(ChartType::Treemap),
            &settings(ExportFormat::Svg),
            ctx(),
            Path::new("/nonexistent/chartdesk/out"),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::MissingDirectory(_)));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("svg".parse::<ExportFormat>(), Ok(ExportFormat::Svg));
        assert!("jpeg".parse::<ExportFormat>().is_err());
    }
}
