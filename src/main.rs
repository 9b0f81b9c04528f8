mod binder;
mod config;
mod controls;
mod dashboard;
mod export;
mod model;
mod output;
mod render;
mod script;

use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::{DEFAULT_DEBOUNCE_MS, DEFAULT_HEIGHT, DEFAULT_WIDTH, Defaults, MAX_EXPORT_SCALE};
use dashboard::{Dashboard, DashboardError};
use export::ExportFormat;
use model::ChartType;
use model::color::Rgba;
use model::palette::{self, DEFAULT_PALETTE};
use output::{print_controls, print_error, print_summary, print_warning};
use render::theme::Theme;
use script::{Step, parse_script};

#[derive(Parser)]
#[command(
    name = "chartdesk",
    version,
    about = "Headless chart configuration dashboard with debounced re-rendering and PNG/SVG export",
    after_help = "Examples:
  chartdesk --script edits.txt                          Replay UI events, print the result
  chartdesk --chart-type pie --export                   Export the sample chart as PNG
  chartdesk --chart-type treemap --export --format svg  SVG export of an SVG chart type
  echo 'click add-dataset' | chartdesk --script -       Read events from stdin
  chartdesk --show-controls --chart-type bar-line       Dump the live control tree"
)]
struct Args {
    /// Event script to replay ('-' reads stdin)
    #[arg(short, long, value_name = "FILE")]
    script: Option<String>,

    /// Initial chart type
    #[arg(short = 't', long, value_enum, default_value = "bar")]
    chart_type: ChartType,

    /// Initial palette key
    #[arg(short, long, default_value = DEFAULT_PALETTE)]
    palette: String,

    /// Initial chart title
    #[arg(long, default_value = "My Chart")]
    title: String,

    /// Initial theme
    #[arg(long, value_enum, default_value = "light")]
    theme: Theme,

    /// Debounce window for sliders and selects
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS, value_name = "MS")]
    debounce_ms: u64,

    /// Surface width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,

    /// Export the final chart after the script has run
    #[arg(short, long)]
    export: bool,

    /// Export format
    #[arg(long, value_enum, default_value = "png")]
    format: ExportFormat,

    /// Export pixel ratio
    #[arg(long, default_value = "2")]
    scale: u32,

    /// Export background color, '#RRGGBB' or 'rgb(r,g,b)' [default: theme background]
    #[arg(long, value_name = "COLOR")]
    background: Option<String>,

    /// Directory that receives exported files
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    out_dir: PathBuf,

    /// Seed for new series colors
    #[arg(long)]
    seed: Option<u64>,

    /// Print the control tree after the run
    #[arg(long)]
    show_controls: bool,

    /// Suppress chart details (show series and exports only)
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "chartdesk=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(msg: &str) -> ! {
    print_error(msg);
    std::process::exit(1);
}

fn validate(args: &Args) {
    if !palette::is_known(&args.palette) {
        let known: Vec<&str> = palette::palette_keys().collect();
        fail(&format!(
            "Unknown palette '{}' (available: {})",
            args.palette,
            known.join(", ")
        ));
    }

    if args.width == 0 || args.height == 0 {
        fail("Width and height must be positive");
    }

    if !(1..=MAX_EXPORT_SCALE).contains(&args.scale) {
        fail(&format!("Scale must be between 1 and {}", MAX_EXPORT_SCALE));
    }

    if let Some(bg) = &args.background
        && Rgba::parse(bg).is_none()
    {
        fail(&format!(
            "Invalid background color '{}' (expected #RRGGBB)",
            bg
        ));
    }

    if args.export && !args.out_dir.is_dir() {
        fail(&format!(
            "Directory does not exist: {}",
            args.out_dir.display()
        ));
    }
}

fn defaults_from(args: &Args) -> Defaults {
    Defaults {
        chart_type: args.chart_type,
        chart_title: args.title.clone(),
        palette_key: args.palette.clone(),
        theme: args.theme,
        debounce: Duration::from_millis(args.debounce_ms),
        width: args.width,
        height: args.height,
        export_format: args.format,
        export_scale: args.scale,
        export_background: args
            .background
            .as_deref()
            .and_then(Rgba::parse)
            .map(Rgba::to_hex),
        ..Defaults::default()
    }
}

fn read_script(source: &str) -> Result<String, std::io::Error> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(source)
    }
}

/// Replay `steps` on a virtual clock; returns false if any export failed
fn run_steps(dashboard: &mut Dashboard, steps: &[Step]) -> bool {
    let mut clock = Instant::now();
    let mut ok = true;
    for step in steps {
        match step {
            Step::Wait(d) => {
                clock += *d;
                if dashboard.tick(clock) {
                    debug!("debounced render after wait");
                }
            }
            Step::Event(event) => match dashboard.handle(event, clock) {
                Ok(()) => {}
                Err(DashboardError::Control(e)) => print_warning(&e.to_string()),
                Err(e @ DashboardError::Export(_)) => {
                    print_error(&e.to_string());
                    ok = false;
                }
            },
        }
    }
    if dashboard.has_pending_update() {
        debug!("flushing trailing edits");
        dashboard.flush();
    }
    ok
}

fn main() {
    let args = Args::parse();

    // Handle --no-color
    if args.no_color {
        colored::control::set_override(false);
    }

    init_logging(args.verbose);
    validate(&args);

    let steps = match &args.script {
        Some(source) => {
            let text = read_script(source)
                .unwrap_or_else(|e| fail(&format!("Cannot read script '{}': {}", source, e)));
            parse_script(&text).unwrap_or_else(|e| fail(&e.to_string()))
        }
        None => Vec::new(),
    };

    let mut dashboard = Dashboard::new(defaults_from(&args), args.seed, &args.out_dir);
    let mut ok = run_steps(&mut dashboard, &steps);

    if args.export
        && let Err(e) = dashboard.export()
    {
        print_error(&e.to_string());
        ok = false;
    }

    if args.show_controls {
        print_controls(dashboard.controls());
    }
    print_summary(&dashboard, args.quiet);

    if !ok {
        std::process::exit(1);
    }
}
