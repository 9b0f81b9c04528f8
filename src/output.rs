use colored::*;

use crate::controls::{ControlGroups, ControlTree};
use crate::dashboard::Dashboard;
use crate::model::parse::format_numbers;
use crate::render::Surface;

pub(crate) fn print_error(msg: &str) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub(crate) fn print_warning(msg: &str) {
    eprintln!("{}: {}", "warning".yellow().bold(), msg);
}

fn on_off(visible: bool) -> ColoredString {
    if visible { "shown".green() } else { "hidden".dimmed() }
}

/// Dump every live control with its current value
pub(crate) fn print_controls(tree: &ControlTree) {
    println!("[Controls] (generation {})", tree.generation);
    for card in &tree.cards {
        println!(
            "  {} {:<12} {} right-axis={} data=[{}]",
            format!("#{}", card.index).bold(),
            card.name,
            card.color,
            card.right_axis,
            card.data
        );
    }

    let selected = tree.single_series.value.as_deref().unwrap_or("-");
    let options: Vec<&str> = tree
        .single_series
        .options
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    println!(
        "  single-series {:<7} value={} options=[{}]",
        on_off(tree.visible.contains(ControlGroups::SINGLE_SERIES)),
        selected,
        options.join(", ")
    );

    if tree.mixed.hidden {
        println!("  mixed-types   {}", on_off(false));
    } else {
        for row in &tree.mixed.rows {
            match row.line {
                Some(line) => println!(
                    "  mixed-type-{} {} marker={} width={} fill={}",
                    row.index,
                    row.kind.key(),
                    line.marker.key(),
                    line.stroke_width,
                    line.area_fill
                ),
                None => println!("  mixed-type-{} {}", row.index, row.kind.key()),
            }
        }
    }

    let groups = [
        ("orientation", ControlGroups::ORIENTATION),
        ("axis-titles", ControlGroups::AXIS_TITLES),
        ("donut-cutout", ControlGroups::DONUT_CUTOUT),
        ("pie-radius", ControlGroups::PIE_RADIUS),
        ("area-opacity", ControlGroups::AREA_OPACITY),
        ("hist-bins", ControlGroups::HIST_BINS),
    ];
    for (name, group) in groups {
        println!("  {:<13} {}", name, on_off(tree.visible.contains(group)));
    }
    println!();
}

/// Final state of the dashboard after a script run
pub(crate) fn print_summary(dashboard: &Dashboard, quiet: bool) {
    let config = dashboard.config();
    let view = &config.view;

    if !quiet {
        println!("[Chart]");
        println!("  Type:        {}", view.chart_type.to_string().bold());
        println!("  Title:       {}", view.chart_title);
        println!("  Orientation: {:?}", view.orientation);
        println!("  Palette:     {}", view.palette_key);
        println!("  Theme:       {}", dashboard.theme());
        println!("  Labels:      {}", config.labels.join(", "));
        println!();
    }

    println!("[Series]");
    for (i, series) in config.datasets.iter().enumerate() {
        println!(
            "  {:<12} {} {:?} [{}]",
            series.display_label(i),
            series.fill.to_hex(),
            config.resolve_axis_binding(i),
            format_numbers(&series.data)
        );
    }
    println!();

    println!("[Surface]");
    match dashboard.current() {
        Some(output) => {
            let kind = match &output.surface {
                Surface::Placeholder(reason) => format!("placeholder ({})", reason).yellow(),
                other => other.kind().normal(),
            };
            println!("  {} {}", output.chart_type, kind);
            if let Some(note) = &output.note {
                println!("  {}", note);
            }
        }
        None => println!("  none"),
    }
    if !quiet {
        println!("  Renders: {}", dashboard.render_count());
    }

    for path in dashboard.exports() {
        println!("Exported: {}", path.display());
    }
}
