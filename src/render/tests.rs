//! Unit tests for the per-type transforms and SVG layouts

use super::canvas::{CanvasBody, MarkKind};
use super::histogram::{bucketize, format_bin_edge};
use super::stream::{nice_domain, point_positions, stack_wiggle};
use super::treemap::{Rect, layout, squarify};
use super::*;
use crate::config::Defaults;
use crate::model::{AxisBinding, ChartConfig, MixKind, Orientation};

fn config_for(chart_type: ChartType) -> ChartConfig {
    let mut config = ChartConfig::seed(&Defaults::default());
    config.view.chart_type = chart_type;
    config
}

fn ctx() -> RenderContext {
    RenderContext {
        theme: Theme::Light,
        width: 800,
        height: 400,
    }
}

fn render(config: &ChartConfig) -> RenderOutput {
    Dispatcher::new().render(config, ctx()).clone()
}

fn cartesian(output: &RenderOutput) -> &canvas::CartesianSpec {
    match &output.surface {
        Surface::Canvas(spec) => match &spec.body {
            CanvasBody::Cartesian(c) => c,
            other => panic!("expected cartesian body, got {:?}", other),
        },
        other => panic!("expected canvas surface, got {:?}", other),
    }
}

#[test]
fn test_histogram_one_to_ten_in_five_bins() {
    let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
    let bins = bucketize(&values, 5);
    assert_eq!(bins.len(), 5);
    let total: usize = bins.iter().map(|b| b.count).sum();
    assert_eq!(total, 10, "every value lands in a bin");
    assert_eq!(bins[4].count, 2, "max value is clamped into the last bin");
    assert_eq!(bins[0].label, "1 - 2.8");
}

#[test]
fn test_histogram_flat_input_uses_unit_step() {
    let bins = bucketize(&[4.0, 4.0, 4.0], 3);
    assert_eq!(bins[0].count, 3);
    assert_eq!(bins[0].label, "4 - 5");
    assert_eq!(bins[2].label, "6 - 7");
}

#[test]
fn test_bin_edge_formatting() {
    assert_eq!(format_bin_edge(2.5), "2.5");
    assert_eq!(format_bin_edge(3.14159), "3.14");
    assert_eq!(format_bin_edge(1500.0), "1.50e+3");
    assert_eq!(format_bin_edge(0.001), "1.00e-3");
    assert_eq!(format_bin_edge(0.0), "0.00e+0");
}

#[test]
fn test_canvas_types_draw_on_canvas() {
    for t in ChartType::ALL {
        let output = render(&config_for(t));
        let is_canvas = matches!(output.surface, Surface::Canvas(_));
        assert_eq!(is_canvas, t.backend() == Backend::Canvas, "{}", t);
        assert!(!matches!(output.surface, Surface::Placeholder(_)), "{}", t);
    }
}

#[test]
fn test_right_axis_only_when_bound() {
    let mut config = config_for(ChartType::Bar);
    config.view.y_axis_right_title = "Revenue".to_string();
    let output = render(&config);
    let spec = cartesian(&output);
    assert!(!spec.right_axis);
    assert_eq!(spec.y_right_title, None);

    config.datasets[1].axis = AxisBinding::Right;
    let output = render(&config);
    let spec = cartesian(&output);
    assert!(spec.right_axis);
    assert_eq!(spec.y_right_title.as_deref(), Some("Revenue"));
}

#[test]
fn test_empty_axis_titles_hidden() {
    let mut config = config_for(ChartType::Line);
    config.view.x_axis_title = "Month".to_string();
    let output = render(&config);
    let spec = cartesian(&output);
    assert_eq!(spec.x_title.as_deref(), Some("Month"));
    assert_eq!(spec.y_left_title, None);
}

#[test]
fn test_area_fill_uses_opacity() {
    let mut config = config_for(ChartType::StackedArea);
    config.view.area_opacity_pct = 40;
    let output = render(&config);
    let spec = cartesian(&output);
    assert!(spec.stacked);
    match &spec.marks[0].kind {
        MarkKind::Line { area: Some(fill), .. } => {
            assert_eq!((fill.r, fill.g, fill.b), (255, 107, 107));
            assert!((fill.a - 0.4).abs() < 1e-9);
        }
        other => panic!("expected filled line, got {:?}", other),
    }
}

#[test]
fn test_bar_line_uses_alternating_kinds() {
    let mut config = config_for(ChartType::BarLine);
    config.datasets[0].style.kind = Some(MixKind::Line);
    config.datasets[1].style.kind = None;
    let output = render(&config);
    let spec = cartesian(&output);
    assert!(matches!(spec.marks[0].kind, MarkKind::Line { .. }));
    // index 1 alternates to line as well
    assert!(matches!(spec.marks[1].kind, MarkKind::Line { .. }));
    config.datasets[0].style.kind = None;
    let output = render(&config);
    assert_eq!(cartesian(&output).marks[0].kind, MarkKind::Bar);
}

#[test]
fn test_orientation_carried_to_cartesian_types() {
    let mut config = config_for(ChartType::Bar);
    config.view.orientation = Orientation::Horizontal;
    assert_eq!(cartesian(&render(&config)).orientation, Orientation::Horizontal);
    config.view.chart_type = ChartType::Histogram;
    assert_eq!(cartesian(&render(&config)).orientation, Orientation::Vertical);
}

#[test]
fn test_pie_uses_selected_series_and_palette() {
    let mut config = config_for(ChartType::Donut);
    config.view.single_series_index = 1;
    config.view.donut_cutout_pct = 50;
    config.view.pie_radius_pct = 80;
    let output = render(&config);
    assert_eq!(output.note.as_deref(), Some("Current series: Series 2"));
    let Surface::Canvas(spec) = &output.surface else {
        panic!("pie draws on canvas");
    };
    let CanvasBody::Pie(pie) = &spec.body else {
        panic!("expected pie body");
    };
    assert_eq!(pie.slices.len(), 5);
    assert_eq!(pie.slices[0].value, 7.0);
    assert_eq!(pie.slices[0].color.to_hex(), "#FF6B6B");
    assert_eq!(pie.outer_pct, 80.0);
    assert_eq!(pie.inner_pct, 40.0);
}

#[test]
fn test_pie_unknown_palette_falls_back_to_ramp() {
    let mut config = config_for(ChartType::Pie);
    config.view.palette_key = "nope".to_string();
    let output = render(&config);
    let Surface::Canvas(spec) = &output.surface else {
        panic!("pie draws on canvas");
    };
    let CanvasBody::Pie(pie) = &spec.body else {
        panic!("expected pie body");
    };
    assert_eq!(pie.inner_pct, 0.0, "plain pie has no cutout");
    assert_ne!(pie.slices[0].color, pie.slices[4].color);
}

#[test]
fn test_stale_single_series_index_clamps() {
    let mut config = config_for(ChartType::Histogram);
    config.view.single_series_index = 9;
    let output = render(&config);
    assert_eq!(output.note.as_deref(), Some("Current series: Series 1"));
}

#[test]
fn test_multi_series_types_have_no_note() {
    assert_eq!(render(&config_for(ChartType::Bar)).note, None);
    assert_eq!(render(&config_for(ChartType::Streamgraph)).note, None);
}

#[test]
fn test_render_failure_paints_placeholder() {
    let mut config = config_for(ChartType::Bar);
    config.datasets.clear();
    let mut dispatcher = Dispatcher::new();
    let output = dispatcher.render(&config, ctx());
    assert!(matches!(output.surface, Surface::Placeholder(_)));
    config.datasets = ChartConfig::seed(&Defaults::default()).datasets;
    let output = dispatcher.render(&config, ctx());
    assert!(matches!(output.surface, Surface::Canvas(_)), "recovers on next render");
    assert_eq!(dispatcher.render_count(), 2);
}

#[test]
fn test_render_replaces_previous_surface() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.render(&config_for(ChartType::Treemap), ctx());
    dispatcher.render(&config_for(ChartType::Bar), ctx());
    let current = dispatcher.current().expect("surface after render");
    assert_eq!(current.chart_type, ChartType::Bar);
    dispatcher.teardown();
    assert!(dispatcher.current().is_none());
}

#[test]
fn test_wiggle_keeps_layer_thickness() {
    let layers = vec![vec![1.0, 3.0, 2.0, 5.0], vec![2.0, 2.0, 4.0, 1.0], vec![3.0, 1.0, 1.0, 2.0]];
    let stacked = stack_wiggle(&layers);
    for (layer, spans) in layers.iter().zip(&stacked) {
        for (v, (y0, y1)) in layer.iter().zip(spans) {
            assert!((y1 - y0 - v).abs() < 1e-9, "layer thickness preserved");
        }
    }
    for j in 0..4 {
        for i in 1..3 {
            assert!((stacked[i][j].0 - stacked[i - 1][j].1).abs() < 1e-9, "layers touch");
        }
    }
    assert_eq!(stacked[0][0].0, 0.0, "baseline starts at zero");
}

#[test]
fn test_wiggle_constant_input_keeps_flat_baseline() {
    let layers = vec![vec![2.0; 4], vec![3.0; 4]];
    let stacked = stack_wiggle(&layers);
    for j in 0..4 {
        assert!(stacked[0][j].0.abs() < 1e-9);
    }
}

#[test]
fn test_nice_domain() {
    assert_eq!(nice_domain(0.13, 9.7), (0.0, 10.0));
    assert_eq!(nice_domain(-3.2, 47.0), (-5.0, 50.0));
    assert_eq!(nice_domain(2.0, 2.0), (2.0, 2.0));
}

#[test]
fn test_point_positions() {
    assert_eq!(point_positions(3, 40.0, 140.0), vec![40.0, 90.0, 140.0]);
    assert_eq!(point_positions(1, 0.0, 100.0), vec![50.0]);
}

#[test]
fn test_squarify_stays_in_bounds_and_is_proportional() {
    let area = Rect {
        x0: 0.0,
        y0: 0.0,
        x1: 600.0,
        y1: 400.0,
    };
    let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
    let total: f64 = values.iter().sum();
    let rects = squarify(&values, area);
    for (v, r) in values.iter().zip(&rects) {
        assert!(r.x0 >= -1e-9 && r.x1 <= 600.0 + 1e-9, "{:?}", r);
        assert!(r.y0 >= -1e-9 && r.y1 <= 400.0 + 1e-9, "{:?}", r);
        let expected = v / total * 600.0 * 400.0;
        assert!((r.width() * r.height() - expected).abs() < 1e-6, "area of {}", v);
    }
}

#[test]
fn test_treemap_layout_sorts_and_pads() {
    let items = vec![
        ("a".to_string(), 1.0),
        ("b".to_string(), 5.0),
        ("c".to_string(), 3.0),
    ];
    let tiles = layout(&items, 300.0, 200.0);
    let names: Vec<&str> = tiles.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c", "a"]);
    for tile in &tiles {
        assert!(tile.rect.x0 >= 3.0 - 1e-9 && tile.rect.y0 >= 3.0 - 1e-9);
        assert!(tile.rect.x1 <= 297.0 + 1e-9 && tile.rect.y1 <= 197.0 + 1e-9);
    }
}

#[test]
fn test_treemap_scene_has_no_title() {
    let mut config = config_for(ChartType::Treemap);
    config.view.x_axis_title = "ignored".to_string();
    let output = render(&config);
    let Surface::Svg(scene) = &output.surface else {
        panic!("treemap draws svg");
    };
    let texts: Vec<&str> = scene.texts().collect();
    assert_eq!(texts.len(), 5);
    assert!(texts.contains(&"Point 2: 19"));
    assert!(!texts.contains(&"My Chart"));
    assert!(!texts.contains(&"ignored"));
}

#[test]
fn test_streamgraph_scene_layers_and_labels() {
    let mut config = config_for(ChartType::Streamgraph);
    config.view.y_axis_left_title = "Volume".to_string();
    let output = render(&config);
    let Surface::Svg(scene) = &output.surface else {
        panic!("streamgraph draws svg");
    };
    let paths = scene
        .elements
        .iter()
        .filter(|e| matches!(e, svg::Element::Path { .. }))
        .count();
    assert_eq!(paths, 2);
    let texts: Vec<&str> = scene.texts().collect();
    assert!(texts.contains(&"My Chart"));
    assert!(texts.contains(&"Point 5"));
    assert!(texts.contains(&"Volume"));

    let markup = scene.to_svg_string(Some("#000000"), 2.0);
    assert!(markup.starts_with("<svg"));
    assert!(markup.contains(r#"width="1600""#));
    assert!(markup.contains(r##"<rect width="800" height="400" fill="#000000"/>"##));
}

#[test]
fn test_svg_text_is_escaped() {
    let mut scene = svg::SvgScene::new(10.0, 10.0);
    scene.push(svg::Element::Text {
        x: 1.0,
        y: 2.0,
        content: "a < b & \"c\"".to_string(),
        size: 12.0,
        fill: "#000".to_string(),
        anchor: svg::Anchor::Start,
        bold: false,
        rotate: None,
    });
    let markup = scene.to_svg_string(None, 1.0);
    assert!(markup.contains("a &lt; b &amp; &quot;c&quot;"));
}
