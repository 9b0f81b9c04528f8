//! Unit tests for the chart model

use super::color::{Rgba, segment_ramp};
use super::palette::{colors_for_count, palette};
use super::parse::{format_numbers, parse_delimited_numbers, parse_labels};
use super::*;
use crate::config::Defaults;

fn seeded() -> ChartConfig {
    ChartConfig::seed(&Defaults::default())
}

#[test]
fn test_normalize_pads_and_truncates() {
    let data = [1.0, 2.0, 3.0];
    for target in 0..6 {
        let out = normalize_series_length(&data, target);
        assert_eq!(out.len(), target, "length should match target {}", target);
        let kept = target.min(data.len());
        assert_eq!(&out[..kept], &data[..kept]);
        assert!(out[kept..].iter().all(|&v| v == 0.0));
    }
}

#[test]
fn test_normalize_coerces_negative_and_non_finite() {
    let out = normalize_series_length(&[-4.0, f64::NAN, f64::INFINITY, 2.5], 4);
    assert_eq!(out, vec![0.0, 0.0, 0.0, 2.5]);
}

#[test]
fn test_parse_mixed_commas_and_garbage() {
    let out = parse_delimited_numbers("1, abc, 3\u{FF0C}4");
    assert_eq!(out, vec![1.0, 0.0, 3.0, 4.0]);
}

#[test]
fn test_parse_never_returns_non_finite() {
    let out = parse_delimited_numbers("inf, NaN, -infinity, 1e400, , 7");
    assert_eq!(out.len(), 6);
    assert!(out.iter().all(|v| v.is_finite()));
    assert_eq!(out[5], 7.0);
}

#[test]
fn test_parse_empty_text() {
    assert_eq!(parse_delimited_numbers(""), vec![0.0]);
}

#[test]
fn test_parse_labels_drops_empty() {
    let labels = parse_labels(" Q1, ,Q2\u{FF0C} Q3 ,");
    assert_eq!(labels, vec!["Q1", "Q2", "Q3"]);
}

#[test]
fn test_format_numbers_round_trip_text() {
    assert_eq!(format_numbers(&[12.0, 2.5, 0.0]), "12, 2.5, 0");
}

#[test]
fn test_remove_last_series_keeps_one() {
    let mut config = seeded();
    assert!(config.remove_last_series());
    assert_eq!(config.datasets.len(), 1);
    assert!(!config.remove_last_series(), "removing the only series is a no-op");
    assert_eq!(config.datasets.len(), 1);
}

#[test]
fn test_add_then_remove_restores_datasets() {
    let mut config = seeded();
    let before = config.datasets.clone();
    let idx = config.add_series(Rgba::opaque(1, 2, 3));
    assert_eq!(idx, 2);
    assert_eq!(config.datasets[idx].data, vec![0.0; config.labels.len()]);
    assert_eq!(config.datasets[idx].axis, AxisBinding::Left);
    assert!(config.remove_last_series());
    assert_eq!(config.datasets, before);
}

#[test]
fn test_single_series_index_clamps() {
    let mut config = seeded();
    config.view.single_series_index = 1;
    assert_eq!(config.resolve_single_series_index(), 1);
    config.remove_last_series();
    assert_eq!(config.resolve_single_series_index(), 0);
}

#[test]
fn test_single_series_survives_type_round_trip() {
    let mut config = seeded();
    config.view.single_series_index = 1;
    config.view.chart_type = ChartType::Pie;
    config.view.chart_type = ChartType::Bar;
    assert_eq!(config.resolve_single_series_index(), 1);
}

#[test]
fn test_resolve_axis_binding_out_of_range() {
    let mut config = seeded();
    config.datasets[1].axis = AxisBinding::Right;
    assert_eq!(config.resolve_axis_binding(1), AxisBinding::Right);
    assert_eq!(config.resolve_axis_binding(9), AxisBinding::Left);
    assert!(config.has_right_axis());
}

#[test]
fn test_set_labels_ignores_empty() {
    let mut config = seeded();
    config.set_labels(Vec::new());
    assert_eq!(config.labels.len(), 5);
    config.set_labels(vec!["a".into(), "b".into()]);
    config.normalize_all();
    assert!(config.datasets.iter().all(|s| s.data.len() == 2));
    assert_eq!(config.datasets[0].data, vec![12.0, 19.0]);
}

#[test]
fn test_chart_type_keys_round_trip() {
    for t in ChartType::ALL {
        assert_eq!(t.key().parse::<ChartType>(), Ok(t));
    }
    assert!("scatter".parse::<ChartType>().is_err());
}

#[test]
fn test_hex_parsing() {
    assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::opaque(255, 255, 255)));
    assert_eq!(Rgba::from_hex("#4ECDC4"), Some(Rgba::opaque(78, 205, 196)));
    assert_eq!(Rgba::from_hex("4ECDC4"), None);
    assert_eq!(Rgba::from_hex("#12345"), None);
    assert_eq!(Rgba::opaque(255, 107, 107).to_hex(), "#FF6B6B");
}

#[test]
fn test_rgba_parsing() {
    let c = Rgba::parse("rgba(255, 107, 107, 0.7)").unwrap();
    assert_eq!((c.r, c.g, c.b), (255, 107, 107));
    assert!((c.a - 0.7).abs() < 1e-9);
    assert_eq!(Rgba::parse("rgb(1,2,3)"), Some(Rgba::opaque(1, 2, 3)));
    assert_eq!(Rgba::parse("hsl(1,2,3)"), None);
}

#[test]
fn test_set_color_derives_fill_and_stroke() {
    let mut series = Series::new("s", vec![], Rgba::opaque(0, 0, 0));
    series.set_color(Rgba::opaque(10, 20, 30));
    assert_eq!(series.stroke, Rgba::opaque(10, 20, 30));
    assert_eq!(series.fill.to_hex(), "#0A141E");
    assert!((series.fill.a - 0.7).abs() < 1e-9);
}

#[test]
fn test_brighter_and_darker() {
    let base = Rgba::opaque(100, 100, 100);
    assert_eq!(base.darker(1.0), Rgba::opaque(70, 70, 70));
    assert_eq!(base.brighter(1.0), Rgba::opaque(143, 143, 143));
    assert_eq!(Rgba::opaque(250, 0, 0).brighter(2.0).r, 255, "channels clamp");
}

#[test]
fn test_segment_ramp_runs_bright_to_dark() {
    let base = Rgba::opaque(100, 150, 200);
    let ramp = segment_ramp(base, 4);
    assert_eq!(ramp.len(), 4);
    assert_eq!(ramp[0], base.brighter(1.2));
    assert_eq!(ramp[3], base.darker(0.5));
    assert_eq!(segment_ramp(base, 1).len(), 1);
}

#[test]
fn test_palette_cycles() {
    let scheme = palette("bright").unwrap();
    assert_eq!(scheme.len(), 6);
    let colors = colors_for_count(&scheme, 8);
    assert_eq!(colors[6], scheme[0]);
    assert_eq!(colors[7], scheme[1]);
    assert!(palette("nope").is_none());
}

#[test]
fn test_apply_palette_recolors_in_order() {
    let mut config = seeded();
    let scheme = palette("ocean").unwrap();
    config.apply_palette(&scheme);
    assert_eq!(config.datasets[0].stroke, scheme[0]);
    assert_eq!(config.datasets[1].stroke, scheme[1]);
}
