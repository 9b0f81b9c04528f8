//! Squarified treemap layout for one series

use super::svg::{Anchor, Element, SvgScene};
use crate::model::ChartConfig;
use crate::model::parse::format_number;

/// Gap around and between tiles
const PADDING: f64 = 3.0;
const TILE_RADIUS: f64 = 6.0;
const LABEL_SIZE: f64 = 12.0;
/// Rough advance of one label glyph, used to clip long labels
const GLYPH_WIDTH: f64 = 7.0;
const LABEL_COLOR: &str = "#222233";

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rect {
    pub(crate) x0: f64,
    pub(crate) y0: f64,
    pub(crate) x1: f64,
    pub(crate) y1: f64,
}

impl Rect {
    pub(crate) fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    pub(crate) fn height(&self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Move every edge inward by `p`, collapsing to the center if it inverts
    fn inset(self, p: f64) -> Self {
        let (mut x0, mut y0, mut x1, mut y1) = (self.x0 + p, self.y0 + p, self.x1 - p, self.y1 - p);
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }
        Rect { x0, y0, x1, y1 }
    }
}

/// One laid-out leaf
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Tile {
    pub(crate) name: String,
    pub(crate) value: f64,
    pub(crate) rect: Rect,
}

/// Lay out sorted `values` inside `area` as rows of near-square tiles.
///
/// `values` must already be sorted largest first.
pub(crate) fn squarify(values: &[f64], area: Rect) -> Vec<Rect> {
    let ratio = (1.0 + 5f64.sqrt()) / 2.0;
    let n = values.len();
    let mut out = vec![
        Rect {
            x0: area.x0,
            y0: area.y0,
            x1: area.x0,
            y1: area.y0,
        };
        n
    ];
    let mut remaining: f64 = values.iter().sum();
    if n == 0 || remaining <= 0.0 {
        return out;
    }

    let (mut x0, mut y0, mut x1, mut y1) = (area.x0, area.y0, area.x1, area.y1);
    let (mut i0, mut i1) = (0, 0);
    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // First non-empty value opens the row
        let mut sum;
        loop {
            sum = values[i1];
            i1 += 1;
            if sum != 0.0 || i1 >= n {
                break;
            }
        }
        let (mut min_value, mut max_value) = (sum, sum);
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let beta = sum * sum * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        // Grow the row while the worst aspect ratio does not get worse
        while i1 < n {
            let v = values[i1];
            sum += v;
            min_value = min_value.min(v);
            max_value = max_value.max(v);
            let beta = sum * sum * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum -= v;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &values[i0..i1];
        if dx < dy {
            // dice: row spans the width, stacked downward
            let ry1 = if remaining > 0.0 { y0 + dy * sum / remaining } else { y1 };
            let k = if sum > 0.0 { (x1 - x0) / sum } else { 0.0 };
            let mut x = x0;
            for (offset, v) in row.iter().enumerate() {
                let next = x + v * k;
                out[i0 + offset] = Rect { x0: x, y0, x1: next, y1: ry1 };
                x = next;
            }
            y0 = ry1;
        } else {
            // slice: row spans the height, stacked rightward
            let rx1 = if remaining > 0.0 { x0 + dx * sum / remaining } else { x1 };
            let k = if sum > 0.0 { (y1 - y0) / sum } else { 0.0 };
            let mut y = y0;
            for (offset, v) in row.iter().enumerate() {
                let next = y + v * k;
                out[i0 + offset] = Rect { x0, y0: y, x1: rx1, y1: next };
                y = next;
            }
            x0 = rx1;
        }
        remaining -= sum;
        i0 = i1;
    }
    out
}

/// Tiles for `(name, value)` pairs in a `width x height` box, largest first
pub(crate) fn layout(items: &[(String, f64)], width: f64, height: f64) -> Vec<Tile> {
    let mut sorted: Vec<(String, f64)> = items.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));

    // outer padding, then half the inner gap on each side of every tile
    let half = PADDING / 2.0;
    let region = Rect {
        x0: PADDING - half,
        y0: PADDING - half,
        x1: width - PADDING + half,
        y1: height - PADDING + half,
    };
    let values: Vec<f64> = sorted.iter().map(|(_, v)| *v).collect();
    let rects = squarify(&values, region);

    sorted
        .into_iter()
        .zip(rects)
        .map(|((name, value), rect)| Tile {
            name,
            value,
            rect: rect.inset(half),
        })
        .collect()
}

/// Cut `text` with an ellipsis so it fits `max_width`
fn clip_label(text: &str, max_width: f64) -> String {
    let fits = (max_width / GLYPH_WIDTH).floor().max(0.0) as usize;
    if text.chars().count() <= fits {
        return text.to_string();
    }
    let kept: String = text.chars().take(fits.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Draw the selected series as a treemap: no title and no axis titles
pub(crate) fn treemap_scene(config: &ChartConfig, width: f64, height: f64) -> SvgScene {
    let mut scene = SvgScene::new(width, height);
    let Some(series) = config.selected_series() else {
        return scene;
    };
    let items: Vec<(String, f64)> = config
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.clone(), series.data.get(i).copied().unwrap_or(0.0)))
        .collect();

    let base = series.fill.with_alpha(1.0);
    let (light, dark) = (base.brighter(1.5), base.darker(0.5));
    let peak = items.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let peak = if peak > 0.0 { peak } else { 1.0 };

    for tile in layout(&items, width, height) {
        let rect = tile.rect;
        scene.push(Element::Rect {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            fill: light.lerp(dark, tile.value / peak).to_hex(),
            stroke: Some("#FFFFFF".to_string()),
            radius: TILE_RADIUS,
        });
        let label = format!("{}: {}", tile.name, format_number(tile.value));
        scene.push(Element::Text {
            x: rect.x0 + 8.0,
            y: rect.y0 + 20.0,
            content: clip_label(&label, rect.width() - 12.0),
            size: LABEL_SIZE,
            fill: LABEL_COLOR.to_string(),
            anchor: Anchor::Start,
            bold: true,
            rotate: None,
        });
    }
    scene
}
