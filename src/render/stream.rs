//! Streamgraph layout: wiggle-offset stacking, scales and smoothed areas

use std::fmt::Write;

use super::svg::{Anchor, Element, SvgScene, num};
use super::theme::ThemeColors;
use crate::model::ChartConfig;

/// Layer fill opacity
const LAYER_OPACITY: f64 = 0.85;
/// Catmull-Rom parameterization (0.5 is centripetal)
const CURVE_ALPHA: f64 = 0.5;
const EPSILON: f64 = 1e-12;

/// Lower and upper edge of one layer at one x position
pub(crate) type Span = (f64, f64);

/// Stack `layers[i][j]` (layer i, position j) with the wiggle offset.
///
/// Layers keep their given order. The baseline moves to minimize the
/// weighted change in slope between neighboring positions.
pub(crate) fn stack_wiggle(layers: &[Vec<f64>]) -> Vec<Vec<Span>> {
    let n = layers.len();
    let m = layers.first().map_or(0, |l| l.len());
    let mut stacked: Vec<Vec<Span>> = layers
        .iter()
        .map(|layer| (0..m).map(|j| (0.0, layer.get(j).copied().unwrap_or(0.0))).collect())
        .collect();
    if n == 0 || m == 0 {
        return stacked;
    }

    let mut y = 0.0;
    for j in 1..m {
        let (mut s1, mut s2) = (0.0, 0.0);
        for i in 0..n {
            let sij0 = stacked[i][j].1;
            let sij1 = stacked[i][j - 1].1;
            let mut s3 = (sij0 - sij1) / 2.0;
            for k in 0..i {
                s3 += stacked[k][j].1 - stacked[k][j - 1].1;
            }
            s1 += sij0;
            s2 += s3 * sij0;
        }
        stacked[0][j - 1].0 = y;
        stacked[0][j - 1].1 += y;
        if s1 != 0.0 {
            y -= s2 / s1;
        }
    }
    stacked[0][m - 1].0 = y;
    stacked[0][m - 1].1 += y;

    // Every later layer sits on the one below it
    for i in 1..n {
        for j in 0..m {
            let below = stacked[i - 1][j].1;
            stacked[i][j].0 = below;
            stacked[i][j].1 += below;
        }
    }
    stacked
}

/// Evenly spaced positions for `count` points across [start, stop]
pub(crate) fn point_positions(count: usize, start: f64, stop: f64) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![(start + stop) / 2.0],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Extend a domain outward to round tick values
pub(crate) fn nice_domain(lo: f64, hi: f64) -> (f64, f64) {
    const COUNT: f64 = 10.0;
    let (mut start, mut stop) = if hi < lo { (hi, lo) } else { (lo, hi) };
    if !(start.is_finite() && stop.is_finite()) || start == stop {
        return (start, stop);
    }
    let mut prestep = f64::NAN;
    for _ in 0..10 {
        let step = tick_increment(start, stop, COUNT);
        if step == prestep {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = step;
    }
    (start, stop)
}

/// Linear map from a domain onto a range; a flat domain maps to the midpoint
#[derive(Clone, Copy, Debug)]
pub(crate) struct LinearScale {
    pub(crate) domain: (f64, f64),
    pub(crate) range: (f64, f64),
}

impl LinearScale {
    pub(crate) fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 != d0 { (v - d0) / (d1 - d0) } else { 0.5 };
        r0 + (r1 - r0) * t
    }
}

/// Centripetal Catmull-Rom through `points`, emitted as cubic Bezier segments
struct CatmullRom<'a> {
    out: &'a mut String,
    line: bool,
    point: u8,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    l01_a: f64,
    l12_a: f64,
    l23_a: f64,
    l01_2a: f64,
    l12_2a: f64,
    l23_2a: f64,
}

impl<'a> CatmullRom<'a> {
    /// `continued` joins the first point with a line instead of a move
    fn new(out: &'a mut String, continued: bool) -> Self {
        Self {
            out,
            line: continued,
            point: 0,
            x0: f64::NAN,
            y0: f64::NAN,
            x1: f64::NAN,
            y1: f64::NAN,
            x2: f64::NAN,
            y2: f64::NAN,
            l01_a: 0.0,
            l12_a: 0.0,
            l23_a: 0.0,
            l01_2a: 0.0,
            l12_2a: 0.0,
            l23_2a: 0.0,
        }
    }

    fn bezier_to(&mut self, x: f64, y: f64) {
        let (mut x1, mut y1, mut x2, mut y2) = (self.x1, self.y1, self.x2, self.y2);
        if self.l01_a > EPSILON {
            let a = 2.0 * self.l01_2a + 3.0 * self.l01_a * self.l12_a + self.l12_2a;
            let n = 3.0 * self.l01_a * (self.l01_a + self.l12_a);
            x1 = (x1 * a - self.x0 * self.l12_2a + self.x2 * self.l01_2a) / n;
            y1 = (y1 * a - self.y0 * self.l12_2a + self.y2 * self.l01_2a) / n;
        }
        if self.l23_a > EPSILON {
            let b = 2.0 * self.l23_2a + 3.0 * self.l23_a * self.l12_a + self.l12_2a;
            let m = 3.0 * self.l23_a * (self.l23_a + self.l12_a);
            x2 = (x2 * b + self.x1 * self.l23_2a - x * self.l12_2a) / m;
            y2 = (y2 * b + self.y1 * self.l23_2a - y * self.l12_2a) / m;
        }
        let _ = write!(
            self.out,
            "C{},{},{},{},{},{}",
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            num(self.x2),
            num(self.y2)
        );
    }

    fn push(&mut self, x: f64, y: f64) {
        if self.point > 0 {
            let (dx, dy) = (self.x2 - x, self.y2 - y);
            self.l23_2a = (dx * dx + dy * dy).powf(CURVE_ALPHA);
            self.l23_a = self.l23_2a.sqrt();
        }
        match self.point {
            0 => {
                self.point = 1;
                let cmd = if self.line { 'L' } else { 'M' };
                let _ = write!(self.out, "{}{},{}", cmd, num(x), num(y));
            }
            1 => self.point = 2,
            2 => {
                self.point = 3;
                self.bezier_to(x, y);
            }
            _ => self.bezier_to(x, y),
        }
        self.l01_a = self.l12_a;
        self.l12_a = self.l23_a;
        self.l01_2a = self.l12_2a;
        self.l12_2a = self.l23_2a;
        self.x0 = self.x1;
        self.x1 = self.x2;
        self.x2 = x;
        self.y0 = self.y1;
        self.y1 = self.y2;
        self.y2 = y;
    }

    fn finish(mut self) {
        match self.point {
            2 => {
                let _ = write!(self.out, "L{},{}", num(self.x2), num(self.y2));
            }
            3 => {
                let (x, y) = (self.x2, self.y2);
                self.push(x, y);
            }
            _ => {}
        }
    }
}

/// Closed area path: smoothed top edge forward, smoothed bottom edge back
pub(crate) fn area_path(xs: &[f64], spans: &[(f64, f64)]) -> String {
    let mut d = String::new();
    if xs.is_empty() {
        return d;
    }
    let mut top = CatmullRom::new(&mut d, false);
    for (x, (_, y1)) in xs.iter().zip(spans) {
        top.push(*x, *y1);
    }
    top.finish();
    let mut bottom = CatmullRom::new(&mut d, true);
    for (x, (y0, _)) in xs.iter().zip(spans).rev() {
        bottom.push(*x, *y0);
    }
    bottom.finish();
    d.push('Z');
    d
}

/// Draw every series as a wiggle-stacked streamgraph layer
pub(crate) fn streamgraph_scene(
    config: &ChartConfig,
    width: f64,
    height: f64,
    colors: ThemeColors,
) -> SvgScene {
    let labels = &config.labels;
    let layers: Vec<Vec<f64>> = config
        .datasets
        .iter()
        .map(|s| (0..labels.len()).map(|j| s.data.get(j).copied().unwrap_or(0.0)).collect())
        .collect();
    let stacked = stack_wiggle(&layers);

    let xs = point_positions(labels.len(), 40.0, width - 20.0);
    let lo = stacked
        .iter()
        .flat_map(|l| l.iter().map(|s| s.0))
        .fold(f64::INFINITY, f64::min);
    let hi = stacked
        .iter()
        .flat_map(|l| l.iter().map(|s| s.1))
        .fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if lo.is_finite() && hi.is_finite() { (lo, hi) } else { (0.0, 0.0) };
    let y = LinearScale {
        domain: nice_domain(lo, hi),
        range: (height - 30.0, 20.0),
    };

    let mut scene = SvgScene::new(width, height);
    for (series, layer) in config.datasets.iter().zip(&stacked) {
        let spans: Vec<(f64, f64)> = layer.iter().map(|(y0, y1)| (y.map(*y0), y.map(*y1))).collect();
        scene.push(Element::Path {
            d: area_path(&xs, &spans),
            fill: series.fill.to_hex(),
            opacity: LAYER_OPACITY,
        });
    }

    scene.push(Element::Text {
        x: 20.0,
        y: 24.0,
        content: config.view.chart_title.clone(),
        size: 16.0,
        fill: colors.text.to_string(),
        anchor: Anchor::Start,
        bold: true,
        rotate: None,
    });
    for (label, x) in labels.iter().zip(&xs) {
        scene.push(Element::Text {
            x: *x,
            y: height - 8.0,
            content: label.clone(),
            size: 12.0,
            fill: colors.text.to_string(),
            anchor: Anchor::Middle,
            bold: false,
            rotate: None,
        });
    }

    let view = &config.view;
    let axis_title = |x: f64, y: f64, text: &str, rotate: Option<f64>| Element::Text {
        x,
        y,
        content: text.to_string(),
        size: 16.0,
        fill: colors.text.to_string(),
        anchor: Anchor::Middle,
        bold: false,
        rotate,
    };
    if !view.x_axis_title.is_empty() {
        scene.push(axis_title(width / 2.0, height - 24.0, &view.x_axis_title, None));
    }
    if !view.y_axis_left_title.is_empty() {
        scene.push(axis_title(24.0, height / 2.0, &view.y_axis_left_title, Some(-90.0)));
    }
    if !view.y_axis_right_title.is_empty() {
        scene.push(axis_title(
            width - 24.0,
            height / 2.0,
            &view.y_axis_right_title,
            Some(90.0),
        ));
    }
    scene
}
