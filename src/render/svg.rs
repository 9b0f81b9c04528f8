//! Retained SVG primitives and their serialization

use std::fmt::Write;
use std::path::Path;

use resvg::{tiny_skia, usvg};

use super::RenderError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Anchor {
    Start,
    Middle,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Element {
    Path {
        d: String,
        fill: String,
        opacity: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
        stroke: Option<String>,
        radius: f64,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        size: f64,
        fill: String,
        anchor: Anchor,
        bold: bool,
        /// Rotation in degrees around (x, y)
        rotate: Option<f64>,
    },
}

/// A drawn SVG chart, kept as primitives until serialized
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SvgScene {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) elements: Vec<Element>,
}

impl SvgScene {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    #[cfg(test)]
    pub(crate) fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Serialize the scene. The output size is multiplied by `scale`; an
    /// optional background rect is inserted as the first child.
    pub(crate) fn to_svg_string(&self, background: Option<&str>, scale: f64) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            num(self.width * scale),
            num(self.height * scale),
            num(self.width),
            num(self.height)
        );
        if let Some(bg) = background {
            let _ = write!(
                out,
                r#"<rect width="{}" height="{}" fill="{}"/>"#,
                num(self.width),
                num(self.height),
                escape(bg)
            );
        }
        out.push_str("<g>");
        for element in &self.elements {
            write_element(&mut out, element);
        }
        out.push_str("</g></svg>");
        out
    }
}

/// Rasterize SVG markup into a PNG at the markup's own pixel size.
///
/// Returns the written width and height.
pub(crate) fn save_png(markup: &str, path: &Path) -> Result<(u32, u32), RenderError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(markup, &options)
        .map_err(|e| RenderError::Backend(format!("SVG parse failed: {}", e)))?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        RenderError::Backend(format!(
            "cannot allocate a {}x{} pixmap",
            size.width(),
            size.height()
        ))
    })?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap
        .save_png(path)
        .map_err(|e| RenderError::Backend(e.to_string()))?;
    Ok((size.width(), size.height()))
}

fn write_element(out: &mut String, element: &Element) {
    let _ = match element {
        Element::Path { d, fill, opacity } => write!(
            out,
            r#"<path d="{}" fill="{}" opacity="{}"/>"#,
            d,
            escape(fill),
            num(*opacity)
        ),
        Element::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            radius,
        } => {
            let stroke = stroke
                .as_deref()
                .map(|s| format!(r#" stroke="{}""#, escape(s)))
                .unwrap_or_default();
            write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{} rx="{}" ry="{}"/>"#,
                num(*x),
                num(*y),
                num(*width),
                num(*height),
                escape(fill),
                stroke,
                num(*radius),
                num(*radius)
            )
        }
        Element::Text {
            x,
            y,
            content,
            size,
            fill,
            anchor,
            bold,
            rotate,
        } => {
            let placement = match rotate {
                Some(deg) => format!(
                    r#"transform="translate({},{}) rotate({})""#,
                    num(*x),
                    num(*y),
                    num(*deg)
                ),
                None => format!(r#"x="{}" y="{}""#, num(*x), num(*y)),
            };
            let anchor = match anchor {
                Anchor::Start => "",
                Anchor::Middle => r#" text-anchor="middle""#,
            };
            let weight = if *bold { r#" font-weight="600""# } else { "" };
            write!(
                out,
                r#"<text {}{} fill="{}" font-size="{}"{}>{}</text>"#,
                placement,
                anchor,
                escape(fill),
                num(*size),
                weight,
                escape(content)
            )
        }
    };
}

/// Compact number formatting for attributes
pub(crate) fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
