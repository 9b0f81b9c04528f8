//! Tolerant parsing of free-text control values

/// ASCII comma and the full-width comma (U+FF0C)
const DELIMITERS: [char; 2] = [',', '\u{FF0C}'];

/// Parse a comma-separated list of numbers.
///
/// Never fails: every piece that does not parse to a finite number becomes 0,
/// and an empty piece counts as 0. The edit loop relies on always getting a
/// usable sequence back.
pub(crate) fn parse_delimited_numbers(text: &str) -> Vec<f64> {
    text.split(DELIMITERS)
        .map(|piece| {
            let piece = piece.trim();
            if piece.is_empty() {
                return 0.0;
            }
            match piece.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => 0.0,
            }
        })
        .collect()
}

/// Parse a comma-separated label list, dropping empty entries
pub(crate) fn parse_labels(text: &str) -> Vec<String> {
    text.split(DELIMITERS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fit `data` to exactly `target` entries.
///
/// Truncates from the tail or right-pads with 0. Negative and non-finite
/// values are coerced to 0.
pub(crate) fn normalize_series_length(data: &[f64], target: usize) -> Vec<f64> {
    let mut out: Vec<f64> = data
        .iter()
        .take(target)
        .map(|&v| if v.is_finite() && v >= 0.0 { v } else { 0.0 })
        .collect();
    out.resize(target, 0.0);
    out
}

/// Render a data sequence back into the editable text form
pub(crate) fn format_numbers(data: &[f64]) -> String {
    data.iter()
        .map(|v| format_number(*v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shortest plain form of a number (`3` rather than `3.0`)
pub(crate) fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
