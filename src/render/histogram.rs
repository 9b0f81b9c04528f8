//! Equal-width binning for the histogram chart

/// One histogram bucket
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Bin {
    pub(crate) label: String,
    pub(crate) count: usize,
}

/// Bucket `values` into `bins` equal-width bins spanning [min, max].
///
/// A zero-width range uses a step of 1. The maximum value lands in the last bin.
pub(crate) fn bucketize(values: &[f64], bins: u32) -> Vec<Bin> {
    let bins = bins.max(1) as usize;
    let finite: Vec<f64> = values
        .iter()
        .map(|&v| if v.is_finite() { v } else { 0.0 })
        .collect();
    let (min, max) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let (min, max) = if finite.is_empty() { (0.0, 0.0) } else { (min, max) };

    let mut step = (max - min) / bins as f64;
    if step == 0.0 || !step.is_finite() {
        step = 1.0;
    }

    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = ((v - min) / step).floor();
        let idx = if idx.is_finite() { idx.max(0.0) as usize } else { 0 };
        counts[idx.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let a = min + i as f64 * step;
            let b = a + step;
            Bin {
                label: format!("{} - {}", format_bin_edge(a), format_bin_edge(b)),
                count,
            }
        })
        .collect()
}

/// Exponent form for large or tiny magnitudes, otherwise up to 2 decimals
pub(crate) fn format_bin_edge(n: f64) -> String {
    let abs = n.abs();
    if abs >= 1000.0 || abs < 0.01 {
        return exponential(n);
    }
    let fixed = format!("{:.2}", n);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `1.50e+3` style: two mantissa decimals and a signed exponent
fn exponential(n: f64) -> String {
    let raw = format!("{:.2e}", n);
    match raw.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => raw,
    }
}
