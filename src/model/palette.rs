//! Named color palettes

use super::color::Rgba;

pub(crate) const DEFAULT_PALETTE: &str = "bright";

/// Palette table: key and six hex colors
const PALETTES: [(&str, [&str; 6]); 7] = [
    (
        "bright",
        ["#FF6B6B", "#4ECDC4", "#FFD166", "#45B7D1", "#A78BFA", "#00C49A"],
    ),
    (
        "pastel",
        ["#FFC8A2", "#A0E7E5", "#B4F8C8", "#FBE7C6", "#C3B1E1", "#FFD6E0"],
    ),
    (
        "ocean",
        ["#004E92", "#00A8C5", "#70E1F5", "#28CC9E", "#045DE9", "#00C6FB"],
    ),
    (
        "sunset",
        ["#FF9A8B", "#FF6A88", "#FF99AC", "#F6D365", "#FDA085", "#F5576C"],
    ),
    (
        "mint",
        ["#00C9A7", "#92FE9D", "#00DBDE", "#4BE1EC", "#7EE8FA", "#E0FFB3"],
    ),
    (
        "warm",
        ["#E67E22", "#E74C3C", "#D35400", "#F39C12", "#C0392B", "#F1C40F"],
    ),
    (
        "cool",
        ["#2980B9", "#16A085", "#1ABC9C", "#2ECC71", "#3498DB", "#9B59B6"],
    ),
];

pub(crate) fn palette_keys() -> impl Iterator<Item = &'static str> {
    PALETTES.iter().map(|(key, _)| *key)
}

pub(crate) fn is_known(key: &str) -> bool {
    palette_keys().any(|k| k == key)
}

/// Colors of the palette named `key`, if any
pub(crate) fn palette(key: &str) -> Option<Vec<Rgba>> {
    PALETTES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, colors)| colors.iter().filter_map(|hex| Rgba::from_hex(hex)).collect())
}

/// `count` colors from a palette, cycling when it runs out
pub(crate) fn colors_for_count(scheme: &[Rgba], count: usize) -> Vec<Rgba> {
    if scheme.is_empty() {
        return Vec::new();
    }
    (0..count).map(|i| scheme[i % scheme.len()]).collect()
}
