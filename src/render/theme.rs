//! Light and dark color themes

use std::fmt;

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum Theme {
    #[default]
    Light,
    Dark,
}

/// Colors every backend draws chrome with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ThemeColors {
    pub(crate) background: &'static str,
    pub(crate) text: &'static str,
    /// Grid lines and axis strokes
    pub(crate) grid: &'static str,
}

const LIGHT: ThemeColors = ThemeColors {
    background: "#FFFFFF",
    text: "#333333",
    grid: "#E0E0E0",
};

const DARK: ThemeColors = ThemeColors {
    background: "#1E1E1E",
    text: "#EEEEEE",
    grid: "#505050",
};

impl Theme {
    pub(crate) fn key(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub(crate) fn colors(self) -> ThemeColors {
        match self {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
