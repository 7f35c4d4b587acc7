//! Terminal styling and capability detection.
//!
//! Colour is on by default and disabled by `NO_COLOR` or `TERM=dumb`.
//! Unicode glyphs are only used when the locale advertises UTF-8.

/// ANSI escape codes used by the route renderer.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    /// Bold reverse green badge for the starting star.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    /// Bold reverse yellow badge for intermediate jumps.
    pub const TAG_JUMP: &str = "\x1b[1;7;33m";
    /// Bold reverse magenta badge for the destination.
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";

    /// Bright bold white for star names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for identifiers and tree lines.
    pub const GRAY: &str = "\x1b[90m";
    /// Green for jump distances.
    pub const GREEN: &str = "\x1b[32m";
    /// Cyan for totals.
    pub const CYAN: &str = "\x1b[36m";
}

/// Resolved colour codes, or empty strings when colour is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_jump: &'static str,
    pub tag_goal: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub cyan: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_jump: colors::TAG_JUMP,
            tag_goal: colors::TAG_GOAL,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            cyan: colors::CYAN,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_jump: "",
            tag_goal: "",
            white_bold: "",
            gray: "",
            green: "",
            cyan: "",
        }
    }

    /// Pick a palette from the current environment.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Whether ANSI colour should be emitted.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Whether the locale advertises UTF-8 via `LC_ALL` or `LANG`.
#[must_use]
pub fn supports_unicode() -> bool {
    ["LC_ALL", "LANG"].iter().any(|key| {
        std::env::var(key)
            .map(|value| value.to_uppercase().contains("UTF"))
            .unwrap_or(false)
    })
}

/// Distance in light-years with thousands separators, e.g. `1,234.57 ly`.
#[must_use]
pub fn format_light_years(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value} ly");
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction} ly")
}
