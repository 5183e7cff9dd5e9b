//! Color option names to swatch hex values.
//!
//! Shopify color options are free-text names. The swatches need hex values,
//! so names are looked up in a static table; values that are already
//! `#RRGGBB` pass through untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Swatch used for names missing from the table (sunflower yellow).
pub const DEFAULT_SWATCH: &str = "#FFB300";

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern
    Regex::new(r"(?i)^#[0-9a-f]{6}$").unwrap()
});

const COLOR_TABLE: &[(&str, &str)] = &[
    // Common color names
    ("red", "#FF0000"),
    ("blue", "#0000FF"),
    ("green", "#00FF00"),
    ("yellow", "#FFFF00"),
    ("black", "#000000"),
    ("white", "#FFFFFF"),
    ("pink", "#FFC0CB"),
    ("purple", "#800080"),
    ("orange", "#FFA500"),
    ("brown", "#A52A2A"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("beige", "#F5F5DC"),
    ("navy", "#000080"),
    ("teal", "#008080"),
    ("maroon", "#800000"),
    ("olive", "#808000"),
    ("lime", "#00FF00"),
    ("aqua", "#00FFFF"),
    ("silver", "#C0C0C0"),
    ("gold", "#FFD700"),
    // Shop palette
    ("sunflower", "#FFB300"),
    ("golden", "#FFB300"),
    ("cream", "#FFF3E0"),
    ("amber", "#FFE082"),
    ("chocolate", "#8B4513"),
    ("honey", "#FFECB3"),
    ("mustard", "#FFC107"),
];

/// Whether `value` is a `#RRGGBB` color.
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Map a color option value to a swatch hex value.
#[must_use]
pub fn color_to_hex(name: &str) -> String {
    if is_hex_color(name) {
        return name.to_owned();
    }

    let normalized = name.trim().to_lowercase();
    COLOR_TABLE
        .iter()
        .find(|(known, _)| *known == normalized)
        .map_or(DEFAULT_SWATCH, |&(_, hex)| hex)
        .to_owned()
}
