//! Color normalization.
//!
//! Every color is reduced to lower-case `#rrggbb` before it is compared or
//! written, so `#FF0000`, `red` and `rgb(255, 0, 0)` all agree.

use peniko::color::{Srgb, parse_color};

/// Display value for a color control with no single color to show.
pub const NEUTRAL_COLOR: &str = "#000000";

/// Canonical lower-case `#rrggbb` form of a CSS color.
///
/// Returns `None` for strings that are not colors (including `none`).
/// Alpha is dropped since color inputs cannot show it.
pub fn normalize_color(value: &str) -> Option<String> {
    let parsed = parse_color(value.trim()).ok()?;
    let rgba = parsed.to_alpha_color::<Srgb>().to_rgba8();
    Some(format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b))
}
