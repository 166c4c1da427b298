//! Cell colors.
//!
//! Slot groups get a pastel header color from a fixed hue cycle so the three
//! columns of one allocation slot read as a unit. Everything else is a small
//! set of constant styles.

use crate::types::CellStyle;

/// Hue step between consecutive slot groups, in degrees. With a step of 120
/// the palette cycles every three slots.
const SLOT_HUE_STEP: u32 = 120;
const SLOT_SATURATION: f64 = 0.7;
const SLOT_LIGHTNESS: f64 = 0.9;

/// Read-only data cells.
pub const NON_EDITABLE_BACKGROUND: &str = "#fafafa";
pub const NON_EDITABLE_TEXT: &str = "#666";

/// Placeholder cells beyond an employee's own allocation count.
pub const DISABLED_BACKGROUND: &str = "#f5f5f5";
pub const DISABLED_TEXT: &str = "#999";
pub const DISABLED_BORDER: &str = "#e0e0e0";

/// Total cell when the allocations sum to exactly 100.
pub const COMPLETE_BACKGROUND: &str = "#f6ffed";
pub const COMPLETE_TEXT: &str = "#389e0d";

/// Total cell for any other sum.
pub const INCOMPLETE_BACKGROUND: &str = "#fff1f0";
pub const INCOMPLETE_TEXT: &str = "#cf1322";

/// Header background for slot group `slot` as `#RRGGBB`.
pub fn slot_group_color(slot: usize) -> String {
    let step = u64::from(SLOT_HUE_STEP);
    let hue = (slot as u64).wrapping_mul(step) % 360;
    #[allow(clippy::cast_precision_loss)]
    let h = hue as f64 / 360.0;
    let (r, g, b) = hsl_to_rgb(h, SLOT_SATURATION, SLOT_LIGHTNESS);
    format!("#{r:02X}{g:02X}{b:02X}")
}

pub fn slot_header_style(slot: usize) -> CellStyle {
    CellStyle::background(slot_group_color(slot))
}

pub fn non_editable_style() -> CellStyle {
    CellStyle {
        background_color: Some(NON_EDITABLE_BACKGROUND.to_string()),
        color: Some(NON_EDITABLE_TEXT.to_string()),
        border_color: None,
    }
}

pub fn disabled_style() -> CellStyle {
    CellStyle {
        background_color: Some(DISABLED_BACKGROUND.to_string()),
        color: Some(DISABLED_TEXT.to_string()),
        border_color: Some(DISABLED_BORDER.to_string()),
    }
}

pub fn total_style(complete: bool) -> CellStyle {
    let (background, text) = if complete {
        (COMPLETE_BACKGROUND, COMPLETE_TEXT)
    } else {
        (INCOMPLETE_BACKGROUND, INCOMPLETE_TEXT)
    };
    CellStyle {
        background_color: Some(background.to_string()),
        color: Some(text.to_string()),
        border_color: None,
    }
}

/// Convert HSL to RGB
#[allow(clippy::many_single_char_names)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    if s.abs() < f64::EPSILON {
        let v = (l * 255.0).round() as u8;
        return (v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l.mul_add(-s, l + s)
    };
    let p = 2.0f64.mul_add(l, -q);

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    (
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        return ((q - p) * 6.0).mul_add(t, p);
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return ((q - p) * (2.0 / 3.0 - t)).mul_add(6.0, p);
    }
    p
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_palette_first_cycle() {
        assert_eq!(slot_group_color(0), "#F7D4D4");
        assert_eq!(slot_group_color(1), "#D4F7D4");
        assert_eq!(slot_group_color(2), "#D4D4F7");
    }

    #[test]
    fn test_slot_palette_is_cyclic() {
        for slot in 0..9 {
            assert_eq!(slot_group_color(slot), slot_group_color(slot + 3));
        }
    }

    #[test]
    fn test_grayscale_when_unsaturated() {
        assert_eq!(hsl_to_rgb(0.3, 0.0, 0.5), (128, 128, 128));
    }

    #[test]
    fn test_total_styles_differ() {
        assert_ne!(total_style(true), total_style(false));
        assert_eq!(
            total_style(true).background_color.as_deref(),
            Some(COMPLETE_BACKGROUND)
        );
    }
}
