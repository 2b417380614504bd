//! Content placement within cells
//!
//! This module computes how a logical page's content sits inside its cell:
//! the fit-or-manual scale factor, the centered content rectangle, and the
//! margin shift applied to the content origin.

use crate::types::{PreviewError, Result, ScalePolicy};

use super::Rect;

// =============================================================================
// Scale Calculation
// =============================================================================

/// Scale factor that fits a page entirely inside a cell, preserving aspect
/// ratio. Picks the width-fit ratio when the height scaled by it still fits,
/// otherwise the height-fit ratio. Never crops, never stretches.
pub fn fit_scale(
    native_width: f32,
    native_height: f32,
    cell_width: f32,
    cell_height: f32,
) -> Result<f32> {
    if native_width <= 0.0 || native_height <= 0.0 {
        return Err(PreviewError::Geometry(format!(
            "Page has non-positive native size {native_width}x{native_height}"
        )));
    }

    let width_ratio = cell_width / native_width;
    if native_height * width_ratio <= cell_height {
        Ok(width_ratio)
    } else {
        Ok(cell_height / native_height)
    }
}

/// Resolve the render scale for a page under the active scale policy.
pub fn resolve_scale(
    native_width: f32,
    native_height: f32,
    cell_width: f32,
    cell_height: f32,
    policy: ScalePolicy,
) -> Result<f32> {
    match policy.fixed_factor() {
        Some(factor) => {
            if native_width <= 0.0 || native_height <= 0.0 {
                return Err(PreviewError::Geometry(format!(
                    "Page has non-positive native size {native_width}x{native_height}"
                )));
            }
            Ok(factor)
        }
        None => fit_scale(native_width, native_height, cell_width, cell_height),
    }
}

// =============================================================================
// Placement
// =============================================================================

/// Centered placement of scaled content inside a cell.
pub fn place_in_cell(cell: &Rect, native_width: f32, native_height: f32, scale: f32) -> Rect {
    let scaled_width = native_width * scale;
    let scaled_height = native_height * scale;

    Rect::new(
        cell.x + (cell.width - scaled_width) / 2.0,
        cell.y + (cell.height - scaled_height) / 2.0,
        scaled_width,
        scaled_height,
    )
}

// =============================================================================
// Margin Shift
// =============================================================================

/// Shift applied to the content origin when the margin changes.
///
/// The shift is a delta against the margin the content was laid out with,
/// not an absolute reposition: content sitting at x under its own margin
/// moves to `x + (new - base)`, whatever x was.
pub fn margin_origin_shift(base_margin: f32, new_margin: f32) -> f32 {
    -base_margin + new_margin
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_width_limited() {
        // 200x100 into 100x100: width ratio 0.5 scales height to 50 <= 100,
        // so the width branch wins.
        let scale = fit_scale(200.0, 100.0, 100.0, 100.0).unwrap();
        assert!((scale - 0.5).abs() < 0.001);
        assert!((200.0 * scale - 100.0).abs() < 0.001);
        assert!((100.0 * scale - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_fit_scale_height_limited() {
        // 100x400 into 100x100: width ratio 1.0 would scale height to 400,
        // so the height branch wins.
        let scale = fit_scale(100.0, 400.0, 100.0, 100.0).unwrap();
        assert!((scale - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_fit_scale_exact_fit() {
        let scale = fit_scale(300.0, 450.0, 300.0, 450.0).unwrap();
        assert!((scale - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_fit_scale_rejects_degenerate_pages() {
        assert!(fit_scale(0.0, 100.0, 50.0, 50.0).is_err());
        assert!(fit_scale(100.0, 0.0, 50.0, 50.0).is_err());
        assert!(fit_scale(-10.0, 100.0, 50.0, 50.0).is_err());
    }

    #[test]
    fn test_resolve_scale_manual_percent() {
        let scale =
            resolve_scale(200.0, 100.0, 100.0, 100.0, ScalePolicy::Percent(75.0)).unwrap();
        assert!((scale - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_resolve_scale_auto_fits() {
        let scale = resolve_scale(200.0, 100.0, 100.0, 100.0, ScalePolicy::Auto).unwrap();
        assert!((scale - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_resolve_scale_manual_still_checks_geometry() {
        assert!(resolve_scale(0.0, 100.0, 50.0, 50.0, ScalePolicy::Percent(100.0)).is_err());
    }

    #[test]
    fn test_place_in_cell_centers_content() {
        let cell = Rect::new(100.0, 200.0, 400.0, 300.0);
        let placed = place_in_cell(&cell, 200.0, 100.0, 0.5);

        assert_eq!(placed.width, 100.0);
        assert_eq!(placed.height, 50.0);
        assert!((placed.center_x() - cell.center_x()).abs() < 0.001);
        assert!((placed.center_y() - cell.center_y()).abs() < 0.001);
    }

    #[test]
    fn test_margin_shift_removing_margin() {
        // Content laid out with margin 40, requested margin 0: origin at 40
        // lands at 0.
        let shift = margin_origin_shift(40.0, 0.0);
        assert_eq!(shift, -40.0);
        assert_eq!(40.0 + shift, 0.0);
    }

    #[test]
    fn test_margin_shift_is_a_delta_not_a_reset() {
        // Content sitting deeper than its own margin keeps the extra offset.
        let shift = margin_origin_shift(40.0, 0.0);
        assert_eq!(100.0 + shift, 60.0);

        let shift = margin_origin_shift(25.0, 10.0);
        assert_eq!(shift, -15.0);
        assert_eq!(100.0 + shift, 85.0);
    }

    #[test]
    fn test_margin_shift_growing_margin() {
        let shift = margin_origin_shift(36.0, 72.0);
        assert_eq!(shift, 36.0);
    }
}
