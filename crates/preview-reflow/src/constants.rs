//! Shared constants for preview reflow
//!
//! This module centralizes magic numbers and constants used throughout
//! the reflow pipeline.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default logical page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default logical page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Margins
// =============================================================================

/// Default page margin in points (about 12.7mm, the common half-inch)
pub const DEFAULT_MARGIN_PT: f32 = 36.0;

/// Tolerance when comparing a requested margin against the printable limit
/// (points). Keeps float round-off from rejecting an exactly-at-limit value.
pub const MARGIN_EPSILON: f32 = 0.001;

// =============================================================================
// Scaling
// =============================================================================

/// Smallest accepted manual scale (percent of natural size)
pub const MIN_SCALE_PERCENT: f32 = 10.0;

/// Largest accepted manual scale (percent of natural size)
pub const MAX_SCALE_PERCENT: f32 = 500.0;
