//! Cell grid calculation
//!
//! This module derives the cell grid for a sheet from the pages-per-sheet
//! bucket and the sheet orientation, and computes cell geometry in points.

use crate::types::{Orientation, PagesPerSheet};

use super::{Rect, SheetArrangement, SlotPosition};

// =============================================================================
// Arrangement Derivation
// =============================================================================

/// Derive the cell grid for a pages-per-sheet bucket.
///
/// The portrait shapes put the longer run of cells down the page; flipping
/// to landscape transposes the grid so the longer run follows the wide axis.
pub fn create_arrangement(
    pages_per_sheet: PagesPerSheet,
    orientation: Orientation,
) -> SheetArrangement {
    let portrait = match pages_per_sheet {
        PagesPerSheet::One => SheetArrangement::new(1, 1),
        PagesPerSheet::Two => SheetArrangement::new(2, 1),
        PagesPerSheet::Four => SheetArrangement::new(2, 2),
        PagesPerSheet::Six => SheetArrangement::new(3, 2),
        PagesPerSheet::Nine => SheetArrangement::new(3, 3),
        PagesPerSheet::Sixteen => SheetArrangement::new(4, 4),
    };

    match orientation {
        Orientation::Portrait => portrait,
        Orientation::Landscape => portrait.transposed(),
    }
}

// =============================================================================
// Cell Geometry
// =============================================================================

/// Cell dimensions for an arrangement over a content area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetGrid {
    pub rows: usize,
    pub columns: usize,
    /// Width of each cell in points
    pub cell_width_pt: f32,
    /// Height of each cell in points
    pub cell_height_pt: f32,
}

/// Divide a content area evenly into the arrangement's cells.
pub fn create_sheet_grid(
    arrangement: SheetArrangement,
    content_width_pt: f32,
    content_height_pt: f32,
) -> SheetGrid {
    SheetGrid {
        rows: arrangement.rows,
        columns: arrangement.columns,
        cell_width_pt: content_width_pt / arrangement.columns as f32,
        cell_height_pt: content_height_pt / arrangement.rows as f32,
    }
}

/// Calculate the bounds of the cell at the given slot.
///
/// # Arguments
/// * `grid` - The sheet grid
/// * `slot` - Slot position (row, column)
/// * `content_origin` - Bottom-left corner of the content area (x, y) in points
pub fn cell_bounds(grid: &SheetGrid, slot: SlotPosition, content_origin: (f32, f32)) -> Rect {
    let (content_x, content_y) = content_origin;

    // Row 0 is at the top, so the y calculation is inverted
    let cell_x = content_x + slot.column as f32 * grid.cell_width_pt;
    let cell_y = content_y + (grid.rows - slot.row - 1) as f32 * grid.cell_height_pt;

    Rect::new(cell_x, cell_y, grid.cell_width_pt, grid.cell_height_pt)
}

// =============================================================================
// Tests
// =============================================================================
