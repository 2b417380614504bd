//! Sheet tiling
//!
//! This module packs the selected logical pages onto output sheets. The page
//! order setting decides the slot-fill pattern; a new sheet starts whenever
//! the current one runs out of slots.
//!
//! ## Slot-fill patterns (2x2 grid)
//!
//! **RowMajor:**          **RowMajorReversed:**
//! ```text
//! +---+---+              +---+---+
//! | 1 | 2 |              | 2 | 1 |
//! +---+---+              +---+---+
//! | 3 | 4 |              | 4 | 3 |
//! +---+---+              +---+---+
//! ```
//!
//! **ColumnMajor:**       **ColumnMajorReversed:**
//! ```text
//! +---+---+              +---+---+
//! | 1 | 3 |              | 2 | 4 |
//! +---+---+              +---+---+
//! | 2 | 4 |              | 1 | 3 |
//! +---+---+              +---+---+
//! ```

use crate::types::PageOrder;

use super::{Cell, OutputSheet, SheetArrangement, SlotPosition};

// =============================================================================
// Slot Ordering
// =============================================================================

/// Slot positions of one sheet in the order the page-order policy fills them.
pub fn slot_sequence(arrangement: SheetArrangement, order: PageOrder) -> Vec<SlotPosition> {
    let rows = arrangement.rows;
    let columns = arrangement.columns;
    let mut slots = Vec::with_capacity(arrangement.cell_count());

    match order {
        PageOrder::RowMajor => {
            for row in 0..rows {
                for column in 0..columns {
                    slots.push(SlotPosition::new(row, column));
                }
            }
        }
        PageOrder::RowMajorReversed => {
            for row in 0..rows {
                for column in (0..columns).rev() {
                    slots.push(SlotPosition::new(row, column));
                }
            }
        }
        PageOrder::ColumnMajor => {
            for column in 0..columns {
                for row in 0..rows {
                    slots.push(SlotPosition::new(row, column));
                }
            }
        }
        PageOrder::ColumnMajorReversed => {
            for column in 0..columns {
                for row in (0..rows).rev() {
                    slots.push(SlotPosition::new(row, column));
                }
            }
        }
    }

    slots
}

// =============================================================================
// Sheet Packing
// =============================================================================

/// A selected page with its precomputed render scale, ready for a slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileEntry {
    /// 1-based index of the logical page in the source document
    pub page: usize,
    /// Scale factor the page is rendered at
    pub scale: f32,
}

/// Pack selected pages onto sheets.
///
/// Each slot, visited in the page order's pattern, consumes one pending entry
/// while any remain. The last sheet may be partially filled. Every entry
/// lands in exactly one slot, so the cell total always equals the entry
/// count. Zero entries or a zero-slot arrangement produce an empty output.
pub fn tile_pages(
    entries: &[TileEntry],
    arrangement: SheetArrangement,
    order: PageOrder,
) -> Vec<OutputSheet> {
    let capacity = arrangement.cell_count();
    if capacity == 0 || entries.is_empty() {
        return Vec::new();
    }

    let slots = slot_sequence(arrangement, order);

    entries
        .chunks(capacity)
        .enumerate()
        .map(|(index, chunk)| OutputSheet {
            index,
            cells: chunk
                .iter()
                .zip(&slots)
                .map(|(entry, &slot)| Cell {
                    page: entry.page,
                    slot,
                    scale: entry.scale,
                })
                .collect(),
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pages: &[usize]) -> Vec<TileEntry> {
        pages.iter().map(|&page| TileEntry { page, scale: 1.0 }).collect()
    }

    fn slot_tuples(arrangement: SheetArrangement, order: PageOrder) -> Vec<(usize, usize)> {
        slot_sequence(arrangement, order)
            .into_iter()
            .map(|s| (s.row, s.column))
            .collect()
    }

    #[test]
    fn test_row_major_sequence() {
        let seq = slot_tuples(SheetArrangement::new(2, 2), PageOrder::RowMajor);
        assert_eq!(seq, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_row_major_reversed_sequence() {
        let seq = slot_tuples(SheetArrangement::new(2, 2), PageOrder::RowMajorReversed);
        assert_eq!(seq, vec![(0, 1), (0, 0), (1, 1), (1, 0)]);
    }

    #[test]
    fn test_column_major_sequence() {
        let seq = slot_tuples(SheetArrangement::new(2, 2), PageOrder::ColumnMajor);
        assert_eq!(seq, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_column_major_reversed_sequence() {
        let seq = slot_tuples(SheetArrangement::new(2, 2), PageOrder::ColumnMajorReversed);
        assert_eq!(seq, vec![(1, 0), (0, 0), (1, 1), (0, 1)]);
    }

    #[test]
    fn test_nonsquare_sequences() {
        // 3 rows x 2 columns
        let arrangement = SheetArrangement::new(3, 2);

        let seq = slot_tuples(arrangement, PageOrder::RowMajor);
        assert_eq!(
            seq,
            vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]
        );

        let seq = slot_tuples(arrangement, PageOrder::ColumnMajor);
        assert_eq!(
            seq,
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn test_tile_fills_sheets_in_order() {
        let sheets = tile_pages(
            &entries(&[1, 2, 3, 4, 5]),
            SheetArrangement::new(2, 2),
            PageOrder::RowMajor,
        );

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].index, 0);
        assert_eq!(sheets[0].cell_count(), 4);
        assert_eq!(sheets[1].index, 1);
        assert_eq!(sheets[1].cell_count(), 1);

        // First sheet: pages 1-4 in reading order.
        let placed: Vec<_> = sheets[0]
            .cells
            .iter()
            .map(|c| (c.page, c.slot.row, c.slot.column))
            .collect();
        assert_eq!(placed, vec![(1, 0, 0), (2, 0, 1), (3, 1, 0), (4, 1, 1)]);

        // Page 5 starts the next sheet at the pattern's first slot.
        assert_eq!(sheets[1].cells[0].page, 5);
        assert_eq!(sheets[1].cells[0].slot, SlotPosition::new(0, 0));
    }

    #[test]
    fn test_partial_sheet_keeps_pattern_order() {
        // One page under RowMajorReversed lands in the top-right slot,
        // because that is the first slot of the pattern.
        let sheets = tile_pages(
            &entries(&[7]),
            SheetArrangement::new(2, 2),
            PageOrder::RowMajorReversed,
        );

        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].cells[0].page, 7);
        assert_eq!(sheets[0].cells[0].slot, SlotPosition::new(0, 1));
    }

    #[test]
    fn test_cell_total_matches_entry_count() {
        for order in [
            PageOrder::RowMajor,
            PageOrder::RowMajorReversed,
            PageOrder::ColumnMajor,
            PageOrder::ColumnMajorReversed,
        ] {
            let input = entries(&(1..=11).collect::<Vec<_>>());
            let sheets = tile_pages(&input, SheetArrangement::new(3, 2), order);

            assert_eq!(sheets.len(), 2); // ceil(11 / 6)
            let total: usize = sheets.iter().map(OutputSheet::cell_count).sum();
            assert_eq!(total, 11);
        }
    }

    #[test]
    fn test_each_slot_used_once_per_sheet() {
        let input = entries(&(1..=9).collect::<Vec<_>>());
        let sheets = tile_pages(&input, SheetArrangement::new(3, 3), PageOrder::ColumnMajor);

        assert_eq!(sheets.len(), 1);
        let mut positions: Vec<_> = sheets[0]
            .cells
            .iter()
            .map(|c| (c.slot.row, c.slot.column))
            .collect();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), 9);
    }

    #[test]
    fn test_empty_input_yields_no_sheets() {
        let sheets = tile_pages(&[], SheetArrangement::new(2, 2), PageOrder::RowMajor);
        assert!(sheets.is_empty());
    }

    #[test]
    fn test_deterministic_layout() {
        let input = entries(&[3, 1, 4, 1, 5, 9, 2, 6]);
        let first = tile_pages(&input, SheetArrangement::new(2, 3), PageOrder::ColumnMajorReversed);
        let second = tile_pages(&input, SheetArrangement::new(2, 3), PageOrder::ColumnMajorReversed);
        assert_eq!(first, second);
    }
}
