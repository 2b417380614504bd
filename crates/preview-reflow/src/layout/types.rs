//! Layout data types for sheet tiling
//!
//! These types describe where logical pages land on output sheets, between
//! page selection and preview projection.

/// Slot position within a sheet's cell grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub column: usize,
}

impl SlotPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Cell grid shape for one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetArrangement {
    pub rows: usize,
    pub columns: usize,
}

impl SheetArrangement {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Total number of slots on one sheet
    pub fn cell_count(self) -> usize {
        self.rows * self.columns
    }

    /// The same grid with rows and columns swapped
    pub fn transposed(self) -> Self {
        Self {
            rows: self.columns,
            columns: self.rows,
        }
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// The rectangle shrunk by a uniform inset on all sides
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }
}

/// One logical page assigned to one slot of one sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// 1-based index of the logical page in the source document
    pub page: usize,
    /// Which slot of the sheet the page occupies
    pub slot: SlotPosition,
    /// Scale factor the page is rendered at
    pub scale: f32,
}

/// One output sheet holding up to `rows * columns` placed pages.
///
/// Cells are stored in slot-fill order, so a partially filled sheet keeps
/// the page-order pattern visible in its cell sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputSheet {
    /// 0-based position of the sheet in the output sequence
    pub index: usize,
    pub cells: Vec<Cell>,
}

impl OutputSheet {
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
