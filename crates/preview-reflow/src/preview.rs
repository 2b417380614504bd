use crate::document::PageContent;
use crate::layout::{Rect, cell_bounds, create_sheet_grid, margin_origin_shift, place_in_cell};
use crate::reflow::ReflowOutput;
use crate::types::ColorMode;

/// Renderable description of one placed page
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    /// 1-based source page index, for page labels
    pub page: usize,
    /// Content bytes to render
    pub content: PageContent,
    /// Where the content lands on the sheet, in points
    pub rect: Rect,
    /// Scale the content is rendered at
    pub scale: f32,
}

/// Renderable description of one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetView {
    /// 0-based position in the output sequence
    pub index: usize,
    /// Sheet width in points
    pub width_pt: f32,
    /// Sheet height in points
    pub height_pt: f32,
    /// Cosmetic screen filter; never alters content or layout
    pub color: ColorMode,
    pub cells: Vec<CellView>,
}

/// Project a reflow output into renderable sheet descriptors.
///
/// Pure and side-effect free: the output is read, never mutated, and an
/// empty output projects to an empty sequence. The color mode rides along
/// for the display layer's screen filter only.
pub fn project_sheets(output: &ReflowOutput) -> Vec<SheetView> {
    let geometry = output.geometry;
    let (content_width, content_height) = geometry.content_size();
    let grid = create_sheet_grid(output.arrangement, content_width, content_height);
    let content_origin = geometry.content_origin();

    output
        .sheets
        .iter()
        .map(|sheet| {
            let mut cells = Vec::with_capacity(sheet.cells.len());
            for cell in &sheet.cells {
                // Selected indices are sorted in document order, so the
                // content for a cell sits at the page's selection position.
                let Ok(position) = output.selected.binary_search(&cell.page) else {
                    log::warn!("Cell references unselected page {}", cell.page);
                    continue;
                };
                let page = &output.pages[position];

                let cell_rect = cell_bounds(&grid, cell.slot, content_origin);
                let placed = place_in_cell(&cell_rect, page.width_pt, page.height_pt, cell.scale);

                // The margin change moves the content origin by a page-space
                // delta, scaled into sheet space.
                let shift = margin_origin_shift(page.margin_pt, geometry.margin_pt) * cell.scale;

                cells.push(CellView {
                    page: cell.page,
                    content: page.content.snapshot(),
                    rect: Rect::new(placed.x + shift, placed.y + shift, placed.width, placed.height),
                    scale: cell.scale,
                });
            }

            SheetView {
                index: sheet.index,
                width_pt: geometry.width_pt,
                height_pt: geometry.height_pt,
                color: output.snapshot.color_mode,
                cells,
            }
        })
        .collect()
}
