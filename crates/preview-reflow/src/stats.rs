use crate::options::SettingsSnapshot;
use crate::types::*;

/// Number of sheets needed for the selected pages
pub fn sheet_count(selected_pages: usize, per_sheet: usize) -> usize {
    if per_sheet == 0 {
        return 0;
    }
    (selected_pages + per_sheet - 1) / per_sheet
}

/// Physical sheets across all copies, halved (rounded up) under duplex
pub fn total_sheets(sheets: usize, copies: u32, duplex: Duplex) -> u64 {
    let faces = sheets as u64 * copies as u64;
    if duplex.is_double_sided() {
        (faces + 1) / 2
    } else {
        faces
    }
}

/// Calculate statistics for the current preview.
///
/// `total_sheets` is always populated here; the orchestrator clears it when
/// the active filter text could not be resolved.
pub fn calculate_statistics(
    source_pages: usize,
    selected_pages: usize,
    snapshot: &SettingsSnapshot,
) -> PreviewStatistics {
    let sheets = sheet_count(selected_pages, snapshot.pages_per_sheet.count());

    PreviewStatistics {
        source_pages,
        selected_pages,
        sheets,
        total_sheets: Some(total_sheets(sheets, snapshot.copies, snapshot.duplex)),
    }
}
