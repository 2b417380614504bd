pub mod capabilities;
pub mod constants;
mod document;
mod filter;
pub mod layout;
mod options;
mod preview;
mod reflow;
mod stats;
mod types;

pub use document::*;
pub use filter::select_pages;
pub use layout::{Cell, OutputSheet, Rect, SheetArrangement, SlotPosition, TileEntry};
pub use options::SettingsSnapshot;
pub use preview::{CellView, SheetView, project_sheets};
pub use reflow::{ReflowEngine, ReflowOutput, ReflowReport, ReflowState};
pub use stats::{calculate_statistics, sheet_count, total_sheets};
pub use types::*;
