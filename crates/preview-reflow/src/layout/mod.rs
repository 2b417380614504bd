//! Layout calculation modules for the preview
//!
//! This module handles all the geometric work of tiling pages onto sheets:
//! - Cell grid derivation (pages-per-sheet bucket, orientation)
//! - Slot ordering and sheet packing (page-order patterns)
//! - Content placement (scaling, centering, margin shift)

mod grid;
mod placement;
mod tiling;
mod types;

pub use grid::*;
pub use placement::*;
pub use tiling::*;
pub use types::*;
