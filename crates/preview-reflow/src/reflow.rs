//! Reflow orchestration
//!
//! The engine turns one settings snapshot into one preview output:
//! 1. Resolve the page filter (falling back to all pages on bad range text)
//! 2. Regenerate content through the host callback, if one is installed
//! 3. Scale each selected page into its cell and tile cells onto sheets
//! 4. Compute sheet statistics
//!
//! The engine moves through `Idle -> Computing -> Ready`, or `-> Failed`
//! when a cycle aborts. A failed cycle keeps the previous Ready output, so
//! the host can go on displaying the last good preview. Snapshots queued
//! while a cycle runs coalesce: only the newest one is computed.

use std::sync::Arc;

use crate::capabilities::{self, NullCapabilities, PrinterCapabilityProvider};
use crate::constants::mm_to_pt;
use crate::document::{DocumentInfo, LogicalPage, PagedDocument, RegenerateFn};
use crate::filter::select_pages;
use crate::layout::{
    OutputSheet, SheetArrangement, TileEntry, create_arrangement, create_sheet_grid,
    resolve_scale, tile_pages,
};
use crate::options::SettingsSnapshot;
use crate::stats::{self, calculate_statistics};
use crate::types::*;

// =============================================================================
// State and Output
// =============================================================================

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflowState {
    #[default]
    Idle,
    Computing,
    Ready,
    Failed,
}

/// Everything one successful reflow cycle produced.
///
/// Owned by the engine; readers borrow it and never see a half-built one.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflowOutput {
    /// Monotonic cycle counter, for matching updates to requests
    pub generation: u64,
    /// The snapshot this output was computed from
    pub snapshot: SettingsSnapshot,
    /// Target sheet geometry in points
    pub geometry: PageGeometry,
    /// Cell grid used for tiling
    pub arrangement: SheetArrangement,
    /// Selected 1-based page indices, in document order
    pub selected: Vec<usize>,
    /// Content for the selected pages, parallel to `selected`
    pub pages: Vec<LogicalPage>,
    /// Tiled sheets in output order
    pub sheets: Vec<OutputSheet>,
    pub stats: PreviewStatistics,
    /// Rejection notice when unusable range text fell back to selecting
    /// every page
    pub range_notice: Option<String>,
}

impl ReflowOutput {
    /// Whether the filter text was rejected and every page was selected
    pub fn filter_fallback(&self) -> bool {
        self.range_notice.is_some()
    }
}

/// Summary of one completed cycle, handed back to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct ReflowReport {
    pub generation: u64,
    pub sheets: usize,
    /// User-visible notice when the range text was rejected
    pub range_notice: Option<String>,
}

// =============================================================================
// Engine
// =============================================================================

pub struct ReflowEngine {
    document: PagedDocument,
    regenerate: Option<Arc<RegenerateFn>>,
    capabilities: Arc<dyn PrinterCapabilityProvider>,
    state: ReflowState,
    generation: u64,
    pending: Option<SettingsSnapshot>,
    output: Option<ReflowOutput>,
    last_error: Option<String>,
}

impl ReflowEngine {
    pub fn new(document: PagedDocument) -> Self {
        Self {
            document,
            regenerate: None,
            capabilities: Arc::new(NullCapabilities),
            state: ReflowState::Idle,
            generation: 0,
            pending: None,
            output: None,
            last_error: None,
        }
    }

    /// Install the host's capability provider
    pub fn with_capabilities(mut self, provider: Arc<dyn PrinterCapabilityProvider>) -> Self {
        self.capabilities = provider;
        self
    }

    /// Install the host's content regeneration callback
    pub fn with_regenerator(mut self, callback: Arc<RegenerateFn>) -> Self {
        self.regenerate = Some(callback);
        self
    }

    pub fn state(&self) -> ReflowState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn document(&self) -> &PagedDocument {
        &self.document
    }

    /// Last good output, surviving failed cycles
    pub fn output(&self) -> Option<&ReflowOutput> {
        self.output.as_ref()
    }

    /// Message of the most recent failed cycle
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Swap in a different source document. The current output is dropped
    /// since it no longer describes anything displayable.
    pub fn replace_document(&mut self, document: PagedDocument) {
        self.document = document;
        self.output = None;
        self.state = ReflowState::Idle;
    }

    /// Record a snapshot for the next reflow. A snapshot already queued is
    /// superseded; the newest user intent wins.
    pub fn queue(&mut self, snapshot: SettingsSnapshot) {
        if self.pending.is_some() {
            log::debug!("Superseding queued settings snapshot with a newer one");
        }
        if self.state == ReflowState::Failed {
            self.state = ReflowState::Idle;
        }
        self.pending = Some(snapshot);
    }

    /// Run the queued snapshot, if any.
    pub async fn reflow(&mut self) -> Option<Result<ReflowReport>> {
        let snapshot = self.pending.take()?;
        Some(self.apply(snapshot).await)
    }

    /// Run one full cycle for the given snapshot.
    ///
    /// On error the previous output is retained and the state is `Failed`
    /// until the next settings event.
    pub async fn apply(&mut self, snapshot: SettingsSnapshot) -> Result<ReflowReport> {
        // A directly applied snapshot supersedes anything still queued.
        self.pending = None;
        self.state = ReflowState::Computing;
        self.generation += 1;
        let generation = self.generation;

        match self.compute(generation, snapshot).await {
            Ok(output) => {
                let report = ReflowReport {
                    generation,
                    sheets: output.sheets.len(),
                    range_notice: output.range_notice.clone(),
                };
                self.output = Some(output);
                self.state = ReflowState::Ready;
                Ok(report)
            }
            Err(e) => {
                log::warn!("Reflow cycle {generation} failed: {e}");
                self.last_error = Some(e.to_string());
                self.state = ReflowState::Failed;
                Err(e)
            }
        }
    }

    /// Re-run the last applied snapshot, for host-driven content changes.
    pub async fn refresh(&mut self) -> Option<Result<ReflowReport>> {
        let snapshot = self.output.as_ref().map(|o| o.snapshot.clone())?;
        Some(self.apply(snapshot).await)
    }

    /// Copies-adjusted sheet total for a snapshot, without reflowing.
    ///
    /// `None` when the snapshot cannot be resolved into a sheet count, in
    /// particular while the user is mid-edit on the range text.
    pub fn query_totals(&self, snapshot: &SettingsSnapshot) -> Option<u64> {
        if snapshot.validate().is_err() {
            return None;
        }
        let selected = select_pages(&snapshot.page_filter, self.document.page_count()).ok()?;
        let sheets = stats::sheet_count(selected.len(), snapshot.pages_per_sheet.count());
        Some(stats::total_sheets(
            sheets,
            snapshot.copies,
            snapshot.duplex,
        ))
    }

    async fn compute(&self, generation: u64, snapshot: SettingsSnapshot) -> Result<ReflowOutput> {
        snapshot.validate()?;

        let total = self.document.page_count();

        // Stage 1: page selection. Bad range text selects everything instead,
        // and the notice is carried to the caller.
        let (selected, range_notice) = match select_pages(&snapshot.page_filter, total) {
            Ok(selected) => (selected, None),
            Err(e @ PreviewError::PageRange(_)) => {
                log::warn!("Page filter rejected, selecting all pages: {e}");
                let notice = e.to_string();
                (select_pages(&PageFilter::All, total)?, Some(notice))
            }
            Err(e) => return Err(e),
        };

        tokio::task::yield_now().await;

        // Stage 2: sheet geometry.
        let (width_mm, height_mm) = snapshot
            .paper_size
            .dimensions_with_orientation(snapshot.orientation);
        let margin_pt = snapshot.margin.resolve(
            self.document.base_margin_pt(),
            capabilities::margin_floor(self.capabilities.as_ref()),
        );
        let geometry = PageGeometry {
            width_pt: mm_to_pt(width_mm),
            height_pt: mm_to_pt(height_mm),
            margin_pt,
            scale: snapshot.scale.fixed_factor(),
        };
        geometry.validate()?;

        // Stage 3: content regeneration.
        let pages = self
            .regenerated_pages(&snapshot, &selected, margin_pt)
            .await?;

        tokio::task::yield_now().await;

        // Stage 4: tiling.
        let arrangement = create_arrangement(snapshot.pages_per_sheet, snapshot.orientation);
        let (content_width, content_height) = geometry.content_size();
        let grid = create_sheet_grid(arrangement, content_width, content_height);

        let mut entries = Vec::with_capacity(selected.len());
        for (&index, page) in selected.iter().zip(&pages) {
            let scale = resolve_scale(
                page.width_pt,
                page.height_pt,
                grid.cell_width_pt,
                grid.cell_height_pt,
                snapshot.scale,
            )?;
            entries.push(TileEntry { page: index, scale });
        }
        let sheets = tile_pages(&entries, arrangement, snapshot.page_order);

        // Stage 5: statistics. The total is unknowable while the filter text
        // is unresolved.
        let mut stats = calculate_statistics(total, selected.len(), &snapshot);
        if range_notice.is_some() {
            stats.total_sheets = None;
        }

        Ok(ReflowOutput {
            generation,
            snapshot,
            geometry,
            arrangement,
            selected,
            pages,
            sheets,
            stats,
            range_notice,
        })
    }

    /// Content for the selected pages: regenerated through the host callback
    /// when one is installed, otherwise snapshotted from the source document.
    async fn regenerated_pages(
        &self,
        snapshot: &SettingsSnapshot,
        selected: &[usize],
        margin_pt: f32,
    ) -> Result<Vec<LogicalPage>> {
        if selected.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(callback) = &self.regenerate {
            let info = DocumentInfo {
                color: snapshot.color_mode,
                margin_pt,
                orientation: snapshot.orientation,
                page_order: snapshot.page_order,
                pages: selected.to_vec(),
                pages_per_sheet: snapshot.pages_per_sheet,
                scale: snapshot.scale,
                size: snapshot.paper_size,
            };

            let callback = Arc::clone(callback);
            let pages = tokio::task::spawn_blocking(move || (callback)(&info))
                .await?
                .map_err(|e| PreviewError::Regeneration(format!("{e:#}")))?;

            if pages.len() != selected.len() {
                return Err(PreviewError::Regeneration(format!(
                    "Callback returned {} pages for {} selected",
                    pages.len(),
                    selected.len()
                )));
            }
            return Ok(pages);
        }

        let mut pages = Vec::with_capacity(selected.len());
        for &index in selected {
            match self.document.page(index) {
                Some(page) => pages.push(page.snapshot()),
                None => {
                    return Err(PreviewError::PageRange(format!(
                        "Page {index} is out of bounds (1-{})",
                        self.document.page_count()
                    )));
                }
            }
        }
        Ok(pages)
    }
}
