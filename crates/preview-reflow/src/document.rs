//! Source document model
//!
//! A paginated document is a flat list of logical pages. Page content is an
//! opaque byte blob behind a reference count, so snapshotting a document for
//! a reflow cycle never copies content bytes.

use std::sync::Arc;

use crate::types::{ColorMode, Orientation, PageOrder, PagesPerSheet, PaperSize, ScalePolicy};

/// Opaque, immutable page content shared by reference count
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent(Arc<[u8]>);

impl PageContent {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Content with no bytes, used for placeholder pages
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cheap structural copy. Both copies point at the same bytes.
    pub fn snapshot(&self) -> PageContent {
        self.clone()
    }
}

impl From<Vec<u8>> for PageContent {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl From<&[u8]> for PageContent {
    fn from(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }
}

/// One unit of source content with its native size and own margin
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalPage {
    pub content: PageContent,
    /// Native content width in points
    pub width_pt: f32,
    /// Native content height in points
    pub height_pt: f32,
    /// The margin the content was laid out with, in points
    pub margin_pt: f32,
}

impl LogicalPage {
    pub fn new(content: PageContent, width_pt: f32, height_pt: f32, margin_pt: f32) -> Self {
        Self {
            content,
            width_pt,
            height_pt,
            margin_pt,
        }
    }

    /// Copy of this page sharing the same content bytes
    pub fn snapshot(&self) -> LogicalPage {
        LogicalPage {
            content: self.content.snapshot(),
            ..*self
        }
    }
}

/// A paginated source document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagedDocument {
    pages: Vec<LogicalPage>,
}

impl PagedDocument {
    pub fn new(pages: Vec<LogicalPage>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[LogicalPage] {
        &self.pages
    }

    /// Look up a page by its 1-based index
    pub fn page(&self, index: usize) -> Option<&LogicalPage> {
        if index == 0 {
            return None;
        }
        self.pages.get(index - 1)
    }

    /// Copy of the document sharing all content bytes
    pub fn snapshot(&self) -> PagedDocument {
        PagedDocument {
            pages: self.pages.iter().map(LogicalPage::snapshot).collect(),
        }
    }

    /// Margin the document was laid out with, taken from its first page
    pub fn base_margin_pt(&self) -> f32 {
        self.pages
            .first()
            .map_or(crate::constants::DEFAULT_MARGIN_PT, |p| p.margin_pt)
    }
}

/// Resolved settings handed to the content regeneration callback
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub color: ColorMode,
    /// Effective margin in points after margin-mode resolution
    pub margin_pt: f32,
    pub orientation: Orientation,
    pub page_order: PageOrder,
    /// Selected 1-based page indices, in document order
    pub pages: Vec<usize>,
    pub pages_per_sheet: PagesPerSheet,
    pub scale: ScalePolicy,
    pub size: PaperSize,
}

/// Host callback that re-lays-out content for new settings.
///
/// Must return exactly one page per entry in [`DocumentInfo::pages`], in the
/// same order. Any error aborts the reflow cycle and keeps the previous
/// preview.
pub type RegenerateFn = dyn Fn(&DocumentInfo) -> anyhow::Result<Vec<LogicalPage>> + Send + Sync;
