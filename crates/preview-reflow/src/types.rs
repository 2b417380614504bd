use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Invalid page geometry: {0}")]
    Geometry(String),
    #[error("Invalid page range: {0}")]
    PageRange(String),
    #[error("Content regeneration failed: {0}")]
    Regeneration(String),
    #[error("Invalid settings: {0}")]
    Settings(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PreviewError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Color rendering mode for the output device
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ColorMode {
    /// Full color output
    #[default]
    Color,
    /// Continuous-tone gray rendering
    Grayscale,
    /// Pure black-and-white rendering
    Monochrome,
}

/// Double-sided printing mode
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Duplex {
    /// Single-sided output
    #[default]
    Off,
    /// Flip on the long edge (book style)
    LongEdge,
    /// Flip on the short edge (notepad style)
    ShortEdge,
}

impl Duplex {
    /// Whether two sheet faces share one piece of paper
    pub fn is_double_sided(self) -> bool {
        !matches!(self, Duplex::Off)
    }
}

/// Order in which selected pages fill the cells of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageOrder {
    /// Left to right, then top to bottom
    #[default]
    RowMajor,
    /// Right to left, then top to bottom
    RowMajorReversed,
    /// Top to bottom, then left to right
    ColumnMajor,
    /// Bottom to top, then left to right
    ColumnMajorReversed,
}

/// How many logical pages share one output sheet
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PagesPerSheet {
    #[default]
    One,
    Two,
    Four,
    Six,
    Nine,
    Sixteen,
}

impl PagesPerSheet {
    /// Number of cells on one sheet
    pub fn count(self) -> usize {
        match self {
            PagesPerSheet::One => 1,
            PagesPerSheet::Two => 2,
            PagesPerSheet::Four => 4,
            PagesPerSheet::Six => 6,
            PagesPerSheet::Nine => 9,
            PagesPerSheet::Sixteen => 16,
        }
    }

    /// Parse a cell count back into a bucket, if it is one of the supported ones
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(PagesPerSheet::One),
            2 => Some(PagesPerSheet::Two),
            4 => Some(PagesPerSheet::Four),
            6 => Some(PagesPerSheet::Six),
            9 => Some(PagesPerSheet::Nine),
            16 => Some(PagesPerSheet::Sixteen),
            _ => None,
        }
    }
}

/// Margin handling for the regenerated document
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MarginMode {
    /// Keep the document's own margin
    #[default]
    Default,
    /// Remove the margin entirely
    None,
    /// Use the smallest margin the printer can honor
    Minimum,
    /// Fixed margin in points
    Custom(f32),
}

impl MarginMode {
    /// Effective margin in points for a page laid out with `base_margin_pt`,
    /// given the printer's minimum printable margin.
    pub fn resolve(self, base_margin_pt: f32, minimum_pt: f32) -> f32 {
        match self {
            MarginMode::Default => base_margin_pt,
            MarginMode::None => 0.0,
            MarginMode::Minimum => minimum_pt,
            MarginMode::Custom(margin_pt) => margin_pt,
        }
    }
}

/// Page scaling policy
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScalePolicy {
    /// Fit each page inside its cell, preserving aspect ratio
    #[default]
    Auto,
    /// Fixed scale as a percentage of natural size (100.0 = unchanged)
    Percent(f32),
}

impl ScalePolicy {
    /// Fixed multiplier for manual scaling, `None` when fitting automatically
    pub fn fixed_factor(self) -> Option<f32> {
        match self {
            ScalePolicy::Auto => None,
            ScalePolicy::Percent(p) => Some(p / 100.0),
        }
    }
}

/// Which logical pages take part in the preview
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PageFilter {
    /// Every page of the document
    #[default]
    All,
    /// Only the page the caller is looking at (1-based)
    CurrentPage(usize),
    /// A textual range expression such as `"2,4-6,9"`
    Custom(String),
}

/// Target sheet geometry for one reflow cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Sheet width in points
    pub width_pt: f32,
    /// Sheet height in points
    pub height_pt: f32,
    /// Uniform margin inset in points
    pub margin_pt: f32,
    /// Fixed scale factor, `None` when fitting automatically
    pub scale: Option<f32>,
}

impl PageGeometry {
    pub fn validate(&self) -> Result<()> {
        if self.width_pt <= 0.0 || self.height_pt <= 0.0 {
            return Err(PreviewError::Geometry(format!(
                "Sheet size {}x{} is not positive",
                self.width_pt, self.height_pt
            )));
        }
        let limit = self.width_pt.min(self.height_pt) / 2.0 - crate::constants::MARGIN_EPSILON;
        if self.margin_pt < 0.0 || self.margin_pt > limit {
            return Err(PreviewError::Geometry(format!(
                "Margin {} leaves no content area on a {}x{} sheet",
                self.margin_pt, self.width_pt, self.height_pt
            )));
        }
        if let Some(scale) = self.scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(PreviewError::Geometry(format!(
                    "Scale factor {scale} is not usable"
                )));
            }
        }
        Ok(())
    }

    /// Bottom-left corner of the content area
    pub fn content_origin(&self) -> (f32, f32) {
        (self.margin_pt, self.margin_pt)
    }

    /// Size of the content area after the margin inset
    pub fn content_size(&self) -> (f32, f32) {
        (
            self.width_pt - 2.0 * self.margin_pt,
            self.height_pt - 2.0 * self.margin_pt,
        )
    }
}

/// Statistics about the reflowed preview
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewStatistics {
    /// Total number of pages in the source document
    pub source_pages: usize,
    /// Number of pages that passed the filter
    pub selected_pages: usize,
    /// Number of preview sheets
    pub sheets: usize,
    /// Physical sheets across all copies, `None` while the filter is unresolved
    pub total_sheets: Option<u64>,
}
