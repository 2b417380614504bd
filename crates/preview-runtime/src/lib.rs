mod controls;
mod worker;

pub use controls::{BoundedInput, PreviewCursor};
pub use worker::worker_task;

// Re-export types that cross the channel boundary
pub use preview_reflow::{ReflowEngine, SettingsSnapshot};

/// Commands sent from the dialog to the preview worker
#[derive(Debug)]
pub enum PreviewCommand {
    /// A settings control changed; reflow with the new snapshot
    UpdateSettings { snapshot: SettingsSnapshot },
    /// The source content changed behind the dialog; replay the current
    /// snapshot so the host callback runs again
    RegenerateContent,
    /// Ask for the copies-adjusted sheet total of the latest snapshot
    QueryTotals,
    /// Close the dialog, handing the settings to the print job
    Commit,
    /// Close the dialog, discarding the settings
    Cancel,
}

/// Updates sent from the preview worker to the dialog
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewUpdate {
    /// A pipeline phase started
    Progress { stage: String },
    /// A reflow cycle finished and the preview can be redrawn
    PreviewReady { generation: u64, sheet_count: usize },
    /// Copies-adjusted sheet total; `None` while the range text is unresolved
    Totals { total_sheets: Option<u64> },
    /// The range text was rejected and the preview shows every page
    RangeNotice { message: String },
    /// A reflow cycle failed; the previous preview remains valid
    Error { message: String },
    /// The dialog is done; `accepted` is what the print flow acts on
    Closed { accepted: bool },
}
