use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use preview_reflow::constants::{DEFAULT_MARGIN_PT, DEFAULT_PAGE_HEIGHT_PT, DEFAULT_PAGE_WIDTH_PT};
use preview_reflow::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prevu", about = "Print preview and N-up layout tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tile a synthetic document and print the per-sheet cell map
    Layout {
        /// Number of pages in the synthetic document
        #[arg(long, default_value = "10")]
        pages: usize,

        /// Sheet paper size
        #[arg(long, default_value = "a4", value_enum)]
        paper: PaperArg,

        /// Sheet orientation
        #[arg(long, default_value = "portrait", value_enum)]
        orientation: OrientationArg,

        /// Pages per sheet (1, 2, 4, 6, 9, or 16)
        #[arg(long, default_value = "1")]
        per_sheet: usize,

        /// Order in which pages fill the sheet cells
        #[arg(long, default_value = "row-major", value_enum)]
        order: OrderArg,

        /// Page range, e.g. "2,4-6,9" (default: all pages)
        #[arg(long)]
        range: Option<String>,

        /// Preview a single page instead of a range
        #[arg(long, conflicts_with = "range")]
        current_page: Option<usize>,

        /// Fixed scale percentage (default: fit each page to its cell)
        #[arg(long)]
        scale: Option<f32>,

        /// Sheet margin in points (default: keep the document margin)
        #[arg(long)]
        margin_pt: Option<f32>,
    },

    /// Print sheet statistics for a copies and duplex combination
    Totals {
        /// Number of pages in the synthetic document
        #[arg(long, default_value = "10")]
        pages: usize,

        /// Pages per sheet (1, 2, 4, 6, 9, or 16)
        #[arg(long, default_value = "1")]
        per_sheet: usize,

        /// Page range, e.g. "2,4-6,9" (default: all pages)
        #[arg(long)]
        range: Option<String>,

        /// Number of copies
        #[arg(long, default_value = "1")]
        copies: u32,

        /// Double-sided printing mode
        #[arg(long, default_value = "off", value_enum)]
        duplex: DuplexArg,
    },

    /// Validate, save, or load a settings snapshot JSON
    Snapshot {
        /// Load the snapshot from this file instead of building it from flags
        #[arg(long)]
        load: Option<PathBuf>,

        /// Write the snapshot to this file after validating
        #[arg(long)]
        save: Option<PathBuf>,

        /// Sheet paper size
        #[arg(long, default_value = "a4", value_enum)]
        paper: PaperArg,

        /// Sheet orientation
        #[arg(long, default_value = "portrait", value_enum)]
        orientation: OrientationArg,

        /// Pages per sheet (1, 2, 4, 6, 9, or 16)
        #[arg(long, default_value = "1")]
        per_sheet: usize,

        /// Order in which pages fill the sheet cells
        #[arg(long, default_value = "row-major", value_enum)]
        order: OrderArg,

        /// Page range, e.g. "2,4-6,9" (default: all pages)
        #[arg(long)]
        range: Option<String>,

        /// Fixed scale percentage (default: fit each page to its cell)
        #[arg(long)]
        scale: Option<f32>,

        /// Sheet margin in points (default: keep the document margin)
        #[arg(long)]
        margin_pt: Option<f32>,

        /// Color rendering mode
        #[arg(long, default_value = "color", value_enum)]
        color: ColorArg,

        /// Number of copies
        #[arg(long, default_value = "1")]
        copies: u32,

        /// Double-sided printing mode
        #[arg(long, default_value = "off", value_enum)]
        duplex: DuplexArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    RowMajor,
    RowMajorReversed,
    ColumnMajor,
    ColumnMajorReversed,
}

#[derive(Clone, Copy, ValueEnum)]
enum DuplexArg {
    Off,
    LongEdge,
    ShortEdge,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    Color,
    Grayscale,
    Monochrome,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<OrderArg> for PageOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::RowMajor => Self::RowMajor,
            OrderArg::RowMajorReversed => Self::RowMajorReversed,
            OrderArg::ColumnMajor => Self::ColumnMajor,
            OrderArg::ColumnMajorReversed => Self::ColumnMajorReversed,
        }
    }
}

impl From<DuplexArg> for Duplex {
    fn from(arg: DuplexArg) -> Self {
        match arg {
            DuplexArg::Off => Self::Off,
            DuplexArg::LongEdge => Self::LongEdge,
            DuplexArg::ShortEdge => Self::ShortEdge,
        }
    }
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Color => Self::Color,
            ColorArg::Grayscale => Self::Grayscale,
            ColorArg::Monochrome => Self::Monochrome,
        }
    }
}

/// In-memory document standing in for the host application's pages
fn synthetic_document(pages: usize) -> PagedDocument {
    let pages = (0..pages)
        .map(|i| {
            LogicalPage::new(
                PageContent::from(format!("synthetic page {}", i + 1).into_bytes()),
                DEFAULT_PAGE_WIDTH_PT,
                DEFAULT_PAGE_HEIGHT_PT,
                DEFAULT_MARGIN_PT,
            )
        })
        .collect();
    PagedDocument::new(pages)
}

fn parse_per_sheet(count: usize) -> Result<PagesPerSheet> {
    PagesPerSheet::from_count(count)
        .ok_or_else(|| anyhow::anyhow!("Pages per sheet must be one of 1, 2, 4, 6, 9, 16"))
}

fn parse_filter(range: Option<String>, current_page: Option<usize>) -> PageFilter {
    match (range, current_page) {
        (Some(text), _) => PageFilter::Custom(text),
        (None, Some(page)) => PageFilter::CurrentPage(page),
        (None, None) => PageFilter::All,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Layout {
            pages,
            paper,
            orientation,
            per_sheet,
            order,
            range,
            current_page,
            scale,
            margin_pt,
        } => {
            let snapshot = SettingsSnapshot {
                paper_size: paper.into(),
                orientation: orientation.into(),
                margin: margin_pt.map_or(MarginMode::Default, MarginMode::Custom),
                scale: scale.map_or(ScalePolicy::Auto, ScalePolicy::Percent),
                page_filter: parse_filter(range, current_page),
                pages_per_sheet: parse_per_sheet(per_sheet)?,
                page_order: order.into(),
                ..Default::default()
            };

            let mut engine = ReflowEngine::new(synthetic_document(pages));
            let report = engine.apply(snapshot).await?;
            if let Some(notice) = &report.range_notice {
                println!("Note: {notice}; showing all pages");
            }

            let Some(output) = engine.output() else {
                anyhow::bail!("reflow produced no output");
            };
            println!(
                "Sheet: {:.1} x {:.1} pt, margin {:.1} pt, {} rows x {} columns",
                output.geometry.width_pt,
                output.geometry.height_pt,
                output.geometry.margin_pt,
                output.arrangement.rows,
                output.arrangement.columns,
            );

            let views = project_sheets(output);
            for view in &views {
                println!("Sheet {} of {}:", view.index + 1, views.len());
                for cell in &view.cells {
                    println!(
                        "  page {:>3} at ({:7.1}, {:7.1}) size {:6.1} x {:6.1}  scale {:3.0}%",
                        cell.page,
                        cell.rect.x,
                        cell.rect.y,
                        cell.rect.width,
                        cell.rect.height,
                        cell.scale * 100.0,
                    );
                }
            }
            println!(
                "{} of {} pages on {} sheets",
                output.stats.selected_pages, output.stats.source_pages, output.stats.sheets
            );
        }

        Commands::Totals {
            pages,
            per_sheet,
            range,
            copies,
            duplex,
        } => {
            let snapshot = SettingsSnapshot {
                page_filter: parse_filter(range, None),
                pages_per_sheet: parse_per_sheet(per_sheet)?,
                copies,
                duplex: duplex.into(),
                ..Default::default()
            };

            let mut engine = ReflowEngine::new(synthetic_document(pages));
            let report = engine.apply(snapshot).await?;
            if let Some(notice) = &report.range_notice {
                println!("Note: {notice}; counting all pages");
            }

            let Some(output) = engine.output() else {
                anyhow::bail!("reflow produced no output");
            };
            println!("Preview statistics:");
            println!("  Source pages: {}", output.stats.source_pages);
            println!("  Selected pages: {}", output.stats.selected_pages);
            println!("  Sheets per copy: {}", output.stats.sheets);
            println!("  Copies: {}", output.snapshot.copies);
            match output.stats.total_sheets {
                Some(total) => println!("  Total sheets: {}", total),
                None => println!("  Total sheets: unknown until the page range is fixed"),
            }
        }

        Commands::Snapshot {
            load,
            save,
            paper,
            orientation,
            per_sheet,
            order,
            range,
            scale,
            margin_pt,
            color,
            copies,
            duplex,
        } => {
            let snapshot = match load {
                Some(path) => {
                    let snapshot = SettingsSnapshot::load(&path).await?;
                    println!("Loaded {}", path.display());
                    snapshot
                }
                None => SettingsSnapshot {
                    paper_size: paper.into(),
                    orientation: orientation.into(),
                    margin: margin_pt.map_or(MarginMode::Default, MarginMode::Custom),
                    scale: scale.map_or(ScalePolicy::Auto, ScalePolicy::Percent),
                    page_filter: parse_filter(range, None),
                    pages_per_sheet: parse_per_sheet(per_sheet)?,
                    page_order: order.into(),
                    color_mode: color.into(),
                    copies,
                    duplex: duplex.into(),
                },
            };

            snapshot.validate()?;
            println!("Settings:");
            println!("  Paper: {:?} {:?}", snapshot.paper_size, snapshot.orientation);
            println!("  Pages per sheet: {}", snapshot.pages_per_sheet.count());
            println!("  Order: {:?}", snapshot.page_order);
            println!("  Filter: {:?}", snapshot.page_filter);
            println!("  Margin: {:?}", snapshot.margin);
            println!("  Scale: {:?}", snapshot.scale);
            println!("  Color: {:?}", snapshot.color_mode);
            println!("  Copies: {}", snapshot.copies);
            println!("  Duplex: {:?}", snapshot.duplex);

            if let Some(path) = save {
                snapshot.save(&path).await?;
                println!("Saved → {}", path.display());
            }
        }
    }

    Ok(())
}
