use preview_reflow::constants::mm_to_pt;
use preview_reflow::*;
use std::sync::{Arc, Mutex};

/// Build an in-memory document of US Letter pages with a 36pt base margin
fn test_document(num_pages: usize) -> PagedDocument {
    let pages = (0..num_pages)
        .map(|i| {
            LogicalPage::new(
                PageContent::from(format!("page {}", i + 1).into_bytes()),
                612.0,
                792.0,
                36.0,
            )
        })
        .collect();
    PagedDocument::new(pages)
}

#[tokio::test]
async fn test_apply_produces_ready_preview() {
    let mut engine = ReflowEngine::new(test_document(5));
    assert_eq!(engine.state(), ReflowState::Idle);

    let report = engine.apply(SettingsSnapshot::default()).await.unwrap();

    assert_eq!(engine.state(), ReflowState::Ready);
    assert_eq!(report.generation, 1);
    assert_eq!(report.sheets, 5, "one page per sheet by default");
    assert!(report.range_notice.is_none());

    let output = engine.output().unwrap();
    assert_eq!(output.selected, vec![1, 2, 3, 4, 5]);
    assert_eq!(output.pages.len(), 5);
    assert_eq!(output.sheets.len(), 5);
    for sheet in &output.sheets {
        assert_eq!(sheet.cell_count(), 1);
    }
    assert_eq!(output.stats.source_pages, 5);
    assert_eq!(output.stats.selected_pages, 5);
    assert_eq!(output.stats.sheets, 5);
    assert_eq!(output.stats.total_sheets, Some(5));
}

#[tokio::test]
async fn test_four_up_fills_sheets_in_reading_order() {
    let mut engine = ReflowEngine::new(test_document(10));
    let snapshot = SettingsSnapshot {
        pages_per_sheet: PagesPerSheet::Four,
        ..Default::default()
    };

    let report = engine.apply(snapshot).await.unwrap();
    assert_eq!(report.sheets, 3, "10 pages at 4 per sheet need 3 sheets");

    let output = engine.output().unwrap();
    assert_eq!(output.arrangement, SheetArrangement::new(2, 2));

    let first = &output.sheets[0];
    let pages: Vec<usize> = first.cells.iter().map(|c| c.page).collect();
    assert_eq!(pages, vec![1, 2, 3, 4]);
    let slots: Vec<SlotPosition> = first.cells.iter().map(|c| c.slot).collect();
    assert_eq!(
        slots,
        vec![
            SlotPosition::new(0, 0),
            SlotPosition::new(0, 1),
            SlotPosition::new(1, 0),
            SlotPosition::new(1, 1),
        ]
    );

    let last = &output.sheets[2];
    assert_eq!(last.cell_count(), 2, "trailing sheet is partially filled");
    let pages: Vec<usize> = last.cells.iter().map(|c| c.page).collect();
    assert_eq!(pages, vec![9, 10]);
}

#[tokio::test]
async fn test_landscape_transposes_arrangement() {
    let mut engine = ReflowEngine::new(test_document(6));

    let portrait = SettingsSnapshot {
        pages_per_sheet: PagesPerSheet::Six,
        ..Default::default()
    };
    engine.apply(portrait).await.unwrap();
    assert_eq!(engine.output().unwrap().arrangement, SheetArrangement::new(3, 2));

    let landscape = SettingsSnapshot {
        pages_per_sheet: PagesPerSheet::Six,
        orientation: Orientation::Landscape,
        ..Default::default()
    };
    engine.apply(landscape).await.unwrap();
    assert_eq!(engine.output().unwrap().arrangement, SheetArrangement::new(2, 3));
}

#[tokio::test]
async fn test_fit_scale_matches_cell_width() {
    let mut engine = ReflowEngine::new(test_document(1));
    engine.apply(SettingsSnapshot::default()).await.unwrap();

    // A4 portrait with a 36pt margin leaves a 523.3pt wide cell; a Letter
    // page is wider than tall relative to that cell, so width drives the fit.
    let expected = (mm_to_pt(210.0) - 72.0) / 612.0;
    let cell = &engine.output().unwrap().sheets[0].cells[0];
    assert!(
        (cell.scale - expected).abs() < 1e-4,
        "expected fit scale {expected}, got {}",
        cell.scale
    );
}

#[tokio::test]
async fn test_custom_range_selects_in_document_order() {
    let mut engine = ReflowEngine::new(test_document(10));
    let snapshot = SettingsSnapshot {
        page_filter: PageFilter::Custom("9,2,4-6".into()),
        ..Default::default()
    };

    let report = engine.apply(snapshot).await.unwrap();
    assert_eq!(report.sheets, 5);
    assert!(report.range_notice.is_none());

    let output = engine.output().unwrap();
    assert_eq!(output.selected, vec![2, 4, 5, 6, 9]);
    let pages: Vec<usize> = output
        .sheets
        .iter()
        .flat_map(|s| s.cells.iter().map(|c| c.page))
        .collect();
    assert_eq!(pages, vec![2, 4, 5, 6, 9]);
}

#[tokio::test]
async fn test_invalid_range_falls_back_to_all_pages() {
    let mut engine = ReflowEngine::new(test_document(10));
    let snapshot = SettingsSnapshot {
        page_filter: PageFilter::Custom("2,11".into()),
        ..Default::default()
    };

    // A rejected filter is not a failed cycle: the preview shows every page
    // and the notice explains why.
    let report = engine.apply(snapshot).await.unwrap();
    assert_eq!(engine.state(), ReflowState::Ready);
    assert_eq!(report.sheets, 10);
    let notice = report.range_notice.expect("fallback should carry a notice");
    assert!(notice.contains("11"), "notice should name the bad page: {notice}");

    let output = engine.output().unwrap();
    assert!(output.filter_fallback());
    assert_eq!(output.selected, (1..=10).collect::<Vec<_>>());
    assert_eq!(
        output.stats.total_sheets, None,
        "totals are unknowable while the range text is unresolved"
    );
}

#[tokio::test]
async fn test_current_page_out_of_bounds_falls_back() {
    let mut engine = ReflowEngine::new(test_document(5));
    let snapshot = SettingsSnapshot {
        page_filter: PageFilter::CurrentPage(7),
        ..Default::default()
    };

    let report = engine.apply(snapshot).await.unwrap();
    assert!(report.range_notice.is_some());
    assert_eq!(engine.output().unwrap().selected, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_current_page_selects_single_page() {
    let mut engine = ReflowEngine::new(test_document(5));
    let snapshot = SettingsSnapshot {
        page_filter: PageFilter::CurrentPage(3),
        ..Default::default()
    };

    let report = engine.apply(snapshot).await.unwrap();
    assert_eq!(report.sheets, 1);
    assert_eq!(engine.output().unwrap().selected, vec![3]);
    assert_eq!(engine.output().unwrap().stats.total_sheets, Some(1));
}

#[tokio::test]
async fn test_failed_cycle_keeps_last_good_output() {
    let mut engine = ReflowEngine::new(test_document(4));
    engine.apply(SettingsSnapshot::default()).await.unwrap();
    assert_eq!(engine.output().unwrap().generation, 1);

    // A 400pt margin cannot fit on A4; the cycle fails but the last good
    // output stays on screen.
    let bad = SettingsSnapshot {
        margin: MarginMode::Custom(400.0),
        ..Default::default()
    };
    let err = engine.apply(bad).await.unwrap_err();
    assert!(matches!(err, PreviewError::Geometry(_)), "got {err:?}");
    assert_eq!(engine.state(), ReflowState::Failed);
    assert!(engine.last_error().is_some());

    let output = engine.output().unwrap();
    assert_eq!(output.generation, 1, "failed cycle must not replace output");
    assert_eq!(output.sheets.len(), 4);

    // The next settings event clears the failure.
    engine.queue(SettingsSnapshot::default());
    assert_eq!(engine.state(), ReflowState::Idle);
    let report = engine.reflow().await.unwrap().unwrap();
    assert_eq!(engine.state(), ReflowState::Ready);
    assert_eq!(report.generation, 3);
}

#[tokio::test]
async fn test_queue_coalesces_to_latest_snapshot() {
    let mut engine = ReflowEngine::new(test_document(8));

    engine.queue(SettingsSnapshot {
        pages_per_sheet: PagesPerSheet::Four,
        ..Default::default()
    });
    engine.queue(SettingsSnapshot {
        pages_per_sheet: PagesPerSheet::Nine,
        ..Default::default()
    });
    assert!(engine.has_pending());

    let report = engine.reflow().await.unwrap().unwrap();
    assert_eq!(report.sheets, 1, "8 pages fit one 9-up sheet");
    assert_eq!(engine.generation(), 1, "superseded snapshot must not run");
    assert_eq!(
        engine.output().unwrap().snapshot.pages_per_sheet,
        PagesPerSheet::Nine
    );

    assert!(engine.reflow().await.is_none(), "queue should be drained");
}

#[tokio::test]
async fn test_refresh_replays_current_snapshot() {
    let mut engine = ReflowEngine::new(test_document(8));
    assert!(engine.refresh().await.is_none(), "nothing applied yet");

    let snapshot = SettingsSnapshot {
        pages_per_sheet: PagesPerSheet::Four,
        ..Default::default()
    };
    engine.apply(snapshot.clone()).await.unwrap();

    let report = engine.refresh().await.unwrap().unwrap();
    assert_eq!(report.generation, 2);
    assert_eq!(report.sheets, 2);
    assert_eq!(engine.output().unwrap().snapshot, snapshot);
}

#[tokio::test]
async fn test_replace_document_clears_preview() {
    let mut engine = ReflowEngine::new(test_document(5));
    engine.apply(SettingsSnapshot::default()).await.unwrap();
    assert!(engine.output().is_some());

    engine.replace_document(test_document(3));
    assert!(engine.output().is_none());
    assert_eq!(engine.state(), ReflowState::Idle);

    let report = engine.apply(SettingsSnapshot::default()).await.unwrap();
    assert_eq!(report.sheets, 3);
}

#[tokio::test]
async fn test_empty_document_yields_empty_preview() {
    let mut engine = ReflowEngine::new(PagedDocument::default());

    let report = engine.apply(SettingsSnapshot::default()).await.unwrap();
    assert_eq!(engine.state(), ReflowState::Ready);
    assert_eq!(report.sheets, 0);

    let output = engine.output().unwrap();
    assert!(output.sheets.is_empty());
    assert!(output.selected.is_empty());
    assert_eq!(output.stats.total_sheets, Some(0));
}

#[tokio::test]
async fn test_same_snapshot_yields_identical_sheets() {
    let mut engine = ReflowEngine::new(test_document(7));
    let snapshot = SettingsSnapshot {
        pages_per_sheet: PagesPerSheet::Four,
        page_order: PageOrder::ColumnMajor,
        ..Default::default()
    };

    engine.apply(snapshot.clone()).await.unwrap();
    let first = engine.output().unwrap().clone();
    engine.apply(snapshot).await.unwrap();
    let second = engine.output().unwrap();

    assert_eq!(first.sheets, second.sheets);
    assert_eq!(first.selected, second.selected);
    assert_eq!(first.geometry, second.geometry);
    assert_eq!(first.arrangement, second.arrangement);
    assert_eq!(first.stats, second.stats);
}

#[tokio::test]
async fn test_duplex_halves_total_sheets() {
    let mut engine = ReflowEngine::new(test_document(5));

    let simplex = SettingsSnapshot {
        copies: 3,
        ..Default::default()
    };
    engine.apply(simplex).await.unwrap();
    assert_eq!(engine.output().unwrap().stats.total_sheets, Some(15));

    // 15 faces double-sided round up to 8 physical sheets.
    let duplex = SettingsSnapshot {
        copies: 3,
        duplex: Duplex::LongEdge,
        ..Default::default()
    };
    engine.apply(duplex).await.unwrap();
    assert_eq!(engine.output().unwrap().stats.total_sheets, Some(8));

    let short_edge = SettingsSnapshot {
        copies: 3,
        duplex: Duplex::ShortEdge,
        ..Default::default()
    };
    engine.apply(short_edge).await.unwrap();
    assert_eq!(engine.output().unwrap().stats.total_sheets, Some(8));
}

#[tokio::test]
async fn test_query_totals_without_reflowing() {
    let engine = ReflowEngine::new(test_document(10));

    let snapshot = SettingsSnapshot {
        page_filter: PageFilter::Custom("1-4".into()),
        pages_per_sheet: PagesPerSheet::Four,
        copies: 2,
        ..Default::default()
    };
    assert_eq!(engine.query_totals(&snapshot), Some(2));

    let unresolved = SettingsSnapshot {
        page_filter: PageFilter::Custom("2,11".into()),
        ..Default::default()
    };
    assert_eq!(engine.query_totals(&unresolved), None);

    let invalid = SettingsSnapshot {
        copies: 0,
        ..Default::default()
    };
    assert_eq!(engine.query_totals(&invalid), None);

    // Queries never disturb the engine.
    assert_eq!(engine.state(), ReflowState::Idle);
    assert_eq!(engine.generation(), 0);
}

#[tokio::test]
async fn test_regeneration_callback_receives_selection() {
    let captured: Arc<Mutex<Option<DocumentInfo>>> = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&captured);

    let callback: Arc<RegenerateFn> = Arc::new(move |info: &DocumentInfo| {
        *seen.lock().unwrap() = Some(info.clone());
        Ok(info
            .pages
            .iter()
            .map(|_| LogicalPage::new(PageContent::from(&b"regen"[..]), 500.0, 500.0, 0.0))
            .collect())
    });

    let mut engine = ReflowEngine::new(test_document(6)).with_regenerator(callback);
    let snapshot = SettingsSnapshot {
        page_filter: PageFilter::Custom("1-3".into()),
        margin: MarginMode::None,
        orientation: Orientation::Landscape,
        color_mode: ColorMode::Grayscale,
        ..Default::default()
    };
    engine.apply(snapshot).await.unwrap();

    let info = captured.lock().unwrap().clone().expect("callback never ran");
    assert_eq!(info.pages, vec![1, 2, 3]);
    assert_eq!(info.margin_pt, 0.0);
    assert_eq!(info.orientation, Orientation::Landscape);
    assert_eq!(info.color, ColorMode::Grayscale);
    assert_eq!(info.size, PaperSize::A4);
    assert_eq!(info.pages_per_sheet, PagesPerSheet::One);
    assert_eq!(info.scale, ScalePolicy::Auto);

    // The preview lays out the regenerated pages, not the source snapshot.
    let output = engine.output().unwrap();
    assert_eq!(output.pages.len(), 3);
    assert_eq!(output.pages[0].width_pt, 500.0);
    assert_eq!(output.pages[0].content.as_bytes(), b"regen");
}

#[tokio::test]
async fn test_regeneration_error_keeps_last_good_output() {
    let mut engine = ReflowEngine::new(test_document(3));
    engine.apply(SettingsSnapshot::default()).await.unwrap();

    let callback: Arc<RegenerateFn> =
        Arc::new(|_info: &DocumentInfo| anyhow::bail!("renderer offline"));
    engine = engine.with_regenerator(callback);

    let err = engine.apply(SettingsSnapshot::default()).await.unwrap_err();
    match err {
        PreviewError::Regeneration(message) => {
            assert!(message.contains("renderer offline"), "got: {message}")
        }
        other => panic!("expected a regeneration error, got {other:?}"),
    }
    assert_eq!(engine.state(), ReflowState::Failed);
    assert_eq!(engine.output().unwrap().generation, 1);
}

#[tokio::test]
async fn test_regeneration_page_count_mismatch_fails() {
    let callback: Arc<RegenerateFn> = Arc::new(|_info: &DocumentInfo| {
        Ok(vec![LogicalPage::new(PageContent::empty(), 612.0, 792.0, 36.0)])
    });

    let mut engine = ReflowEngine::new(test_document(4)).with_regenerator(callback);
    let snapshot = SettingsSnapshot {
        page_filter: PageFilter::Custom("1-2".into()),
        ..Default::default()
    };

    let err = engine.apply(snapshot).await.unwrap_err();
    assert!(matches!(err, PreviewError::Regeneration(_)), "got {err:?}");
    assert_eq!(engine.state(), ReflowState::Failed);
}

#[tokio::test]
async fn test_snapshot_content_shares_source_bytes() {
    let document = test_document(2);
    let source_ptr = document.page(1).unwrap().content.as_bytes().as_ptr();

    let mut engine = ReflowEngine::new(document);
    engine.apply(SettingsSnapshot::default()).await.unwrap();

    // Without a regenerator the preview snapshots page content by reference.
    let output = engine.output().unwrap();
    assert_eq!(output.pages[0].content.as_bytes().as_ptr(), source_ptr);
}
