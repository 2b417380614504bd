//! Preview worker task
//!
//! Owns the reflow engine for one dialog session and services commands over
//! channels. Rapid settings changes coalesce: queued updates are drained and
//! only the newest snapshot is reflowed, so a slider drag costs one cycle
//! instead of dozens.

use preview_reflow::{PreviewError, ReflowEngine, ReflowReport, SettingsSnapshot};
use tokio::sync::mpsc;

use crate::{PreviewCommand, PreviewUpdate};

/// Async worker task that processes preview commands and sends updates.
///
/// Runs until `Commit` or `Cancel` arrives (the `Closed` update says which)
/// or the command channel closes.
pub async fn worker_task(
    mut engine: ReflowEngine,
    mut command_rx: mpsc::UnboundedReceiver<PreviewCommand>,
    update_tx: mpsc::UnboundedSender<PreviewUpdate>,
) {
    // Latest user intent, for totals queries that arrive between reflows.
    let mut snapshot = engine
        .output()
        .map(|o| o.snapshot.clone())
        .unwrap_or_default();

    while let Some(cmd) = command_rx.recv().await {
        let keep_running = process_command(
            cmd,
            &mut engine,
            &mut snapshot,
            &mut command_rx,
            &update_tx,
        )
        .await;
        if !keep_running {
            return;
        }
    }
}

async fn process_command(
    cmd: PreviewCommand,
    engine: &mut ReflowEngine,
    snapshot: &mut SettingsSnapshot,
    command_rx: &mut mpsc::UnboundedReceiver<PreviewCommand>,
    update_tx: &mpsc::UnboundedSender<PreviewUpdate>,
) -> bool {
    match cmd {
        PreviewCommand::UpdateSettings {
            snapshot: mut requested,
        } => {
            *snapshot = requested.clone();

            // Drain queued settings changes, keeping only the most recent
            let mut close_after = None;
            while let Ok(next_cmd) = command_rx.try_recv() {
                match next_cmd {
                    PreviewCommand::UpdateSettings { snapshot: newer } => {
                        log::debug!("Discarding queued settings update, using newer request");
                        requested = newer;
                        *snapshot = requested.clone();
                    }
                    PreviewCommand::Commit | PreviewCommand::Cancel => {
                        // The close must still see this settings change, so
                        // apply first and close afterwards.
                        close_after = Some(next_cmd);
                        break;
                    }
                    other @ (PreviewCommand::RegenerateContent | PreviewCommand::QueryTotals) => {
                        Box::pin(process_command(
                            other, engine, snapshot, command_rx, update_tx,
                        ))
                        .await;
                    }
                }
            }

            let _ = update_tx.send(PreviewUpdate::Progress {
                stage: "reflow".to_string(),
            });
            let result = engine.apply(requested).await;
            report_cycle(engine, result, update_tx);

            match close_after {
                Some(cmd) => {
                    Box::pin(process_command(
                        cmd, engine, snapshot, command_rx, update_tx,
                    ))
                    .await
                }
                None => true,
            }
        }
        PreviewCommand::RegenerateContent => {
            let _ = update_tx.send(PreviewUpdate::Progress {
                stage: "regenerate".to_string(),
            });
            match engine.refresh().await {
                Some(result) => report_cycle(engine, result, update_tx),
                None => log::debug!("Content change before any reflow, nothing to replay"),
            }
            true
        }
        PreviewCommand::QueryTotals => {
            let _ = update_tx.send(PreviewUpdate::Totals {
                total_sheets: engine.query_totals(snapshot),
            });
            true
        }
        PreviewCommand::Commit => {
            let _ = update_tx.send(PreviewUpdate::Closed { accepted: true });
            false
        }
        PreviewCommand::Cancel => {
            let _ = update_tx.send(PreviewUpdate::Closed { accepted: false });
            false
        }
    }
}

/// Translate one finished cycle into dialog updates
fn report_cycle(
    engine: &ReflowEngine,
    result: Result<ReflowReport, PreviewError>,
    update_tx: &mpsc::UnboundedSender<PreviewUpdate>,
) {
    match result {
        Ok(report) => {
            let _ = update_tx.send(PreviewUpdate::PreviewReady {
                generation: report.generation,
                sheet_count: report.sheets,
            });
            if let Some(message) = report.range_notice {
                let _ = update_tx.send(PreviewUpdate::RangeNotice { message });
            }
            let total_sheets = engine.output().and_then(|o| o.stats.total_sheets);
            let _ = update_tx.send(PreviewUpdate::Totals { total_sheets });
        }
        Err(e) => {
            let _ = update_tx.send(PreviewUpdate::Error {
                message: e.to_string(),
            });
        }
    }
}
