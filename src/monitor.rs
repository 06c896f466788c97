use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::diff::diff_snapshots;
use crate::directory::{FetchError, ProgramDirectory};
use crate::notify::ReportSink;
use crate::report::text::render_report;
use crate::snapshot::{SnapshotStore, StoreError};

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// First run: the fetched snapshot became the baseline, nothing to report.
    Baseline,
    NoChanges,
    Reported {
        new_programs: usize,
        updated_programs: usize,
    },
}

/// One complete check: fetch, compare against the stored baseline, report
/// changes, then persist the fetch as the new baseline.
///
/// Effects are strictly ordered. A fetch or load failure aborts before the
/// store is touched; a sink failure is logged and never fatal; a save failure
/// after emission is the cycle's error, but the emitted report stands.
pub async fn run_cycle(
    directory: &dyn ProgramDirectory,
    store: &SnapshotStore,
    sinks: &[Box<dyn ReportSink>],
) -> Result<CycleOutcome, CycleError> {
    let current = directory.fetch_current().await?;
    debug!(
        source = directory.name(),
        programs = current.len(),
        "fetched snapshot"
    );

    let previous = match store.load_previous() {
        Ok(previous) => previous,
        Err(StoreError::NotFound) => {
            store.save(&current)?;
            info!(
                programs = current.len(),
                "no previous snapshot; saved current as baseline"
            );
            return Ok(CycleOutcome::Baseline);
        }
        Err(err) => return Err(err.into()),
    };

    let changes = diff_snapshots(&previous, &current);
    let outcome = if changes.is_empty() {
        CycleOutcome::NoChanges
    } else {
        let report = render_report(&changes);
        for sink in sinks {
            if let Err(err) = sink.emit(&report).await {
                warn!("failed emitting report: {err}");
            }
        }
        CycleOutcome::Reported {
            new_programs: changes.new_programs.len(),
            updated_programs: changes.new_scopes.len(),
        }
    };

    store.save(&current)?;
    Ok(outcome)
}

/// One immediate check, then one per interval, forever. Cycles run strictly
/// in sequence; a failed cycle is logged and the loop keeps going.
pub async fn run_watch_loop(
    directory: &dyn ProgramDirectory,
    store: &SnapshotStore,
    sinks: &[Box<dyn ReportSink>],
    interval: Duration,
) {
    loop {
        match run_cycle(directory, store, sinks).await {
            Ok(CycleOutcome::Baseline) => info!("baseline captured"),
            Ok(CycleOutcome::NoChanges) => debug!("no changes this cycle"),
            Ok(CycleOutcome::Reported {
                new_programs,
                updated_programs,
            }) => info!(new_programs, updated_programs, "changes reported"),
            Err(err) => warn!("check cycle failed: {err}"),
        }
        tokio::time::sleep(interval).await;
    }
}
