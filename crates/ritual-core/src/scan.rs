//! Background region scans.
//!
//! Some variants look for cells that random sampling rarely hits (stone deep
//! inside a large area, scattered ore). The tick thread captures a
//! [`RegionSnapshot`] around the ritual and submits it to the
//! [`ScanWorker`]; the worker filters the snapshot on its own thread and
//! sends matching positions back. Results are drained on the tick thread
//! and re-verified against the live world before they are cached, so the
//! worker never touches the world and a stale result is harmless.

use std::sync::mpsc;
use std::thread;

use ritual_types::{CellState, Position, RitualId, ScanId};
use ritual_world::{RegionSnapshot, WorldError};
use tracing::{debug, warn};

/// Most positions a single scan reports back.
pub const MAX_SCAN_RESULTS: usize = 256;

/// Errors that can occur when submitting scans.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The worker thread could not be started.
    #[error("failed to spawn scan worker thread: {source}")]
    Spawn {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The worker thread has stopped and no longer accepts requests.
    #[error("scan worker has shut down")]
    WorkerGone,

    /// The region could not be captured.
    #[error("failed to capture scan region: {source}")]
    Snapshot {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// A region to scan for one ritual.
#[derive(Debug)]
pub struct ScanRequest {
    /// Identifier echoed back in the result.
    pub id: ScanId,
    /// The ritual that asked for the scan.
    pub ritual: RitualId,
    /// The ritual's origin; results are ordered nearest first.
    pub origin: Position,
    /// The captured cells.
    pub snapshot: RegionSnapshot,
    /// Which cells to report.
    pub filter: fn(CellState) -> bool,
}

/// Positions found by one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// The request this answers.
    pub id: ScanId,
    /// The ritual that asked for the scan.
    pub ritual: RitualId,
    /// Matching positions, nearest to the origin first, at most
    /// [`MAX_SCAN_RESULTS`].
    pub positions: Vec<Position>,
}

/// Run one scan. Pure; used by the worker thread and directly in tests.
pub fn run_scan(request: &ScanRequest) -> ScanResult {
    let mut positions = request.snapshot.positions_matching(request.filter);
    positions.sort_by_key(|pos| pos.chebyshev_distance(request.origin));
    positions.truncate(MAX_SCAN_RESULTS);
    ScanResult {
        id: request.id,
        ritual: request.ritual,
        positions,
    }
}

/// A dedicated thread that runs scans off the tick thread.
#[derive(Debug)]
pub struct ScanWorker {
    tx: Option<mpsc::Sender<ScanRequest>>,
    rx: mpsc::Receiver<ScanResult>,
    handle: Option<thread::JoinHandle<()>>,
    pending: usize,
}

impl ScanWorker {
    /// Start the worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Spawn`] if the thread cannot be created.
    pub fn spawn() -> Result<Self, ScanError> {
        let (request_tx, request_rx) = mpsc::channel::<ScanRequest>();
        let (result_tx, result_rx) = mpsc::channel::<ScanResult>();
        let handle = thread::Builder::new()
            .name("ritual-scan-worker".into())
            .spawn(move || {
                while let Ok(request) = request_rx.recv() {
                    let result = run_scan(&request);
                    debug!(
                        scan = %result.id,
                        ritual = %result.ritual,
                        found = result.positions.len(),
                        "scan finished"
                    );
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            tx: Some(request_tx),
            rx: result_rx,
            handle: Some(handle),
            pending: 0,
        })
    }

    /// Queue a scan. Never blocks.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::WorkerGone`] if the worker has stopped.
    pub fn submit(&mut self, request: ScanRequest) -> Result<ScanId, ScanError> {
        let id = request.id;
        let tx = self.tx.as_ref().ok_or(ScanError::WorkerGone)?;
        if tx.send(request).is_err() {
            return Err(ScanError::WorkerGone);
        }
        self.pending = self.pending.saturating_add(1);
        Ok(id)
    }

    /// Every result that has arrived so far. Never blocks.
    pub fn drain(&mut self) -> Vec<ScanResult> {
        let results: Vec<ScanResult> = self.rx.try_iter().collect();
        self.pending = self.pending.saturating_sub(results.len());
        results
    }

    /// Block until every submitted scan has reported back.
    pub fn wait_all(&mut self) -> Vec<ScanResult> {
        let mut results = Vec::with_capacity(self.pending);
        while self.pending > 0 {
            let Ok(result) = self.rx.recv() else {
                warn!(pending = self.pending, "scan worker stopped with scans outstanding");
                self.pending = 0;
                break;
            };
            self.pending = self.pending.saturating_sub(1);
            results.push(result);
        }
        results
    }

    /// Scans submitted but not yet drained.
    pub const fn pending(&self) -> usize {
        self.pending
    }
}

impl Drop for ScanWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.tx.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("scan worker thread panicked");
        }
    }
}
