//! Concurrent access to the active tracking session.
//!
//! One producer (the vision pipeline) pushes samples while any number of
//! observers read published snapshots. All mutation happens under a single
//! mutex; each mutation publishes a complete `TrackingSnapshot` through a
//! `watch` channel, so readers see either the new state or the previous one.
//!
//! Every control operation advances the session epoch. Producers tag samples
//! with the epoch returned by `start`, and samples carrying an older epoch are
//! rejected as `Stale`.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{
    ImageSize, IngestOutcome, KinematicsTracker, NormalizedPoint, NormalizedRect, TrackerState,
    TrackingSessionStats, VelocityZone,
};
use crate::error::CalibrationError;

/// Monotonic session generation counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionEpoch(pub u64);

/// Immutable view of the tracker published after every change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingSnapshot {
    pub epoch: SessionEpoch,
    pub state: TrackerState,
    pub stats: TrackingSessionStats,
    /// Zone of the most recent velocity
    pub zone: VelocityZone,
}

struct Session {
    epoch: SessionEpoch,
    tracker: KinematicsTracker,
}

impl Session {
    fn snapshot(&self) -> TrackingSnapshot {
        let stats = self.tracker.stats();
        TrackingSnapshot {
            epoch: self.epoch,
            state: self.tracker.state(),
            stats,
            zone: self.tracker.color_for_velocity(stats.current_velocity),
        }
    }

    fn advance(&mut self) -> SessionEpoch {
        self.epoch = SessionEpoch(self.epoch.0 + 1);
        self.epoch
    }
}

struct Inner {
    session: Mutex<Session>,
    snapshots: watch::Sender<TrackingSnapshot>,
}

/// Cloneable handle to a tracker shared between a producer and observers
#[derive(Clone)]
pub struct SharedTracker {
    inner: Arc<Inner>,
}

impl SharedTracker {
    pub fn new(tracker: KinematicsTracker) -> Self {
        let session = Session {
            epoch: SessionEpoch(0),
            tracker,
        };
        let (snapshots, _) = watch::channel(session.snapshot());

        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(session),
                snapshots,
            }),
        }
    }

    fn publish(&self, session: &Session) {
        self.inner.snapshots.send_replace(session.snapshot());
    }

    /// Start a new session and return the epoch producers must tag samples with
    ///
    /// Any earlier session is discarded, even when calibration fails.
    pub fn start(
        &self,
        initial_region: NormalizedRect,
        image_size: ImageSize,
    ) -> Result<SessionEpoch, CalibrationError> {
        let mut session = self.inner.session.lock();
        let epoch = session.advance();
        let result = session.tracker.start(initial_region, image_size);
        self.publish(&session);

        result.map(|_| {
            info!(epoch = epoch.0, "Shared session started");
            epoch
        })
    }

    /// Ingest a sample produced for `epoch`
    pub fn ingest(
        &self,
        epoch: SessionEpoch,
        position: NormalizedPoint,
        timestamp: f64,
    ) -> IngestOutcome {
        let mut session = self.inner.session.lock();
        if session.epoch != epoch {
            debug!(
                sample_epoch = epoch.0,
                current_epoch = session.epoch.0,
                "Discarding stale sample"
            );
            return IngestOutcome::Stale;
        }

        let outcome = session.tracker.ingest(position, timestamp);
        if matches!(outcome, IngestOutcome::Accepted { .. }) {
            self.publish(&session);
        }
        outcome
    }

    /// Freeze the active session; samples still in flight become stale
    pub fn stop(&self) {
        let mut session = self.inner.session.lock();
        session.advance();
        session.tracker.stop();
        self.publish(&session);
    }

    /// Wipe the session and return to idle; samples still in flight become stale
    pub fn reset(&self) {
        let mut session = self.inner.session.lock();
        session.advance();
        session.tracker.reset();
        self.publish(&session);
    }

    /// Latest published snapshot. Never blocks on the producer.
    pub fn snapshot(&self) -> TrackingSnapshot {
        *self.inner.snapshots.borrow()
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<TrackingSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Current epoch
    pub fn epoch(&self) -> SessionEpoch {
        self.inner.session.lock().epoch
    }

    /// Run `f` against the tracker under the session lock
    pub fn with_tracker<R>(&self, f: impl FnOnce(&KinematicsTracker) -> R) -> R {
        let session = self.inner.session.lock();
        f(&session.tracker)
    }
}

impl Default for SharedTracker {
    fn default() -> Self {
        Self::new(KinematicsTracker::default())
    }
}

/// One tracked frame delivered by the vision worker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameObservation {
    pub epoch: SessionEpoch,
    pub position: NormalizedPoint,
    pub timestamp: f64,
}

/// Counts of what happened to the frames a worker consumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionSummary {
    pub accepted: usize,
    pub dropped: usize,
    pub ignored: usize,
    pub stale: usize,
}

impl IngestionSummary {
    pub fn record(&mut self, outcome: IngestOutcome) {
        match outcome {
            IngestOutcome::Accepted { .. } => self.accepted += 1,
            IngestOutcome::Dropped => self.dropped += 1,
            IngestOutcome::Ignored => self.ignored += 1,
            IngestOutcome::Stale => self.stale += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.accepted + self.dropped + self.ignored + self.stale
    }
}

/// Drain frames from `frames` into `tracker` on a tokio task
///
/// The task ends when every sender is dropped. Must be called from within a
/// tokio runtime.
pub fn spawn_ingestion(
    tracker: SharedTracker,
    mut frames: mpsc::Receiver<FrameObservation>,
) -> JoinHandle<IngestionSummary> {
    tokio::spawn(async move {
        let mut summary = IngestionSummary::default();
        while let Some(frame) = frames.recv().await {
            summary.record(tracker.ingest(frame.epoch, frame.position, frame.timestamp));
        }
        debug!(
            accepted = summary.accepted,
            dropped = summary.dropped,
            stale = summary.stale,
            "Ingestion worker finished"
        );
        summary
    })
}
