//! Off-thread snapshot writing.
//!
//! ```text
//!   step loop                         writer thread ("viscid-writer")
//!   ─────────                         ───────────────────────────────
//!   write(step, u, v)
//!     copy planes ──[jobs: bounded(N)]──► inner.write(step, u, v)
//!     Full → Rejected                       failure → warn!, counted
//!   flush()  ──── Flush(reply) ──────────► inner.flush() + failure count
//!            ◄──── [reply: bounded(1)] ───
//!   drop / finish()  close channel, join ► final flush, return inner
//! ```
//!
//! The loop never blocks on I/O: when the queue is full the sample is
//! dropped and reported as [`SinkError::Rejected`].

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, warn};
use viscid_core::{PlaneView, SinkError, SnapshotSink, StepId};

enum Job {
    Write {
        step: StepId,
        width: usize,
        height: usize,
        u: Vec<f64>,
        v: Vec<f64>,
    },
    Flush(Sender<Result<(), SinkError>>),
}

/// Runs an inner [`SnapshotSink`] on a dedicated writer thread.
pub struct BackgroundSnapshotSink<S: SnapshotSink + 'static> {
    jobs: Option<Sender<Job>>,
    writer: Option<JoinHandle<S>>,
}

impl<S: SnapshotSink + 'static> BackgroundSnapshotSink<S> {
    /// Move `inner` onto a writer thread with room for `capacity` queued
    /// snapshots (at least 1).
    pub fn new(inner: S, capacity: usize) -> Result<Self, SinkError> {
        let (jobs, rx) = crossbeam_channel::bounded(capacity.max(1));
        let writer = thread::Builder::new()
            .name("viscid-writer".into())
            .spawn(move || writer_loop(inner, rx))
            .map_err(|e| SinkError::Io {
                reason: format!("could not spawn writer thread: {e}"),
            })?;
        Ok(Self {
            jobs: Some(jobs),
            writer: Some(writer),
        })
    }

    /// Drain the queue, stop the writer and hand back the inner sink.
    pub fn finish(mut self) -> Result<S, SinkError> {
        self.shutdown().ok_or(SinkError::Closed)
    }

    fn shutdown(&mut self) -> Option<S> {
        // Closing the channel ends the writer loop once the queue drains.
        drop(self.jobs.take());
        let handle = self.writer.take()?;
        match handle.join() {
            Ok(inner) => Some(inner),
            Err(_) => {
                warn!("snapshot writer thread panicked");
                None
            }
        }
    }
}

fn writer_loop<S: SnapshotSink>(mut inner: S, rx: Receiver<Job>) -> S {
    let mut failed: u64 = 0;
    let mut last_error: Option<SinkError> = None;
    for job in rx {
        match job {
            Job::Write {
                step,
                width,
                height,
                u,
                v,
            } => {
                let result = inner.write(
                    step,
                    PlaneView::new(width, height, &u),
                    PlaneView::new(width, height, &v),
                );
                if let Err(e) = result {
                    warn!(step = step.0, error = %e, "background snapshot write failed");
                    failed += 1;
                    last_error = Some(e);
                }
            }
            Job::Flush(reply) => {
                let result = match last_error.take() {
                    Some(e) if failed > 1 => Err(SinkError::Io {
                        reason: format!("{failed} background writes failed, last: {e}"),
                    }),
                    Some(e) => Err(e),
                    None => inner.flush(),
                };
                failed = 0;
                // The caller may have given up waiting; nothing to do then.
                let _ = reply.send(result);
            }
        }
    }
    if let Err(e) = inner.flush() {
        warn!(error = %e, "final snapshot flush failed");
    }
    debug!("snapshot writer stopped");
    inner
}

impl<S: SnapshotSink + 'static> SnapshotSink for BackgroundSnapshotSink<S> {
    fn write(&mut self, step: StepId, u: PlaneView<'_>, v: PlaneView<'_>) -> Result<(), SinkError> {
        let jobs = self.jobs.as_ref().ok_or(SinkError::Closed)?;
        let job = Job::Write {
            step,
            width: u.width(),
            height: u.height(),
            u: u.as_slice().to_vec(),
            v: v.as_slice().to_vec(),
        };
        jobs.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::Rejected {
                reason: "writer queue full".into(),
            },
            TrySendError::Disconnected(_) => SinkError::Closed,
        })
    }

    /// Wait until every queued snapshot is written, then flush the inner
    /// sink. Reports write failures that happened since the last flush.
    fn flush(&mut self) -> Result<(), SinkError> {
        let jobs = self.jobs.as_ref().ok_or(SinkError::Closed)?;
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        jobs.send(Job::Flush(reply_tx))
            .map_err(|_| SinkError::Closed)?;
        reply_rx.recv().map_err(|_| SinkError::Closed)?
    }
}

impl<S: SnapshotSink + 'static> Drop for BackgroundSnapshotSink<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S: SnapshotSink + 'static> std::fmt::Debug for BackgroundSnapshotSink<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundSnapshotSink")
            .field("open", &self.jobs.is_some())
            .finish_non_exhaustive()
    }
}
