//! Count-job lifecycle controller.
//!
//! Owns at most one active counting job: submission, the periodic poll
//! loop, cooperative cancellation, and teardown. All "concurrency" is a
//! single poll thread per armed job plus controller methods called from
//! the caller's thread.
//!
//! ## Generation guard
//!
//! Every poll loop is tagged with the generation it was armed for.
//! `start` and `dispose` bump the generation; any response belonging to
//! an older generation is dropped before it touches shared state, so a
//! superseded job can never clobber a newer one, and nothing armed
//! before `dispose` can mutate state afterward.
//!
//! ## Cancellation is cooperative
//!
//! `cancel` only asks the service to stop; the poll loop keeps running
//! until a terminal snapshot arrives. The server is the sole authority
//! on job termination.

use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use squaresum_core::PuzzleSpec;
use squaresum_protocol::{CountJobStatus, CountMode, JobState, StartCountRequest};

use crate::error::ClientError;
use crate::solver::SolverClient;

// ── Options ─────────────────────────────────────────────────────────

/// Counting options supplied alongside a validated puzzle.
#[derive(Debug, Clone)]
pub struct CountOptions {
    pub mode: CountMode,
    pub max_seconds: Option<f64>,
    pub sample_paths: u32,
    pub use_multiprocessing: bool,
    pub workers: Option<u32>,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            mode: CountMode::Auto,
            max_seconds: Some(5.0),
            sample_paths: 200,
            use_multiprocessing: false,
            workers: None,
        }
    }
}

impl CountOptions {
    /// Build the wire request, enforcing the option invariants:
    /// auto mode requires a positive time budget, sample_paths and
    /// workers must be at least 1.
    pub fn to_request(&self, spec: &PuzzleSpec) -> Result<StartCountRequest, ClientError> {
        if self.mode == CountMode::Auto {
            match self.max_seconds {
                Some(secs) if secs > 0.0 => {}
                _ => {
                    return Err(ClientError::InvalidRequest(
                        "max_seconds must be positive when mode is auto".into(),
                    ))
                }
            }
        }
        if self.sample_paths < 1 {
            return Err(ClientError::InvalidRequest("sample_paths must be >= 1".into()));
        }
        if matches!(self.workers, Some(0)) {
            return Err(ClientError::InvalidRequest("workers must be >= 1".into()));
        }

        Ok(StartCountRequest {
            target: spec.target,
            size: spec.size,
            known_grid: spec.known_grid.clone(),
            game_mode: spec.game_mode,
            mode: self.mode,
            max_seconds: self.max_seconds,
            sample_paths: self.sample_paths,
            use_multiprocessing: self.use_multiprocessing,
            workers: self.workers,
        })
    }
}

// ── Phase ───────────────────────────────────────────────────────────

/// Client-side lifecycle phase. The transient server-side `canceling`
/// state shows up inside `Polling` via the latest snapshot, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Idle,
    Starting,
    Polling,
    Completed,
    Canceled,
    Failed,
}

impl JobPhase {
    /// A job is in flight: UI disable-flags derive from this.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Starting | Self::Polling)
    }
}

// ── Controller ──────────────────────────────────────────────────────

struct Inner {
    /// Bumped by `start` and `dispose`; ties poll loops to their job.
    generation: u64,
    phase: JobPhase,
    job_id: Option<String>,
    snapshot: Option<CountJobStatus>,
    /// Last transient message (submission failure, poll transport
    /// error). Cleared when a new job starts.
    notice: Option<String>,
}

type Shared = (Mutex<Inner>, Condvar);

/// Lifecycle controller for at most one active counting job.
///
/// Dropping the controller does not stop a running poll loop by itself;
/// call [`dispose`](Self::dispose) on teardown. The loop thread holds
/// its own `Arc` to the shared slot, so a dropped-without-dispose
/// controller leaks nothing beyond one sleeping thread per job, which
/// exits at its next terminal or stale-generation check.
pub struct CountJobController {
    client: SolverClient,
    shared: Arc<Shared>,
    poll_interval: Duration,
}

impl CountJobController {
    pub fn new(client: SolverClient) -> Self {
        Self::with_poll_interval(client, Duration::from_millis(1000))
    }

    pub fn with_poll_interval(client: SolverClient, poll_interval: Duration) -> Self {
        let inner = Inner {
            generation: 0,
            phase: JobPhase::Idle,
            job_id: None,
            snapshot: None,
            notice: None,
        };
        Self {
            client,
            shared: Arc::new((Mutex::new(inner), Condvar::new())),
            poll_interval,
        }
    }

    /// Submit a counting job and arm the poll loop.
    ///
    /// Any previously armed loop is superseded first (its generation is
    /// bumped), so two loops never write to the same status slot. On a
    /// submission failure the controller returns to `Idle` with a
    /// notice; the caller may retry.
    ///
    /// Exact-mode confirmation (the irreversible-cost warning) is a UI
    /// concern: the request is accepted as given.
    pub fn start(&self, request: StartCountRequest) -> Result<String, ClientError> {
        let my_generation = {
            let (lock, cvar) = &*self.shared;
            let mut inner = lock.lock().unwrap();
            inner.generation += 1;
            inner.phase = JobPhase::Starting;
            inner.job_id = None;
            inner.snapshot = None;
            inner.notice = None;
            cvar.notify_all();
            inner.generation
        };

        // Network call happens outside the lock; dispose() may run
        // while it is in flight.
        let result = self.client.start_count_job(&request);

        let (lock, cvar) = &*self.shared;
        let mut inner = lock.lock().unwrap();
        if inner.generation != my_generation {
            // Disposed or re-armed mid-start: discard whatever the
            // network produced.
            log::debug!("start superseded before resolution");
            return Err(ClientError::Superseded);
        }

        match result {
            Ok(job_id) => {
                inner.phase = JobPhase::Polling;
                inner.job_id = Some(job_id.clone());
                cvar.notify_all();
                drop(inner);

                let client = self.client.clone();
                let shared = Arc::clone(&self.shared);
                let interval = self.poll_interval;
                let loop_job_id = job_id.clone();
                thread::spawn(move || {
                    poll_loop(client, shared, my_generation, loop_job_id, interval);
                });

                log::info!("count job {job_id} started");
                Ok(job_id)
            }
            Err(err) => {
                inner.phase = JobPhase::Idle;
                inner.notice = Some(err.to_string());
                cvar.notify_all();
                Err(err)
            }
        }
    }

    /// Request cancellation of the currently polling job.
    ///
    /// Does not stop the poll loop: confirmation only arrives when a
    /// later poll returns a terminal `canceled` snapshot. A failed
    /// cancel call leaves the loop running unchanged.
    pub fn cancel(&self) -> Result<(), ClientError> {
        let job_id = {
            let (lock, _) = &*self.shared;
            let inner = lock.lock().unwrap();
            if inner.phase != JobPhase::Polling {
                return Err(ClientError::InvalidRequest("no counting job is active".into()));
            }
            inner.job_id.clone().expect("polling phase implies a job id")
        };

        self.client.cancel_job(&job_id)
    }

    /// Tear down: unconditionally stop the poll loop and suppress any
    /// in-flight request from producing further state changes. Always
    /// wins against concurrent operations.
    pub fn dispose(&self) {
        let (lock, cvar) = &*self.shared;
        let mut inner = lock.lock().unwrap();
        inner.generation += 1;
        inner.phase = JobPhase::Idle;
        inner.job_id = None;
        inner.snapshot = None;
        cvar.notify_all();
    }

    /// Current phase plus the latest polled snapshot, for presentation.
    pub fn snapshot(&self) -> (JobPhase, Option<CountJobStatus>) {
        let (lock, _) = &*self.shared;
        let inner = lock.lock().unwrap();
        (inner.phase, inner.snapshot.clone())
    }

    /// Last transient notice (submission or poll transport failure).
    pub fn notice(&self) -> Option<String> {
        let (lock, _) = &*self.shared;
        lock.lock().unwrap().notice.clone()
    }

    /// Block until the controller leaves the active phases or the
    /// timeout elapses. Returns the phase observed last.
    pub fn wait_terminal(&self, timeout: Duration) -> JobPhase {
        let deadline = Instant::now() + timeout;
        let (lock, cvar) = &*self.shared;
        let mut inner = lock.lock().unwrap();
        while inner.phase.is_active() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (guard, _) = cvar.wait_timeout(inner, deadline - now).unwrap();
            inner = guard;
        }
        inner.phase
    }
}

// ── Poll loop ───────────────────────────────────────────────────────

fn poll_loop(
    client: SolverClient,
    shared: Arc<Shared>,
    my_generation: u64,
    job_id: String,
    interval: Duration,
) {
    loop {
        // The next tick is not issued until this one is fully applied,
        // so snapshots land in issue order within a generation.
        let result = client.job_status(&job_id);

        let (lock, cvar) = &*shared;
        let mut inner = lock.lock().unwrap();
        if inner.generation != my_generation {
            log::debug!("dropping stale poll response for job {job_id}");
            return;
        }

        match result {
            Ok(snapshot) => {
                let state = snapshot.status;
                inner.snapshot = Some(snapshot);
                if state.is_terminal() {
                    inner.phase = match state {
                        JobState::Completed => JobPhase::Completed,
                        JobState::Canceled => JobPhase::Canceled,
                        _ => JobPhase::Failed,
                    };
                    log::info!("count job {job_id} reached {}", state.as_str());
                    cvar.notify_all();
                    return;
                }
                cvar.notify_all();
            }
            Err(err) => {
                // Transport or decode failure terminates the local view
                // without contacting the server again.
                inner.phase = JobPhase::Failed;
                inner.notice = Some(err.to_string());
                log::warn!("poll failed for job {job_id}: {err}");
                cvar.notify_all();
                return;
            }
        }

        // Sleep one interval, waking early if the generation moves on.
        let deadline = Instant::now() + interval;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (guard, _) = cvar.wait_timeout(inner, deadline - now).unwrap();
            inner = guard;
            if inner.generation != my_generation {
                return;
            }
        }
        drop(inner);
    }
}
