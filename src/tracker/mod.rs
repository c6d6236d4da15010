pub mod machine;

pub use machine::{ActivityState, PollingMachine};

use crate::categorizer::Categorizer;
use crate::constants::{
    IDLE_CHECK_TICKS, IDLE_THRESHOLD_SECS, MEETING_IDLE_THRESHOLD_SECS, MIN_ACTIVITY_SECS,
    MIN_INACTIVE_SECS, TICK_INTERVAL,
};
use crate::error::AppError;
use crate::platform::WindowInspector;
use crate::recorder::{lock_recorder, ActivityRecorder};
use chrono::Local;
use log::{error, info, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub tick_interval: Duration,
    pub idle_check_ticks: u32,
    pub idle_threshold_secs: u64,
    pub meeting_idle_threshold_secs: u64,
    pub min_activity_secs: u64,
    pub min_inactive_secs: u64,
    pub flush_on_stop: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            idle_check_ticks: IDLE_CHECK_TICKS,
            idle_threshold_secs: IDLE_THRESHOLD_SECS,
            meeting_idle_threshold_secs: MEETING_IDLE_THRESHOLD_SECS,
            min_activity_secs: MIN_ACTIVITY_SECS,
            min_inactive_secs: MIN_INACTIVE_SECS,
            flush_on_stop: false,
        }
    }
}

/// Runs the polling machine on a dedicated worker thread.
///
/// The control surface only calls `start`, `stop`, `restart` and
/// `is_running`. At most one worker exists at a time.
pub struct TrackerService {
    config: TrackerConfig,
    running: Arc<AtomicBool>,
    inspector: Arc<dyn WindowInspector>,
    categorizer: Arc<Categorizer>,
    recorder: Arc<Mutex<ActivityRecorder>>,
    failed_writes: Arc<AtomicU64>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TrackerService {
    pub fn new(
        inspector: Arc<dyn WindowInspector>,
        categorizer: Arc<Categorizer>,
        recorder: Arc<Mutex<ActivityRecorder>>,
        config: TrackerConfig,
    ) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            inspector,
            categorizer,
            recorder,
            failed_writes: Arc::new(AtomicU64::new(0)),
            worker: Mutex::new(None),
        }
    }

    fn lock_worker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("TrackerService: worker mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Spawn the worker unless one is running. Returns once the worker has
    /// seeded its initial activity; `Ok(false)` if it was already running.
    pub fn start(&self) -> Result<bool, AppError> {
        let mut worker = self.lock_worker();
        if let Some(handle) = worker.take() {
            if !handle.is_finished() {
                *worker = Some(handle);
                return Ok(false);
            }
            // Left behind by a worker that died without being stopped
            if handle.join().is_err() {
                warn!("Previous tracker worker panicked");
            }
        }

        self.running.store(true, Ordering::SeqCst);

        let running = RunningFlag(Arc::clone(&self.running));
        let inspector = Arc::clone(&self.inspector);
        let categorizer = Arc::clone(&self.categorizer);
        let recorder = Arc::clone(&self.recorder);
        let failed_writes = Arc::clone(&self.failed_writes);
        let config = self.config.clone();
        let (ready_tx, ready_rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("activity-tracker".to_string())
            .spawn(move || {
                let tick_interval = config.tick_interval;
                let flush_on_stop = config.flush_on_stop;
                let mut machine = PollingMachine::new(
                    inspector,
                    categorizer,
                    recorder,
                    config,
                    failed_writes,
                    Local::now(),
                );
                let _ = ready_tx.send(());

                while running.is_set() {
                    let now = Local::now();
                    let tick = AssertUnwindSafe(|| machine.tick(now));
                    if let Err(payload) = panic::catch_unwind(tick) {
                        error!("Tracker tick failed: {}", panic_message(payload.as_ref()));
                    }
                    thread::sleep(tick_interval);
                }

                if flush_on_stop {
                    let now = Local::now();
                    let flush = AssertUnwindSafe(|| machine.flush(now));
                    if let Err(payload) = panic::catch_unwind(flush) {
                        error!(
                            "Flushing open interval failed: {}",
                            panic_message(payload.as_ref())
                        );
                    }
                }
                info!("Tracker worker stopped");
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
        };

        if ready_rx.recv().is_err() {
            self.running.store(false, Ordering::SeqCst);
            let _ = handle.join();
            return Err(AppError::WorkerStartFailed);
        }

        info!("Tracker worker started");
        *worker = Some(handle);
        Ok(true)
    }

    /// Ask the worker to exit and wait until it has. The in-progress tick
    /// completes first. Returns `Ok(false)` if nothing was running.
    pub fn stop(&self) -> Result<bool, AppError> {
        let mut worker = self.lock_worker();
        self.running.store(false, Ordering::SeqCst);

        match worker.take() {
            Some(handle) => {
                handle.join().map_err(|_| AppError::WorkerPanicked)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stop, then start a fresh worker. The open interval is not carried over.
    pub fn restart(&self) -> Result<(), AppError> {
        self.stop()?;
        self.start()?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of intervals dropped because the log could not be written.
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    pub fn log_path(&self) -> PathBuf {
        lock_recorder(&self.recorder).log_path().to_path_buf()
    }
}

/// Running flag owned by the worker. Cleared when the worker exits for any
/// reason, so `is_running` never reports a dead worker.
struct RunningFlag(Arc<AtomicBool>);

impl RunningFlag {
    fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Drop for RunningFlag {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

impl Drop for TrackerService {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Tracker worker did not shut down cleanly: {e}");
        }
    }
}
