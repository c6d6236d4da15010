use crate::categorizer::Categorizer;
use crate::constants::MEETINGS_CATEGORY;
use crate::models::{ActivityInterval, ActivitySample};
use crate::platform::WindowInspector;
use crate::recorder::{lock_recorder, ActivityRecorder};
use crate::tracker::TrackerConfig;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityState {
    /// Tracking `current` since `since`.
    Active {
        current: ActivitySample,
        since: DateTime<Local>,
    },
    /// No input since `idle_start`. `last_active` keeps following the
    /// foreground window so tracking resumes on the newest one.
    /// `threshold_secs` is fixed from the category tracked before idling.
    Idle {
        idle_start: DateTime<Local>,
        last_active: ActivitySample,
        threshold_secs: u64,
    },
}

/// Decides where one logged interval ends and the next begins.
///
/// Owned by the tracker worker thread. Every state change that records an
/// interval happens while the shared recorder lock is held.
pub struct PollingMachine {
    inspector: Arc<dyn WindowInspector>,
    categorizer: Arc<Categorizer>,
    recorder: Arc<Mutex<ActivityRecorder>>,
    config: TrackerConfig,
    failed_writes: Arc<AtomicU64>,
    state: ActivityState,
    ticks_since_idle_check: u32,
}

impl PollingMachine {
    /// Seed the machine with the window in the foreground at `now`.
    pub fn new(
        inspector: Arc<dyn WindowInspector>,
        categorizer: Arc<Categorizer>,
        recorder: Arc<Mutex<ActivityRecorder>>,
        config: TrackerConfig,
        failed_writes: Arc<AtomicU64>,
        now: DateTime<Local>,
    ) -> Self {
        let current = ActivitySample::observe(inspector.as_ref(), &categorizer);
        info!("Initial window: {}", current.window_title);

        Self {
            inspector,
            categorizer,
            recorder,
            config,
            failed_writes,
            state: ActivityState::Active { current, since: now },
            ticks_since_idle_check: 0,
        }
    }

    pub fn state(&self) -> &ActivityState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ActivityState::Idle { .. })
    }

    /// Start of the interval being tracked, `None` while idle.
    pub fn interval_start(&self) -> Option<DateTime<Local>> {
        match &self.state {
            ActivityState::Active { since, .. } => Some(*since),
            ActivityState::Idle { .. } => None,
        }
    }

    /// The activity being tracked, or the one tracking resumes on after idling.
    pub fn current_activity(&self) -> &ActivitySample {
        match &self.state {
            ActivityState::Active { current, .. } => current,
            ActivityState::Idle { last_active, .. } => last_active,
        }
    }

    /// One polling step: resample, detect window changes, and every
    /// `idle_check_ticks` ticks evaluate idleness.
    pub fn tick(&mut self, now: DateTime<Local>) {
        let sample = ActivitySample::observe(self.inspector.as_ref(), &self.categorizer);
        self.detect_change(&sample, now);

        self.ticks_since_idle_check += 1;
        if self.ticks_since_idle_check >= self.config.idle_check_ticks {
            self.ticks_since_idle_check = 0;
            let idle_secs = self.inspector.idle_seconds();
            self.check_idle(idle_secs, sample, now);
        }
    }

    /// Record whatever interval is open at `now`.
    pub fn flush(&mut self, now: DateTime<Local>) {
        let (interval, min_secs) = match &self.state {
            ActivityState::Active { current, since } => (
                ActivityInterval::from_sample(current, *since, now),
                self.config.min_activity_secs,
            ),
            ActivityState::Idle { idle_start, .. } => (
                ActivityInterval::inactive(*idle_start, now),
                self.config.min_inactive_secs,
            ),
        };
        let next = self.state.clone();
        self.commit(Some((interval, min_secs)), next);
    }

    fn idle_threshold_for(&self, category: &str) -> u64 {
        if category == MEETINGS_CATEGORY {
            self.config.meeting_idle_threshold_secs
        } else {
            self.config.idle_threshold_secs
        }
    }

    fn detect_change(&mut self, sample: &ActivitySample, now: DateTime<Local>) {
        let transition = match &self.state {
            ActivityState::Active { current, since } if sample.differs_from(current) => {
                debug!("Window changed: {} -> {}", current.window_title, sample.window_title);
                let finished = ActivityInterval::from_sample(current, *since, now);
                let next = ActivityState::Active {
                    current: sample.clone(),
                    since: now,
                };
                Some((Some((finished, self.config.min_activity_secs)), next))
            }
            ActivityState::Idle {
                idle_start,
                last_active,
                threshold_secs,
            } if sample.differs_from(last_active) => {
                let next = ActivityState::Idle {
                    idle_start: *idle_start,
                    last_active: sample.clone(),
                    threshold_secs: *threshold_secs,
                };
                Some((None, next))
            }
            ActivityState::Active { .. } | ActivityState::Idle { .. } => None,
        };

        if let Some((finished, next)) = transition {
            self.commit(finished, next);
        }
    }

    fn check_idle(&mut self, idle_secs: u64, sample: ActivitySample, now: DateTime<Local>) {
        let transition = match &self.state {
            ActivityState::Active { current, since } => {
                let threshold_secs = self.idle_threshold_for(&current.category);
                (idle_secs >= threshold_secs).then(|| {
                    info!("Going idle after {idle_secs} seconds");
                    let finished = ActivityInterval::from_sample(current, *since, now);
                    let next = ActivityState::Idle {
                        idle_start: now,
                        last_active: current.clone(),
                        threshold_secs,
                    };
                    ((finished, self.config.min_activity_secs), next)
                })
            }
            ActivityState::Idle {
                idle_start,
                threshold_secs,
                ..
            } => (idle_secs < *threshold_secs).then(|| {
                info!("Becoming active after {} seconds idle", (now - *idle_start).num_seconds());
                let inactive = ActivityInterval::inactive(*idle_start, now);
                let next = ActivityState::Active {
                    current: sample,
                    since: now,
                };
                ((inactive, self.config.min_inactive_secs), next)
            }),
        };

        if let Some((finished, next)) = transition {
            self.commit(Some(finished), next);
        }
    }

    /// Persist `finished` if it lasts at least the given seconds, then move to `next`.
    ///
    /// Write failures are dropped after being logged and counted; the state
    /// still advances.
    fn commit(&mut self, finished: Option<(ActivityInterval, u64)>, next: ActivityState) {
        let recorder = Arc::clone(&self.recorder);
        let recorder = lock_recorder(&recorder);

        if let Some((interval, min_secs)) = finished {
            if lasts_at_least(&interval, min_secs) {
                match recorder.record(&interval) {
                    Ok(_) => debug!(
                        "Logged {} ({}s)",
                        interval.window_title,
                        interval.duration_secs()
                    ),
                    Err(e) => {
                        self.failed_writes.fetch_add(1, Ordering::Relaxed);
                        warn!("Failed to write {}: {e}", recorder.log_path().display());
                    }
                }
            }
        }

        self.state = next;
    }
}

fn lasts_at_least(interval: &ActivityInterval, secs: u64) -> bool {
    u64::try_from(interval.duration_secs()).is_ok_and(|duration| duration >= secs)
}
