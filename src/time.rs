//! Simulation clock: decides when a tick is due and how much time it covers.
//!
//! `draw_web()` calls at ~60fps. The clock fires at most once per nominal
//! period but always reports the real elapsed time since the previous tick,
//! so throttled or delayed frames neither lose nor double-count production.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockStatus {
    Stopped,
    Running,
}

pub struct SimClock {
    /// Nominal ms between ticks (e.g. 100ms = 10 ticks/sec).
    tick_ms: f64,
    status: ClockStatus,
    /// Timestamp of the last tick (ms). None until the first frame after start.
    last_tick: Option<f64>,
    /// Elapsed ms since the last persist.
    since_persist: f64,
    /// Total ticks fired since creation.
    pub total_ticks: u64,
}

impl SimClock {
    pub fn new(tick_ms: f64) -> Self {
        Self {
            tick_ms,
            status: ClockStatus::Stopped,
            last_tick: None,
            since_persist: 0.0,
            total_ticks: 0,
        }
    }

    pub fn status(&self) -> ClockStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == ClockStatus::Running
    }

    /// Start measuring from `now_ms`. No-op if already running.
    pub fn start(&mut self, now_ms: f64) {
        if self.is_running() {
            return;
        }
        self.status = ClockStatus::Running;
        self.last_tick = Some(now_ms);
    }

    /// Stop ticking. Safe to call repeatedly or before `start`.
    pub fn stop(&mut self) {
        self.status = ClockStatus::Stopped;
        self.last_tick = None;
    }

    /// Feed a frame timestamp. Returns the measured ms since the previous
    /// tick once at least one nominal period has passed.
    pub fn poll(&mut self, now_ms: f64) -> Option<f64> {
        if !self.is_running() {
            return None;
        }
        let prev = match self.last_tick {
            Some(prev) => prev,
            None => {
                self.last_tick = Some(now_ms);
                return None;
            }
        };
        let delta = now_ms - prev;
        if delta < 0.0 {
            // Wall clock moved backwards: re-anchor, credit nothing.
            self.last_tick = Some(now_ms);
            return None;
        }
        if delta < self.tick_ms {
            return None;
        }
        self.last_tick = Some(now_ms);
        self.since_persist += delta;
        self.total_ticks += 1;
        Some(delta)
    }

    pub fn persist_due(&self, autosave_ms: f64) -> bool {
        self.since_persist >= autosave_ms
    }

    pub fn mark_persisted(&mut self) {
        self.since_persist = 0.0;
    }
}
