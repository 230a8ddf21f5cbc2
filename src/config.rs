//! Engine constants and the tunable timing config owned by the orchestrator.

/// Nominal tick period. 100ms = 10 ticks/sec.
pub const TICK_MS: f64 = 100.0;

/// Autosave cadence.
pub const AUTOSAVE_MS: f64 = 30_000.0;

/// Offline progress is never granted for more than 7 days.
pub const OFFLINE_CAP_MS: f64 = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Gaps at or below this are credited silently.
pub const OFFLINE_NOTICE_MS: f64 = 60_000.0;

/// Aggregate cost reduction can never make an upgrade free.
pub const MAX_COST_REDUCTION: f64 = 0.9;

/// Production multiplier gained per simulation depth.
pub const PRESTIGE_MULTIPLIER_STEP: f64 = 0.25;

/// Permanent cost reduction gained per simulation depth, and its cap.
pub const PRESTIGE_DISCOUNT_STEP: f64 = 0.05;
pub const PRESTIGE_DISCOUNT_CAP: f64 = 0.5;

/// localStorage slot for the single save.
pub const STORAGE_KEY: &str = "singularity_idle_save";

/// Version tag stamped on every snapshot.
pub const SAVE_VERSION: &str = "1.1";

/// Message log entries kept for display.
pub const LOG_LIMIT: usize = 50;

/// Timing knobs for one engine instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    pub tick_ms: f64,
    pub autosave_ms: f64,
    pub offline_cap_ms: f64,
    pub offline_notice_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            autosave_ms: AUTOSAVE_MS,
            offline_cap_ms: OFFLINE_CAP_MS,
            offline_notice_ms: OFFLINE_NOTICE_MS,
        }
    }
}
