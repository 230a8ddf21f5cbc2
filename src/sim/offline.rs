//! Offline catch-up: credit passive production for the time the game was closed.
//!
//! Rates are the ones in effect at load time. There is no replay of which
//! upgrades were owned during the gap.

use crate::config::EngineConfig;

use super::economy::ProductionRates;
use super::state::{GameState, Resource, Resources};

/// Result of comparing the last save stamp with the current time.
#[derive(Clone, Debug, PartialEq)]
pub struct OfflineReport {
    /// Elapsed ms actually credited, after clamping and capping.
    pub granted_ms: f64,
    /// Whole units earned per resource.
    pub earnings: Resources,
    /// The true gap was longer than the cap.
    pub was_capped: bool,
    /// The true gap is long enough to tell the player about.
    pub is_significant: bool,
}

/// Compute offline earnings. Negative gaps (clock rolled back) grant nothing.
/// A missing save stamp (0) is treated the same way.
pub fn reconcile(
    last_save_time: f64,
    now: f64,
    rates: &ProductionRates,
    config: &EngineConfig,
) -> OfflineReport {
    let elapsed = if last_save_time > 0.0 && now.is_finite() {
        (now - last_save_time).max(0.0)
    } else {
        0.0
    };
    let granted_ms = elapsed.min(config.offline_cap_ms);

    let mut earnings = Resources::default();
    for &resource in Resource::all() {
        let amount = (rates.get(resource) * granted_ms / 1000.0).floor();
        *earnings.get_mut(resource) = amount.max(0.0);
    }

    OfflineReport {
        granted_ms,
        earnings,
        was_capped: elapsed > config.offline_cap_ms,
        is_significant: elapsed > config.offline_notice_ms,
    }
}

/// Add the earnings to the state. Dollars also count toward `totalEarned`.
pub fn apply(state: &mut GameState, report: &OfflineReport) {
    for &resource in Resource::all() {
        state.resources.add(resource, report.earnings.get(resource));
    }
    state.statistics.total_earned += report.earnings.dollars;
}
