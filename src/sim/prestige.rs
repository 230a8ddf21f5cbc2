//! Prestige cycle: trade the current run for a deeper simulation.
//!
//! LOCKED until the unlock upgrade is bought, then UNLOCKED. A player trigger
//! moves it to OFFERED; confirming resets the run, declining leaves
//! everything as it was and the offer can be raised again later.

use super::state::{GameState, PermanentBonuses, Prestige};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrestigePhase {
    Locked,
    Unlocked,
    Offered,
}

impl PrestigePhase {
    pub fn of(state: &GameState, offered: bool) -> Self {
        match (state.prestige_unlocked, offered) {
            (false, _) => PrestigePhase::Locked,
            (true, false) => PrestigePhase::Unlocked,
            (true, true) => PrestigePhase::Offered,
        }
    }
}

/// Reset the run into the next simulation depth. Returns the new depth.
///
/// Kept: prestige block (with the new depth), play time, prestige count,
/// settings. Everything else starts fresh. Bonuses must be recomputed by
/// the caller afterwards.
pub fn confirm(state: &mut GameState) -> u32 {
    let depth = state.prestige.simulation_depth + 1;
    let play_time = state.statistics.play_time;
    let prestige_count = state.statistics.prestige_count + 1;
    let settings = state.settings.clone();
    let last_save_time = state.last_save_time;

    *state = GameState::new();
    state.prestige = Prestige {
        simulation_depth: depth,
        permanent_bonuses: PermanentBonuses::for_depth(depth),
    };
    state.statistics.play_time = play_time;
    state.statistics.prestige_count = prestige_count;
    state.settings = settings;
    state.last_save_time = last_save_time;
    depth
}

#[cfg(test)]
mod tests {
    use super::*;

    fn late_game() -> GameState {
        let mut s = GameState::new();
        s.current_stage = 6;
        s.resources.dollars = 5e10;
        s.resources.product = 123.0;
        s.resources.compute_units = 77.0;
        s.upgrades.insert("universe_forge".into(), 10);
        s.upgrades.insert("question_reality".into(), 1);
        s.statistics.total_clicks = 5_000;
        s.statistics.total_earned = 2e11;
        s.statistics.play_time = 36_000.0;
        s.statistics.prestige_count = 2;
        s.prestige.simulation_depth = 2;
        s.prestige.permanent_bonuses = PermanentBonuses::for_depth(2);
        s.settings.headline_index = 9;
        s.prestige_unlocked = true;
        s
    }

    #[test]
    fn phase_follows_flags() {
        let mut s = GameState::new();
        assert_eq!(PrestigePhase::of(&s, true), PrestigePhase::Locked);
        s.prestige_unlocked = true;
        assert_eq!(PrestigePhase::of(&s, false), PrestigePhase::Unlocked);
        assert_eq!(PrestigePhase::of(&s, true), PrestigePhase::Offered);
    }

    #[test]
    fn confirm_resets_progress() {
        let mut s = late_game();
        let depth = confirm(&mut s);
        assert_eq!(depth, 3);
        assert_eq!(s.resources.dollars, 0.0);
        assert_eq!(s.resources.product, 0.0);
        assert_eq!(s.resources.compute_units, 0.0);
        assert_eq!(s.current_stage, 1);
        assert!(s.upgrades.is_empty());
        assert_eq!(s.statistics.total_clicks, 0);
        assert_eq!(s.statistics.total_earned, 0.0);
        assert!(!s.prestige_unlocked);
    }

    #[test]
    fn confirm_keeps_lifetime_fields() {
        let mut s = late_game();
        confirm(&mut s);
        assert_eq!(s.statistics.play_time, 36_000.0);
        assert_eq!(s.statistics.prestige_count, 3);
        assert_eq!(s.prestige.simulation_depth, 3);
        assert_eq!(s.settings.headline_index, 9);
    }

    #[test]
    fn bonuses_derived_from_depth_not_stacked() {
        let mut s = late_game();
        // A hand-edited bonus is replaced, not compounded.
        s.prestige.permanent_bonuses.production_multiplier = 40.0;
        confirm(&mut s);
        let b = &s.prestige.permanent_bonuses;
        assert!((b.production_multiplier - 1.75).abs() < 1e-9);
        assert!((b.cost_reduction - 0.15).abs() < 1e-9);
    }

    #[test]
    fn discount_caps_at_half() {
        let mut s = late_game();
        s.prestige.simulation_depth = 12;
        confirm(&mut s);
        assert_eq!(s.prestige.simulation_depth, 13);
        assert!((s.prestige.permanent_bonuses.cost_reduction - 0.5).abs() < 1e-9);
    }
}
