//! Singularity: an idle game about growing a code shop into a simulated universe.
//!
//! [`Engine`] owns the state and is the only thing that mutates it. The pure
//! transitions live in the submodules; the engine runs them and carries out
//! the intents they return (persist, offer prestige, log).

pub mod actions;
pub mod catalog;
pub mod economy;
pub mod headlines;
pub mod logic;
pub mod offline;
pub mod prestige;
pub mod render;
pub mod save;
pub mod stage;
pub mod state;
pub mod storage;

mod simulator;

use crate::config::{EngineConfig, LOG_LIMIT};
use crate::logging;
use crate::time::{ClockStatus, SimClock};

use actions::Command;
use catalog::{Catalog, EffectType, Upgrade};
use economy::{Bonuses, Rejection};
use headlines::Headlines;
use logic::{format_duration, format_number, Intent};
use offline::OfflineReport;
use prestige::PrestigePhase;
use stage::Stage;
use state::{GameState, Resource};
use storage::SaveStore;

/// Rotate the headline every 8 seconds of ticks.
const HEADLINE_TICKS: u64 = 80;

/// Player-facing message.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// One row of the upgrade panel, priced against the live state.
#[derive(Clone, Debug)]
pub struct UpgradeView<'a> {
    pub upgrade: &'a Upgrade,
    pub count: u32,
    /// Price the next purchase would be charged right now.
    pub cost: f64,
    pub affordable: bool,
    pub maxed: bool,
}

pub struct Engine {
    state: GameState,
    catalog: Catalog,
    headlines: Headlines,
    bonuses: Bonuses,
    clock: SimClock,
    config: EngineConfig,
    store: Box<dyn SaveStore>,
    prestige_offered: bool,
    log: Vec<LogEntry>,
    last_offline: Option<OfflineReport>,
}

impl Engine {
    /// Fresh state and derived bonuses. Only `boot` hands an engine out, with
    /// the clock already running.
    fn new(
        catalog: Catalog,
        headlines: Headlines,
        store: Box<dyn SaveStore>,
        config: EngineConfig,
    ) -> Self {
        let state = GameState::new();
        let bonuses =
            economy::compute_bonuses(&catalog, &state.upgrades, &state.prestige.permanent_bonuses);
        Self {
            state,
            catalog,
            headlines,
            bonuses,
            clock: SimClock::new(config.tick_ms),
            config,
            store,
            prestige_offered: false,
            log: Vec::new(),
            last_offline: None,
        }
    }

    /// Load the save if there is one, credit the offline gap, start the clock.
    pub fn boot(
        catalog: Catalog,
        headlines: Headlines,
        store: Box<dyn SaveStore>,
        config: EngineConfig,
        now: f64,
    ) -> Self {
        let mut engine = Self::new(catalog, headlines, store, config);
        match save::load_game(engine.store.as_mut(), &engine.catalog) {
            Some(loaded) => {
                engine.state = loaded;
                engine.recompute_bonuses();
                let report = offline::reconcile(
                    engine.state.last_save_time,
                    now,
                    &engine.bonuses.production_rates(),
                    &engine.config,
                );
                offline::apply(&mut engine.state, &report);
                if report.is_significant {
                    let text = offline_summary(&report);
                    logging::info(&text);
                    engine.add_log(&text, true);
                }
                engine.last_offline = Some(report);
                engine.add_log("Simulation resumed.", false);
                // Re-stamp so a quick reload does not grant the same gap twice.
                engine.persist(now);
            }
            None => engine.add_log("Welcome. Start writing code.", true),
        }
        engine.clock.start(now);
        engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn bonuses(&self) -> &Bonuses {
        &self.bonuses
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn store(&self) -> &dyn SaveStore {
        self.store.as_ref()
    }

    pub fn last_offline(&self) -> Option<&OfflineReport> {
        self.last_offline.as_ref()
    }

    pub fn current_stage(&self) -> &'static Stage {
        stage::stage(self.state.current_stage)
    }

    pub fn prestige_phase(&self) -> PrestigePhase {
        PrestigePhase::of(&self.state, self.prestige_offered)
    }

    pub fn headline(&self) -> &str {
        self.headlines
            .get(self.state.current_stage, self.state.settings.headline_index)
    }

    pub fn clock_status(&self) -> ClockStatus {
        self.clock.status()
    }

    pub fn start(&mut self, now: f64) {
        self.clock.start(now);
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// Feed a frame timestamp. Runs a tick when one is due and returns the
    /// intents it produced (persistence has already been carried out).
    pub fn frame(&mut self, now: f64) -> Vec<Intent> {
        let Some(elapsed) = self.clock.poll(now) else {
            return Vec::new();
        };
        let report = logic::advance(&mut self.state, &self.bonuses, elapsed);

        let mut intents = Vec::new();
        if let Some(id) = report.stage_advanced {
            intents.push(Intent::StageAdvanced(id));
            intents.push(Intent::Persist);
        }
        if self.clock.persist_due(self.config.autosave_ms) {
            intents.push(Intent::Persist);
        }
        if self.clock.total_ticks % HEADLINE_TICKS == 0 {
            let idx = &mut self.state.settings.headline_index;
            *idx = idx.wrapping_add(1);
        }
        intents.push(Intent::Render);
        self.execute(&intents, now);
        intents
    }

    pub fn click(&mut self) {
        logic::click(&mut self.state, &self.bonuses);
    }

    /// Buy one level of `id`, priced against the state as it is right now.
    pub fn purchase(&mut self, id: &str, now: f64) -> Result<(), Rejection> {
        let intents = logic::purchase(&mut self.state, &self.catalog, &mut self.bonuses, id)?;
        if let Some(u) = self.catalog.get(id) {
            let text = format!("Bought {} ({})", u.name, self.state.purchase_count(id));
            self.add_log(&text, false);
        }
        self.execute(&intents, now);
        Ok(())
    }

    /// Player picked an upgrade row. The maxed prestige unlock stays usable
    /// and raises the offer again; everything else is a purchase.
    pub fn select_upgrade(&mut self, id: &str, now: f64) -> Result<(), Rejection> {
        if let Some(u) = self.catalog.get(id) {
            if u.effect_type == EffectType::UnlockPrestige
                && self.state.prestige_unlocked
                && u.is_maxed(self.state.purchase_count(id))
            {
                self.offer_prestige();
                return Ok(());
            }
        }
        self.purchase(id, now)
    }

    /// UNLOCKED → OFFERED. Returns false while locked.
    pub fn offer_prestige(&mut self) -> bool {
        if !self.state.prestige_unlocked {
            return false;
        }
        if !self.prestige_offered {
            self.prestige_offered = true;
            let next = self.state.prestige.simulation_depth + 1;
            self.add_log(
                &format!("Question reality? Enter simulation depth {next} [Y/N]"),
                true,
            );
        }
        true
    }

    pub fn decline_prestige(&mut self) {
        if self.prestige_offered {
            self.prestige_offered = false;
            self.add_log("Reality accepted, for now.", false);
        }
    }

    /// OFFERED → reset into the next depth. Returns false if no offer is open.
    pub fn confirm_prestige(&mut self, now: f64) -> bool {
        if self.prestige_phase() != PrestigePhase::Offered {
            return false;
        }
        self.clock.stop();
        let depth = prestige::confirm(&mut self.state);
        self.prestige_offered = false;
        self.recompute_bonuses();
        self.log.clear();
        self.add_log(
            &format!(
                "Simulation depth {depth}. Production ×{:.2}, costs -{:.0}%",
                self.state.prestige.permanent_bonuses.production_multiplier,
                self.state.prestige.permanent_bonuses.cost_reduction * 100.0,
            ),
            true,
        );
        self.persist(now);
        self.clock.start(now);
        true
    }

    /// Run a player command. Rejected purchases are reported in the log.
    pub fn handle(&mut self, command: Command, now: f64) {
        match command {
            Command::Click => self.click(),
            Command::Buy(index) => {
                let id = self
                    .available_upgrades()
                    .get(index)
                    .map(|v| v.upgrade.id.clone());
                if let Some(id) = id {
                    if let Err(rejection) = self.select_upgrade(&id, now) {
                        self.add_log(&format!("Can't buy: {rejection}"), false);
                    }
                }
            }
            Command::OfferPrestige => {
                self.offer_prestige();
            }
            Command::ConfirmPrestige => {
                self.confirm_prestige(now);
            }
            Command::DeclinePrestige => self.decline_prestige(),
            Command::Save => self.persist(now),
            Command::HardReset => self.hard_reset(now),
        }
    }

    /// Write a snapshot. Failures are logged and never undo gameplay.
    pub fn persist(&mut self, now: f64) {
        if let Err(e) = save::save_game(self.store.as_mut(), &mut self.state, now) {
            logging::warn(&format!("save failed: {e}"));
        }
        self.clock.mark_persisted();
    }

    /// Wipe the save and start over from nothing, prestige included.
    pub fn hard_reset(&mut self, now: f64) {
        save::clear_save(self.store.as_mut());
        self.clock.stop();
        self.state = GameState::new();
        self.prestige_offered = false;
        self.last_offline = None;
        self.recompute_bonuses();
        self.log.clear();
        self.add_log("Hard reset. Start writing code.", true);
        self.clock.start(now);
    }

    /// Upgrades offered at the current stage whose prerequisite is owned.
    pub fn available_upgrades(&self) -> Vec<UpgradeView<'_>> {
        self.catalog
            .iter()
            .filter(|u| u.stage <= self.state.current_stage)
            .filter(|u| {
                u.prerequisite
                    .as_ref()
                    .map_or(true, |pre| self.state.purchase_count(pre) > 0)
            })
            .map(|u| {
                let count = self.state.purchase_count(&u.id);
                let maxed = u.is_maxed(count);
                let cost = economy::final_cost(economy::cost(u, count), self.bonuses.cost_reduction);
                UpgradeView {
                    upgrade: u,
                    count,
                    cost,
                    affordable: !maxed && self.state.resources.get(u.cost_resource) >= cost,
                    maxed,
                }
            })
            .collect()
    }

    fn recompute_bonuses(&mut self) {
        self.bonuses = economy::compute_bonuses(
            &self.catalog,
            &self.state.upgrades,
            &self.state.prestige.permanent_bonuses,
        );
    }

    fn execute(&mut self, intents: &[Intent], now: f64) {
        let mut persisted = false;
        for intent in intents {
            match intent {
                Intent::Persist => {
                    if !persisted {
                        self.persist(now);
                        persisted = true;
                    }
                }
                Intent::OfferPrestige => {
                    self.offer_prestige();
                }
                Intent::StageAdvanced(id) => {
                    let s = stage::stage(*id);
                    let mut text = format!("Stage {}: {}", s.id, s.product_name);
                    if let Some(r) = s.introduces {
                        text.push_str(&format!(" ({} unlocked)", r.name()));
                    }
                    self.add_log(&text, true);
                }
                Intent::Render => {}
            }
        }
    }

    fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > LOG_LIMIT {
            self.log.remove(0);
        }
    }
}

fn offline_summary(report: &OfflineReport) -> String {
    let mut text = format!("Away for {}", format_duration(report.granted_ms));
    if report.was_capped {
        text.push_str(" (capped)");
    }
    text.push_str(&format!(
        ": +${}, +{} {}",
        format_number(report.earnings.dollars),
        format_number(report.earnings.product),
        Resource::Product.name().to_lowercase(),
    ));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STORAGE_KEY;
    use storage::MemoryStore;

    const T0: f64 = 1_700_000_000_000.0;

    fn engine() -> Engine {
        Engine::boot(
            Catalog::builtin(),
            Headlines::builtin(),
            Box::new(MemoryStore::new()),
            EngineConfig::default(),
            T0,
        )
    }

    #[test]
    fn boot_without_save_starts_running() {
        let mut e = engine();
        assert_eq!(e.clock_status(), ClockStatus::Running);
        assert_eq!(e.state(), &GameState::new());
        assert!(e.last_offline().is_none());
        // Ticks from the first due frame, no explicit start needed.
        assert!(e.frame(T0 + 100.0).contains(&Intent::Render));
    }

    #[test]
    fn boot_with_save_credits_offline_and_restamps() {
        let mut store = MemoryStore::new();
        let mut saved = GameState::new();
        saved.upgrades.insert("freelance_gig".into(), 5); // $1/sec
        save::save_game(&mut store, &mut saved, T0).unwrap();

        let e = Engine::boot(
            Catalog::builtin(),
            Headlines::builtin(),
            Box::new(store),
            EngineConfig::default(),
            T0 + 120_000.0,
        );
        let report = e.last_offline().unwrap();
        assert!(report.is_significant);
        assert_eq!(report.earnings.dollars, 120.0);
        assert_eq!(e.state().resources.dollars, 120.0);
        assert_eq!(e.state().statistics.total_earned, 120.0);
        assert_eq!(e.state().last_save_time, T0 + 120_000.0);
        assert!(e.log().iter().any(|l| l.text.starts_with("Away for 2m")));
        assert_eq!(e.clock_status(), ClockStatus::Running);
    }

    #[test]
    fn frame_ticks_only_when_due() {
        let mut e = engine();
        assert!(e.frame(T0 + 50.0).is_empty());
        let intents = e.frame(T0 + 100.0);
        assert!(intents.contains(&Intent::Render));
    }

    #[test]
    fn autosave_after_thirty_seconds() {
        let mut e = engine();
        let mut now = T0;
        for _ in 0..299 {
            now += 100.0;
            assert!(!e.frame(now).contains(&Intent::Persist));
        }
        now += 100.0;
        assert!(e.frame(now).contains(&Intent::Persist));
        assert_eq!(e.state().last_save_time, now);
    }

    #[test]
    fn stopped_engine_does_not_tick() {
        let mut e = engine();
        e.stop();
        e.stop();
        assert!(e.frame(T0 + 10_000.0).is_empty());
    }

    #[test]
    fn purchase_persists_immediately() {
        let mut e = engine();
        e.state.resources.dollars = 15.0;
        e.purchase("better_keyboard", T0 + 1.0).unwrap();
        assert_eq!(e.state().last_save_time, T0 + 1.0);
        let raw = e.store.get(STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("better_keyboard"));
    }

    #[test]
    fn buy_command_uses_listing_order() {
        let mut e = engine();
        e.state.resources.dollars = 1_000.0;
        let first = e.available_upgrades()[0].upgrade.id.clone();
        e.handle(Command::Buy(0), T0);
        assert_eq!(e.state().purchase_count(&first), 1);
        // Out-of-range index is ignored.
        let before = e.state().clone();
        e.handle(Command::Buy(99), T0);
        assert_eq!(e.state(), &before);
    }

    #[test]
    fn listing_respects_stage_and_prerequisite() {
        let e = engine();
        let ids: Vec<_> = e.available_upgrades().iter().map(|v| v.upgrade.id.clone()).collect();
        assert!(ids.contains(&"intern".to_string()));
        assert!(!ids.contains(&"code_review".to_string())); // needs intern
        assert!(!ids.contains(&"dev_team".to_string())); // stage 2
    }

    #[test]
    fn prestige_offer_confirm_cycle() {
        let mut e = engine();
        assert!(!e.offer_prestige());
        assert_eq!(e.prestige_phase(), PrestigePhase::Locked);

        e.state.current_stage = 6;
        e.state.upgrades.insert("universe_forge".into(), 1);
        e.state.resources.dollars = 1e11;
        e.recompute_bonuses();
        e.purchase("question_reality", T0).unwrap();
        assert_eq!(e.prestige_phase(), PrestigePhase::Offered);

        e.decline_prestige();
        assert_eq!(e.prestige_phase(), PrestigePhase::Unlocked);
        // Maxed unlock upgrade re-raises the offer.
        e.select_upgrade("question_reality", T0).unwrap();
        assert_eq!(e.prestige_phase(), PrestigePhase::Offered);

        assert!(e.confirm_prestige(T0 + 10.0));
        assert_eq!(e.state().prestige.simulation_depth, 1);
        assert_eq!(e.state().current_stage, 1);
        assert_eq!(e.prestige_phase(), PrestigePhase::Locked);
        assert!((e.bonuses().production_multiplier - 1.25).abs() < 1e-9);
        assert!((e.bonuses().cost_reduction - 0.05).abs() < 1e-9);
        assert_eq!(e.clock_status(), ClockStatus::Running);
        assert!(!e.confirm_prestige(T0 + 20.0));
    }

    #[test]
    fn hard_reset_wipes_everything() {
        let mut e = engine();
        e.state.prestige.simulation_depth = 3;
        e.state.resources.dollars = 99.0;
        e.persist(T0);
        e.hard_reset(T0 + 5.0);
        assert_eq!(e.state(), &GameState::new());
        assert_eq!(e.store.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn stage_advance_logged_and_saved() {
        let mut e = engine();
        e.state.statistics.total_earned = 1_000.0;
        let intents = e.frame(T0 + 100.0);
        assert!(intents.contains(&Intent::StageAdvanced(2)));
        assert!(intents.contains(&Intent::Persist));
        assert!(e.log().iter().any(|l| l.text.starts_with("Stage 2")));
    }

    #[test]
    fn log_is_bounded() {
        let mut e = engine();
        for i in 0..(LOG_LIMIT + 10) {
            e.add_log(&format!("msg {i}"), false);
        }
        assert_eq!(e.log().len(), LOG_LIMIT);
    }
}
