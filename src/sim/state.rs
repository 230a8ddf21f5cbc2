//! Game state definitions: the single mutable root and its persisted parts.
//!
//! Every struct here is also the save format. `#[serde(default)]` on each
//! level gives the structural merge used for older or partial snapshots:
//! missing fields fall back to the fresh-game value, present fields override.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{PRESTIGE_DISCOUNT_CAP, PRESTIGE_DISCOUNT_STEP, PRESTIGE_MULTIPLIER_STEP, SAVE_VERSION};

use super::stage::FIRST_STAGE;

/// The five counters the simulation advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Product,
    #[default]
    Dollars,
    ComputeUnits,
    IntelligencePoints,
    ConsciousnessCycles,
}

impl Resource {
    /// All resources in display order.
    pub fn all() -> &'static [Resource] {
        &[
            Resource::Product,
            Resource::Dollars,
            Resource::ComputeUnits,
            Resource::IntelligencePoints,
            Resource::ConsciousnessCycles,
        ]
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Product => "Product",
            Resource::Dollars => "Dollars",
            Resource::ComputeUnits => "Compute",
            Resource::IntelligencePoints => "Intelligence",
            Resource::ConsciousnessCycles => "Consciousness",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resources {
    pub product: f64,
    pub dollars: f64,
    pub compute_units: f64,
    pub intelligence_points: f64,
    pub consciousness_cycles: f64,
}

impl Resources {
    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Product => self.product,
            Resource::Dollars => self.dollars,
            Resource::ComputeUnits => self.compute_units,
            Resource::IntelligencePoints => self.intelligence_points,
            Resource::ConsciousnessCycles => self.consciousness_cycles,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> &mut f64 {
        match resource {
            Resource::Product => &mut self.product,
            Resource::Dollars => &mut self.dollars,
            Resource::ComputeUnits => &mut self.compute_units,
            Resource::IntelligencePoints => &mut self.intelligence_points,
            Resource::ConsciousnessCycles => &mut self.consciousness_cycles,
        }
    }

    /// Add `amount` to a counter. The counter never goes below zero.
    pub fn add(&mut self, resource: Resource, amount: f64) {
        let slot = self.get_mut(resource);
        *slot = (*slot + amount).max(0.0);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    #[serde(deserialize_with = "whole::number")]
    pub total_clicks: u64,
    /// Dollars earned in the current prestige cycle.
    pub total_earned: f64,
    /// Seconds played, never reset.
    pub play_time: f64,
    #[serde(deserialize_with = "whole::number")]
    pub prestige_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermanentBonuses {
    pub production_multiplier: f64,
    pub cost_reduction: f64,
}

impl PermanentBonuses {
    /// Bonuses are derived from depth, never accumulated step by step.
    pub fn for_depth(depth: u32) -> Self {
        Self {
            production_multiplier: 1.0 + depth as f64 * PRESTIGE_MULTIPLIER_STEP,
            cost_reduction: (depth as f64 * PRESTIGE_DISCOUNT_STEP).min(PRESTIGE_DISCOUNT_CAP),
        }
    }
}

impl Default for PermanentBonuses {
    fn default() -> Self {
        Self::for_depth(0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Prestige {
    #[serde(deserialize_with = "whole::number")]
    pub simulation_depth: u32,
    pub permanent_bonuses: PermanentBonuses,
}

/// Cosmetic settings. Not touched by production rules.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(deserialize_with = "whole::number")]
    pub headline_index: u32,
}

/// Full state of one play-through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    pub version: String,
    /// ms since epoch of the last persisted snapshot.
    pub last_save_time: f64,
    #[serde(deserialize_with = "whole::number")]
    pub current_stage: u8,
    pub resources: Resources,
    /// Upgrade id → purchase count. Absent means 0.
    #[serde(deserialize_with = "whole::counts")]
    pub upgrades: BTreeMap<String, u32>,
    pub statistics: Statistics,
    pub prestige: Prestige,
    pub settings: Settings,
    pub prestige_unlocked: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            version: SAVE_VERSION.to_string(),
            last_save_time: 0.0,
            current_stage: FIRST_STAGE,
            resources: Resources::default(),
            upgrades: BTreeMap::new(),
            statistics: Statistics::default(),
            prestige: Prestige::default(),
            settings: Settings::default(),
            prestige_unlocked: false,
        }
    }

    pub fn purchase_count(&self, id: &str) -> u32 {
        self.upgrades.get(id).copied().unwrap_or(0)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Lenient readers for integer fields. Snapshots are plain JSON numbers, so
/// `3.0` means 3. A value that is not a whole number in range reads as the
/// type's default (sanitising clamps it afterwards) instead of rejecting the
/// whole snapshot.
mod whole {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn as_whole(value: &Value) -> Option<u64> {
        if let Some(n) = value.as_u64() {
            return Some(n);
        }
        let f = value.as_f64()?;
        (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then(|| f as u64)
    }

    pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64> + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(as_whole(&value)
            .and_then(|n| T::try_from(n).ok())
            .unwrap_or_default())
    }

    /// The map itself must be an object; entries that are not whole counts
    /// are dropped.
    pub fn counts<'de, D>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(id, v)| {
                let count = as_whole(&v).and_then(|n| u32::try_from(n).ok())?;
                Some((id, count))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_defaults() {
        let s = GameState::new();
        assert_eq!(s.current_stage, 1);
        assert_eq!(s.version, SAVE_VERSION);
        assert!(s.upgrades.is_empty());
        assert!(!s.prestige_unlocked);
        assert!((s.prestige.permanent_bonuses.production_multiplier - 1.0).abs() < 1e-9);
        assert_eq!(s.prestige.permanent_bonuses.cost_reduction, 0.0);
    }

    #[test]
    fn absent_upgrade_counts_as_zero() {
        let mut s = GameState::new();
        assert_eq!(s.purchase_count("faster_typing"), 0);
        s.upgrades.insert("faster_typing".into(), 3);
        assert_eq!(s.purchase_count("faster_typing"), 3);
    }

    #[test]
    fn resources_never_driven_negative() {
        let mut r = Resources::default();
        r.add(Resource::Dollars, 10.0);
        r.add(Resource::Dollars, -25.0);
        assert_eq!(r.dollars, 0.0);
    }

    #[test]
    fn permanent_bonuses_follow_depth() {
        let b = PermanentBonuses::for_depth(4);
        assert!((b.production_multiplier - 2.0).abs() < 1e-9);
        assert!((b.cost_reduction - 0.2).abs() < 1e-9);
        // Discount caps at 50%
        let b = PermanentBonuses::for_depth(30);
        assert!((b.cost_reduction - 0.5).abs() < 1e-9);
        assert!((b.production_multiplier - 8.5).abs() < 1e-9);
    }

    #[test]
    fn resource_names_serialize_camel_case() {
        let json = serde_json::to_string(&Resource::ComputeUnits).unwrap();
        assert_eq!(json, "\"computeUnits\"");
    }

    #[test]
    fn integral_floats_read_as_integers() {
        let json = r#"{
            "currentStage": 5.0,
            "upgrades": { "intern": 2.0, "dev_team": 7 },
            "statistics": { "totalClicks": 1200.0, "prestigeCount": 3.0 },
            "prestige": { "simulationDepth": 3.0 },
            "settings": { "headlineIndex": 4.0 }
        }"#;
        let s: GameState = serde_json::from_str(json).unwrap();
        assert_eq!(s.current_stage, 5);
        assert_eq!(s.purchase_count("intern"), 2);
        assert_eq!(s.purchase_count("dev_team"), 7);
        assert_eq!(s.statistics.total_clicks, 1200);
        assert_eq!(s.statistics.prestige_count, 3);
        assert_eq!(s.prestige.simulation_depth, 3);
        assert_eq!(s.settings.headline_index, 4);
    }

    #[test]
    fn bad_integer_field_falls_back_without_losing_the_rest() {
        let json = r#"{
            "currentStage": 2.5,
            "resources": { "dollars": 1e9 },
            "upgrades": { "intern": -1, "dev_team": "lots", "gpu_cluster": 4 },
            "statistics": { "totalClicks": "many", "playTime": 60 },
            "prestige": { "simulationDepth": 1e12 }
        }"#;
        let s: GameState = serde_json::from_str(json).unwrap();
        assert_eq!(s.current_stage, 0);
        assert_eq!(s.resources.dollars, 1e9);
        assert_eq!(s.upgrades.len(), 1);
        assert_eq!(s.purchase_count("gpu_cluster"), 4);
        assert_eq!(s.statistics.total_clicks, 0);
        assert_eq!(s.statistics.play_time, 60.0);
        // Out of u32 range.
        assert_eq!(s.prestige.simulation_depth, 0);
    }
}
