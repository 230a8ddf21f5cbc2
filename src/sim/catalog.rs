//! Upgrade catalog: definitions loaded once from `content/upgrades.json`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging;

use super::state::Resource;

const BUILTIN_UPGRADES: &str = include_str!("../../content/upgrades.json");

/// Failure to read a content file.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What an upgrade does per purchase.
///
/// Tags this build does not know are kept as `Unknown` and contribute
/// nothing, so newer content files still load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EffectType {
    ClickPower,
    PassiveProduct,
    PassiveDollars,
    PassiveCompute,
    PassiveIntelligence,
    PassiveConsciousness,
    SellPrice,
    CostReduction,
    UnlockPrestige,
    Unknown(String),
}

impl EffectType {
    pub fn as_str(&self) -> &str {
        match self {
            EffectType::ClickPower => "clickPower",
            EffectType::PassiveProduct => "passiveProduct",
            EffectType::PassiveDollars => "passiveDollars",
            EffectType::PassiveCompute => "passiveCompute",
            EffectType::PassiveIntelligence => "passiveIntelligence",
            EffectType::PassiveConsciousness => "passiveConsciousness",
            EffectType::SellPrice => "sellPrice",
            EffectType::CostReduction => "costReduction",
            EffectType::UnlockPrestige => "unlockPrestige",
            EffectType::Unknown(tag) => tag,
        }
    }
}

impl From<String> for EffectType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "clickPower" => EffectType::ClickPower,
            "passiveProduct" => EffectType::PassiveProduct,
            "passiveDollars" => EffectType::PassiveDollars,
            "passiveCompute" => EffectType::PassiveCompute,
            "passiveIntelligence" => EffectType::PassiveIntelligence,
            "passiveConsciousness" => EffectType::PassiveConsciousness,
            "sellPrice" => EffectType::SellPrice,
            "costReduction" => EffectType::CostReduction,
            "unlockPrestige" => EffectType::UnlockPrestige,
            _ => EffectType::Unknown(tag),
        }
    }
}

impl From<EffectType> for String {
    fn from(effect: EffectType) -> Self {
        effect.as_str().to_string()
    }
}

fn default_stage() -> u8 {
    1
}

/// A purchasable upgrade definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: f64,
    pub cost_scaling: f64,
    pub effect_type: EffectType,
    pub effect_value: f64,
    /// None = unbounded.
    #[serde(default)]
    pub max_purchases: Option<u32>,
    /// First stage at which the upgrade is offered.
    #[serde(default = "default_stage")]
    pub stage: u8,
    #[serde(default)]
    pub prerequisite: Option<String>,
    #[serde(default)]
    pub cost_resource: Resource,
}

impl Upgrade {
    pub fn is_maxed(&self, count: u32) -> bool {
        self.max_purchases.is_some_and(|max| count >= max)
    }

    fn is_well_formed(&self) -> bool {
        !self.id.is_empty()
            && self.base_cost.is_finite()
            && self.base_cost >= 0.0
            && self.cost_scaling.is_finite()
            && self.cost_scaling > 1.0
            && self.effect_value.is_finite()
    }
}

/// Read-only registry of upgrade definitions in display order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    upgrades: Vec<Upgrade>,
}

impl Catalog {
    pub fn new(upgrades: Vec<Upgrade>) -> Self {
        Self { upgrades }
    }

    /// Parse an upgrade list. Malformed or duplicate records are dropped
    /// with a warning; a file that is not a JSON array of upgrades fails.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let raw: Vec<Upgrade> = serde_json::from_str(json)?;
        let mut upgrades: Vec<Upgrade> = Vec::with_capacity(raw.len());
        for upgrade in raw {
            if !upgrade.is_well_formed() {
                logging::warn(&format!("skipping malformed upgrade '{}'", upgrade.id));
                continue;
            }
            if upgrades.iter().any(|u| u.id == upgrade.id) {
                logging::warn(&format!("skipping duplicate upgrade '{}'", upgrade.id));
                continue;
            }
            upgrades.push(upgrade);
        }
        Ok(Self { upgrades })
    }

    /// The catalog shipped with the game. An unreadable file leaves the
    /// catalog empty rather than stopping the game.
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_UPGRADES) {
            Ok(c) => c,
            Err(e) => {
                logging::warn(&format!("upgrade catalog unavailable: {e}"));
                Self::default()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades.iter()
    }

    pub fn len(&self) -> usize {
        self.upgrades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upgrades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let c = Catalog::builtin();
        assert!(!c.is_empty());
        assert!(c
            .iter()
            .any(|u| u.effect_type == EffectType::UnlockPrestige));
    }

    #[test]
    fn builtin_prerequisites_exist() {
        let c = Catalog::builtin();
        for u in c.iter() {
            if let Some(pre) = &u.prerequisite {
                assert!(c.get(pre).is_some(), "{} needs missing {}", u.id, pre);
            }
        }
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"[{
            "id": "a", "name": "A", "baseCost": 10, "costScaling": 1.2,
            "effectType": "clickPower", "effectValue": 1
        }]"#;
        let c = Catalog::from_json(json).unwrap();
        let u = c.get("a").unwrap();
        assert_eq!(u.max_purchases, None);
        assert_eq!(u.stage, 1);
        assert_eq!(u.prerequisite, None);
        assert_eq!(u.cost_resource, Resource::Dollars);
        assert!(!u.is_maxed(1_000_000));
    }

    #[test]
    fn unknown_effect_tag_is_kept() {
        let json = r#"[{
            "id": "future", "name": "F", "baseCost": 10, "costScaling": 1.2,
            "effectType": "timeTravel", "effectValue": 3
        }]"#;
        let c = Catalog::from_json(json).unwrap();
        assert_eq!(
            c.get("future").unwrap().effect_type,
            EffectType::Unknown("timeTravel".into())
        );
    }

    #[test]
    fn malformed_and_duplicate_records_dropped() {
        let json = r#"[
            {"id": "a", "name": "A", "baseCost": 10, "costScaling": 1.2, "effectType": "clickPower", "effectValue": 1},
            {"id": "a", "name": "A2", "baseCost": 10, "costScaling": 1.2, "effectType": "clickPower", "effectValue": 1},
            {"id": "flat", "name": "Flat", "baseCost": 10, "costScaling": 1.0, "effectType": "clickPower", "effectValue": 1}
        ]"#;
        let c = Catalog::from_json(json).unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("a").unwrap().name, "A");
    }

    #[test]
    fn non_array_fails() {
        assert!(Catalog::from_json("{\"oops\": true}").is_err());
        assert!(Catalog::from_json("not json").is_err());
    }

    #[test]
    fn maxed_check() {
        let c = Catalog::builtin();
        let u = c.iter().find(|u| u.max_purchases.is_some()).unwrap();
        let max = u.max_purchases.unwrap();
        assert!(!u.is_maxed(max - 1));
        assert!(u.is_maxed(max));
    }
}
