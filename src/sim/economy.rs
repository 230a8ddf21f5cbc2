//! Economy engine: aggregate bonuses, upgrade costs and purchase validation.
//!
//! Everything here is a pure function of its arguments.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::MAX_COST_REDUCTION;

use super::catalog::{Catalog, EffectType, Upgrade};
use super::stage::Stage;
use super::state::{PermanentBonuses, Resource, Resources};

/// Per-second production of each resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductionRates {
    pub product: f64,
    pub dollars: f64,
    pub compute_units: f64,
    pub intelligence_points: f64,
    pub consciousness_cycles: f64,
}

impl ProductionRates {
    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Product => self.product,
            Resource::Dollars => self.dollars,
            Resource::ComputeUnits => self.compute_units,
            Resource::IntelligencePoints => self.intelligence_points,
            Resource::ConsciousnessCycles => self.consciousness_cycles,
        }
    }

    fn get_mut(&mut self, resource: Resource) -> &mut f64 {
        match resource {
            Resource::Product => &mut self.product,
            Resource::Dollars => &mut self.dollars,
            Resource::ComputeUnits => &mut self.compute_units,
            Resource::IntelligencePoints => &mut self.intelligence_points,
            Resource::ConsciousnessCycles => &mut self.consciousness_cycles,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            product: self.product * factor,
            dollars: self.dollars * factor,
            compute_units: self.compute_units * factor,
            intelligence_points: self.intelligence_points * factor,
            consciousness_cycles: self.consciousness_cycles * factor,
        }
    }
}

/// Derived aggregate of every purchased upgrade plus prestige. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Bonuses {
    pub click_power: f64,
    /// Raw passive sums before the prestige multiplier.
    pub passive: ProductionRates,
    pub sell_price_multiplier: f64,
    /// Upgrade reductions plus the permanent one, at most `MAX_COST_REDUCTION`.
    pub cost_reduction: f64,
    /// Permanent prestige multiplier.
    pub production_multiplier: f64,
}

impl Default for Bonuses {
    fn default() -> Self {
        Self {
            click_power: 1.0,
            passive: ProductionRates::default(),
            sell_price_multiplier: 1.0,
            cost_reduction: 0.0,
            production_multiplier: 1.0,
        }
    }
}

impl Bonuses {
    /// Effective passive rates, prestige multiplier applied.
    pub fn production_rates(&self) -> ProductionRates {
        self.passive.scaled(self.production_multiplier)
    }

    /// Product gained by one manual click.
    pub fn click_yield(&self) -> f64 {
        self.click_power * self.production_multiplier
    }

    /// Dollars paid for one sale at `stage`.
    pub fn sale_price(&self, stage: &Stage) -> f64 {
        (stage.base_sell_price * self.sell_price_multiplier * self.production_multiplier).floor()
    }
}

/// Sum every purchased upgrade's `effectValue × count` into its slot.
pub fn compute_bonuses(
    catalog: &Catalog,
    purchases: &BTreeMap<String, u32>,
    permanent: &PermanentBonuses,
) -> Bonuses {
    let mut bonuses = Bonuses {
        production_multiplier: permanent.production_multiplier,
        ..Bonuses::default()
    };
    let mut reduction = permanent.cost_reduction;

    for upgrade in catalog.iter() {
        let count = purchases.get(&upgrade.id).copied().unwrap_or(0);
        if count == 0 {
            continue;
        }
        let contribution = upgrade.effect_value * count as f64;
        let passive_slot = match upgrade.effect_type {
            EffectType::ClickPower => {
                bonuses.click_power += contribution;
                None
            }
            EffectType::PassiveProduct => Some(Resource::Product),
            EffectType::PassiveDollars => Some(Resource::Dollars),
            EffectType::PassiveCompute => Some(Resource::ComputeUnits),
            EffectType::PassiveIntelligence => Some(Resource::IntelligencePoints),
            EffectType::PassiveConsciousness => Some(Resource::ConsciousnessCycles),
            EffectType::SellPrice => {
                bonuses.sell_price_multiplier += contribution;
                None
            }
            EffectType::CostReduction => {
                reduction += contribution;
                None
            }
            // Gating flag only, read by the prestige cycle.
            EffectType::UnlockPrestige => None,
            EffectType::Unknown(_) => None,
        };
        if let Some(resource) = passive_slot {
            *bonuses.passive.get_mut(resource) += contribution;
        }
    }

    bonuses.cost_reduction = reduction.clamp(0.0, MAX_COST_REDUCTION);
    bonuses
}

/// List price of the next purchase: `floor(baseCost × costScaling^count)`.
pub fn cost(upgrade: &Upgrade, count: u32) -> f64 {
    (upgrade.base_cost * upgrade.cost_scaling.powf(count as f64)).floor()
}

/// Price actually charged after the aggregate reduction.
pub fn final_cost(list_price: f64, cost_reduction: f64) -> f64 {
    (list_price * (1.0 - cost_reduction)).floor()
}

/// Why a purchase was refused. An expected outcome, not a failure.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Rejection {
    #[error("no such upgrade")]
    UnknownUpgrade,
    #[error("already at max purchases")]
    Maxed,
    #[error("requires {requires}")]
    Prerequisite { requires: String },
    #[error("unlocks at stage {stage}")]
    StageLocked { stage: u8 },
    #[error("needs {cost} {}", .resource.name())]
    Insufficient { cost: f64, resource: Resource },
}

impl Rejection {
    /// Short machine-readable reason tag.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::UnknownUpgrade => "unknown",
            Rejection::Maxed => "maxed",
            Rejection::Prerequisite { .. } => "prerequisite",
            Rejection::StageLocked { .. } => "stage",
            Rejection::Insufficient { .. } => "insufficient",
        }
    }
}

/// Validate one purchase. On success returns the cost that would be charged.
///
/// Order: maxed, prerequisite, stage gate, affordability.
pub fn can_purchase(
    upgrade: &Upgrade,
    count: u32,
    resources: &Resources,
    purchases: &BTreeMap<String, u32>,
    current_stage: u8,
    cost_reduction: f64,
) -> Result<f64, Rejection> {
    if upgrade.is_maxed(count) {
        return Err(Rejection::Maxed);
    }
    if let Some(pre) = &upgrade.prerequisite {
        if purchases.get(pre).copied().unwrap_or(0) == 0 {
            return Err(Rejection::Prerequisite {
                requires: pre.clone(),
            });
        }
    }
    if upgrade.stage > current_stage {
        return Err(Rejection::StageLocked {
            stage: upgrade.stage,
        });
    }
    let price = final_cost(cost(upgrade, count), cost_reduction);
    if resources.get(upgrade.cost_resource) < price {
        return Err(Rejection::Insufficient {
            cost: price,
            resource: upgrade.cost_resource,
        });
    }
    Ok(price)
}
