//! Game logic: click, purchase commit and the per-tick advance.
//!
//! Pure state transitions. Side effects the caller must perform are returned
//! as [`Intent`]s instead of being executed here.

use super::catalog::{Catalog, EffectType};
use super::economy::{self, Bonuses, Rejection};
use super::stage;
use super::state::{GameState, Resource};

/// Follow-up work requested by a state transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    /// Write a snapshot now.
    Persist,
    /// Ask the player whether to reset into the next simulation depth.
    OfferPrestige,
    /// The stage counter moved forward to this id.
    StageAdvanced(u8),
    /// Redraw the read-only view.
    Render,
}

/// What one tick did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub sales: u64,
    pub dollars_from_sales: f64,
    pub stage_advanced: Option<u8>,
}

/// Manual click: add one click's worth of product.
pub fn click(state: &mut GameState, bonuses: &Bonuses) {
    state.resources.add(Resource::Product, bonuses.click_yield());
    state.statistics.total_clicks += 1;
}

/// Buy one level of an upgrade. Validation runs against the live state, never
/// a previously displayed price. On rejection nothing changes.
///
/// On success `bonuses` is recomputed and the returned intents say what the
/// orchestrator must do next.
pub fn purchase(
    state: &mut GameState,
    catalog: &Catalog,
    bonuses: &mut Bonuses,
    upgrade_id: &str,
) -> Result<Vec<Intent>, Rejection> {
    let upgrade = catalog.get(upgrade_id).ok_or(Rejection::UnknownUpgrade)?;
    let count = state.purchase_count(upgrade_id);
    let price = economy::can_purchase(
        upgrade,
        count,
        &state.resources,
        &state.upgrades,
        state.current_stage,
        bonuses.cost_reduction,
    )?;

    state.resources.add(upgrade.cost_resource, -price);
    state.upgrades.insert(upgrade.id.clone(), count + 1);
    *bonuses = economy::compute_bonuses(catalog, &state.upgrades, &state.prestige.permanent_bonuses);

    let mut intents = vec![Intent::Persist];
    if upgrade.effect_type == EffectType::UnlockPrestige {
        state.prestige_unlocked = true;
        intents.push(Intent::OfferPrestige);
    }
    Ok(intents)
}

/// Advance the simulation by `elapsed_ms` of measured wall time.
pub fn advance(state: &mut GameState, bonuses: &Bonuses, elapsed_ms: f64) -> TickReport {
    if elapsed_ms <= 0.0 {
        return TickReport::default();
    }
    let seconds = elapsed_ms / 1000.0;
    state.statistics.play_time += seconds;

    let rates = bonuses.production_rates();
    for &resource in Resource::all() {
        state.resources.add(resource, rates.get(resource) * seconds);
    }
    state.statistics.total_earned += rates.dollars * seconds;

    let (sales, dollars_from_sales) = auto_sell(state, bonuses);
    let stage_advanced = check_stage(state);

    TickReport {
        sales,
        dollars_from_sales,
        stage_advanced,
    }
}

/// Convert every full batch of product into dollars. A single tick may cover
/// several batches, so all of them are sold at once. Returns (sales, dollars).
fn auto_sell(state: &mut GameState, bonuses: &Bonuses) -> (u64, f64) {
    let current = stage::stage(state.current_stage);
    if current.product_per_sale <= 0.0 || state.resources.product < current.product_per_sale {
        return (0, 0.0);
    }
    let sales = (state.resources.product / current.product_per_sale).floor();
    let earned = sales * bonuses.sale_price(current);

    state.resources.product -= sales * current.product_per_sale;
    state.resources.add(Resource::Dollars, earned);
    state.statistics.total_earned += earned;
    (sales as u64, earned)
}

/// Move forward at most one stage per tick.
fn check_stage(state: &mut GameState) -> Option<u8> {
    let next = stage::next_stage(state.current_stage)?;
    if state.statistics.total_earned >= next.unlock_threshold {
        state.current_stage = next.id;
        Some(next.id)
    } else {
        None
    }
}

/// Format a number with commas (e.g. 1234567 → "1,234,567").
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    if !n.is_finite() {
        return "∞".to_string();
    }
    let int_part = n.floor() as u64;
    let frac = n - int_part as f64;

    let s = int_part.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    let tenth = (frac * 10.0).round() as u8;
    if frac > 0.05 && tenth < 10 {
        format!("{}.{}", result, tenth)
    } else {
        result
    }
}

/// Format a duration in ms as "2d 3h", "4h 12m", "5m 30s" or "42s".
pub fn format_duration(ms: f64) -> String {
    let total = (ms.max(0.0) / 1000.0).floor() as u64;
    let (d, h, m, s) = (total / 86_400, total / 3_600 % 24, total / 60 % 60, total % 60);
    if d > 0 {
        format!("{d}d {h}h")
    } else if h > 0 {
        format!("{h}h {m}m")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}
