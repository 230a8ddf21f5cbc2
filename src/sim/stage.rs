//! Static stage table: what is being built and sold at each progression tier.

use super::state::Resource;

pub const FIRST_STAGE: u8 = 1;
pub const TOTAL_STAGES: u8 = 6;

/// One progression tier.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    pub id: u8,
    pub product_name: &'static str,
    pub click_label: &'static str,
    pub base_sell_price: f64,
    /// Lifetime dollars (this prestige cycle) needed to enter the stage.
    pub unlock_threshold: f64,
    /// Units auto-sold per sale event.
    pub product_per_sale: f64,
    /// Secondary resource that becomes visible from this stage on.
    pub introduces: Option<Resource>,
}

static STAGES: [Stage; TOTAL_STAGES as usize] = [
    Stage {
        id: 1,
        product_name: "Lines of Code",
        click_label: "Write Code",
        base_sell_price: 1.0,
        unlock_threshold: 0.0,
        product_per_sale: 10.0,
        introduces: None,
    },
    Stage {
        id: 2,
        product_name: "Apps",
        click_label: "Ship App",
        base_sell_price: 12.0,
        unlock_threshold: 1_000.0,
        product_per_sale: 10.0,
        introduces: None,
    },
    Stage {
        id: 3,
        product_name: "Models",
        click_label: "Train Model",
        base_sell_price: 150.0,
        unlock_threshold: 50_000.0,
        product_per_sale: 10.0,
        introduces: Some(Resource::ComputeUnits),
    },
    Stage {
        id: 4,
        product_name: "Agents",
        click_label: "Deploy Agent",
        base_sell_price: 2_500.0,
        unlock_threshold: 2_500_000.0,
        product_per_sale: 10.0,
        introduces: Some(Resource::IntelligencePoints),
    },
    Stage {
        id: 5,
        product_name: "Minds",
        click_label: "Awaken Mind",
        base_sell_price: 60_000.0,
        unlock_threshold: 150_000_000.0,
        product_per_sale: 10.0,
        introduces: Some(Resource::ConsciousnessCycles),
    },
    Stage {
        id: 6,
        product_name: "Simulated Universes",
        click_label: "Spawn Universe",
        base_sell_price: 1_500_000.0,
        unlock_threshold: 10_000_000_000.0,
        product_per_sale: 10.0,
        introduces: None,
    },
];

/// All stages in order.
pub fn all() -> &'static [Stage] {
    &STAGES
}

/// Look up a stage. Out-of-range ids clamp into the table.
pub fn stage(id: u8) -> &'static Stage {
    let idx = id.clamp(FIRST_STAGE, TOTAL_STAGES) as usize - 1;
    &STAGES[idx]
}

/// The stage after `id`, or None at the final stage.
pub fn next_stage(id: u8) -> Option<&'static Stage> {
    if id >= TOTAL_STAGES {
        None
    } else {
        Some(stage(id + 1))
    }
}

/// Resources shown at `current_stage`: product and dollars always, plus every
/// resource introduced up to and including this stage.
pub fn visible_resources(current_stage: u8) -> Vec<Resource> {
    let mut visible = vec![Resource::Product, Resource::Dollars];
    visible.extend(
        STAGES
            .iter()
            .filter(|s| s.id <= current_stage)
            .filter_map(|s| s.introduces),
    );
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_ids_are_sequential() {
        for (i, s) in all().iter().enumerate() {
            assert_eq!(s.id as usize, i + 1);
        }
        assert_eq!(all().len(), TOTAL_STAGES as usize);
    }

    #[test]
    fn thresholds_strictly_increase() {
        for pair in all().windows(2) {
            assert!(pair[1].unlock_threshold > pair[0].unlock_threshold);
        }
    }

    #[test]
    fn lookup_clamps_out_of_range() {
        assert_eq!(stage(0).id, 1);
        assert_eq!(stage(99).id, TOTAL_STAGES);
    }

    #[test]
    fn no_stage_after_final() {
        assert!(next_stage(TOTAL_STAGES).is_none());
        assert_eq!(next_stage(1).map(|s| s.id), Some(2));
    }

    #[test]
    fn secondary_resources_appear_with_their_stage() {
        assert_eq!(visible_resources(1), vec![Resource::Product, Resource::Dollars]);
        assert!(visible_resources(3).contains(&Resource::ComputeUnits));
        assert!(!visible_resources(3).contains(&Resource::IntelligencePoints));
        assert_eq!(visible_resources(6).len(), 5);
    }
}
