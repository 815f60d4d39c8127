//! Tier pricing and plan configuration, and the plan-to-tier resolver.

use serde::{Deserialize, Serialize};

use super::Tier;

/// Primary key of the singleton settings record.
pub const TIER_SETTINGS_ID: &str = "singleton";

/// Singleton configuration record mapping gateway plans to local tiers.
///
/// Read-only from the billing core's perspective. Created with defaults on
/// first access if absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSettings {
    /// ISO currency code for displayed prices.
    pub currency: String,
    /// Price of the basic tier in minor units.
    pub basic_price: i64,
    /// Price of the pro tier in minor units.
    pub pro_price: i64,
    /// Gateway plan id billed for the basic tier.
    pub basic_plan_id: Option<String>,
    /// Gateway plan id billed for the pro tier.
    pub pro_plan_id: Option<String>,
}

impl Default for TierSettings {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            basic_price: 0,
            pro_price: 0,
            basic_plan_id: None,
            pro_plan_id: None,
        }
    }
}

impl TierSettings {
    /// Returns the configured plan id for a purchasable tier.
    ///
    /// Empty or whitespace-only ids count as not configured.
    pub fn plan_id_for(&self, tier: Tier) -> Option<&str> {
        let plan = match tier {
            Tier::Basic => self.basic_plan_id.as_deref(),
            Tier::Pro => self.pro_plan_id.as_deref(),
            Tier::None => None,
        };
        plan.map(str::trim).filter(|p| !p.is_empty())
    }

    /// Maps a gateway plan id to a local tier.
    ///
    /// Total: a missing or unknown plan id maps to `Tier::None`. Both sides
    /// are compared trimmed.
    pub fn resolve_plan_tier(&self, plan_id: Option<&str>) -> Tier {
        let Some(plan_id) = plan_id.map(str::trim).filter(|p| !p.is_empty()) else {
            return Tier::None;
        };
        if self.plan_id_for(Tier::Basic) == Some(plan_id) {
            Tier::Basic
        } else if self.plan_id_for(Tier::Pro) == Some(plan_id) {
            Tier::Pro
        } else {
            Tier::None
        }
    }
}
