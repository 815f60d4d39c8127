//! Maps a subscription's native status to a user tier change.

use super::Tier;

/// What a subscription status means for the owning user's tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierDecision {
    /// `active`: grant the tier resolved from the plan.
    Grant(Tier),
    /// `cancelled`, `expired`, `completed`, `halted`: drop to `NONE`.
    Revoke,
    /// `paused`: keep whatever the user has. Pausing does not revoke access.
    Retain,
    /// Any other status. The user's tier is left untouched.
    Unrecognized,
}

impl TierDecision {
    /// Decides from the gateway-native status. An absent status is unrecognized.
    pub fn for_status(status: Option<&str>, resolved: Tier) -> Self {
        match status {
            Some("active") => TierDecision::Grant(resolved),
            Some("cancelled" | "expired" | "completed" | "halted") => TierDecision::Revoke,
            Some("paused") => TierDecision::Retain,
            _ => TierDecision::Unrecognized,
        }
    }

    /// The tier to write given the user's current tier, or `None` for no write.
    pub fn next_tier(&self, current: Tier) -> Option<Tier> {
        match self {
            TierDecision::Grant(tier) => Some(*tier),
            TierDecision::Revoke => Some(Tier::None),
            TierDecision::Retain => Some(current),
            TierDecision::Unrecognized => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_grants_resolved_tier() {
        let decision = TierDecision::for_status(Some("active"), Tier::Basic);
        assert_eq!(decision, TierDecision::Grant(Tier::Basic));
        assert_eq!(decision.next_tier(Tier::None), Some(Tier::Basic));
    }

    #[test]
    fn active_with_unknown_plan_grants_none() {
        let decision = TierDecision::for_status(Some("active"), Tier::None);
        assert_eq!(decision.next_tier(Tier::Pro), Some(Tier::None));
    }

    #[test]
    fn terminal_statuses_revoke() {
        for status in ["cancelled", "expired", "completed", "halted"] {
            let decision = TierDecision::for_status(Some(status), Tier::Pro);
            assert_eq!(decision, TierDecision::Revoke, "status {}", status);
            assert_eq!(decision.next_tier(Tier::Pro), Some(Tier::None));
        }
    }

    #[test]
    fn paused_retains_current_tier() {
        let decision = TierDecision::for_status(Some("paused"), Tier::Basic);
        assert_eq!(decision.next_tier(Tier::Pro), Some(Tier::Pro));
    }

    #[test]
    fn other_statuses_make_no_change() {
        for status in [Some("pending"), Some("authenticated"), Some("ACTIVE"), None] {
            let decision = TierDecision::for_status(status, Tier::Pro);
            assert_eq!(decision, TierDecision::Unrecognized);
            assert_eq!(decision.next_tier(Tier::Basic), None);
        }
    }
}
