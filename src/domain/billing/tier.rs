//! Subscription tier definitions.

use serde::{Deserialize, Serialize};

/// Subscription level granted to a user.
///
/// Controls feature access. Stored and transmitted as `NONE`, `BASIC`, `PRO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    /// No paid access.
    #[default]
    None,
    /// Basic paid plan.
    Basic,
    /// Pro paid plan.
    Pro,
}

impl Tier {
    /// Parses a tier case-insensitively. Unknown strings map to `None`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "BASIC" => Tier::Basic,
            "PRO" => Tier::Pro,
            _ => Tier::None,
        }
    }

    /// Parses a tier that a caller may purchase. Returns `None` for anything
    /// other than `BASIC` or `PRO`.
    pub fn parse_purchasable(s: &str) -> Option<Self> {
        match Self::parse(s) {
            Tier::None => None,
            tier => Some(tier),
        }
    }

    /// Returns true if this tier grants paid access.
    pub fn is_active(&self) -> bool {
        !matches!(self, Tier::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::None => "NONE",
            Tier::Basic => "BASIC",
            Tier::Pro => "PRO",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
