//! Subscription tiers and response-body classification.

use std::fmt;

/// Phrase present only on the account page of an authenticated session.
pub const AUTHENTICATED_MARKER: &str = "Manage your subscription";

/// Plan-name markers in check order.
///
/// `"Premium"` is a substring of every other plan name, so the most specific
/// names must be checked first; order of appearance in the body is irrelevant.
pub const PLAN_MARKERS: [(&str, Tier); 4] = [
    ("Premium Family", Tier::PremiumFamily),
    ("Premium Duo", Tier::PremiumDuo),
    ("Premium Student", Tier::PremiumStudent),
    ("Premium", Tier::Premium),
];

/// Subscription tier of a live cookie set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Authenticated, but no plan marker matched.
    Free,
    /// Individual premium plan.
    Premium,
    /// Two-account premium plan.
    PremiumDuo,
    /// Family premium plan.
    PremiumFamily,
    /// Discounted student plan.
    PremiumStudent,
}

impl Tier {
    /// Display name as it appears on the account page.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Premium => "Premium",
            Self::PremiumDuo => "Premium Duo",
            Self::PremiumFamily => "Premium Family",
            Self::PremiumStudent => "Premium Student",
        }
    }

    /// Display name with spaces replaced by underscores, for file names.
    #[must_use]
    pub fn file_suffix(self) -> String {
        self.as_str().replace(' ', "_")
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating one cookie set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The endpoint accepted the session; carries the detected tier.
    Live(Tier),
    /// The endpoint answered but the session is not authenticated.
    Invalid,
    /// The request failed (network error, timeout, or non-success status).
    Unreachable,
}

impl Outcome {
    /// Returns the tier for live outcomes.
    #[must_use]
    pub fn tier(self) -> Option<Tier> {
        match self {
            Self::Live(tier) => Some(tier),
            Self::Invalid | Self::Unreachable => None,
        }
    }

    /// Returns `true` for [`Outcome::Live`].
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::Live(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live(tier) => write!(f, "{tier}"),
            Self::Invalid => f.write_str("Invalid"),
            Self::Unreachable => f.write_str("Unreachable"),
        }
    }
}

/// Classifies an account page body.
///
/// Without [`AUTHENTICATED_MARKER`] the outcome is [`Outcome::Invalid`].
/// Otherwise the first [`PLAN_MARKERS`] entry found decides the tier, and a
/// body with no plan marker is [`Tier::Free`].
#[must_use]
pub fn classify(body: &str) -> Outcome {
    if !body.contains(AUTHENTICATED_MARKER) {
        return Outcome::Invalid;
    }

    let tier = PLAN_MARKERS
        .iter()
        .find(|(marker, _)| body.contains(marker))
        .map_or(Tier::Free, |&(_, tier)| tier);
    Outcome::Live(tier)
}
