//! # Quality Profiles
//!
//! Finish-quality tiers and the multipliers they apply to the MEP and
//! finishing cost categories. Structure cost is never scaled: the same slab
//! needs the same cement whatever tiles go on top of it.

use serde::{Deserialize, Serialize};

/// Coarse finish-quality bucket chosen for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityTier {
    Economy,
    #[default]
    Standard,
    Luxury,
}

/// Multipliers applied to per-unit MEP and finishing costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityProfile {
    pub tier: QualityTier,
    pub mep_multiplier: f64,
    pub finishing_multiplier: f64,
}

impl QualityTier {
    /// All tiers, cheapest first
    pub const ALL: [QualityTier; 3] = [QualityTier::Economy, QualityTier::Standard, QualityTier::Luxury];

    /// Multipliers bound to this tier
    pub fn profile(&self) -> QualityProfile {
        let (mep_multiplier, finishing_multiplier) = match self {
            QualityTier::Economy => (0.8, 0.75),
            QualityTier::Standard => (1.0, 1.0),
            QualityTier::Luxury => (1.35, 1.8),
        };
        QualityProfile {
            tier: *self,
            mep_multiplier,
            finishing_multiplier,
        }
    }

    /// Wire code (e.g., "STANDARD")
    pub fn code(&self) -> &'static str {
        match self {
            QualityTier::Economy => "ECONOMY",
            QualityTier::Standard => "STANDARD",
            QualityTier::Luxury => "LUXURY",
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipliers_strictly_increase() {
        let profiles: Vec<QualityProfile> = QualityTier::ALL.iter().map(|t| t.profile()).collect();
        for pair in profiles.windows(2) {
            assert!(pair[1].mep_multiplier > pair[0].mep_multiplier);
            assert!(pair[1].finishing_multiplier > pair[0].finishing_multiplier);
        }
    }

    #[test]
    fn test_standard_is_neutral() {
        let profile = QualityTier::Standard.profile();
        assert_eq!(profile.mep_multiplier, 1.0);
        assert_eq!(profile.finishing_multiplier, 1.0);
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&QualityTier::Luxury).unwrap(), "\"LUXURY\"");
        let tier: QualityTier = serde_json::from_str("\"ECONOMY\"").unwrap();
        assert_eq!(tier, QualityTier::Economy);
    }
}
