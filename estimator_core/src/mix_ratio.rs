//! # Mix Ratios
//!
//! Parses `cement:sand` (mortar, plaster) and `cement:sand:aggregate`
//! (concrete) expressions and splits a dry volume across the parts.
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::mix_ratio::{ConcreteGrade, MixRatio};
//! use estimator_core::units::CubicFeet;
//!
//! let mortar = MixRatio::parse("1:6").unwrap();
//! assert_eq!(mortar.total_parts(), 7.0);
//!
//! let split = mortar.split(CubicFeet(14.0));
//! assert_eq!(split.cement.0, 2.0);
//! assert_eq!(split.sand.0, 12.0);
//!
//! assert_eq!(ConcreteGrade::M20.mix_ratio().to_string(), "1:1.5:3");
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::CubicFeet;

/// Proportion of cement to sand (to aggregate) by volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixRatio {
    pub cement: f64,
    pub sand: f64,
    /// Present only for concrete mixes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<f64>,
}

/// A dry volume divided across the parts of a [`MixRatio`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialSplit {
    pub cement: CubicFeet,
    pub sand: CubicFeet,
    pub aggregate: CubicFeet,
}

impl MaterialSplit {
    /// Sum of all shares
    pub fn total(&self) -> CubicFeet {
        self.cement + self.sand + self.aggregate
    }
}

impl MixRatio {
    /// Standard plain cement concrete mix (1:2:4) used for flooring beds.
    pub const PCC: MixRatio = MixRatio {
        cement: 1.0,
        sand: 2.0,
        aggregate: Some(4.0),
    };

    /// Parse a colon-delimited ratio expression such as `"1:6"` or `"1:1.5:3"`.
    ///
    /// Fails with [`CalcError::InvalidRatio`] when the expression has fewer
    /// than 2 or more than 3 parts, or when any part is not a positive number.
    pub fn parse(expression: &str) -> CalcResult<Self> {
        let parts: Vec<&str> = expression.split(':').map(str::trim).collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(CalcError::invalid_ratio(
                expression,
                format!("Expected 2 or 3 parts, found {}", parts.len()),
            ));
        }

        let mut values = Vec::with_capacity(parts.len());
        for part in &parts {
            let value: f64 = part.parse().map_err(|_| {
                CalcError::invalid_ratio(expression, format!("'{}' is not a number", part))
            })?;
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_ratio(
                    expression,
                    format!("Part '{}' must be a positive number", part),
                ));
            }
            values.push(value);
        }

        Ok(MixRatio {
            cement: values[0],
            sand: values[1],
            aggregate: values.get(2).copied(),
        })
    }

    /// Number of parts (2 for mortar, 3 for concrete)
    pub fn arity(&self) -> usize {
        if self.aggregate.is_some() {
            3
        } else {
            2
        }
    }

    /// Sum of all parts
    pub fn total_parts(&self) -> f64 {
        self.cement + self.sand + self.aggregate.unwrap_or(0.0)
    }

    /// Ensure this is a cement:sand mix (masonry mortar, plaster).
    pub fn require_two_part(self) -> CalcResult<Self> {
        if self.arity() != 2 {
            return Err(CalcError::invalid_ratio(
                self.to_string(),
                "Mortar and plaster take a cement:sand ratio",
            ));
        }
        Ok(self)
    }

    /// Ensure this is a cement:sand:aggregate mix (concrete).
    pub fn require_three_part(self) -> CalcResult<Self> {
        if self.arity() != 3 {
            return Err(CalcError::invalid_ratio(
                self.to_string(),
                "Concrete takes a cement:sand:aggregate ratio",
            ));
        }
        Ok(self)
    }

    /// Divide a dry volume across the parts in proportion.
    ///
    /// The shares always add back up to `dry_volume`.
    pub fn split(&self, dry_volume: CubicFeet) -> MaterialSplit {
        let total = self.total_parts();
        let share = |part: f64| CubicFeet(dry_volume.0 * part / total);
        MaterialSplit {
            cement: share(self.cement),
            sand: share(self.sand),
            aggregate: share(self.aggregate.unwrap_or(0.0)),
        }
    }
}

impl std::fmt::Display for MixRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.cement, self.sand)?;
        if let Some(aggregate) = self.aggregate {
            write!(f, ":{}", aggregate)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for MixRatio {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MixRatio::parse(s)
    }
}

/// Nominal concrete grades and their volumetric mixes.
///
/// Serialized as its code ("M20"); deserialized with
/// [`ConcreteGrade::from_str_flexible`], so "m20" and "20" are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConcreteGrade {
    /// 1:1:2
    M25,
    /// 1:1.5:3, standard slab
    #[default]
    M20,
    /// 1:2:4, PCC/flooring
    M15,
    /// 1:3:6, rough base
    M10,
}

impl ConcreteGrade {
    /// All grades for UI selection
    pub const ALL: [ConcreteGrade; 4] = [
        ConcreteGrade::M25,
        ConcreteGrade::M20,
        ConcreteGrade::M15,
        ConcreteGrade::M10,
    ];

    /// Volumetric mix for this grade
    pub fn mix_ratio(&self) -> MixRatio {
        let (cement, sand, aggregate) = match self {
            ConcreteGrade::M25 => (1.0, 1.0, 2.0),
            ConcreteGrade::M20 => (1.0, 1.5, 3.0),
            ConcreteGrade::M15 => (1.0, 2.0, 4.0),
            ConcreteGrade::M10 => (1.0, 3.0, 6.0),
        };
        MixRatio {
            cement,
            sand,
            aggregate: Some(aggregate),
        }
    }

    /// Grade code (e.g., "M20")
    pub fn code(&self) -> &'static str {
        match self {
            ConcreteGrade::M25 => "M25",
            ConcreteGrade::M20 => "M20",
            ConcreteGrade::M15 => "M15",
            ConcreteGrade::M10 => "M10",
        }
    }

    /// Parse from common string representations ("M20", "m 20", "20")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_uppercase().replace([' ', '-', '_'], "").as_str() {
            "M25" | "25" => Ok(ConcreteGrade::M25),
            "M20" | "20" => Ok(ConcreteGrade::M20),
            "M15" | "15" => Ok(ConcreteGrade::M15),
            "M10" | "10" => Ok(ConcreteGrade::M10),
            _ => Err(CalcError::invalid_ratio(s, "Unknown concrete grade (expected M25, M20, M15 or M10)")),
        }
    }
}

impl TryFrom<String> for ConcreteGrade {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ConcreteGrade::from_str_flexible(&value)
    }
}

impl From<ConcreteGrade> for String {
    fn from(grade: ConcreteGrade) -> Self {
        grade.code().to_string()
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code(), self.mix_ratio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_part() {
        let ratio = MixRatio::parse("1:6").unwrap();
        assert_eq!(ratio.cement, 1.0);
        assert_eq!(ratio.sand, 6.0);
        assert_eq!(ratio.aggregate, None);
        assert_eq!(ratio.arity(), 2);
    }

    #[test]
    fn test_parse_three_part_with_decimals() {
        let ratio = MixRatio::parse(" 1 : 1.5 : 3 ").unwrap();
        assert_eq!(ratio.aggregate, Some(3.0));
        assert_eq!(ratio.total_parts(), 5.5);
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!(matches!(MixRatio::parse("1"), Err(CalcError::InvalidRatio { .. })));
        assert!(matches!(MixRatio::parse("1:2:3:4"), Err(CalcError::InvalidRatio { .. })));
        assert!(matches!(MixRatio::parse(""), Err(CalcError::InvalidRatio { .. })));
    }

    #[test]
    fn test_parse_rejects_bad_parts() {
        assert!(MixRatio::parse("1:0").is_err());
        assert!(MixRatio::parse("1:-4").is_err());
        assert!(MixRatio::parse("one:six").is_err());
        assert!(MixRatio::parse("1:").is_err());
        assert!(MixRatio::parse("1:inf").is_err());
        assert!(MixRatio::parse("1:NaN").is_err());
    }

    #[test]
    fn test_require_arity() {
        assert!(MixRatio::parse("1:4").unwrap().require_two_part().is_ok());
        assert!(MixRatio::parse("1:4").unwrap().require_three_part().is_err());
        assert!(MixRatio::parse("1:2:4").unwrap().require_two_part().is_err());
    }

    #[test]
    fn test_split_conserves_volume() {
        let ratio = MixRatio::parse("1:1.5:3").unwrap();
        let split = ratio.split(CubicFeet(100.0));
        assert!((split.total().0 - 100.0).abs() < 1e-9);
        assert!((split.cement.0 - 100.0 / 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_display_roundtrip() {
        for expr in ["1:6", "1:1.5:3", "1:2:4"] {
            let ratio: MixRatio = expr.parse().unwrap();
            assert_eq!(ratio.to_string(), expr);
        }
    }

    #[test]
    fn test_grade_lookup() {
        assert_eq!(ConcreteGrade::from_str_flexible("m20").unwrap(), ConcreteGrade::M20);
        assert_eq!(ConcreteGrade::from_str_flexible("M-15").unwrap(), ConcreteGrade::M15);
        assert!(ConcreteGrade::from_str_flexible("M40").is_err());
        assert_eq!(ConcreteGrade::M15.mix_ratio(), MixRatio::PCC);
    }

    #[test]
    fn test_grade_serialization() {
        let json = serde_json::to_string(&ConcreteGrade::M10).unwrap();
        assert_eq!(json, "\"M10\"");

        let lower: ConcreteGrade = serde_json::from_str("\"m20\"").unwrap();
        assert_eq!(lower, ConcreteGrade::M20);
        let bare: ConcreteGrade = serde_json::from_str("\"25\"").unwrap();
        assert_eq!(bare, ConcreteGrade::M25);
        assert!(serde_json::from_str::<ConcreteGrade>("\"M40\"").is_err());
    }
}
