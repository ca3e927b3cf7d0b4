//! Force and moment units
//!
//! A load set carries exactly one force unit and one moment unit, and only the
//! canonical pairings are accepted:
//!
//! | force | moment |
//! |-------|--------|
//! | N     | Nm     |
//! | kN    | kNm    |
//! | lbf   | lbf-ft |
//! | klbf  | lbf-ft |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoadsError;

/// Force unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceUnit {
    #[serde(rename = "N")]
    N,
    #[serde(rename = "kN")]
    KN,
    #[serde(rename = "lbf")]
    Lbf,
    #[serde(rename = "klbf")]
    Klbf,
}

/// Moment unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MomentUnit {
    #[serde(rename = "Nm")]
    Nm,
    #[serde(rename = "kNm")]
    KNm,
    #[serde(rename = "lbf-ft")]
    LbfFt,
}

impl ForceUnit {
    pub const ALL: [ForceUnit; 4] = [ForceUnit::N, ForceUnit::KN, ForceUnit::Lbf, ForceUnit::Klbf];

    /// Conversion factor from this unit to newtons
    pub fn to_newtons(self) -> f64 {
        match self {
            ForceUnit::N => 1.0,
            ForceUnit::KN => 1000.0,
            ForceUnit::Lbf => 4.448222,
            ForceUnit::Klbf => 4448.222,
        }
    }

    /// The moment unit that goes with this force unit.
    ///
    /// `klbf` has no moment unit of its own and shares `lbf-ft`.
    pub fn paired_moment(self) -> MomentUnit {
        match self {
            ForceUnit::N => MomentUnit::Nm,
            ForceUnit::KN => MomentUnit::KNm,
            ForceUnit::Lbf | ForceUnit::Klbf => MomentUnit::LbfFt,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ForceUnit::N => "N",
            ForceUnit::KN => "kN",
            ForceUnit::Lbf => "lbf",
            ForceUnit::Klbf => "klbf",
        }
    }
}

impl MomentUnit {
    /// Conversion factor from this unit to newton-metres
    pub fn to_newton_metres(self) -> f64 {
        match self {
            MomentUnit::Nm => 1.0,
            MomentUnit::KNm => 1000.0,
            MomentUnit::LbfFt => 1.355818,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MomentUnit::Nm => "Nm",
            MomentUnit::KNm => "kNm",
            MomentUnit::LbfFt => "lbf-ft",
        }
    }
}

impl fmt::Display for ForceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MomentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForceUnit {
    type Err = LoadsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForceUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| LoadsError::UnsupportedUnit(s.to_string()))
    }
}

/// Unit system of a load set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawUnits")]
pub struct Units {
    forces: ForceUnit,
    moments: MomentUnit,
}

#[derive(Deserialize)]
struct RawUnits {
    forces: ForceUnit,
    moments: MomentUnit,
}

impl TryFrom<RawUnits> for Units {
    type Error = String;

    fn try_from(raw: RawUnits) -> Result<Self, Self::Error> {
        if raw.forces.paired_moment() != raw.moments {
            return Err(format!(
                "moment unit '{}' does not pair with force unit '{}' (expected '{}')",
                raw.moments,
                raw.forces,
                raw.forces.paired_moment()
            ));
        }
        Ok(Units {
            forces: raw.forces,
            moments: raw.moments,
        })
    }
}

impl Units {
    /// Units for a force unit and its paired moment unit
    pub fn new(forces: ForceUnit) -> Self {
        Self {
            forces,
            moments: forces.paired_moment(),
        }
    }

    pub fn forces(&self) -> ForceUnit {
        self.forces
    }

    pub fn moments(&self) -> MomentUnit {
        self.moments
    }
}

impl Default for Units {
    fn default() -> Self {
        Self::new(ForceUnit::N)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_table() {
        assert_eq!(ForceUnit::N.paired_moment(), MomentUnit::Nm);
        assert_eq!(ForceUnit::KN.paired_moment(), MomentUnit::KNm);
        assert_eq!(ForceUnit::Lbf.paired_moment(), MomentUnit::LbfFt);
        assert_eq!(ForceUnit::Klbf.paired_moment(), MomentUnit::LbfFt);
    }

    #[test]
    fn test_parse_force_unit() {
        assert_eq!("kN".parse::<ForceUnit>().unwrap(), ForceUnit::KN);
        assert_eq!("klbf".parse::<ForceUnit>().unwrap(), ForceUnit::Klbf);
        let err = "MN".parse::<ForceUnit>().unwrap_err();
        assert!(matches!(err, LoadsError::UnsupportedUnit(ref u) if u == "MN"));
    }

    #[test]
    fn test_units_json() {
        let units: Units = serde_json::from_str(r#"{"forces": "lbf", "moments": "lbf-ft"}"#).unwrap();
        assert_eq!(units, Units::new(ForceUnit::Lbf));
        assert_eq!(
            serde_json::to_string(&units).unwrap(),
            r#"{"forces":"lbf","moments":"lbf-ft"}"#
        );
    }

    #[test]
    fn test_mismatched_pairing_rejected() {
        assert!(serde_json::from_str::<Units>(r#"{"forces": "N", "moments": "kNm"}"#).is_err());
        assert!(serde_json::from_str::<Units>(r#"{"forces": "N", "moments": "Nmm"}"#).is_err());
    }
}
