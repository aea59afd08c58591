use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A concrete measurement unit one of the unit-dependent fields may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldUnit {
    MmHg,
    KPa,
    GPerL,
    GPerDl,
    MgPerDl,
    MmolPerL,
    UmolPerL,
}

impl std::fmt::Display for FieldUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MmHg => "mmHg",
            Self::KPa => "kPa",
            Self::GPerL => "g/L",
            Self::GPerDl => "g/dL",
            Self::MgPerDl => "mg/dL",
            Self::MmolPerL => "mmol/L",
            Self::UmolPerL => "µmol/L",
        };
        write!(f, "{}", s)
    }
}

/// Snapshot of the institution's unit table.
///
/// Loaded from the externally-owned settings store at session start and
/// after any admin change; callers pass it around explicitly rather than
/// caching it in component state. A field missing from the snapshot means
/// the configuration is not loaded yet — unit-specific validation and
/// conversion are simply not applied then.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitConfig {
    codes: HashMap<String, u8>,
}

impl UnitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, code: u8) {
        self.codes.insert(field.into(), code);
    }

    /// Resolve the configured unit for a field.
    ///
    /// `None` means "not configured (yet)" or "not a unit-dependent field";
    /// either way the caller skips unit-specific behavior.
    pub fn unit_for(&self, field: &str) -> Option<FieldUnit> {
        let code = *self.codes.get(field)?;
        match field {
            // Partial pressures: 1 = mmHg, 2 = kPa.
            "co2aufn" | "ecprpco2" | "ecprpao2" => match code {
                1 => Some(FieldUnit::MmHg),
                2 => Some(FieldUnit::KPa),
                _ => None,
            },
            // Hemoglobin: 1 = g/L, 2 = g/dL.
            "hbaufn" => match code {
                1 => Some(FieldUnit::GPerL),
                2 => Some(FieldUnit::GPerDl),
                _ => None,
            },
            // Lactate and glucose: 1 = mg/dL, 2 = mmol/L.
            "lactaufn" | "ecprlact" | "bzaufn" => match code {
                1 => Some(FieldUnit::MgPerDl),
                2 => Some(FieldUnit::MmolPerL),
                _ => None,
            },
            // Creatinine: 1 = mg/dL, 2 = µmol/L.
            "kreaaufn" => match code {
                1 => Some(FieldUnit::MgPerDl),
                2 => Some(FieldUnit::UmolPerL),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromIterator<(String, u8)> for UnitConfig {
    fn from_iter<I: IntoIterator<Item = (String, u8)>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}
