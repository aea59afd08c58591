//! Pure display/canonical conversion with per-field factors and rounding.
//!
//! Rounding is half-away-from-zero at a fixed number of decimal places per
//! field, matching how the registry formats these values everywhere else.

use crate::{Error, FieldUnit, Result};
use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("literal decimal")
}

// Read direction (canonical -> display).
static KPA_PER_MMHG: Lazy<Decimal> = Lazy::new(|| dec("0.133322"));
static LACT_TO_MMOL: Lazy<Decimal> = Lazy::new(|| dec("0.111"));
static BZ_TO_MMOL: Lazy<Decimal> = Lazy::new(|| dec("0.0555"));
static KREA_TO_UMOL: Lazy<Decimal> = Lazy::new(|| dec("88.40168421052632"));
static HB_TO_G_L: Lazy<Decimal> = Lazy::new(|| dec("10"));

// Write direction (display -> canonical). Not exact reciprocals of the
// read factors; these literals are fixed by the registry definition.
static MMHG_PER_KPA: Lazy<Decimal> = Lazy::new(|| dec("7.5006375541921"));
static LACT_TO_MG_DL: Lazy<Decimal> = Lazy::new(|| dec("9.01"));
static BZ_TO_MG_DL: Lazy<Decimal> = Lazy::new(|| dec("18.018"));
static KREA_TO_MG_DL: Lazy<Decimal> = Lazy::new(|| dec("0.0113120016765577"));
static HB_TO_G_DL: Lazy<Decimal> = Lazy::new(|| dec("0.1"));

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a canonically-stored value into the configured display unit.
pub fn to_display(field: &str, unit: FieldUnit, canonical: Decimal) -> Result<Decimal> {
    match (field, unit) {
        ("co2aufn" | "ecprpco2" | "ecprpao2", FieldUnit::KPa) => {
            Ok(round(canonical * *KPA_PER_MMHG, 3))
        }
        ("co2aufn" | "ecprpco2" | "ecprpao2", FieldUnit::MmHg) => Ok(round(canonical, 3)),
        ("hbaufn", FieldUnit::GPerL) => Ok(round(canonical * *HB_TO_G_L, 0)),
        ("hbaufn", FieldUnit::GPerDl) => Ok(round(canonical, 1)),
        ("bzaufn", FieldUnit::MmolPerL) => Ok(round(canonical * *BZ_TO_MMOL, 1)),
        ("bzaufn", FieldUnit::MgPerDl) => Ok(round(canonical, 0)),
        ("lactaufn" | "ecprlact", FieldUnit::MmolPerL) => {
            Ok(round(canonical * *LACT_TO_MMOL, 2))
        }
        ("lactaufn" | "ecprlact", FieldUnit::MgPerDl) => Ok(round(canonical, 2)),
        ("kreaaufn", FieldUnit::UmolPerL) => Ok(round(canonical * *KREA_TO_UMOL, 1)),
        ("kreaaufn", FieldUnit::MgPerDl) => Ok(round(canonical, 3)),
        ("co2aufn" | "ecprpco2" | "ecprpao2" | "hbaufn" | "bzaufn" | "lactaufn" | "ecprlact"
        | "kreaaufn", _) => Err(Error::WrongUnit {
            field: field.into(),
            unit,
        }),
        _ => Err(Error::NotUnitDependent(field.into())),
    }
}

/// Convert a display-unit value back into the canonical storage unit.
///
/// The canonical-unit case passes the value through unrounded: only the
/// converted path carries a fixed precision, as on the original write path.
pub fn to_canonical(field: &str, unit: FieldUnit, display: Decimal) -> Result<Decimal> {
    match (field, unit) {
        ("co2aufn" | "ecprpco2" | "ecprpao2", FieldUnit::KPa) => {
            Ok(round(display * *MMHG_PER_KPA, 3))
        }
        ("co2aufn" | "ecprpco2" | "ecprpao2", FieldUnit::MmHg) => Ok(display),
        ("hbaufn", FieldUnit::GPerL) => Ok(round(display * *HB_TO_G_DL, 1)),
        ("hbaufn", FieldUnit::GPerDl) => Ok(display),
        ("bzaufn", FieldUnit::MmolPerL) => Ok(round(display * *BZ_TO_MG_DL, 0)),
        ("bzaufn", FieldUnit::MgPerDl) => Ok(display),
        ("lactaufn" | "ecprlact", FieldUnit::MmolPerL) => {
            Ok(round(display * *LACT_TO_MG_DL, 2))
        }
        ("lactaufn" | "ecprlact", FieldUnit::MgPerDl) => Ok(display),
        ("kreaaufn", FieldUnit::UmolPerL) => Ok(round(display * *KREA_TO_MG_DL, 3)),
        ("kreaaufn", FieldUnit::MgPerDl) => Ok(display),
        ("co2aufn" | "ecprpco2" | "ecprpao2" | "hbaufn" | "bzaufn" | "lactaufn" | "ecprlact"
        | "kreaaufn", _) => Err(Error::WrongUnit {
            field: field.into(),
            unit,
        }),
        _ => Err(Error::NotUnitDependent(field.into())),
    }
}
