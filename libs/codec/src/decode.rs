//! Populates a protocol from the flat external record.
//!
//! Dispatch is purely by the static schema tables; keys the schema does
//! not know are ignored. Values that violate a field's type or sentinel
//! contract abort the decode, so a malformed record never yields a
//! half-populated protocol. Callers run the rule engine on the result to
//! restore activation state.

use crate::checkbox::{checkbox_spec, fanout_key, Selection};
use crate::error::DecodeError;
use chrono::{NaiveDate, NaiveTime};
use rearc_model::{
    is_sentinel, section_fields, FieldKind, FieldValue, FlatRecord, Protocol, SectionId,
    CROSS_REF_SLOTS,
};
use rearc_units::{to_display, UnitConfig};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn decode(flat: &FlatRecord, units: &UnitConfig) -> Result<Protocol, DecodeError> {
    let record_id = match flat.get_non_empty("record_id") {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| DecodeError::InvalidRecordId(raw.to_string()))?,
        None => 0,
    };
    let mut protocol = Protocol::new(record_id);

    for slot in 0..CROSS_REF_SLOTS {
        let key = format!("protnr_0{}", slot + 1);
        protocol.cross_refs[slot] = flat.get_non_empty(&key).map(str::to_string);
    }

    for section in SectionId::ALL {
        for def in section_fields(section) {
            decode_field(flat, units, def.name, def.kind, &mut protocol)?;
        }
    }
    Ok(protocol)
}

fn decode_field(
    flat: &FlatRecord,
    units: &UnitConfig,
    field: &'static str,
    kind: FieldKind,
    protocol: &mut Protocol,
) -> Result<(), DecodeError> {
    if kind == FieldKind::MultiChoice {
        if let Some(spec) = checkbox_spec(field) {
            // Replaying the set bits one toggle at a time leaves the
            // cap/exclusive disablement exactly as it was at save time.
            let set_codes = spec
                .codes
                .iter()
                .copied()
                .filter(|code| flat.get(&fanout_key(field, code)) == Some("1"));
            let selection = Selection::from_codes(spec, set_codes);
            if !selection.is_empty() {
                protocol.set(
                    field,
                    FieldValue::MultiChoice(
                        selection.selected_codes().iter().map(|c| c.to_string()).collect(),
                    ),
                );
            }
        }
        return Ok(());
    }

    let Some(raw) = flat.get_non_empty(field) else {
        return Ok(());
    };
    if is_sentinel(field, raw) {
        protocol.set_sentinel(field, raw);
        return Ok(());
    }

    let value = match kind {
        FieldKind::Text => FieldValue::Text(raw.to_string()),
        FieldKind::Choice => FieldValue::Choice(raw.to_string()),
        FieldKind::Number => {
            let canonical =
                Decimal::from_str(raw).map_err(|_| DecodeError::InvalidNumber {
                    field: field.to_string(),
                    raw: raw.to_string(),
                })?;
            let display = match units.unit_for(field) {
                Some(unit) => to_display(field, unit, canonical).map_err(|source| {
                    DecodeError::Conversion {
                        field: field.to_string(),
                        source,
                    }
                })?,
                None => canonical,
            };
            FieldValue::Number(display)
        }
        FieldKind::Date => {
            let stored =
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    DecodeError::InvalidDate {
                        field: field.to_string(),
                        raw: raw.to_string(),
                    }
                })?;
            // Inverse of the encoder's one-day forward shift.
            let date = stored.pred_opt().ok_or_else(|| DecodeError::InvalidDate {
                field: field.to_string(),
                raw: raw.to_string(),
            })?;
            FieldValue::Date(date)
        }
        FieldKind::Time => {
            let time = NaiveTime::parse_from_str(raw, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
                .map_err(|_| DecodeError::InvalidTime {
                    field: field.to_string(),
                    raw: raw.to_string(),
                })?;
            FieldValue::Time(time)
        }
        FieldKind::MultiChoice => unreachable!("handled above"),
    };
    protocol.set(field, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(pairs: &[(&str, &str)]) -> FlatRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn dates_are_shifted_back() {
        let record = flat(&[("adatum", "2024-03-01")]);
        let p = decode(&record, &UnitConfig::new()).unwrap();
        assert_eq!(
            p.get("adatum").unwrap().as_date(),
            Some(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
    }

    #[test]
    fn sentinel_is_kept_as_sentinel_not_parsed() {
        let record = flat(&[("dtod", "9999-99-99"), ("lactaufn", "999")]);
        let p = decode(&record, &UnitConfig::new()).unwrap();
        assert_eq!(p.sentinel("dtod"), Some("9999-99-99"));
        assert_eq!(p.sentinel("lactaufn"), Some("999"));
    }

    #[test]
    fn read_conversion_applies_configured_unit() {
        let mut units = UnitConfig::new();
        units.set("co2aufn", 2); // kPa
        let record = flat(&[("co2aufn", "7.5")]);
        let p = decode(&record, &units).unwrap();
        assert_eq!(
            p.get("co2aufn").unwrap().as_number().unwrap().to_string(),
            "1.000"
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let record = flat(&[("not_a_field", "hello"), ("geschl", "01")]);
        let p = decode(&record, &UnitConfig::new()).unwrap();
        assert_eq!(p.code("geschl"), Some("01"));
    }

    #[test]
    fn malformed_number_aborts() {
        let record = flat(&[("o2saufn", "abc")]);
        assert!(matches!(
            decode(&record, &UnitConfig::new()),
            Err(DecodeError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn fanout_bits_become_an_ordered_selection() {
        let record = flat(&[
            ("komplsek___03", "1"),
            ("komplsek___08", "1"),
            ("komplsek___02", "0"),
        ]);
        let p = decode(&record, &UnitConfig::new()).unwrap();
        assert_eq!(
            p.get("komplsek").unwrap().as_codes().unwrap(),
            &["03".to_string(), "08".to_string()]
        );
    }

    #[test]
    fn cross_references_are_collected() {
        let record = flat(&[
            ("record_id", "17"),
            ("protnr_01", "E100"),
            ("protnr_03", "E300"),
        ]);
        let p = decode(&record, &UnitConfig::new()).unwrap();
        assert_eq!(p.record_id, 17);
        assert_eq!(p.cross_refs[0].as_deref(), Some("E100"));
        assert_eq!(p.cross_refs[1], None);
        assert_eq!(p.cross_refs[2].as_deref(), Some("E300"));
    }
}
