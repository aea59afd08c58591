//! Serializes one protocol into the flat external record.
//!
//! Every field the external schema expects is emitted on every save, with
//! empty strings for blank or gated-off values. The first field that
//! cannot be serialized aborts the whole record.

use crate::checkbox::{checkbox_spec, fanout_key, Selection};
use crate::error::EncodeError;
use crate::registry::CrossRefRegistry;
use rearc_model::{
    choice_codes, section_fields, FieldKind, FieldValue, FlatRecord, Protocol, SectionId,
    CROSS_REF_SLOTS,
};
use rearc_rules::{Completeness, Evaluation, FieldState};
use rearc_units::{to_canonical, UnitConfig};

/// Single-choice fields that carry a `stat<field>` completion flag for
/// the registry's mandatory-field statistics.
const STAT_FIELDS: &[&str] = &["zckb", "urkrstst", "rosc", "ekg1", "einsaort_cac"];

pub fn encode(
    protocol: &Protocol,
    eval: &Evaluation,
    completeness: Completeness,
    registry: &CrossRefRegistry,
    units: &UnitConfig,
) -> Result<FlatRecord, EncodeError> {
    let mut out = FlatRecord::new();
    out.set("record_id", protocol.record_id.to_string());
    out.set("validity", if eval.is_valid() { "1" } else { "0" });
    out.set("statmaxpflicht", completeness.total.to_string());
    out.set("statistpflicht", completeness.filled.to_string());

    for slot in 0..CROSS_REF_SLOTS {
        let key = format!("protnr_0{}", slot + 1);
        match &protocol.cross_refs[slot] {
            // A number already claimed by another protocol is silently
            // blanked, never rejected.
            Some(number)
                if !registry.is_claimed_by_other(protocol.record_id, number) =>
            {
                out.set(key, number.clone());
            }
            _ => out.set_blank(key),
        }
    }

    for section in SectionId::ALL {
        for def in section_fields(section) {
            encode_field(protocol, eval, units, def.name, def.kind, &mut out)?;
        }
    }
    Ok(out)
}

fn encode_field(
    protocol: &Protocol,
    eval: &Evaluation,
    units: &UnitConfig,
    field: &'static str,
    kind: FieldKind,
    out: &mut FlatRecord,
) -> Result<(), EncodeError> {
    if kind == FieldKind::MultiChoice {
        encode_fanout(protocol, eval, field, out);
        return Ok(());
    }

    // The clinic number mirrors the clinic name verbatim.
    if field == "iknumklin" {
        match protocol.get("namklin") {
            Some(FieldValue::Text(name)) => out.set(field, name.clone()),
            _ => out.set_blank(field),
        }
        return Ok(());
    }

    let active = eval.state(field) != FieldState::Inactive;
    let value = if active { protocol.get(field) } else { None };

    match value {
        None => out.set_blank(field),
        Some(FieldValue::Sentinel(raw)) => out.set(field, raw.clone()),
        Some(FieldValue::Text(text)) => out.set(field, text.clone()),
        Some(FieldValue::Choice(code)) => {
            let allowed = choice_codes(field);
            if allowed.is_empty() || allowed.contains(&code.as_str()) {
                out.set(field, code.clone());
            } else {
                out.set_blank(field);
            }
        }
        Some(FieldValue::Number(n)) => {
            let emitted = match units.unit_for(field) {
                Some(unit) => to_canonical(field, unit, *n).map_err(|source| {
                    EncodeError::Conversion {
                        field: field.to_string(),
                        source,
                    }
                })?,
                None => *n,
            };
            out.set(field, emitted.to_string());
        }
        Some(FieldValue::Date(date)) => {
            // The external system is one day ahead on every date field.
            let shifted = date
                .succ_opt()
                .ok_or_else(|| EncodeError::DateOutOfRange {
                    field: field.to_string(),
                })?;
            out.set(field, shifted.format("%Y-%m-%d").to_string());
        }
        Some(FieldValue::Time(time)) => {
            out.set(field, time.format("%H:%M").to_string());
        }
        Some(FieldValue::MultiChoice(_)) => out.set_blank(field),
    }

    if STAT_FIELDS.contains(&field) {
        let answered = active
            && matches!(
                protocol.get(field),
                Some(FieldValue::Choice(code))
                    if choice_codes(field).contains(&code.as_str())
            );
        out.set(format!("stat{}", field), if answered { "1" } else { "0" });
    }
    Ok(())
}

fn encode_fanout(
    protocol: &Protocol,
    eval: &Evaluation,
    field: &'static str,
    out: &mut FlatRecord,
) {
    let Some(spec) = checkbox_spec(field) else {
        return;
    };
    let selection = if eval.state(field) == FieldState::Inactive {
        Selection::new(spec)
    } else {
        match protocol.get(field).and_then(FieldValue::as_codes) {
            Some(codes) => Selection::from_codes(spec, codes.iter().map(String::as_str)),
            None => Selection::new(spec),
        }
    };
    // Every code is emitted on every save; the external system has no
    // notion of an absent fan-out field.
    for code in spec.codes {
        let bit = if selection.is_selected(code) { "1" } else { "0" };
        out.set(fanout_key(field, code), bit);
    }
}
