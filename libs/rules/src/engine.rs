use crate::rule::{Constraint, FieldRule, Requiredness};
use crate::state::{Evaluation, FieldState, FieldStatus, Violation};
use crate::table::{ALWAYS_REQUIRED, RULES};
use chrono::Utc;
use once_cell::sync::Lazy;
use rearc_model::{field_name, section_fields, Protocol, SectionId, CROSS_REF_SLOTS};
use rearc_units::UnitConfig;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Filled-required / total-required progress over one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    pub filled: usize,
    pub total: usize,
}

static BY_FIELD: Lazy<HashMap<&'static str, &'static FieldRule>> = Lazy::new(|| {
    RULES.iter().map(|rule| (rule.field, rule)).collect()
});

// Governing field -> fields whose rules list it as a source.
static DEPENDENTS: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
    for rule in RULES.iter() {
        for source in rule.sources() {
            map.entry(source).or_default().push(rule.field);
        }
    }
    map
});

/// Interprets the rule table against a protocol.
///
/// Holds an explicit [`UnitConfig`] snapshot; callers construct a fresh
/// engine (or call [`RuleEngine::set_units`]) whenever the institution's
/// unit table may have changed, at session start and after admin edits.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    units: UnitConfig,
    today: chrono::NaiveDate,
}

impl RuleEngine {
    pub fn new(units: UnitConfig) -> Self {
        Self {
            units,
            today: Utc::now().date_naive(),
        }
    }

    /// Engine with a fixed "today", for deterministic date checks.
    pub fn with_today(units: UnitConfig, today: chrono::NaiveDate) -> Self {
        Self { units, today }
    }

    /// Replace the unit snapshot. Callers re-run [`RuleEngine::evaluate`]
    /// afterwards so unit-dependent bounds are re-applied.
    pub fn set_units(&mut self, units: UnitConfig) {
        self.units = units;
    }

    pub fn units(&self) -> &UnitConfig {
        &self.units
    }

    /// Full pass over every field, in section order.
    ///
    /// Fields whose gate is not met are deactivated and their stale
    /// values cleared, so nothing hidden ever reaches the encoder.
    pub fn evaluate(&self, protocol: &mut Protocol) -> Evaluation {
        let mut eval = Evaluation::default();
        for section in SectionId::ALL {
            for def in section_fields(section) {
                self.apply(protocol, def.name, &mut eval);
            }
        }
        eval
    }

    /// Synchronous re-fire after one field changed.
    ///
    /// Re-applies the changed field's own status (whether or not a rule
    /// targets it), then every rule that lists it as a source,
    /// transitively: deactivating a field clears its value, which can
    /// gate further fields off in turn.
    pub fn reevaluate(&self, protocol: &mut Protocol, changed: &str, eval: &mut Evaluation) {
        let mut queue: VecDeque<&'static str> = VecDeque::new();
        let mut seen: HashSet<&'static str> = HashSet::new();

        if let Some(field) = field_name(changed) {
            self.apply(protocol, field, eval);
            seen.insert(field);
        }
        if let Some(dependents) = DEPENDENTS.get(changed) {
            queue.extend(dependents.iter().copied());
        }
        while let Some(field) = queue.pop_front() {
            if !seen.insert(field) {
                continue;
            }
            self.apply(protocol, field, eval);
            if let Some(dependents) = DEPENDENTS.get(field) {
                queue.extend(dependents.iter().copied());
            }
        }
    }

    /// Progress over the required fields, counting the cross-reference
    /// slots alongside them.
    pub fn completeness(&self, protocol: &Protocol, eval: &Evaluation) -> Completeness {
        let mut filled = 0;
        let mut total = 0;
        for section in SectionId::ALL {
            for def in section_fields(section) {
                if eval.state(def.name) == FieldState::ActiveRequired {
                    total += 1;
                    if protocol.is_filled(def.name) {
                        filled += 1;
                    }
                }
            }
        }
        total += CROSS_REF_SLOTS;
        filled += protocol.cross_refs.iter().filter(|r| r.is_some()).count();
        Completeness { filled, total }
    }

    fn apply(&self, protocol: &mut Protocol, field: &'static str, eval: &mut Evaluation) {
        let rule = BY_FIELD.get(field).copied();
        let state = match rule.map(|r| &r.requiredness) {
            Some(Requiredness::Always) => FieldState::ActiveRequired,
            Some(Requiredness::When(gate)) => {
                if gate.is_met(protocol) {
                    FieldState::ActiveRequired
                } else {
                    FieldState::Inactive
                }
            }
            Some(Requiredness::OptionalWhen(gate)) => {
                if gate.is_met(protocol) {
                    FieldState::ActiveOptional
                } else {
                    FieldState::Inactive
                }
            }
            Some(Requiredness::Optional) | None => {
                if ALWAYS_REQUIRED.contains(&field) {
                    FieldState::ActiveRequired
                } else {
                    FieldState::ActiveOptional
                }
            }
        };

        if state == FieldState::Inactive {
            protocol.clear(field);
            eval.put(field, FieldStatus::inactive());
            return;
        }

        let violation = if !protocol.is_filled(field) {
            (state == FieldState::ActiveRequired).then_some(Violation::MissingRequired)
        } else if protocol.sentinel(field).is_some() {
            // A recorded "unknown" satisfies requiredness and carries no
            // value to range-check.
            None
        } else {
            rule.and_then(|r| self.first_violation(protocol, r))
        };
        eval.put(field, FieldStatus { state, violation });
    }

    fn first_violation(&self, protocol: &Protocol, rule: &FieldRule) -> Option<Violation> {
        let value = protocol.get(rule.field)?;
        for constraint in &rule.constraints {
            let violation = match constraint {
                Constraint::Range { min, max } => value.as_number().and_then(|n| {
                    (n < *min || n > *max).then_some(Violation::OutOfRange {
                        min: *min,
                        max: *max,
                    })
                }),
                Constraint::UnitRange(bounds) => {
                    match (value.as_number(), self.units.unit_for(rule.field)) {
                        (Some(n), Some(unit)) => bounds
                            .iter()
                            .find(|b| b.unit == unit)
                            .and_then(|b| {
                                (n < b.min || n > b.max).then_some(Violation::OutOfRange {
                                    min: b.min,
                                    max: b.max,
                                })
                            }),
                        // Unit not configured yet: unit-specific bounds
                        // are not applied.
                        _ => None,
                    }
                }
                Constraint::GateRange {
                    gate,
                    min,
                    max_when,
                    max_otherwise,
                } => value.as_number().and_then(|n| {
                    let max = if gate.is_met(protocol) {
                        *max_when
                    } else {
                        *max_otherwise
                    };
                    (n < *min || n > max)
                        .then_some(Violation::OutOfRange { min: *min, max })
                }),
                Constraint::DateNotFuture => value
                    .as_date()
                    .and_then(|d| (d > self.today).then_some(Violation::DateInFuture)),
                Constraint::DateOnOrAfter(reference) => {
                    match (value.as_date(), protocol.get(reference).and_then(|v| v.as_date())) {
                        (Some(own), Some(other)) if own < other => {
                            Some(Violation::DateBefore { reference })
                        }
                        _ => None,
                    }
                }
                Constraint::TimeAfter {
                    base_date,
                    base_time,
                    own_date,
                } => {
                    let base_d = protocol.get(base_date).and_then(|v| v.as_date());
                    let base_t = protocol.get(base_time).and_then(|v| v.as_time());
                    let own_d = protocol.get(own_date).and_then(|v| v.as_date());
                    match (base_d, base_t, own_d, value.as_time()) {
                        (Some(bd), Some(bt), Some(od), Some(ot)) if bd.and_time(bt) > od.and_time(ot) => {
                            Some(Violation::TimeNotAfter {
                                date: base_date,
                                time: base_time,
                            })
                        }
                        _ => None,
                    }
                }
                Constraint::CountRange { min, max } => value.as_codes().and_then(|codes| {
                    (codes.len() < *min || codes.len() > *max)
                        .then_some(Violation::SelectionCount {
                            min: *min,
                            max: *max,
                        })
                }),
            };
            if violation.is_some() {
                return violation;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rearc_model::FieldValue;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn engine() -> RuleEngine {
        RuleEngine::with_today(
            UnitConfig::new(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    fn num(s: &str) -> FieldValue {
        FieldValue::Number(Decimal::from_str(s).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> FieldValue {
        FieldValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn time(h: u32, m: u32) -> FieldValue {
        FieldValue::Time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn governing_change_refires_set_membership_gate() {
        let engine = engine();
        let mut p = Protocol::new(1);
        p.set("rosca", FieldValue::Choice("01".into()));
        let mut eval = engine.evaluate(&mut p);
        assert_eq!(eval.state("zroscaufn"), FieldState::Inactive);

        p.set("rosca", FieldValue::Choice("02".into()));
        engine.reevaluate(&mut p, "rosca", &mut eval);
        assert_eq!(eval.state("zroscaufn"), FieldState::ActiveRequired);
        // The blood-pressure block flips the other way.
        assert_eq!(eval.state("rraufn"), FieldState::Inactive);
    }

    #[test]
    fn filling_an_untargeted_required_field_clears_its_violation() {
        // rosc governs other rules but has no rule entry of its own;
        // its requiredness still refreshes on the incremental path.
        let engine = engine();
        let mut p = Protocol::new(1);
        let mut eval = engine.evaluate(&mut p);
        assert!(matches!(
            eval.status("rosc").unwrap().violation,
            Some(Violation::MissingRequired)
        ));

        p.set("rosc", FieldValue::Choice("01".into()));
        engine.reevaluate(&mut p, "rosc", &mut eval);
        assert!(eval.status("rosc").unwrap().is_valid());
        assert_eq!(eval.state("rosc"), FieldState::ActiveRequired);
    }

    #[test]
    fn deactivated_field_loses_its_value() {
        let engine = engine();
        let mut p = Protocol::new(1);
        p.set("aktkuehl", FieldValue::Choice("01".into()));
        p.set("kuehlbeg", FieldValue::Choice("02".into()));
        let mut eval = engine.evaluate(&mut p);
        assert_eq!(eval.state("kuehlbeg"), FieldState::ActiveRequired);

        p.set("aktkuehl", FieldValue::Choice("02".into()));
        engine.reevaluate(&mut p, "aktkuehl", &mut eval);
        assert_eq!(eval.state("kuehlbeg"), FieldState::Inactive);
        assert!(p.get("kuehlbeg").is_none());
        assert_eq!(eval.state("naktkuehl_grund"), FieldState::ActiveRequired);
    }

    #[test]
    fn unit_bounds_follow_the_snapshot() {
        let mut units = UnitConfig::new();
        units.set("co2aufn", 1); // mmHg, max 80
        let engine = RuleEngine::with_today(
            units.clone(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        let mut p = Protocol::new(1);
        p.set("co2aufn", num("40"));
        let eval = engine.evaluate(&mut p);
        assert!(eval.status("co2aufn").unwrap().is_valid());

        // Same stored number read under kPa is far out of range.
        let mut engine = engine;
        units.set("co2aufn", 2);
        engine.set_units(units);
        let eval = engine.evaluate(&mut p);
        assert!(matches!(
            eval.status("co2aufn").unwrap().violation,
            Some(Violation::OutOfRange { .. })
        ));
    }

    #[test]
    fn unconfigured_unit_skips_bounds() {
        let engine = engine();
        let mut p = Protocol::new(1);
        p.set("co2aufn", num("500"));
        let eval = engine.evaluate(&mut p);
        assert!(eval.status("co2aufn").unwrap().is_valid());
    }

    #[test]
    fn chained_time_gate_refires_on_date_edit() {
        let engine = engine();
        let mut p = Protocol::new(1);
        p.set("ekg12", FieldValue::Choice("01".into()));
        p.set("adatum", date(2024, 3, 1));
        p.set("zadatum", time(14, 0));
        p.set("dekg12", date(2024, 3, 1));
        p.set("zekg12", time(13, 0));
        let mut eval = engine.evaluate(&mut p);
        assert!(matches!(
            eval.status("zekg12").unwrap().violation,
            Some(Violation::TimeNotAfter { .. })
        ));

        // Moving the twelve-lead ECG to the next day resolves the
        // ordering without touching the time field itself.
        p.set("dekg12", date(2024, 3, 2));
        engine.reevaluate(&mut p, "dekg12", &mut eval);
        assert!(eval.status("zekg12").unwrap().is_valid());
    }

    #[test]
    fn equal_timestamps_pass_the_time_gate() {
        let engine = engine();
        let mut p = Protocol::new(1);
        p.set("ecls", FieldValue::Choice("02".into()));
        p.set("adatum", date(2024, 3, 1));
        p.set("ecprdbk", date(2024, 3, 1));
        p.set("ecprzbk", time(10, 30));
        p.set("ecprdst", date(2024, 3, 1));
        p.set("ecprzst", time(10, 30));
        let eval = engine.evaluate(&mut p);
        assert!(eval.status("ecprzst").unwrap().is_valid());
    }

    #[test]
    fn survival_gate_switches_stay_bounds() {
        let engine = engine();
        let mut p = Protocol::new(1);
        p.set("leb24h", FieldValue::Choice("02".into()));
        p.set("icutage", num("5"));
        let mut eval = engine.evaluate(&mut p);
        assert!(matches!(
            eval.status("icutage").unwrap().violation,
            Some(Violation::OutOfRange { .. })
        ));

        p.set("leb24h", FieldValue::Choice("01".into()));
        engine.reevaluate(&mut p, "leb24h", &mut eval);
        assert!(eval.status("icutage").unwrap().is_valid());
    }

    #[test]
    fn sentinel_satisfies_requiredness() {
        let engine = engine();
        let mut p = Protocol::new(1);
        let eval = engine.evaluate(&mut p);
        assert!(matches!(
            eval.status("lactaufn").unwrap().violation,
            Some(Violation::MissingRequired)
        ));

        p.set_sentinel("lactaufn", "999");
        let eval = engine.evaluate(&mut p);
        assert!(eval.status("lactaufn").unwrap().is_valid());
    }

    #[test]
    fn selection_count_is_capped() {
        let engine = engine();
        let mut p = Protocol::new(1);
        p.set(
            "ekgaufn",
            FieldValue::MultiChoice(vec!["01".into(), "02".into(), "03".into(), "04".into()]),
        );
        let eval = engine.evaluate(&mut p);
        assert!(matches!(
            eval.status("ekgaufn").unwrap().violation,
            Some(Violation::SelectionCount { min: 1, max: 3 })
        ));
    }

    #[test]
    fn completeness_counts_required_and_cross_refs() {
        let engine = engine();
        let mut p = Protocol::new(1);
        let eval = engine.evaluate(&mut p);
        let empty = engine.completeness(&p, &eval);
        assert_eq!(empty.filled, 0);
        assert!(empty.total >= ALWAYS_REQUIRED.len() + CROSS_REF_SLOTS);

        p.set("geschl", FieldValue::Choice("01".into()));
        p.cross_refs[0] = Some("E100".into());
        let eval = engine.evaluate(&mut p);
        let some = engine.completeness(&p, &eval);
        assert_eq!(some.filled, 2);
        assert_eq!(some.total, empty.total);
    }

    #[test]
    fn future_dates_are_flagged() {
        let engine = engine();
        let mut p = Protocol::new(1);
        p.set("adatum", date(2024, 6, 2));
        let eval = engine.evaluate(&mut p);
        assert!(matches!(
            eval.status("adatum").unwrap().violation,
            Some(Violation::DateInFuture)
        ));
    }

    #[test]
    fn discharge_before_admission_is_flagged() {
        let engine = engine();
        let mut p = Protocol::new(1);
        p.set("adatum", date(2024, 3, 10));
        p.set("entldat", date(2024, 3, 5));
        let eval = engine.evaluate(&mut p);
        assert!(matches!(
            eval.status("entldat").unwrap().violation,
            Some(Violation::DateBefore { reference: "adatum" })
        ));
    }
}
