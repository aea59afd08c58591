//! Declarative rule shapes consumed by the engine.
//!
//! A rule names its target field, when the field is active/required, and
//! the constraints checked while it is active. Rules are static data; the
//! engine is the only interpreter.

use rearc_model::Protocol;
use rearc_units::FieldUnit;
use rust_decimal::Decimal;

/// Activation predicate on a governing field's current code.
#[derive(Debug, Clone, Copy)]
pub enum Gate {
    Equals(&'static str, &'static str),
    OneOf(&'static str, &'static [&'static str]),
}

impl Gate {
    pub fn source(&self) -> &'static str {
        match self {
            Gate::Equals(field, _) | Gate::OneOf(field, _) => field,
        }
    }

    pub fn is_met(&self, protocol: &Protocol) -> bool {
        match self {
            Gate::Equals(field, code) => protocol.code(field) == Some(code),
            Gate::OneOf(field, codes) => protocol
                .code(field)
                .map(|c| codes.contains(&c))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Requiredness {
    Always,
    /// Required while the gate is met; inactive otherwise.
    When(Gate),
    /// Active but optional while the gate is met; inactive otherwise.
    OptionalWhen(Gate),
    Optional,
}

/// One bounds row of a unit-dependent range.
#[derive(Debug, Clone, Copy)]
pub struct UnitBounds {
    pub unit: FieldUnit,
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone)]
pub enum Constraint {
    /// Fixed numeric bounds, inclusive.
    Range { min: Decimal, max: Decimal },
    /// Bounds resolved against the configured unit; skipped while the
    /// unit table has no entry for the field.
    UnitRange(Vec<UnitBounds>),
    /// Upper bound switched by a gate (survival-dependent stay lengths).
    GateRange {
        gate: Gate,
        min: Decimal,
        max_when: Decimal,
        max_otherwise: Decimal,
    },
    DateNotFuture,
    /// The date must not precede the referenced date field.
    DateOnOrAfter(&'static str),
    /// The field's own date+time pair must not precede the referenced
    /// pair; checked only when all four parts are present. `own_date`
    /// is the date field paired with this time field.
    TimeAfter {
        base_date: &'static str,
        base_time: &'static str,
        own_date: &'static str,
    },
    /// Bounds on the number of selected multi-choice codes.
    CountRange { min: usize, max: usize },
}

impl Constraint {
    /// Governing fields whose edits must re-fire this constraint.
    pub fn sources(&self) -> Vec<&'static str> {
        match self {
            Constraint::GateRange { gate, .. } => vec![gate.source()],
            Constraint::DateOnOrAfter(reference) => vec![reference],
            Constraint::TimeAfter {
                base_date,
                base_time,
                own_date,
            } => vec![base_date, base_time, own_date],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    pub requiredness: Requiredness,
    pub constraints: Vec<Constraint>,
}

impl FieldRule {
    /// Every governing field of this rule (gate plus constraint sources).
    pub fn sources(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        match &self.requiredness {
            Requiredness::When(gate) | Requiredness::OptionalWhen(gate) => {
                out.push(gate.source());
            }
            _ => {}
        }
        for constraint in &self.constraints {
            out.extend(constraint.sources());
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}
