//! The rule table: one declarative entry per governed or constrained field.
//!
//! Gate codes and numeric bounds are fixed by the registry's data
//! dictionary. Fields without an entry here are plain optional fields.

use crate::rule::{Constraint, FieldRule, Gate, Requiredness, UnitBounds};
use once_cell::sync::Lazy;
use rearc_units::FieldUnit;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("literal decimal")
}

fn entry(field: &'static str, requiredness: Requiredness) -> FieldRule {
    FieldRule {
        field,
        requiredness,
        constraints: Vec::new(),
    }
}

fn with(mut rule: FieldRule, constraint: Constraint) -> FieldRule {
    rule.constraints.push(constraint);
    rule
}

fn range(field: &'static str, requiredness: Requiredness, min: &str, max: &str) -> FieldRule {
    with(
        entry(field, requiredness),
        Constraint::Range {
            min: dec(min),
            max: dec(max),
        },
    )
}

fn ub(unit: FieldUnit, min: &str, max: &str) -> UnitBounds {
    UnitBounds {
        unit,
        min: dec(min),
        max: dec(max),
    }
}

fn pressure_bounds() -> Vec<UnitBounds> {
    vec![
        ub(FieldUnit::MmHg, "0", "80"),
        ub(FieldUnit::KPa, "0", "10.666"),
    ]
}

fn lactate_bounds() -> Vec<UnitBounds> {
    vec![
        ub(FieldUnit::MgPerDl, "0.90", "270.03"),
        ub(FieldUnit::MmolPerL, "0.10", "29.97"),
    ]
}

use Requiredness::{Always, Optional};

fn when(field: &'static str, code: &'static str) -> Requiredness {
    Requiredness::When(Gate::Equals(field, code))
}

fn when_one_of(field: &'static str, codes: &'static [&'static str]) -> Requiredness {
    Requiredness::When(Gate::OneOf(field, codes))
}

/// Fields required unconditionally on every protocol.
pub static ALWAYS_REQUIRED: &[&str] = &[
    "datum", "adatum", "stokenn", "patid", "gebdat", "geschl", "aufnq",
    "ekg1", "urkrstst", "zckb", "zchdm", "rosc", "rosca", "o2saufn",
    "bgaaufn", "lactaufn", "bzaufn", "kreaaufn", "urkrststaufn", "ekg12",
    "efast", "ct", "coro", "tee", "tte", "lyse", "aktkuehl", "leb30d",
    "komplsek", "lebentl", "thlimit", "entldat", "wvwie", "leb24h", "dtod",
    "ztod",
];

pub static RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        // Section 1: registration and admission.
        with(entry("datum", Always), Constraint::DateNotFuture),
        with(entry("gebdat", Always), Constraint::DateNotFuture),
        with(entry("adatum", Always), Constraint::DateNotFuture),
        entry("einsaort_cac", when("aufnq", "01")),
        entry("eoko", when("aufnq", "02")),
        entry(
            "eokc",
            Requiredness::OptionalWhen(Gate::Equals("aufnq", "02")),
        ),
        // Section 2: prehospital course.
        entry("zrosc1", when("rosc", "02")),
        range("adrena", Optional, "0.01", "99.8"),
        range("amioda", Optional, "1", "998"),
        // Section 3: admission findings.
        entry("bewaufn", when("rosca", "01")),
        range("rraufn", when("rosca", "01"), "0", "300"),
        range("rrdaufn", when("rosca", "01"), "0", "300"),
        range("hfaufn", when("rosca", "01"), "0", "300"),
        entry("zroscaufn", when_one_of("rosca", &["02", "03", "04", "98"])),
        with(
            entry("ekgaufn", Optional),
            Constraint::CountRange { min: 1, max: 3 },
        ),
        range("afaufn", Optional, "0", "50"),
        range("o2saufn", Always, "0", "100"),
        with(
            entry("co2aufn", Optional),
            Constraint::UnitRange(pressure_bounds()),
        ),
        range("tempaufn", Optional, "20", "40"),
        range("phaufn", when_one_of("bgaaufn", &["01", "02", "03", "99"]), "6", "8"),
        range("beaufn", when_one_of("bgaaufn", &["01", "02", "03", "99"]), "-40", "30"),
        range(
            "pco2aufn",
            when_one_of("bgaaufn", &["01", "02", "03", "99"]),
            "3.8",
            "300",
        ),
        with(
            entry("hbaufn", when_one_of("bgaaufn", &["01", "02", "03", "99"])),
            Constraint::UnitRange(vec![
                ub(FieldUnit::GPerDl, "0", "20"),
                ub(FieldUnit::GPerL, "0", "200"),
            ]),
        ),
        with(
            entry("lactaufn", Always),
            Constraint::UnitRange(lactate_bounds()),
        ),
        with(
            entry("bzaufn", Always),
            Constraint::UnitRange(vec![
                ub(FieldUnit::MgPerDl, "0", "600"),
                ub(FieldUnit::MmolPerL, "0", "33.3"),
            ]),
        ),
        with(
            entry("kreaaufn", Always),
            Constraint::UnitRange(vec![
                ub(FieldUnit::MgPerDl, "0.2", "5.7"),
                ub(FieldUnit::UmolPerL, "17.7", "503.9"),
            ]),
        ),
        range("troponw", Optional, "0.0001", "0.4"),
        range("bnpaufn", Optional, "0", "99998"),
        // Section 4: diagnostics and interventions.
        with(
            with(entry("dekg12", when("ekg12", "01")), Constraint::DateNotFuture),
            Constraint::DateOnOrAfter("adatum"),
        ),
        with(
            entry("zekg12", when("ekg12", "01")),
            Constraint::TimeAfter {
                base_date: "adatum",
                base_time: "zadatum",
                own_date: "dekg12",
            },
        ),
        entry("ekg12auf", when("ekg12", "01")),
        with(
            with(entry("dct", when("ct", "01")), Constraint::DateNotFuture),
            Constraint::DateOnOrAfter("adatum"),
        ),
        entry("zct", when("ct", "01")),
        with(
            with(entry("dcoro", when("coro", "01")), Constraint::DateNotFuture),
            Constraint::DateOnOrAfter("adatum"),
        ),
        entry("zcoro", when("coro", "01")),
        entry("coro_cpr", when("coro", "01")),
        entry("ncoro_grund", when("coro", "02")),
        with(
            with(
                entry("decls", when_one_of("ecls", &["02", "03"])),
                Constraint::DateNotFuture,
            ),
            Constraint::DateOnOrAfter("adatum"),
        ),
        entry("zecls", when_one_of("ecls", &["02", "03"])),
        with(
            with(
                entry("diabp", when_one_of("geniabp", &["03", "04"])),
                Constraint::DateNotFuture,
            ),
            Constraint::DateOnOrAfter("adatum"),
        ),
        entry("ziabp", when_one_of("geniabp", &["03", "04"])),
        with(
            with(
                entry("dimpella", when_one_of("genimpella", &["03", "04"])),
                Constraint::DateNotFuture,
            ),
            Constraint::DateOnOrAfter("adatum"),
        ),
        entry("zimpella", when_one_of("genimpella", &["03", "04"])),
        range("rrziel3", Optional, "30", "120"),
        with(
            entry("instab", Optional),
            Constraint::CountRange { min: 1, max: 4 },
        ),
        entry("pci", when("coro", "01")),
        entry("pcierfolg", when("pci", "01")),
        entry("pcigefae", when("pcierfolg", "01")),
        entry("lyse_rosc", when_one_of("lyse", &["02", "03", "98"])),
        with(
            with(
                entry("dlyse", when_one_of("lyse", &["02", "03", "98"])),
                Constraint::DateNotFuture,
            ),
            Constraint::DateOnOrAfter("adatum"),
        ),
        entry("zlyse", when_one_of("lyse", &["02", "03", "98"])),
        // Section 5: extracorporeal resuscitation, active only when the
        // protocol records an eCPR run.
        with(
            with(entry("ecprdbk", when("ecls", "02")), Constraint::DateNotFuture),
            Constraint::DateOnOrAfter("adatum"),
        ),
        entry("ecprzbk", when("ecls", "02")),
        with(
            with(entry("ecprdst", when("ecls", "02")), Constraint::DateNotFuture),
            Constraint::DateOnOrAfter("ecprdbk"),
        ),
        with(
            entry("ecprzst", when("ecls", "02")),
            Constraint::TimeAfter {
                base_date: "ecprdbk",
                base_time: "ecprzbk",
                own_date: "ecprdst",
            },
        ),
        with(
            entry("ecprlact", when("ecls", "02")),
            Constraint::UnitRange(lactate_bounds()),
        ),
        range("ecprph", when("ecls", "02"), "6", "8"),
        range("ecprbe", when("ecls", "02"), "-40", "30"),
        with(
            entry("ecprpco2", when("ecls", "02")),
            Constraint::UnitRange(vec![
                ub(FieldUnit::MmHg, "3.803", "300.003"),
                ub(FieldUnit::KPa, "0.507", "39.997"),
            ]),
        ),
        with(
            entry("ecprpao2", when("ecls", "02")),
            Constraint::UnitRange(vec![
                ub(FieldUnit::MmHg, "0", "500"),
                ub(FieldUnit::KPa, "0", "66.661"),
            ]),
        ),
        entry("ecprpunkt", when("ecls", "02")),
        entry("ecprart", when("ecls", "02")),
        entry("ecprven", when("ecls", "02")),
        entry("ecprbein", when("ecls", "02")),
        entry("ecprvav", when("ecls", "02")),
        entry("roscecpr", when("ecls", "02")),
        entry("ecprende", when("ecls", "02")),
        with(
            entry("ecprkompl", when("ecls", "02")),
            Constraint::CountRange { min: 1, max: 4 },
        ),
        with(
            with(entry("ecprdend", when("ecls", "02")), Constraint::DateNotFuture),
            Constraint::DateOnOrAfter("ecprdst"),
        ),
        with(
            entry("ecprzend", when("ecls", "02")),
            Constraint::TimeAfter {
                base_date: "ecprdst",
                base_time: "ecprzst",
                own_date: "ecprdend",
            },
        ),
        entry("eclsiabp", when_one_of("geniabp", &["03", "04"])),
        entry("impellaecls", when_one_of("genimpella", &["03", "04"])),
        // Section 6: temperature management.
        entry("naktkuehl_grund", when("aktkuehl", "02")),
        entry("kuehlbeg", when("aktkuehl", "01")),
        with(
            with(
                entry("dkuehlbeg", when("aktkuehl", "01")),
                Constraint::DateNotFuture,
            ),
            Constraint::DateOnOrAfter("adatum"),
        ),
        entry("zkuehlbeg", when("aktkuehl", "01")),
        entry("dauerkuehl", when("aktkuehl", "01")),
        entry("zieltemp1", when("aktkuehl", "01")),
        with(
            with(
                entry("dzieltemp", when("aktkuehl", "01")),
                Constraint::DateNotFuture,
            ),
            Constraint::DateOnOrAfter("dkuehlbeg"),
        ),
        with(
            entry("zzieltemp", when("aktkuehl", "01")),
            Constraint::TimeAfter {
                base_date: "dkuehlbeg",
                base_time: "zkuehlbeg",
                own_date: "dzieltemp",
            },
        ),
        entry("kuehlrel", when("aktkuehl", "01")),
        entry("fiebrpae", when("fieb", "01")),
        // Section 8: outcome and discharge.
        with(
            entry("komplsek", Always),
            Constraint::CountRange { min: 1, max: 7 },
        ),
        with(
            entry("icutage", Optional),
            Constraint::GateRange {
                gate: Gate::Equals("leb24h", "02"),
                min: dec("0"),
                max_when: dec("2"),
                max_otherwise: dec("997"),
            },
        ),
        with(
            entry("beatstd", Optional),
            Constraint::GateRange {
                gate: Gate::Equals("leb24h", "02"),
                min: dec("0"),
                max_when: dec("25"),
                max_otherwise: dec("997"),
            },
        ),
        entry("gthlimit", when("thlimit", "01")),
        with(
            with(entry("entldat", Always), Constraint::DateNotFuture),
            Constraint::DateOnOrAfter("adatum"),
        ),
        with(
            with(entry("vdatum", when("wvwie", "01")), Constraint::DateNotFuture),
            Constraint::DateOnOrAfter("adatum"),
        ),
        entry("zvdatum", when("wvwie", "01")),
        entry("wvgrund", when("wvwie", "01")),
        entry("cpcentl", when("lebentl", "01")),
        entry("mrsentl", when("lebentl", "01")),
        range("eq5d", when("lebensqual1", "01"), "11111", "55555"),
        range("sf12", when("lebensqual1", "01"), "0", "100"),
        with(
            with(entry("dtod", Always), Constraint::DateNotFuture),
            Constraint::DateOnOrAfter("adatum"),
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use rearc_model::field_section;
    use std::collections::HashSet;

    #[test]
    fn every_rule_targets_a_schema_field() {
        for rule in RULES.iter() {
            assert!(field_section(rule.field).is_some(), "{}", rule.field);
            for source in rule.sources() {
                assert!(field_section(source).is_some(), "{}", source);
            }
        }
    }

    #[test]
    fn rule_targets_are_unique() {
        let mut seen = HashSet::new();
        for rule in RULES.iter() {
            assert!(seen.insert(rule.field), "duplicate rule for {}", rule.field);
        }
    }

    #[test]
    fn always_required_fields_exist() {
        for field in ALWAYS_REQUIRED {
            assert!(field_section(field).is_some(), "{}", field);
        }
    }
}
