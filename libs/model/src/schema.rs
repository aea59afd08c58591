//! Static schema tables: section order, field membership and value kinds.
//!
//! The decoder dispatches on these tables rather than inferring anything
//! from the wire, and the encoder walks sections in exactly this order.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sections of the treatment protocol form, in encode/evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionId {
    Section1,
    Section2,
    Section3,
    Section3Hyb,
    Section4,
    Section4Icu,
    Section4Hyb,
    Section5,
    Section6,
    Section7,
    Section8,
    Section8Hyb,
}

impl SectionId {
    pub const ALL: [SectionId; 12] = [
        SectionId::Section1,
        SectionId::Section2,
        SectionId::Section3,
        SectionId::Section3Hyb,
        SectionId::Section4,
        SectionId::Section4Icu,
        SectionId::Section4Hyb,
        SectionId::Section5,
        SectionId::Section6,
        SectionId::Section7,
        SectionId::Section8,
        SectionId::Section8Hyb,
    ];
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Section1 => "section1",
            Self::Section2 => "section2",
            Self::Section3 => "section3",
            Self::Section3Hyb => "section3hyb",
            Self::Section4 => "section4",
            Self::Section4Icu => "section4icu",
            Self::Section4Hyb => "section4hyb",
            Self::Section5 => "section5",
            Self::Section6 => "section6",
            Self::Section7 => "section7",
            Self::Section8 => "section8",
            Self::Section8Hyb => "section8hyb",
        };
        write!(f, "{}", s)
    }
}

/// How a field's raw string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Choice,
    MultiChoice,
    Date,
    Time,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn f(name: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef { name, kind }
}

use FieldKind::{Choice as C, Date as D, MultiChoice as M, Number as N, Text as T, Time as Z};

static SECTION1: &[FieldDef] = &[
    f("datum", D),
    f("adatum", D),
    f("zadatum", Z),
    f("stokenn", C),
    f("namklin", T),
    f("iknumklin", T),
    f("patid", T),
    f("gebdat", D),
    f("geschl", C),
    f("aufnq", C),
    f("zkuebgp", C),
];

static SECTION2: &[FieldDef] = &[
    f("ekg1", C),
    f("urkrstst", C),
    f("einsaort_cac", C),
    f("eoko", C),
    f("eokc", C),
    f("zckb", C),
    f("zkoll", Z),
    f("zchdm", C),
    f("zhdm", Z),
    f("rosc", C),
    f("zrosc1", Z),
    f("adrena", N),
    f("amioda", N),
    f("pes", C),
    f("autocpr", C),
];

static SECTION3: &[FieldDef] = &[
    f("bewaufn", C),
    f("rosca", C),
    f("ekgaufn", M),
    f("rraufn", N),
    f("rrdaufn", N),
    f("hfaufn", N),
    f("afaufn", N),
    f("beataufn", C),
    f("o2saufn", N),
    f("co2aufn", N),
    f("tempaufn", N),
    f("bgaaufn", C),
    f("hbaufn", N),
    f("phaufn", N),
    f("beaufn", N),
    f("pco2aufn", N),
    f("lactaufn", N),
    f("bzaufn", N),
    f("kreaaufn", N),
    f("tropart", C),
    f("troponw", N),
    f("tropaaufn", N),
    f("tropaufn", N),
    f("trop2aaufn", N),
    f("trop2aufn", N),
    f("bnpaufn", N),
    f("urkrststaufn", C),
    f("zroscaufn", Z),
];

static SECTION3HYB: &[FieldDef] = &[f("reaverl", M)];

static SECTION4: &[FieldDef] = &[
    f("ekg12", C),
    f("dekg12", D),
    f("zekg12", Z),
    f("ekg12auf", C),
    f("stemi", C),
    f("efast", C),
    f("ct", C),
    f("dct", D),
    f("zct", Z),
    f("coro", C),
    f("dcoro", D),
    f("zcoro", Z),
    f("coro_cpr", C),
    f("ncoro_grund", C),
    f("ecls", C),
    f("decls", D),
    f("zecls", Z),
    f("geniabp", C),
    f("diabp", D),
    f("ziabp", Z),
    f("genimpella", C),
    f("dimpella", D),
    f("zimpella", Z),
    f("acb", C),
    f("genpacerwv", C),
    f("epu", C),
    f("hits", M),
    f("bzziel2", C),
    f("rrziel3", N),
];

static SECTION4ICU: &[FieldDef] = &[f("instab", M)];

static SECTION4HYB: &[FieldDef] = &[
    f("tee", C),
    f("tte", C),
    f("pci", C),
    f("pcierfolg", C),
    f("pcigefae", M),
    f("lyse", C),
    f("lyse_rosc", M),
    f("dlyse", D),
    f("zlyse", Z),
];

static SECTION5: &[FieldDef] = &[
    f("ecprdbk", D),
    f("ecprzbk", Z),
    f("ecprdst", D),
    f("ecprzst", Z),
    f("ecprlact", N),
    f("ecprph", N),
    f("ecprbe", N),
    f("ecprpco2", N),
    f("ecprpao2", N),
    f("ecprpunkt", C),
    f("ecprart", C),
    f("ecprven", M),
    f("ecprbein", C),
    f("ecprvav", C),
    f("roscecpr", C),
    f("ecprende", C),
    f("ecprkompl", M),
    f("ecprdend", D),
    f("ecprzend", Z),
    f("eclsiabp", C),
    f("impellaecls", C),
];

static SECTION6: &[FieldDef] = &[
    f("aktkuehl", C),
    f("naktkuehl_grund", C),
    f("kuehlbeg", C),
    f("dkuehlbeg", D),
    f("zkuehlbeg", Z),
    f("dauerkuehl", C),
    f("zieltemp1", C),
    f("dzieltemp", D),
    f("zzieltemp", Z),
    f("kuehlrel", C),
    f("fieb", C),
    f("fiebrpae", C),
];

static SECTION7: &[FieldDef] = &[
    f("ssep", C),
    f("nse", C),
    f("eegwv", C),
    f("cct", C),
    f("cmrt", C),
    f("neuro", C),
];

static SECTION8: &[FieldDef] = &[
    f("leb30d", C),
    f("komplsek", M),
    f("icutage", N),
    f("beatstd", N),
    f("icdimpl", C),
    f("lebentl", C),
    f("thlimit", C),
    f("gthlimit", M),
    f("organexpl", C),
    f("entldat", D),
    f("wvwie", C),
    f("vdatum", D),
    f("zvdatum", Z),
    f("wvgrund", M),
    f("cpcentl", C),
    f("mrsentl", C),
    f("cpcvor", C),
    f("mrsvor", C),
    f("lebensqual1", C),
    f("eq5d", N),
    f("sf12", N),
];

static SECTION8HYB: &[FieldDef] = &[f("leb24h", C), f("dtod", D), f("ztod", Z)];

/// Fields of one section, in form order.
pub fn section_fields(section: SectionId) -> &'static [FieldDef] {
    match section {
        SectionId::Section1 => SECTION1,
        SectionId::Section2 => SECTION2,
        SectionId::Section3 => SECTION3,
        SectionId::Section3Hyb => SECTION3HYB,
        SectionId::Section4 => SECTION4,
        SectionId::Section4Icu => SECTION4ICU,
        SectionId::Section4Hyb => SECTION4HYB,
        SectionId::Section5 => SECTION5,
        SectionId::Section6 => SECTION6,
        SectionId::Section7 => SECTION7,
        SectionId::Section8 => SECTION8,
        SectionId::Section8Hyb => SECTION8HYB,
    }
}

static FIELD_INDEX: Lazy<HashMap<&'static str, (SectionId, FieldKind)>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for section in SectionId::ALL {
        for def in section_fields(section) {
            let prev = map.insert(def.name, (section, def.kind));
            debug_assert!(prev.is_none(), "duplicate field name {}", def.name);
        }
    }
    map
});

/// Section a field belongs to, if the field exists in the schema.
pub fn field_section(name: &str) -> Option<SectionId> {
    FIELD_INDEX.get(name).map(|(s, _)| *s)
}

/// Value kind of a field, if the field exists in the schema.
pub fn field_kind(name: &str) -> Option<FieldKind> {
    FIELD_INDEX.get(name).map(|(_, k)| *k)
}

/// The schema's interned name for a field, if the field exists.
pub fn field_name(name: &str) -> Option<&'static str> {
    FIELD_INDEX.get_key_value(name).map(|(k, _)| *k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_resolves_to_its_section() {
        for section in SectionId::ALL {
            for def in section_fields(section) {
                assert_eq!(field_section(def.name), Some(section), "{}", def.name);
                assert_eq!(field_kind(def.name), Some(def.kind), "{}", def.name);
            }
        }
    }

    #[test]
    fn unknown_field_resolves_to_none() {
        assert_eq!(field_section("no_such_field"), None);
        assert_eq!(field_kind("no_such_field"), None);
        assert_eq!(field_name("no_such_field"), None);
    }

    #[test]
    fn field_name_interns_borrowed_lookups() {
        let owned = String::from("rosc");
        assert_eq!(field_name(&owned), Some("rosc"));
    }

    #[test]
    fn field_names_are_globally_unique() {
        let total: usize = SectionId::ALL.iter().map(|s| section_fields(*s).len()).sum();
        let mut names: Vec<&str> = SectionId::ALL
            .iter()
            .flat_map(|s| section_fields(*s).iter().map(|d| d.name))
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
