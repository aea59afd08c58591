//! Allowed code sets for single-choice fields.
//!
//! The external system rejects nothing, so the encoder blanks any code
//! outside the field's set instead of transmitting it. An empty set means
//! the field carries free codes (site identifiers) emitted as-is.

/// Allowed codes for a single-choice field, empty if unrestricted.
pub fn choice_codes(field: &str) -> &'static [&'static str] {
    match field {
        "geschl" => &["01", "02", "03"],
        "aufnq" => &["01", "02"],
        "zkuebgp" => &["00", "01", "02", "03", "04", "05", "06", "07", "08", "99"],
        "ekg1" => &["01", "09", "10", "11", "97", "99"],
        "urkrstst" => &[
            "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "99",
        ],
        "einsaort_cac" => &[
            "00", "01", "02", "03", "04", "06", "07", "09", "10", "11", "12", "99",
        ],
        "eoko" => &[
            "00", "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "99",
        ],
        "eokc" => &[
            "00", "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
            "13", "14", "15", "16", "17", "18", "19", "20", "21", "22", "23", "24", "25",
            "26", "27", "28", "29", "30", "31", "32", "33", "34", "35", "36", "98",
        ],
        "zckb" => &["01", "02", "03", "04", "05", "98"],
        "zchdm" => &["01", "02", "03", "04", "99"],
        "rosc" => &["01", "02"],
        "pes" => &["00", "01", "02", "03", "04", "05"],
        "autocpr" => &["05", "06"],
        "rosca" | "bewaufn" => &["01", "02", "03", "04", "98", "99"],
        "beataufn" => &["01", "02"],
        "bgaaufn" => &["00", "01", "02", "03", "99"],
        "tropart" => &["01", "02"],
        "urkrststaufn" => &["01", "02", "03", "04", "05", "13", "98", "99"],
        "ekg12" | "ct" | "tte" => &["01", "03", "99"],
        "ekg12auf" | "stemi" | "epu" | "bzziel2" => &["01", "02"],
        "efast" | "coro" | "tee" | "pci" | "pcierfolg" => &["01", "02", "99"],
        "coro_cpr" => &["01", "02", "03", "04", "98"],
        "ncoro_grund" => &["04", "05", "06"],
        "ecls" => &["01", "02", "03"],
        "geniabp" | "acb" => &["02", "03", "04", "05"],
        "genimpella" | "genpacerwv" => &["02", "03", "04"],
        "lyse" => &["01", "02", "03", "98", "99"],
        "ecprpunkt" | "roscecpr" => &["01", "02", "03", "04"],
        "ecprart" => &["01", "02", "03", "98"],
        "ecprbein" => &["01", "02"],
        "ecprvav" | "ecprende" | "eclsiabp" | "impellaecls" => &["01", "02", "03"],
        "aktkuehl" => &["00", "01", "02", "03"],
        "kuehlbeg" => &["01", "03", "04"],
        "dauerkuehl" | "zieltemp1" => &["01", "02", "03", "04", "99"],
        "kuehlrel" | "fieb" | "fiebrpae" => &["01", "02"],
        "naktkuehl_grund" => &["04", "05", "06", "98"],
        "ssep" | "nse" | "eegwv" | "cct" | "cmrt" | "neuro" => &["01", "02"],
        "leb30d" | "lebentl" | "thlimit" | "wvwie" | "leb24h" => &["01", "02", "99"],
        "icdimpl" | "organexpl" | "lebensqual1" => &["01", "02"],
        "cpcentl" => &["01", "02", "03", "04", "99"],
        "mrsentl" | "mrsvor" => &["00", "01", "02", "03", "04", "05"],
        "cpcvor" => &["01", "02", "03", "04"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{section_fields, FieldKind, SectionId};

    #[test]
    fn code_sets_cover_only_choice_fields() {
        for section in SectionId::ALL {
            for def in section_fields(section) {
                if !choice_codes(def.name).is_empty() {
                    assert_eq!(def.kind, FieldKind::Choice, "{}", def.name);
                }
            }
        }
    }

    #[test]
    fn site_identifier_is_unrestricted() {
        assert!(choice_codes("stokenn").is_empty());
    }
}
