//! Reserved "not recorded" values per field.
//!
//! The external schema has no null: a numeric, date or time field that was
//! not measured carries one of a small set of reserved strings instead
//! (`-1`, `999`, `9999-99-99`, `99:99`, ...). The form keeps such a value in
//! a companion control named `<field>R`, outside the typed widget.

/// Reserved sentinel strings for a field, empty if the field has none.
pub fn sentinels(field: &str) -> &'static [&'static str] {
    match field {
        "gebdat" | "adatum" => &["1000-01-01"],
        "adrena" => &["-1", "00.0", "99.9"],
        "amioda" => &["-1", "0", "999"],
        "rraufn" | "rrdaufn" | "hfaufn" | "o2saufn" => &["-1", "999"],
        "afaufn" | "co2aufn" => &["-1"],
        "tempaufn" => &["99.9"],
        "phaufn" | "beaufn" | "hbaufn" => &["99.9", "-1"],
        "pco2aufn" => &["999.9", "-1"],
        "bzaufn" | "lactaufn" => &["999"],
        "kreaaufn" => &["999.9"],
        "zroscaufn" | "zkuehlbeg" | "ztod" => &["99:99"],
        "dkuehlbeg" | "entldat" | "dtod" => &["9999-99-99"],
        "icutage" | "beatstd" => &["999", "998"],
        "rrziel3" => &["-1", "999"],
        _ => &[],
    }
}

/// Whether `raw` is one of `field`'s reserved sentinel strings.
pub fn is_sentinel(field: &str, raw: &str) -> bool {
    sentinels(field).contains(&raw)
}

/// Name of the companion control carrying the sentinel (`<field>R`).
pub fn companion_field(field: &str) -> String {
    format!("{}R", field)
}
