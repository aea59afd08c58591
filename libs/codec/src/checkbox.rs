//! Multi-select fields and their external fan-out representation.
//!
//! Externally each multi-select is one boolean field per allowed code
//! (`field___code`). Internally a [`Selection`] is the set of selected
//! codes, kept in vocabulary order so the stored form is canonical no
//! matter the entry order, with two declared policies: a per-field cap
//! on how many may be selected, and exclusive codes that clear and
//! disable all siblings while selected.

#[derive(Debug, Clone, Copy)]
pub struct CheckboxSpec {
    pub field: &'static str,
    /// Full code vocabulary, in emission order.
    pub codes: &'static [&'static str],
    /// Maximum number of simultaneously selected codes.
    pub cap: usize,
    /// Codes mutually exclusive with every sibling.
    pub exclusive: &'static [&'static str],
}

static SPECS: &[CheckboxSpec] = &[
    CheckboxSpec {
        field: "ekgaufn",
        codes: &[
            "00", "01", "02", "03", "04", "05", "06", "09", "10", "11", "12", "13", "98",
            "99",
        ],
        cap: 3,
        exclusive: &["00", "09", "10", "11", "99"],
    },
    CheckboxSpec {
        field: "reaverl",
        codes: &["02", "03", "04", "05", "06", "07", "08", "10"],
        cap: 6,
        exclusive: &["10"],
    },
    CheckboxSpec {
        field: "hits",
        codes: &["01", "02", "03", "04", "05", "06", "07", "08", "98"],
        cap: 8,
        exclusive: &[],
    },
    CheckboxSpec {
        field: "instab",
        codes: &["01", "02", "03", "04", "97", "98"],
        cap: 4,
        exclusive: &["97"],
    },
    CheckboxSpec {
        field: "pcigefae",
        codes: &["01", "02", "03", "04", "98"],
        cap: 4,
        exclusive: &[],
    },
    CheckboxSpec {
        field: "lyse_rosc",
        codes: &["01", "02", "03"],
        cap: 2,
        exclusive: &[],
    },
    CheckboxSpec {
        field: "ecprven",
        codes: &["01", "02", "03", "04", "98"],
        cap: 2,
        exclusive: &[],
    },
    CheckboxSpec {
        field: "ecprkompl",
        codes: &["01", "02", "03", "04", "98", "99"],
        cap: 4,
        exclusive: &["01", "99"],
    },
    CheckboxSpec {
        field: "komplsek",
        codes: &["02", "03", "04", "05", "08", "09", "97", "98", "99"],
        cap: 7,
        exclusive: &["97", "99"],
    },
    CheckboxSpec {
        field: "gthlimit",
        codes: &["01", "02", "03", "04", "98"],
        cap: 3,
        exclusive: &[],
    },
    CheckboxSpec {
        field: "wvgrund",
        codes: &["01", "02", "03", "04", "05", "06", "07", "98"],
        cap: 6,
        exclusive: &[],
    },
];

/// Fan-out spec for a multi-select field, if it has one.
pub fn checkbox_spec(field: &str) -> Option<&'static CheckboxSpec> {
    SPECS.iter().find(|s| s.field == field)
}

/// External key for one code of a fan-out field.
pub fn fanout_key(field: &str, code: &str) -> String {
    format!("{}___{}", field, code)
}

/// Live selection state of one multi-select field.
#[derive(Debug, Clone)]
pub struct Selection {
    spec: &'static CheckboxSpec,
    selected: Vec<&'static str>,
}

impl Selection {
    pub fn new(spec: &'static CheckboxSpec) -> Self {
        Self {
            spec,
            selected: Vec::new(),
        }
    }

    /// Selection reconstructed from a list of selected codes, replayed
    /// one toggle at a time so cap and exclusivity apply exactly as they
    /// would have during entry.
    pub fn from_codes<'a, I: IntoIterator<Item = &'a str>>(
        spec: &'static CheckboxSpec,
        codes: I,
    ) -> Self {
        let mut selection = Self::new(spec);
        for code in codes {
            selection.toggle(code);
        }
        selection
    }

    /// Flip one code; returns whether the selection changed. Toggling a
    /// disabled or unknown code is a no-op.
    pub fn toggle(&mut self, code: &str) -> bool {
        let Some(idx) = self.spec.codes.iter().position(|c| *c == code) else {
            return false;
        };
        let code = self.spec.codes[idx];
        if let Some(pos) = self.selected.iter().position(|c| *c == code) {
            self.selected.remove(pos);
            return true;
        }
        if self.is_disabled(code) {
            return false;
        }
        if self.spec.exclusive.contains(&code) {
            self.selected.clear();
        }
        // Insert at the code's vocabulary position; the fan-out wire
        // carries no order, so the canonical form must be reproducible
        // from the set alone.
        let at = self
            .selected
            .iter()
            .filter(|c| self.vocab_pos(c) < idx)
            .count();
        self.selected.insert(at, code);
        true
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.iter().any(|c| *c == code)
    }

    /// Whether a currently unselected code cannot be selected.
    pub fn is_disabled(&self, code: &str) -> bool {
        if self.is_selected(code) {
            return false;
        }
        if self.selected.len() >= self.spec.cap {
            return true;
        }
        self.selected
            .iter()
            .any(|c| self.spec.exclusive.contains(c))
    }

    pub fn selected_codes(&self) -> &[&'static str] {
        &self.selected
    }

    fn vocab_pos(&self, code: &str) -> usize {
        self.spec
            .codes
            .iter()
            .position(|c| *c == code)
            .unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(field: &str) -> &'static CheckboxSpec {
        checkbox_spec(field).unwrap()
    }

    #[test]
    fn cap_disables_remaining_codes() {
        let mut s = Selection::new(spec("ekgaufn"));
        assert!(s.toggle("01"));
        assert!(s.toggle("02"));
        assert!(s.toggle("03"));
        assert!(s.is_disabled("04"));
        assert!(!s.toggle("04"));

        assert!(s.toggle("01")); // deselect frees a slot
        assert!(!s.is_disabled("04"));
        assert!(s.toggle("04"));
    }

    #[test]
    fn exclusive_code_clears_and_disables_siblings() {
        let mut s = Selection::new(spec("komplsek"));
        s.toggle("02");
        s.toggle("03");
        assert!(s.toggle("99"));
        assert_eq!(s.selected_codes(), &["99"]);
        assert!(s.is_disabled("02"));
        assert!(s.is_disabled("03"));

        assert!(s.toggle("99")); // deselecting re-enables siblings
        assert!(!s.is_disabled("02"));
    }

    #[test]
    fn unknown_code_is_rejected() {
        let mut s = Selection::new(spec("lyse_rosc"));
        assert!(!s.toggle("77"));
        assert!(s.is_empty());
    }

    #[test]
    fn replay_applies_policies() {
        // An exclusive code arriving mid-list wipes what came before it.
        let s = Selection::from_codes(spec("instab"), ["01", "02", "97"]);
        assert_eq!(s.selected_codes(), &["97"]);
    }

    #[test]
    fn selection_is_normalized_to_vocabulary_order() {
        let s = Selection::from_codes(spec("hits"), ["03", "01", "08"]);
        assert_eq!(s.selected_codes(), &["01", "03", "08"]);
    }

    #[test]
    fn entry_order_never_leaks_into_the_stored_form() {
        let a = Selection::from_codes(spec("komplsek"), ["03", "02"]);
        let b = Selection::from_codes(spec("komplsek"), ["02", "03"]);
        assert_eq!(a.selected_codes(), b.selected_codes());
        assert_eq!(a.selected_codes(), &["02", "03"]);
    }
}
