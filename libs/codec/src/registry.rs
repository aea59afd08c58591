use std::collections::HashMap;

/// Snapshot of every protocol's external cross-reference numbers.
///
/// Fetched once per form session from the external system and used only
/// to detect a number already claimed by a different protocol. Never
/// mutated by the core.
#[derive(Debug, Clone, Default)]
pub struct CrossRefRegistry {
    by_record: HashMap<u32, Vec<String>>,
}

impl CrossRefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I>(&mut self, record_id: u32, numbers: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.by_record
            .entry(record_id)
            .or_default()
            .extend(numbers.into_iter().filter(|n| !n.is_empty()));
    }

    /// Whether `number` is already listed by a protocol other than
    /// `record_id`.
    pub fn is_claimed_by_other(&self, record_id: u32, number: &str) -> bool {
        self.by_record
            .iter()
            .any(|(id, numbers)| *id != record_id && numbers.iter().any(|n| n == number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_numbers_are_not_collisions() {
        let mut reg = CrossRefRegistry::new();
        reg.insert(1, ["E100".to_string()]);
        reg.insert(2, ["E200".to_string()]);
        assert!(!reg.is_claimed_by_other(1, "E100"));
        assert!(reg.is_claimed_by_other(1, "E200"));
        assert!(!reg.is_claimed_by_other(1, "E300"));
    }
}
