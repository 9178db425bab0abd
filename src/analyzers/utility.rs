use std::collections::HashMap;
use std::hash::Hash;

/// Counts occurrences of values while remembering first-seen order.
///
/// The order is what makes [`FrequencyTable::mode`] deterministic: among
/// values tied on count, the one seen first wins.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, value: K) {
        match self.index.get(&value) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(value.clone(), self.entries.len());
                self.entries.push((value, 1));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most frequent value and its count, first-seen on ties. `None` when empty.
    pub fn mode(&self) -> Option<(&K, usize)> {
        let mut best: Option<(&K, usize)> = None;
        for (value, count) in &self.entries {
            if best.is_none_or(|(_, top)| *count > top) {
                best = Some((value, *count));
            }
        }
        best
    }

    /// All values by descending count; ties keep first-seen order.
    pub fn descending(&self) -> Vec<(K, usize)> {
        let mut rows = self.entries.clone();
        // sort_by is stable
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }
}

impl<K: Eq + Hash + Clone> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for value in iter {
            table.add(value);
        }
        table
    }
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds to two decimal places, halves to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
