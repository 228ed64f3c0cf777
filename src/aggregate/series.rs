use std::sync::Arc;

use ahash::AHashMap;
use tracing::warn;

/// Attribute record paired by index with one country boundary geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    name: Arc<str>,
}

impl CountryRecord {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Display name used as the aggregation key.
    #[inline] pub fn name(&self) -> &str { &self.name }

    #[inline] pub(crate) fn shared_name(&self) -> Arc<str> { self.name.clone() }
}

/// Ordered mapping from country name to one aggregate value.
///
/// Keys keep first-insertion order; adding to an existing key accumulates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountrySeries {
    names: Vec<Arc<str>>,
    values: Vec<f64>,
    index: AHashMap<Arc<str>, usize>,
}

impl CountrySeries {
    pub fn new() -> Self { Self::default() }

    /// Build a series from (name, value) pairs, summing repeated names.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<Arc<str>>,
    {
        let mut series = Self::new();
        for (name, value) in pairs {
            series.add(name, value);
        }
        series
    }

    /// Add `value` to the entry for `name`, creating it at the end if absent.
    pub fn add(&mut self, name: impl Into<Arc<str>>, value: f64) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => self.values[i] += value,
            None => {
                self.index.insert(name.clone(), self.names.len());
                self.names.push(name);
                self.values.push(value);
            }
        }
    }

    #[inline] pub fn len(&self) -> usize { self.names.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.names.is_empty() }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&i| self.values[i])
    }

    pub fn contains(&self, name: &str) -> bool { self.index.contains_key(name) }

    /// Iterate over (name, value) in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names.iter().map(|n| n.as_ref()).zip(self.values.iter().copied())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|n| n.as_ref())
    }

    #[inline] pub fn values(&self) -> &[f64] { &self.values }

    /// Sum over all countries.
    pub fn total(&self) -> f64 { self.values.iter().sum() }

    /// The `n` largest entries, descending. Ties keep insertion order.
    pub fn top(&self, n: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().filter(|(_, v)| !v.is_nan()).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Per-country `later - earlier`, in the key order of `later`.
    ///
    /// Countries missing from `earlier` are left out.
    pub fn difference(later: &CountrySeries, earlier: &CountrySeries) -> CountrySeries {
        let mut out = CountrySeries::new();
        for (name, &value) in later.names.iter().zip(&later.values) {
            match earlier.get(name) {
                Some(before) => out.add(name.clone(), value - before),
                None => warn!(country = %name, "country absent from earlier series; skipped in difference"),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_accumulate_in_place() {
        let series = CountrySeries::from_pairs([("France", 1.0), ("Spain", 2.0), ("France", 0.5)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.get("France"), Some(1.5));
        assert_eq!(series.names().collect::<Vec<_>>(), vec!["France", "Spain"]);
    }

    #[test]
    fn top_ranks_descending() {
        let series = CountrySeries::from_pairs([
            ("A", 3.0), ("B", f64::NAN), ("C", 10.0), ("D", 3.0), ("E", -1.0),
        ]);
        assert_eq!(series.top(3), vec![("C", 10.0), ("A", 3.0), ("D", 3.0)]);
        assert_eq!(series.top(10).len(), 4);
    }

    #[test]
    fn difference_is_exact_subtraction() {
        let baseline = CountrySeries::from_pairs([("World", 62_499_624.0)]);
        let no_fire = CountrySeries::from_pairs([("World", 62_191_602.0)]);
        let fire = CountrySeries::difference(&baseline, &no_fire);
        assert_eq!(fire.get("World"), Some(308_022.0));
    }

    #[test]
    fn difference_is_antisymmetric() {
        let a = CountrySeries::from_pairs([("X", 1.25), ("Y", -4.0), ("Z", 7.5)]);
        let b = CountrySeries::from_pairs([("X", 0.5), ("Y", 2.0), ("Z", 7.5)]);
        let ab = CountrySeries::difference(&b, &a);
        let ba = CountrySeries::difference(&a, &b);
        for (name, value) in ab.iter() {
            assert_eq!(value, -ba.get(name).unwrap());
        }
    }

    #[test]
    fn difference_skips_unmatched_keys() {
        let later = CountrySeries::from_pairs([("X", 1.0), ("New", 2.0)]);
        let earlier = CountrySeries::from_pairs([("X", 0.25)]);
        let change = CountrySeries::difference(&later, &earlier);
        assert_eq!(change.len(), 1);
        assert_eq!(change.get("X"), Some(0.75));
    }
}
