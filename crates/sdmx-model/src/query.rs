//! Caller-supplied query options.

/// Option name/value pairs in insertion order.
///
/// Only names known to the provider's registry end up in a request; the rest
/// are dropped when the query string is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    entries: Vec<(String, String)>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`QueryOptions::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets an option. Re-setting a name keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (name, value) in iter {
            options.insert(name, value);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_preserved() {
        let options = QueryOptions::new()
            .with("end_period", "2021")
            .with("start_period", "2020");
        let names: Vec<_> = options.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["end_period", "start_period"]);
    }

    #[test]
    fn test_reinsert_replaces_value_in_place() {
        let mut options: QueryOptions = [("a", "1"), ("b", "2")].into_iter().collect();
        options.insert("a", "3");
        assert_eq!(options.get("a"), Some("3"));
        assert_eq!(options.len(), 2);
        assert_eq!(options.iter().next(), Some(("a", "3")));
    }
}
