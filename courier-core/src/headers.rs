//! Case-insensitive header map.
//!
//! Header names compare case-insensitively but keep the casing they were
//! first inserted with, and entries iterate in insertion order. This is the
//! map carried on [`RequestConfig`](crate::config::RequestConfig) and
//! [`Response`](crate::response::Response); the transport adapter converts it
//! to whatever its wire library expects.

/// Ordered, case-insensitive multimap-free header collection.
///
/// Re-inserting an existing name (under any casing) replaces its value in
/// place instead of appending a duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `name`, comparing case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if a header with this name exists under any casing.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets `name` to `value`.
    ///
    /// If the name is already present under any casing, the existing entry's
    /// value is replaced and its original casing and position are kept.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Removes `name` (case-insensitive) and returns its value if present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    /// Returns a new map containing the union of `self` and `overrides`,
    /// with `overrides` winning on conflicting names.
    ///
    /// Neither input is mutated; this is the header half of the config merge.
    #[must_use]
    pub fn merge(&self, overrides: &Headers) -> Headers {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            merged.insert(name, value);
        }
        merged
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "application/json");
        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert!(headers.contains("Content-type"));
    }

    #[test]
    fn insert_collapses_casings() {
        let mut headers = Headers::new();
        headers.insert("Accept", "text/plain");
        headers.insert("accept", "application/json");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Accept"), Some("application/json"));
        // first-seen casing is kept
        assert_eq!(headers.iter().next(), Some(("Accept", "application/json")));
    }

    #[test]
    fn remove_ignores_case() {
        let mut headers = Headers::new();
        headers.insert("X-Request-Id", "abc");
        assert_eq!(headers.remove("x-request-id"), Some("abc".to_string()));
        assert!(headers.is_empty());
    }

    #[test]
    fn merge_prefers_overrides() {
        let defaults: Headers = [("Accept", "*/*"), ("X-Env", "prod")].into_iter().collect();
        let overrides: Headers = [("accept", "application/json")].into_iter().collect();
        let merged = defaults.merge(&overrides);
        assert_eq!(merged.get("Accept"), Some("application/json"));
        assert_eq!(merged.get("X-Env"), Some("prod"));
        // inputs untouched
        assert_eq!(defaults.get("Accept"), Some("*/*"));
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let headers: Headers = [("A", "1"), ("B", "2"), ("C", "3")].into_iter().collect();
        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
