//! Query-string assembly for endpoint URLs.
//!
//! Values are percent-encoded when they are written into the URL, so callers
//! can pass identifiers through untouched.

use std::fmt::Display;
use url::Url;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append every pair to the query string of `url`.
    pub fn apply_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (key, value) in &self.pairs {
            query.append_pair(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;
    use url::Url;

    #[test]
    fn apply_to_encodes_values() {
        let mut params = QueryParams::new();
        params.push("backup_id", "a b&c");

        let mut url = Url::parse("https://api.24fire.de/kvm/backup/delete").unwrap();
        params.apply_to(&mut url);
        assert_eq!(url.query(), Some("backup_id=a+b%26c"));
    }

    #[test]
    fn apply_to_leaves_url_without_query_when_empty() {
        let mut url = Url::parse("https://api.24fire.de/kvm/status").unwrap();
        QueryParams::new().apply_to(&mut url);
        assert_eq!(url.query(), None);
    }
}
