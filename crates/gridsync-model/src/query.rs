//! Query parameters as exposed by the navigation layer.

use std::fmt;

use url::form_urlencoded;

/// Ordered query parameters.
///
/// Values are the parameter values the navigation layer hands out, i.e. already
/// form-decoded from the address bar. The predicate codec stores its own
/// percent-encoded text inside them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    entries: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an address-bar query (`?a=1&b=2`, leading `?` optional).
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self {
            entries: form_urlencoded::parse(raw.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        }
    }

    /// Render in address-bar form.
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.entries.iter())
            .finish()
    }

    /// First value for `key`, as the navigation layer's `get` returns it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryString {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_form_decodes_values() {
        let query = QueryString::parse("?make=%22Ford%22&model=null");
        assert_eq!(query.len(), 2);
        assert_eq!(query.get("make"), Some("\"Ford\""));
        assert_eq!(query.get("model"), Some("null"));
        assert_eq!(query.get("price"), None);
    }

    #[test]
    fn empty_query_has_no_entries() {
        assert!(QueryString::parse("").is_empty());
        assert!(QueryString::parse("?").is_empty());
    }

    #[test]
    fn to_query_form_encodes_values() {
        let query: QueryString = [("make", "%22Ford%22"), ("price", "null")]
            .into_iter()
            .collect();
        assert_eq!(query.to_query(), "make=%2522Ford%2522&price=null");
        assert_eq!(QueryString::parse(&query.to_query()), query);
    }

    #[test]
    fn get_returns_first_duplicate() {
        let query = QueryString::parse("make=a&make=b");
        assert_eq!(query.get("make"), Some("a"));
    }
}
