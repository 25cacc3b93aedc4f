//! Query-string assembly: the [`Query`] trait and the ordered [`QueryPairs`] builder.

use url::Url;

/// Anything that can append its parameters to a URL.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// Ordered `key=value` pairs appended verbatim (form-encoded) to a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs {
    pairs: Vec<(String, String)>,
}

impl QueryPairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(mut self, key: &str, value: &str) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: &str) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Query for QueryPairs {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if self.pairs.is_empty() {
            return url;
        }
        {
            let mut query = url.query_pairs_mut();
            for (k, v) in &self.pairs {
                query.append_pair(k, v);
            }
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("http://transparencydata.com/api/1.0/aggregates/pol/abc/contributors.json")
            .unwrap()
    }

    #[test]
    fn empty_pairs_leave_url_untouched() {
        let url = QueryPairs::new().add_to_url(&base_url());
        assert_eq!(url, base_url());
        assert_eq!(url.query(), None);
    }

    #[test]
    fn pairs_keep_declaration_order() {
        let url = QueryPairs::new()
            .with_pair("cycle", "2012")
            .with_pair("limit", "10")
            .with_pair("apikey", "k")
            .add_to_url(&base_url());
        assert_eq!(url.query(), Some("cycle=2012&limit=10&apikey=k"));
    }

    #[test]
    fn values_are_form_encoded() {
        let url = QueryPairs::new()
            .with_pair("text", "Nancy Pelosi & co")
            .add_to_url(&base_url());
        assert_eq!(url.query(), Some("text=Nancy+Pelosi+%26+co"));
    }
}
