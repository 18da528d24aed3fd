//! Directory entry as returned by a read

use std::collections::HashMap;

/// A directory entry: its DN and the attributes that were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Distinguished name of the entry
    pub dn: String,
    /// Attribute values keyed by attribute description as returned by the server
    pub attributes: HashMap<String, Vec<String>>,
}

impl Entry {
    /// Create an entry with no attributes
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: HashMap::new(),
        }
    }

    /// Add values for an attribute
    pub fn with_attribute<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .entry(name.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Values of an attribute, or `None` if the entry has no such attribute.
    ///
    /// Attribute descriptions are case-insensitive; values are returned as stored.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }
}

impl From<ldap3::SearchEntry> for Entry {
    fn from(entry: ldap3::SearchEntry) -> Self {
        Self {
            dn: entry.dn,
            attributes: entry.attrs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_is_case_insensitive_on_name() {
        let entry = Entry::new("cn=admin,ou=roles,dc=example,dc=net")
            .with_attribute("Member", ["cn=a,dc=example,dc=net"]);

        assert_eq!(entry.get("member").map(|v| v.len()), Some(1));
        assert_eq!(entry.get("MEMBER").map(|v| v.len()), Some(1));
    }

    #[test]
    fn test_missing_attribute() {
        let entry = Entry::new("cn=empty,dc=example,dc=net");
        assert!(entry.get("member").is_none());
    }
}
