//! Attribute values and the ordered, multi-valued attribute bag.
//!
//! An identity provider releases attributes as a mapping from name to an
//! ordered list of values. Names are case-sensitive and the first value of
//! a list is the primary one wherever a single value is needed.

use std::fmt;

/// Well-known attribute names consulted or written by the filters.
pub mod names {
    /// Email address.
    pub const MAIL: &str = "mail";
    /// Given (first) name.
    pub const GIVEN_NAME: &str = "givenName";
    /// Surname.
    pub const SURNAME: &str = "sn";
    /// Common name, usually "First Last".
    pub const COMMON_NAME: &str = "cn";
    /// Full display name.
    pub const DISPLAY_NAME: &str = "displayName";
    /// Human-readable name of the authenticating provider.
    pub const PROVIDER_NAME: &str = "idpname";
    /// Organization name.
    pub const ORGANIZATION_NAME: &str = "organizationName";
    /// Short organization attribute.
    pub const ORGANIZATION: &str = "o";
    /// SCHAC home organization domain.
    pub const SCHAC_HOME_ORGANIZATION: &str = "schacHomeOrganization";
    /// Two-letter country code.
    pub const COUNTRY_NAME: &str = "countryName";
    /// Opaque per-service targeted identifier.
    pub const TARGETED_ID: &str = "eduPersonTargetedID";
    /// Scoped principal name, `user@domain`.
    pub const PRINCIPAL_NAME: &str = "eduPersonPrincipalName";
    /// Preferred language tag such as `en-gb`.
    pub const PREFERRED_LANGUAGE: &str = "preferredLanguage";
}

/// A structured name identifier, as released for the targeted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameId {
    /// The identifier text.
    pub value: String,
    /// Name identifier format URI.
    pub format: Option<String>,
    /// Qualifier naming the issuing provider.
    pub name_qualifier: Option<String>,
    /// Qualifier naming the relying party.
    pub sp_name_qualifier: Option<String>,
}

impl NameId {
    /// Creates a name identifier with only its text set.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: None,
            name_qualifier: None,
            sp_name_qualifier: None,
        }
    }

    /// Sets the format URI.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Returns the identifier text, or `None` when there is none to extract.
    pub fn text(&self) -> Option<&str> {
        if self.value.is_empty() {
            None
        } else {
            Some(&self.value)
        }
    }
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Plain text.
    Text(String),
    /// A structured name identifier.
    NameId(NameId),
}

impl AttributeValue {
    /// Returns the value as plain text; structured values have none.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            AttributeValue::NameId(_) => None,
        }
    }

    /// Byte length of the textual content.
    pub fn len(&self) -> usize {
        match self {
            AttributeValue::Text(text) => text.len(),
            AttributeValue::NameId(id) => id.value.len(),
        }
    }

    /// Returns true if the textual content is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value with its textual content cut to `max_len` bytes.
    pub fn truncated(&self, max_len: usize) -> Self {
        match self {
            AttributeValue::Text(text) => {
                AttributeValue::Text(truncate_bytes(text, max_len).to_string())
            }
            AttributeValue::NameId(id) => AttributeValue::NameId(NameId {
                value: truncate_bytes(&id.value, max_len).to_string(),
                ..id.clone()
            }),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(text) => f.write_str(text),
            AttributeValue::NameId(id) => f.write_str(&id.value),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(text: &str) -> Self {
        AttributeValue::Text(text.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(text: String) -> Self {
        AttributeValue::Text(text)
    }
}

impl From<NameId> for AttributeValue {
    fn from(id: NameId) -> Self {
        AttributeValue::NameId(id)
    }
}

/// Returns the longest prefix of `s` that is at most `max_len` bytes and
/// ends on a character boundary.
pub(crate) fn truncate_bytes(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Insertion-ordered mapping from attribute name to its values.
///
/// Inserting under an existing name replaces the values in place; new
/// names are appended.
///
/// ```
/// use attr_synth::AttributeBag;
///
/// let mut bag = AttributeBag::new();
/// bag.insert("mail", vec!["jane.doe@example.com".into()]);
/// bag.insert("cn", vec!["Jane Doe".into()]);
///
/// assert_eq!(bag.first_text("mail"), Some("jane.doe@example.com"));
/// assert_eq!(bag.names().collect::<Vec<_>>(), ["mail", "cn"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
    entries: Vec<(String, Vec<AttributeValue>)>,
}

impl AttributeBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bag of plain-text attributes.
    pub fn from_text<N, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<V>)>,
        N: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(name, values)| {
                let values = values
                    .into_iter()
                    .map(|v| AttributeValue::Text(v.into()))
                    .collect();
                (name.into(), values)
            })
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Sets the values of `name`, returning the previous ones.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<AttributeValue>,
    ) -> Option<Vec<AttributeValue>> {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, values)),
            None => {
                self.entries.push((name, values));
                None
            }
        }
    }

    /// Sets `name` to the given plain-text values.
    pub fn insert_text<V: Into<String>>(&mut self, name: impl Into<String>, values: Vec<V>) {
        let values = values.into_iter().map(|v| AttributeValue::Text(v.into())).collect();
        self.insert(name, values);
    }

    /// Removes `name`, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<AttributeValue>> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    /// Moves the values of `from` under `to`, overwriting whatever `to`
    /// held. Returns false if `from` does not exist.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> bool {
        let to = to.into();
        if from == to {
            return self.contains(from);
        }
        match self.remove(from) {
            Some(values) => {
                self.insert(to, values);
                true
            }
            None => false,
        }
    }

    /// Returns the values of `name`.
    pub fn get(&self, name: &str) -> Option<&[AttributeValue]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns mutable access to the values of `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<AttributeValue>> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values)
    }

    /// Returns true if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the primary value of `name` if it is plain text.
    pub fn first_text(&self, name: &str) -> Option<&str> {
        self.get(name)?.first()?.as_text()
    }

    /// Returns the plain-text values of `name`, or `None` when it has none.
    pub fn texts(&self, name: &str) -> Option<Vec<String>> {
        let texts: Vec<String> = self
            .get(name)?
            .iter()
            .filter_map(AttributeValue::as_text)
            .map(str::to_string)
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts)
        }
    }

    /// Writes every entry of `other` over this bag.
    pub fn merge(&mut self, other: AttributeBag) {
        for (name, values) in other {
            self.insert(name, values);
        }
    }

    /// Iterates over attribute names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Iterates over entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AttributeValue])> {
        self.entries
            .iter()
            .map(|(n, values)| (n.as_str(), values.as_slice()))
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the bag holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<AttributeValue>)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (N, Vec<AttributeValue>)>>(iter: I) -> Self {
        let mut bag = AttributeBag::new();
        for (name, values) in iter {
            bag.insert(name, values);
        }
        bag
    }
}

impl IntoIterator for AttributeBag {
    type Item = (String, Vec<AttributeValue>);
    type IntoIter = std::vec::IntoIter<(String, Vec<AttributeValue>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut bag = AttributeBag::from_text([("a", vec!["1"]), ("b", vec!["2"])]);
        let previous = bag.insert("a", vec!["3".into()]);

        assert_eq!(previous, Some(vec![AttributeValue::from("1")]));
        assert_eq!(bag.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(bag.first_text("a"), Some("3"));
    }

    #[test]
    fn names_are_case_sensitive() {
        let bag = AttributeBag::from_text([("Mail", vec!["x@example.org"])]);
        assert!(bag.get("mail").is_none());
        assert!(bag.contains("Mail"));
    }

    #[test]
    fn rename_overwrites_existing_target() {
        let mut bag = AttributeBag::from_text([("long", vec!["new"]), ("short", vec!["old"])]);

        assert!(bag.rename("long", "short"));
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.first_text("short"), Some("new"));
        assert!(!bag.rename("missing", "other"));
    }

    #[test]
    fn structured_values_are_not_text() {
        let mut bag = AttributeBag::new();
        bag.insert("eduPersonTargetedID", vec![NameId::new("abc").into()]);

        assert_eq!(bag.first_text("eduPersonTargetedID"), None);
        assert_eq!(bag.texts("eduPersonTargetedID"), None);
    }

    #[test]
    fn texts_of_empty_list_is_none() {
        let mut bag = AttributeBag::new();
        bag.insert("cn", Vec::new());

        assert!(bag.contains("cn"));
        assert_eq!(bag.texts("cn"), None);
        assert_eq!(bag.first_text("cn"), None);
    }

    #[test]
    fn merge_overwrites_and_appends() {
        let mut bag = AttributeBag::from_text([("mail", vec!["a@x.org"]), ("uid", vec!["a"])]);
        bag.merge(AttributeBag::from_text([("mail", vec!["b@x.org"]), ("o", vec!["X"])]));

        assert_eq!(bag.names().collect::<Vec<_>>(), ["mail", "uid", "o"]);
        assert_eq!(bag.first_text("mail"), Some("b@x.org"));
    }

    #[test]
    fn truncate_bytes_respects_char_boundaries() {
        assert_eq!(truncate_bytes("abcdef", 3), "abc");
        assert_eq!(truncate_bytes("abc", 10), "abc");
        // 'é' is two bytes; cutting inside it backs off to the boundary
        assert_eq!(truncate_bytes("aé", 2), "a");
    }

    #[test]
    fn truncated_name_id_keeps_qualifiers() {
        let id = NameId::new("0123456789")
            .with_format("urn:oasis:names:tc:SAML:2.0:nameid-format:persistent");
        let cut = AttributeValue::NameId(id).truncated(4);

        match cut {
            AttributeValue::NameId(id) => {
                assert_eq!(id.value, "0123");
                assert!(id.format.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
