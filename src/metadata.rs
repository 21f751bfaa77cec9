//! Read-only identity provider metadata and its lookup seam.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// Descriptive record of the identity provider that authenticated the user.
///
/// ```
/// use attr_synth::ProviderMetadata;
///
/// let idp = ProviderMetadata::new("https://idp.example.org/saml")
///     .with_name("en", "Example University");
///
/// assert_eq!(idp.name("en"), Some("Example University"));
/// assert_eq!(idp.display_name("en"), "Example University");
/// assert_eq!(idp.display_name("nl"), "https://idp.example.org/saml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderMetadata {
    /// Stable identifier (entity ID) of the provider.
    #[serde(rename = "entityid")]
    pub entity_id: String,
    /// Human-readable names keyed by language tag.
    #[serde(default)]
    pub name: BTreeMap<String, String>,
}

impl ProviderMetadata {
    /// Creates metadata with no display names.
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            name: BTreeMap::new(),
        }
    }

    /// Adds a localized display name.
    #[must_use]
    pub fn with_name(mut self, language: impl Into<String>, name: impl Into<String>) -> Self {
        self.name.insert(language.into(), name.into());
        self
    }

    /// Returns the display name for `language` if it is set and non-empty.
    pub fn name(&self, language: &str) -> Option<&str> {
        self.name
            .get(language)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Returns the display name for `language`, falling back to the entity ID.
    pub fn display_name(&self, language: &str) -> &str {
        self.name(language).unwrap_or(&self.entity_id)
    }
}

/// Maps provider identifiers to their metadata.
pub trait MetadataSource {
    /// Looks up the metadata of the provider with the given entity ID.
    fn provider(&self, entity_id: &str) -> Option<&ProviderMetadata>;
}

/// Metadata source backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadata {
    providers: HashMap<String, ProviderMetadata>,
}

impl InMemoryMetadata {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider, replacing any record with the same entity ID.
    pub fn register(&mut self, metadata: ProviderMetadata) {
        self.providers.insert(metadata.entity_id.clone(), metadata);
    }

    /// Returns the number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl FromIterator<ProviderMetadata> for InMemoryMetadata {
    fn from_iter<I: IntoIterator<Item = ProviderMetadata>>(iter: I) -> Self {
        let mut source = InMemoryMetadata::new();
        for metadata in iter {
            source.register(metadata);
        }
        source
    }
}

impl MetadataSource for InMemoryMetadata {
    fn provider(&self, entity_id: &str) -> Option<&ProviderMetadata> {
        self.providers.get(entity_id)
    }
}
