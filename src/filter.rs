//! The processing-filter seam and the chain that runs filters in order.

use crate::{
    AttributeBag, AttributeLimiter, AttributeSynthesizer, ChainConfig, DiagnosticLog, Error,
    MetadataSource, PrefixStripper,
};

/// Per-login state handed from filter to filter.
///
/// ```
/// use attr_synth::{AttributeBag, AuthState};
///
/// let state = AuthState::new(AttributeBag::new())
///     .with_identity_provider("https://idp.example.org");
///
/// assert_eq!(state.identity_provider(), Some("https://idp.example.org"));
/// assert!(state.diagnostics().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    attributes: Option<AttributeBag>,
    identity_provider: Option<String>,
    diagnostics: Vec<String>,
}

impl AuthState {
    /// Creates a state carrying the released attributes.
    pub fn new(attributes: AttributeBag) -> Self {
        Self {
            attributes: Some(attributes),
            ..Self::default()
        }
    }

    /// Creates a state with no attributes at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Names the provider that authenticated the user.
    #[must_use]
    pub fn with_identity_provider(mut self, entity_id: impl Into<String>) -> Self {
        self.identity_provider = Some(entity_id.into());
        self
    }

    /// Returns the provider that authenticated the user.
    pub fn identity_provider(&self) -> Option<&str> {
        self.identity_provider.as_deref()
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> Option<&AttributeBag> {
        self.attributes.as_ref()
    }

    /// Returns mutable access to the attributes.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingAttributes` if the state has none.
    pub fn attributes_mut(&mut self) -> Result<&mut AttributeBag, Error> {
        self.attributes.as_mut().ok_or(Error::MissingAttributes)
    }

    /// Takes the attributes out of the state, to be put back with
    /// [`set_attributes`](Self::set_attributes).
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingAttributes` if the state has none.
    pub fn take_attributes(&mut self) -> Result<AttributeBag, Error> {
        self.attributes.take().ok_or(Error::MissingAttributes)
    }

    /// Replaces the attributes.
    pub fn set_attributes(&mut self, attributes: AttributeBag) {
        self.attributes = Some(attributes);
    }

    /// Appends a filter's diagnostics.
    pub fn record(&mut self, log: DiagnosticLog) {
        self.diagnostics.extend(log.into_lines());
    }

    /// Returns every diagnostic recorded so far.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Consumes the state, returning its attributes.
    pub fn into_attributes(self) -> Option<AttributeBag> {
        self.attributes
    }
}

/// A step in the authentication processing pipeline.
pub trait ProcessingFilter {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Processes the state in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lacks something the filter needs.
    fn process(&self, state: &mut AuthState, metadata: &dyn MetadataSource) -> Result<(), Error>;
}

/// Ordered list of filters run over each login.
///
/// ```
/// use attr_synth::{AttributeBag, AuthState, FilterChain, InMemoryMetadata, ProviderMetadata};
///
/// let metadata: InMemoryMetadata = [ProviderMetadata::new("https://idp.example.com")]
///     .into_iter()
///     .collect();
/// let mut state = AuthState::new(AttributeBag::from_text([
///     ("urn:mace:dir:attribute-def:mail", vec!["jane.doe@example.com"]),
/// ]))
/// .with_identity_provider("https://idp.example.com");
///
/// FilterChain::standard().run(&mut state, &metadata).expect("chain runs");
///
/// let attributes = state.attributes().expect("attributes present");
/// assert_eq!(attributes.first_text("displayName"), Some("Jane Doe"));
/// ```
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn ProcessingFilter>>,
}

impl FilterChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the default chain: strip prefixes, synthesize, limit.
    pub fn standard() -> Self {
        Self::new()
            .with_filter(PrefixStripper::new())
            .with_filter(AttributeSynthesizer::new())
            .with_filter(AttributeLimiter::default_limits())
    }

    /// Builds the chain described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the configuration does not validate.
    pub fn from_config(config: &ChainConfig) -> Result<Self, Error> {
        config.validate()?;

        let mut chain = Self::new();
        if config.strip_prefixes {
            chain = chain.with_filter(PrefixStripper::new());
        }
        if config.synthesize {
            chain = chain.with_filter(AttributeSynthesizer::from_config(&config.synthesis));
        }
        if config.limit {
            chain = chain.with_filter(AttributeLimiter::try_from_config(&config.limits)?);
        }
        Ok(chain)
    }

    /// Appends a filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl ProcessingFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Returns the names of the filters, in run order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true if the chain has no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Runs every filter in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first filter error.
    pub fn run(&self, state: &mut AuthState, metadata: &dyn MetadataSource) -> Result<(), Error> {
        for filter in &self.filters {
            tracing::debug!(filter = filter.name(), "running filter");
            if let Err(err) = filter.process(state, metadata) {
                tracing::warn!(filter = filter.name(), error = %err, "filter failed");
                return Err(err);
            }
        }
        Ok(())
    }
}
