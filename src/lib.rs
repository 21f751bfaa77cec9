//! Identity-attribute normalization for federated authentication.
//!
//! After a user authenticates at an external identity provider, the
//! provider releases a bag of multi-valued attributes whose presence,
//! naming and format vary from provider to provider. This crate turns that
//! bag into one a downstream consumer can rely on:
//!
//! - **Prefix stripping**: legacy `urn:mace:...:attribute-def:` names are
//!   shortened ([`PrefixStripper`])
//! - **Synthesis**: email, given name, surname, display name, provider name,
//!   organization and country are always present, derived through ordered
//!   fallback chains ([`AttributeSynthesizer`])
//! - **Limiting**: names and values are cut to the lengths a consumer with
//!   fixed-size fields can store ([`AttributeLimiter`])
//!
//! Each step returns its result together with a [`DiagnosticLog`] of what
//! it did; the lines are also emitted through `tracing` at DEBUG level.
//!
//! # Core Types
//!
//! - [`AttributeBag`]: ordered mapping from attribute name to values
//! - [`ProviderMetadata`]: read-only description of the identity provider
//! - [`FilterChain`]: runs the steps over an [`AuthState`] in order
//!
//! # Examples
//!
//! ```
//! use attr_synth::{AttributeBag, AttributeLimiter, AttributeSynthesizer, ProviderMetadata};
//!
//! let mut attributes = AttributeBag::from_text([("mail", vec!["jane.doe@example.com"])]);
//! let provider = ProviderMetadata::new("https://idp.example.com/saml");
//!
//! let (derived, _log) = AttributeSynthesizer::new().synthesize(&attributes, &provider);
//! attributes.merge(derived.to_bag());
//!
//! let (attributes, _log) = AttributeLimiter::default_limits().limit(attributes);
//! assert_eq!(attributes.first_text("givenName"), Some("Jane"));
//! assert_eq!(attributes.first_text("o"), Some("EXAMPLE"));
//! assert_eq!(attributes.first_text("countryName"), Some("0"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attributes;
mod config;
mod error;
mod filter;
mod limiter;
mod logging;
mod metadata;
mod prefix;
mod reference;
mod rules;
mod synthesizer;

#[cfg(test)]
mod test_utils;

pub use attributes::{names, AttributeBag, AttributeValue, NameId};
pub use config::{ChainConfig, LimitConfig, SynthesisConfig};
pub use error::Error;
pub use filter::{AuthState, FilterChain, ProcessingFilter};
pub use limiter::{AttributeLimiter, DEFAULT_MAX_NAME_LENGTH, DEFAULT_MAX_VALUE_LENGTH};
pub use logging::DiagnosticLog;
pub use metadata::{InMemoryMetadata, MetadataSource, ProviderMetadata};
pub use prefix::{PrefixStripper, DEFAULT_PREFIXES};
pub use reference::{country_codes, is_country_code, is_excluded_provider};
pub use rules::{country_suffix, domain_without_tld, mail_domain, mail_local_part, mail_name_parts};
pub use synthesizer::{
    normalize_targeted_id, targeted_id, AttributeSynthesizer, SynthesizedAttributes,
    EMAIL_PLACEHOLDER, GIVEN_NAME_PLACEHOLDER, NO_ORGANIZATION, ORGANIZATION_PLACEHOLDER,
    SURNAME_PLACEHOLDER, UNKNOWN_COUNTRY,
};
