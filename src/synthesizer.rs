//! Derivation of a fixed set of always-present attributes from whatever a
//! provider released.
//!
//! Each derived attribute has its own ordered fallback chain, ending in a
//! placeholder when nothing usable was released. Placeholders are chosen
//! to be recognizable downstream, so that a user can be asked to correct
//! them.

use std::fmt::Write as _;

use crate::attributes::names;
use crate::filter::{AuthState, ProcessingFilter};
use crate::reference::{is_country_code, is_excluded_provider};
use crate::rules::{
    capitalize_first, country_suffix, domain_without_tld, mail_domain, mail_local_part,
    mail_name_parts, split_full_name, title_case, Rule, RuleChain, Sources,
};
use crate::{
    AttributeBag, AttributeValue, DiagnosticLog, Error, MetadataSource, ProviderMetadata,
    SynthesisConfig,
};

/// Placeholder address for users whose provider released no email. It is
/// deliberately not a valid address.
pub const EMAIL_PLACEHOLDER: &str = "invalid_email_needs_updating";
/// Placeholder given name.
pub const GIVEN_NAME_PLACEHOLDER: &str = "first_name";
/// Placeholder surname.
pub const SURNAME_PLACEHOLDER: &str = "last_name";
/// Organization reported for generic, non-institutional providers.
pub const NO_ORGANIZATION: &str = "No organisation";
/// Placeholder organization.
pub const ORGANIZATION_PLACEHOLDER: &str = "My_Organisation";
/// Country reported when none could be determined.
pub const UNKNOWN_COUNTRY: &str = "0";

/// The attributes produced by [`AttributeSynthesizer::synthesize`].
///
/// Every field holds at least one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAttributes {
    /// Email address, or [`EMAIL_PLACEHOLDER`].
    pub email: Vec<String>,
    /// Given name, or [`GIVEN_NAME_PLACEHOLDER`].
    pub given_name: Vec<String>,
    /// Surname, or [`SURNAME_PLACEHOLDER`].
    pub surname: Vec<String>,
    /// Full display name.
    pub display_name: Vec<String>,
    /// Display name of the authenticating provider.
    pub provider_name: Vec<String>,
    /// Organization, [`NO_ORGANIZATION`] or [`ORGANIZATION_PLACEHOLDER`].
    pub organization: Vec<String>,
    /// Country code, or [`UNKNOWN_COUNTRY`].
    pub country: Vec<String>,
}

impl SynthesizedAttributes {
    /// Returns the attributes under the names the downstream consumer reads.
    ///
    /// The surname is written to `cn`.
    pub fn to_bag(&self) -> AttributeBag {
        self.fields()
            .into_iter()
            .map(|(name, values)| {
                let values = values.iter().cloned().map(AttributeValue::Text).collect();
                (name, values)
            })
            .collect()
    }

    fn fields(&self) -> [(&'static str, &Vec<String>); 7] {
        [
            (names::MAIL, &self.email),
            (names::GIVEN_NAME, &self.given_name),
            (names::COMMON_NAME, &self.surname),
            (names::DISPLAY_NAME, &self.display_name),
            (names::PROVIDER_NAME, &self.provider_name),
            (names::ORGANIZATION, &self.organization),
            (names::COUNTRY_NAME, &self.country),
        ]
    }

    fn summary(&self) -> String {
        let mut out = String::from("{");
        for (i, (name, values)) in self.fields().into_iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}: {:?}", name, values);
        }
        out.push('}');
        out
    }
}

// ============================================================================
// Rules
// ============================================================================

fn first_text<'a>(sources: &Sources<'a>, name: &str) -> Option<&'a str> {
    sources.attributes.first_text(name)
}

fn mail(s: &Sources<'_>) -> Option<Vec<String>> {
    s.attributes.texts(names::MAIL)
}

fn given_name(s: &Sources<'_>) -> Option<Vec<String>> {
    s.attributes.texts(names::GIVEN_NAME)
}

fn given_name_from_cn(s: &Sources<'_>) -> Option<Vec<String>> {
    let (first, _) = split_full_name(first_text(s, names::COMMON_NAME)?)?;
    Some(vec![first.to_string()])
}

fn given_name_from_display_name(s: &Sources<'_>) -> Option<Vec<String>> {
    let (first, _) = split_full_name(first_text(s, names::DISPLAY_NAME)?)?;
    Some(vec![first.to_string()])
}

fn given_name_from_mail(s: &Sources<'_>) -> Option<Vec<String>> {
    let (first, _) = mail_name_parts(first_text(s, names::MAIL)?)?;
    Some(vec![title_case(first)])
}

fn surname(s: &Sources<'_>) -> Option<Vec<String>> {
    s.attributes.texts(names::SURNAME)
}

fn surname_from_cn(s: &Sources<'_>) -> Option<Vec<String>> {
    let (_, rest) = split_full_name(first_text(s, names::COMMON_NAME)?)?;
    Some(vec![rest])
}

fn surname_from_display_name(s: &Sources<'_>) -> Option<Vec<String>> {
    let (_, rest) = split_full_name(first_text(s, names::DISPLAY_NAME)?)?;
    Some(vec![rest])
}

fn surname_from_mail(s: &Sources<'_>) -> Option<Vec<String>> {
    let (_, last) = mail_name_parts(first_text(s, names::MAIL)?)?;
    Some(vec![title_case(last)])
}

fn surname_from_mail_local_part(s: &Sources<'_>) -> Option<Vec<String>> {
    let local = mail_local_part(first_text(s, names::MAIL)?)?;
    Some(vec![capitalize_first(local)])
}

fn display_name(s: &Sources<'_>) -> Option<Vec<String>> {
    s.attributes.texts(names::DISPLAY_NAME)
}

fn organization_name(s: &Sources<'_>) -> Option<Vec<String>> {
    s.attributes.texts(names::ORGANIZATION_NAME)
}

fn organization(s: &Sources<'_>) -> Option<Vec<String>> {
    s.attributes.texts(names::ORGANIZATION)
}

fn organization_from_home_organization(s: &Sources<'_>) -> Option<Vec<String>> {
    let domain = first_text(s, names::SCHAC_HOME_ORGANIZATION)?;
    Some(vec![domain_without_tld(domain)?])
}

fn organization_excluded_provider(s: &Sources<'_>) -> Option<Vec<String>> {
    if is_excluded_provider(&s.provider.entity_id) {
        Some(vec![NO_ORGANIZATION.to_string()])
    } else {
        None
    }
}

fn organization_from_provider_name(s: &Sources<'_>) -> Option<Vec<String>> {
    Some(vec![s.provider.name(s.language)?.to_string()])
}

fn organization_from_mail(s: &Sources<'_>) -> Option<Vec<String>> {
    let domain = mail_domain(first_text(s, names::MAIL)?)?;
    Some(vec![domain_without_tld(domain)?])
}

fn organization_from_principal_name(s: &Sources<'_>) -> Option<Vec<String>> {
    let domain = mail_domain(first_text(s, names::PRINCIPAL_NAME)?)?;
    Some(vec![domain_without_tld(domain)?])
}

fn known_country(code: String) -> Option<Vec<String>> {
    if is_country_code(&code) {
        Some(vec![code])
    } else {
        None
    }
}

fn country_name(s: &Sources<'_>) -> Option<Vec<String>> {
    known_country(first_text(s, names::COUNTRY_NAME)?.to_uppercase())
}

fn country_from_mail(s: &Sources<'_>) -> Option<Vec<String>> {
    known_country(country_suffix(first_text(s, names::MAIL)?)?)
}

fn country_from_targeted_id(s: &Sources<'_>) -> Option<Vec<String>> {
    known_country(country_suffix(s.targeted_id?)?)
}

fn country_from_principal_name(s: &Sources<'_>) -> Option<Vec<String>> {
    known_country(country_suffix(first_text(s, names::PRINCIPAL_NAME)?)?)
}

fn country_from_preferred_language(s: &Sources<'_>) -> Option<Vec<String>> {
    let language = first_text(s, names::PREFERRED_LANGUAGE)?;
    let chars: Vec<char> = language.chars().collect();
    if chars.len() < 2 {
        return None;
    }
    let region: String = chars[chars.len() - 2..].iter().collect();
    known_country(region.to_uppercase())
}

static EMAIL: RuleChain = RuleChain {
    field: names::MAIL,
    rules: &[Rule { label: "mail", derive: mail }],
};

static GIVEN_NAME: RuleChain = RuleChain {
    field: names::GIVEN_NAME,
    rules: &[
        Rule { label: "givenName", derive: given_name },
        Rule { label: "first word of cn", derive: given_name_from_cn },
        Rule { label: "first word of displayName", derive: given_name_from_display_name },
        Rule { label: "first part of mail", derive: given_name_from_mail },
    ],
};

static SURNAME: RuleChain = RuleChain {
    field: "surname",
    rules: &[
        Rule { label: "sn", derive: surname },
        Rule { label: "remaining words of cn", derive: surname_from_cn },
        Rule { label: "remaining words of displayName", derive: surname_from_display_name },
        Rule { label: "last part of mail", derive: surname_from_mail },
        Rule { label: "local part of mail", derive: surname_from_mail_local_part },
    ],
};

static DISPLAY_NAME: RuleChain = RuleChain {
    field: names::DISPLAY_NAME,
    rules: &[Rule { label: "displayName", derive: display_name }],
};

static ORGANIZATION: RuleChain = RuleChain {
    field: names::ORGANIZATION,
    rules: &[
        Rule { label: "organizationName", derive: organization_name },
        Rule { label: "o", derive: organization },
        Rule { label: "domain of schacHomeOrganization", derive: organization_from_home_organization },
        Rule { label: "generic provider", derive: organization_excluded_provider },
        Rule { label: "provider name", derive: organization_from_provider_name },
        Rule { label: "domain of mail", derive: organization_from_mail },
        Rule { label: "domain of eduPersonPrincipalName", derive: organization_from_principal_name },
    ],
};

static COUNTRY: RuleChain = RuleChain {
    field: names::COUNTRY_NAME,
    rules: &[
        Rule { label: "countryName", derive: country_name },
        Rule { label: "suffix of mail", derive: country_from_mail },
        Rule { label: "suffix of eduPersonTargetedID", derive: country_from_targeted_id },
        Rule { label: "suffix of eduPersonPrincipalName", derive: country_from_principal_name },
        Rule { label: "region of preferredLanguage", derive: country_from_preferred_language },
    ],
};

// ============================================================================
// Targeted identifier
// ============================================================================

/// Returns the text of the primary targeted identifier, extracting it from
/// a structured name identifier when needed.
pub fn targeted_id(attributes: &AttributeBag) -> Option<&str> {
    match attributes.get(names::TARGETED_ID)?.first()? {
        AttributeValue::Text(text) => Some(text),
        AttributeValue::NameId(id) => id.text(),
    }
}

/// Replaces a structured primary targeted identifier with its text.
///
/// Returns true if the bag was changed. An identifier without text is left
/// untouched and reads as absent.
pub fn normalize_targeted_id(attributes: &mut AttributeBag) -> bool {
    let text = match attributes.get(names::TARGETED_ID).and_then(<[_]>::first) {
        Some(AttributeValue::NameId(id)) => match id.text() {
            Some(text) => text.to_string(),
            None => return false,
        },
        _ => return false,
    };
    attributes.insert_text(names::TARGETED_ID, vec![text]);
    true
}

// ============================================================================
// Synthesizer
// ============================================================================

/// Derives the always-present attributes from a provider's release.
///
/// ```
/// use attr_synth::{AttributeBag, AttributeSynthesizer, ProviderMetadata};
///
/// let attributes = AttributeBag::from_text([("mail", vec!["jane.doe@example.com"])]);
/// let provider = ProviderMetadata::new("https://idp.example.com/saml");
///
/// let (derived, log) = AttributeSynthesizer::new().synthesize(&attributes, &provider);
///
/// assert_eq!(derived.given_name, ["Jane"]);
/// assert_eq!(derived.surname, ["Doe"]);
/// assert_eq!(derived.display_name, ["Jane Doe"]);
/// assert_eq!(derived.organization, ["EXAMPLE"]);
/// assert!(!log.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct AttributeSynthesizer {
    language: String,
}

impl AttributeSynthesizer {
    /// Creates a synthesizer that reads English provider names.
    pub fn new() -> Self {
        Self::from_config(&SynthesisConfig::default())
    }

    /// Creates a synthesizer from configuration.
    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self {
            language: config.language.clone(),
        }
    }

    /// Returns the language whose provider name is consulted.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Computes the derived attributes. The input bag is not modified.
    pub fn synthesize(
        &self,
        attributes: &AttributeBag,
        provider: &ProviderMetadata,
    ) -> (SynthesizedAttributes, DiagnosticLog) {
        let mut log = DiagnosticLog::new("synthesize");

        if let Some(AttributeValue::NameId(_)) =
            attributes.get(names::TARGETED_ID).and_then(<[_]>::first)
        {
            match targeted_id(attributes) {
                Some(text) => log.debug(format_args!(
                    "{}: extracted {:?} from name identifier",
                    names::TARGETED_ID,
                    text
                )),
                None => log.debug(format_args!(
                    "{}: name identifier has no value, ignoring it",
                    names::TARGETED_ID
                )),
            }
        }

        let sources = Sources {
            attributes,
            provider,
            language: &self.language,
            targeted_id: targeted_id(attributes),
        };

        let email = EMAIL.resolve_or(&sources, &mut log, || EMAIL_PLACEHOLDER.to_string());
        let given_name =
            GIVEN_NAME.resolve_or(&sources, &mut log, || GIVEN_NAME_PLACEHOLDER.to_string());
        let surname = SURNAME.resolve_or(&sources, &mut log, || SURNAME_PLACEHOLDER.to_string());
        let display_name = DISPLAY_NAME.resolve_or(&sources, &mut log, || {
            format!(
                "{} {}",
                given_name.first().map(String::as_str).unwrap_or_default(),
                surname.first().map(String::as_str).unwrap_or_default()
            )
        });

        let provider_name = provider.display_name(&self.language).to_string();
        log.debug(format_args!(
            "{}: using {:?}",
            names::PROVIDER_NAME,
            provider_name
        ));

        let organization = ORGANIZATION.resolve_or(&sources, &mut log, || {
            ORGANIZATION_PLACEHOLDER.to_string()
        });
        let country = COUNTRY.resolve_or(&sources, &mut log, || UNKNOWN_COUNTRY.to_string());

        let derived = SynthesizedAttributes {
            email,
            given_name,
            surname,
            display_name,
            provider_name: vec![provider_name],
            organization,
            country,
        };
        log.debug(format_args!("Synthesized attributes: {}", derived.summary()));

        (derived, log)
    }
}

impl Default for AttributeSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingFilter for AttributeSynthesizer {
    fn name(&self) -> &'static str {
        "synthesize"
    }

    /// Looks up the provider, synthesizes, and merges the result over the
    /// state's attributes.
    fn process(&self, state: &mut AuthState, metadata: &dyn MetadataSource) -> Result<(), Error> {
        if state.attributes().is_none() {
            return Err(Error::MissingAttributes);
        }
        let entity_id = state
            .identity_provider()
            .ok_or(Error::MissingIdentityProvider)?;
        let provider = metadata
            .provider(entity_id)
            .ok_or_else(|| Error::UnknownProvider(entity_id.to_string()))?;

        let attributes = state.attributes_mut()?;
        normalize_targeted_id(attributes);
        let (derived, log) = self.synthesize(attributes, provider);
        attributes.merge(derived.to_bag());

        state.record(log);
        Ok(())
    }
}
