//! Ordered fallback chains and the string heuristics they are built from.
//!
//! A [`RuleChain`] is a list of named rules evaluated in order; the first
//! rule that yields values wins and the rest are never consulted.

use std::sync::LazyLock;

use regex::Regex;

use crate::{AttributeBag, DiagnosticLog, ProviderMetadata};

/// `first.last@...`: everything before the last dot of the local part,
/// then everything up to the `@`.
static DOTTED_LOCAL_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\.(.*)@").expect("dotted local part pattern"));

static LOCAL_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)@").expect("local part pattern"));

static COUNTRY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([a-z]{2})$").expect("country suffix pattern"));

/// Everything a rule may consult.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sources<'a> {
    pub attributes: &'a AttributeBag,
    pub provider: &'a ProviderMetadata,
    pub language: &'a str,
    /// Textual targeted identifier, already extracted from a structured value.
    pub targeted_id: Option<&'a str>,
}

/// A single derivation step: returns values, or `None` to fall through.
pub(crate) type Derive = fn(&Sources<'_>) -> Option<Vec<String>>;

#[derive(Clone, Copy)]
pub(crate) struct Rule {
    pub label: &'static str,
    pub derive: Derive,
}

pub(crate) struct RuleChain {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

impl RuleChain {
    /// Evaluates the rules in order, logging the one that fired.
    pub fn resolve(&self, sources: &Sources<'_>, log: &mut DiagnosticLog) -> Option<Vec<String>> {
        self.rules.iter().find_map(|rule| {
            let values = (rule.derive)(sources)?;
            log.debug(format_args!(
                "{}: rule '{}' matched, using {:?}",
                self.field, rule.label, values
            ));
            Some(values)
        })
    }

    /// Like [`resolve`](Self::resolve), but falls back to `fallback` when no
    /// rule matches.
    pub fn resolve_or(
        &self,
        sources: &Sources<'_>,
        log: &mut DiagnosticLog,
        fallback: impl FnOnce() -> String,
    ) -> Vec<String> {
        if let Some(values) = self.resolve(sources, log) {
            return values;
        }
        let value = fallback();
        log.debug(format_args!(
            "{}: no rule matched, falling back to {:?}",
            self.field, value
        ));
        vec![value]
    }
}

/// Derives an organization-like label from a dotted domain.
///
/// Returns the label just before the top-level label, uppercased. Strings
/// with fewer than two labels, or with an empty label in either of the two
/// positions, do not match.
///
/// ```
/// use attr_synth::domain_without_tld;
///
/// assert_eq!(domain_without_tld("foo.bar.example.com").as_deref(), Some("EXAMPLE"));
/// assert_eq!(domain_without_tld("example.com").as_deref(), Some("EXAMPLE"));
/// assert_eq!(domain_without_tld("localhost"), None);
/// ```
pub fn domain_without_tld(domain: &str) -> Option<String> {
    let mut labels = domain.rsplit('.');
    let tld = labels.next()?;
    let label = labels.next()?;
    if tld.is_empty() || label.is_empty() {
        return None;
    }
    Some(label.to_uppercase())
}

/// Returns the domain of an address: everything after the last `@`.
pub fn mail_domain(address: &str) -> Option<&str> {
    address.rsplit_once('@').map(|(_, domain)| domain)
}

/// Splits a `first.last@domain` address into its two name parts.
pub fn mail_name_parts(address: &str) -> Option<(&str, &str)> {
    let caps = DOTTED_LOCAL_PART.captures(address)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Returns the local part of an address, if it is non-empty.
pub fn mail_local_part(address: &str) -> Option<&str> {
    let local = LOCAL_PART.captures(address)?.get(1)?.as_str();
    if local.is_empty() {
        None
    } else {
        Some(local)
    }
}

/// Returns the uppercased two-letter suffix of a dotted string, if it ends
/// in a dot followed by exactly two lowercase ASCII letters.
pub fn country_suffix(value: &str) -> Option<String> {
    let caps = COUNTRY_SUFFIX.captures(value)?;
    Some(caps.get(1)?.as_str().to_ascii_uppercase())
}

/// Lowercases `s`, then capitalizes the first letter of every
/// whitespace-separated word.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = c.is_whitespace();
    }
    out
}

/// Capitalizes the first character of `s`, leaving the rest untouched.
pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Splits a full name into its first word and the remaining words.
///
/// Only names of at least two words are split.
pub(crate) fn split_full_name(full_name: &str) -> Option<(&str, String)> {
    let mut words = full_name.split_whitespace();
    let first = words.next()?;
    let rest: Vec<&str> = words.collect();
    if rest.is_empty() {
        None
    } else {
        Some((first, rest.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_without_tld_keeps_second_level_label() {
        assert_eq!(domain_without_tld("foo.bar.example.com").as_deref(), Some("EXAMPLE"));
        assert_eq!(domain_without_tld("sub.example.com").as_deref(), Some("EXAMPLE"));
        assert_eq!(domain_without_tld("example.com").as_deref(), Some("EXAMPLE"));
        assert_eq!(domain_without_tld("geant.org").as_deref(), Some("GEANT"));
    }

    #[test]
    fn domain_without_tld_rejects_single_label_and_empty() {
        assert_eq!(domain_without_tld(""), None);
        assert_eq!(domain_without_tld("localhost"), None);
        assert_eq!(domain_without_tld("example."), None);
        assert_eq!(domain_without_tld(".com"), None);
    }

    #[test]
    fn mail_domain_uses_last_at_sign() {
        assert_eq!(mail_domain("jane@example.com"), Some("example.com"));
        assert_eq!(mail_domain("\"a@b\"@example.com"), Some("example.com"));
        assert_eq!(mail_domain("no-at-sign"), None);
    }

    #[test]
    fn mail_name_parts_splits_on_last_dot_of_local_part() {
        assert_eq!(mail_name_parts("jane.doe@example.com"), Some(("jane", "doe")));
        assert_eq!(mail_name_parts("mary.ann.smith@example.com"), Some(("mary.ann", "smith")));
        assert_eq!(mail_name_parts("jane@example.com"), None);
        assert_eq!(mail_name_parts("jane.doe"), None);
    }

    #[test]
    fn mail_local_part_requires_content() {
        assert_eq!(mail_local_part("jane@example.com"), Some("jane"));
        assert_eq!(mail_local_part("@example.com"), None);
        assert_eq!(mail_local_part("jane"), None);
    }

    #[test]
    fn country_suffix_needs_two_lowercase_letters() {
        assert_eq!(country_suffix("jan@uni.nl").as_deref(), Some("NL"));
        assert_eq!(country_suffix("jan@uni.NL"), None);
        assert_eq!(country_suffix("jan@uni.com"), None);
        assert_eq!(country_suffix("nl"), None);
    }

    #[test]
    fn title_case_lowercases_then_capitalizes_words() {
        assert_eq!(title_case("jANE"), "Jane");
        assert_eq!(title_case("mary ann"), "Mary Ann");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn capitalize_first_leaves_rest_alone() {
        assert_eq!(capitalize_first("jdoe"), "Jdoe");
        assert_eq!(capitalize_first("jDOE"), "JDOE");
        assert_eq!(capitalize_first("élise"), "Élise");
    }

    #[test]
    fn split_full_name_needs_two_words() {
        assert_eq!(split_full_name("Jane Doe"), Some(("Jane", "Doe".to_string())));
        assert_eq!(
            split_full_name("Jan  van der Berg"),
            Some(("Jan", "van der Berg".to_string()))
        );
        assert_eq!(split_full_name("Cher"), None);
        assert_eq!(split_full_name("   "), None);
    }

    fn first_rule(_: &Sources<'_>) -> Option<Vec<String>> {
        None
    }

    fn second_rule(_: &Sources<'_>) -> Option<Vec<String>> {
        Some(vec!["second".to_string()])
    }

    fn third_rule(_: &Sources<'_>) -> Option<Vec<String>> {
        panic!("rules after the first match must not run")
    }

    #[test]
    fn chain_stops_at_first_match_and_logs_it() {
        static RULES: &[Rule] = &[
            Rule { label: "first", derive: first_rule },
            Rule { label: "second", derive: second_rule },
            Rule { label: "third", derive: third_rule },
        ];
        let chain = RuleChain { field: "test", rules: RULES };
        let bag = AttributeBag::new();
        let provider = ProviderMetadata::new("https://idp.example.org");
        let sources = Sources {
            attributes: &bag,
            provider: &provider,
            language: "en",
            targeted_id: None,
        };
        let mut log = DiagnosticLog::new("synthesize");

        let values = chain.resolve_or(&sources, &mut log, || "fallback".to_string());

        assert_eq!(values, vec!["second"]);
        assert_eq!(log.len(), 1);
        assert!(log.lines()[0].contains("'second'"));
    }

    #[test]
    fn chain_falls_back_when_nothing_matches() {
        static RULES: &[Rule] = &[Rule { label: "first", derive: first_rule }];
        let chain = RuleChain { field: "test", rules: RULES };
        let bag = AttributeBag::new();
        let provider = ProviderMetadata::new("https://idp.example.org");
        let sources = Sources {
            attributes: &bag,
            provider: &provider,
            language: "en",
            targeted_id: None,
        };
        let mut log = DiagnosticLog::new("synthesize");

        let values = chain.resolve_or(&sources, &mut log, || "fallback".to_string());

        assert_eq!(values, vec!["fallback"]);
        assert!(log.lines()[0].contains("falling back"));
    }
}
