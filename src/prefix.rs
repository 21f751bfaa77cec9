//! Renaming of legacy URN-prefixed attribute names to their short form.

use crate::filter::{AuthState, ProcessingFilter};
use crate::{AttributeBag, DiagnosticLog, Error, MetadataSource};

/// Prefixes stripped by [`PrefixStripper::new`].
pub const DEFAULT_PREFIXES: &[&str] = &[
    "urn:mace:dir:attribute-def:",
    "urn:mace:terena.org:attribute-def:",
];

/// Renames `urn:mace:dir:attribute-def:mail` style names to `mail`.
///
/// Values move unchanged. If the short name is already present, the moved
/// values replace it.
///
/// ```
/// use attr_synth::{AttributeBag, PrefixStripper};
///
/// let bag = AttributeBag::from_text([("urn:mace:dir:attribute-def:mail", vec!["a@example.org"])]);
/// let (stripped, _) = PrefixStripper::new().strip(bag);
///
/// assert_eq!(stripped.first_text("mail"), Some("a@example.org"));
/// ```
#[derive(Debug, Clone)]
pub struct PrefixStripper {
    prefixes: Vec<String>,
}

impl PrefixStripper {
    /// Creates a stripper for the MACE attribute-definition prefixes.
    pub fn new() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Adds another prefix to strip.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    fn short_name<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.prefixes
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty())
    }

    /// Renames every prefixed attribute.
    pub fn strip(&self, mut attributes: AttributeBag) -> (AttributeBag, DiagnosticLog) {
        let mut log = DiagnosticLog::new("strip_prefix");

        let renames: Vec<(String, String)> = attributes
            .names()
            .filter_map(|name| Some((name.to_string(), self.short_name(name)?.to_string())))
            .collect();
        for (from, to) in renames {
            log.debug(format_args!("Stripped prefix: {} -> {}", from, to));
            attributes.rename(&from, to);
        }

        (attributes, log)
    }
}

impl Default for PrefixStripper {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingFilter for PrefixStripper {
    fn name(&self) -> &'static str {
        "strip_prefix"
    }

    fn process(&self, state: &mut AuthState, _metadata: &dyn MetadataSource) -> Result<(), Error> {
        let attributes = state.take_attributes()?;
        let (attributes, log) = self.strip(attributes);
        state.set_attributes(attributes);
        state.record(log);
        Ok(())
    }
}
