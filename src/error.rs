use std::fmt;

/// Errors raised by the filter-chain glue around the pure operations.
///
/// Synthesis, limiting and prefix stripping never fail on their own; these
/// errors only report a processing state or configuration that the caller
/// got wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The processing state carries no attribute bag.
    MissingAttributes,
    /// The processing state does not name the authenticating provider.
    MissingIdentityProvider,
    /// No metadata is registered for the named provider.
    UnknownProvider(String),
    /// A configuration value is out of range.
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingAttributes => write!(f, "processing state has no attributes"),
            Error::MissingIdentityProvider => {
                write!(f, "processing state does not name an identity provider")
            }
            Error::UnknownProvider(entity_id) => {
                write!(f, "no metadata for identity provider '{}'", entity_id)
            }
            Error::InvalidConfig(message) => write!(f, "invalid configuration: {}", message),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_names_the_entity() {
        let err = Error::UnknownProvider("https://idp.example.org".to_string());
        assert_eq!(
            err.to_string(),
            "no metadata for identity provider 'https://idp.example.org'"
        );
    }

    #[test]
    fn invalid_config_carries_message() {
        let err = Error::InvalidConfig("max_name_length must be greater than 0".to_string());
        assert!(err.to_string().starts_with("invalid configuration: "));
        assert!(err.to_string().contains("max_name_length"));
    }
}
