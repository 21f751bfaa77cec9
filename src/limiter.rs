//! Enforcement of the name and value lengths a downstream consumer with
//! fixed-size fields can store.

use crate::attributes::truncate_bytes;
use crate::filter::{AuthState, ProcessingFilter};
use crate::{AttributeBag, DiagnosticLog, Error, LimitConfig, MetadataSource};

/// Default maximum attribute name length, in bytes.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 127;
/// Default maximum attribute value length, in bytes.
pub const DEFAULT_MAX_VALUE_LENGTH: usize = 383;

/// Truncates over-long attribute names and values.
///
/// Names are cut to their first `max_name_len` bytes and the values moved
/// under the shortened name; if that name is already taken, the moved
/// values replace what was there. Any attribute holding an over-long value
/// then has every one of its values cut to `max_value_len` bytes. Cuts
/// never split a character, so a cut value may be slightly shorter than
/// the limit.
///
/// ```
/// use attr_synth::{AttributeBag, AttributeLimiter};
///
/// let limiter = AttributeLimiter::new(4, 3);
/// let bag = AttributeBag::from_text([("surname", vec!["Doe", "Smith"])]);
///
/// let (limited, log) = limiter.limit(bag);
///
/// assert_eq!(limited.texts("surn"), Some(vec!["Doe".to_string(), "Smi".to_string()]));
/// assert_eq!(log.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLimiter {
    max_name_len: usize,
    max_value_len: usize,
}

impl AttributeLimiter {
    /// Creates a limiter with the given maximum name and value lengths.
    ///
    /// # Panics
    ///
    /// Panics if either limit is 0.
    pub fn new(max_name_len: usize, max_value_len: usize) -> Self {
        assert!(max_name_len > 0, "max_name_len must be greater than 0");
        assert!(max_value_len > 0, "max_value_len must be greater than 0");
        Self {
            max_name_len,
            max_value_len,
        }
    }

    /// Creates a limiter with the default limits of 127 and 383 bytes.
    pub fn default_limits() -> Self {
        Self::new(DEFAULT_MAX_NAME_LENGTH, DEFAULT_MAX_VALUE_LENGTH)
    }

    /// Creates a limiter from configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if either limit is 0.
    pub fn try_from_config(config: &LimitConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::new(config.max_name_length, config.max_value_length))
    }

    /// Returns the maximum name length.
    pub fn max_name_len(&self) -> usize {
        self.max_name_len
    }

    /// Returns the maximum value length.
    pub fn max_value_len(&self) -> usize {
        self.max_value_len
    }

    /// Applies both limits, names first.
    pub fn limit(&self, mut attributes: AttributeBag) -> (AttributeBag, DiagnosticLog) {
        let mut log = DiagnosticLog::new("limit");

        let long_names: Vec<String> = attributes
            .names()
            .filter(|name| name.len() > self.max_name_len)
            .map(str::to_string)
            .collect();
        for name in long_names {
            let short = truncate_bytes(&name, self.max_name_len).to_string();
            log.debug(format_args!("Name too long: {}, truncated to {}", name, short));
            attributes.rename(&name, short);
        }

        let long_values: Vec<String> = attributes
            .iter()
            .filter(|(_, values)| values.iter().any(|v| v.len() > self.max_value_len))
            .map(|(name, _)| name.to_string())
            .collect();
        for name in long_values {
            let Some(values) = attributes.get_mut(&name) else {
                continue;
            };
            for value in values.iter().filter(|v| v.len() > self.max_value_len) {
                log.debug(format_args!(
                    "Value too long: {} has a value of {} bytes, truncated to {}",
                    name,
                    value.len(),
                    self.max_value_len
                ));
            }
            let truncated = values.iter().map(|v| v.truncated(self.max_value_len)).collect();
            *values = truncated;
        }

        (attributes, log)
    }
}

impl Default for AttributeLimiter {
    fn default() -> Self {
        Self::default_limits()
    }
}

impl ProcessingFilter for AttributeLimiter {
    fn name(&self) -> &'static str {
        "limit"
    }

    fn process(&self, state: &mut AuthState, _metadata: &dyn MetadataSource) -> Result<(), Error> {
        let attributes = state.take_attributes()?;
        let (attributes, log) = self.limit(attributes);
        state.set_attributes(attributes);
        state.record(log);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::arb_attribute_bag;
    use crate::{AttributeValue, NameId};

    #[test]
    fn short_bag_is_untouched() {
        let bag = AttributeBag::from_text([("mail", vec!["a@example.org"]), ("cn", vec!["A B"])]);
        let (limited, log) = AttributeLimiter::default_limits().limit(bag.clone());

        assert_eq!(limited, bag);
        assert!(log.is_empty());
    }

    #[test]
    fn long_name_keeps_its_first_bytes() {
        let name = format!("urn:oid:{}", "1".repeat(122));
        assert_eq!(name.len(), 130);
        let bag = AttributeBag::from_text([(name.clone(), vec!["hello"])]);

        let (limited, log) = AttributeLimiter::default_limits().limit(bag);

        assert_eq!(limited.len(), 1);
        assert_eq!(limited.first_text(&name[..127]), Some("hello"));
        assert_eq!(log.len(), 1);
        assert!(log.lines()[0].contains(&name));
    }

    #[test]
    fn colliding_truncated_names_last_write_wins() {
        let bag = AttributeBag::from_text([
            ("abc", vec!["existing"]),
            ("abcdef", vec!["first"]),
            ("abcxyz", vec!["second"]),
        ]);

        let (limited, log) = AttributeLimiter::new(3, 100).limit(bag);

        assert_eq!(limited.len(), 1);
        assert_eq!(limited.first_text("abc"), Some("second"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn long_value_truncates_every_value_of_the_attribute() {
        let long = "x".repeat(400);
        let bag = AttributeBag::from_text([
            ("description", vec![long.as_str(), "short"]),
            ("mail", vec!["a@example.org"]),
        ]);

        let (limited, log) = AttributeLimiter::default_limits().limit(bag);

        let values = limited.texts("description").expect("still present");
        assert_eq!(values[0].len(), 383);
        assert_eq!(values[1], "short");
        assert_eq!(log.len(), 1);
        assert!(log.lines()[0].contains("400 bytes"));
    }

    #[test]
    fn one_diagnostic_per_long_value() {
        let bag = AttributeBag::from_text([("cn", vec!["aaaa", "bbbb", "cc"])]);
        let (limited, log) = AttributeLimiter::new(10, 3).limit(bag);

        assert_eq!(
            limited.texts("cn"),
            Some(vec!["aaa".to_string(), "bbb".to_string(), "cc".to_string()])
        );
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn value_limit_applies_to_renamed_attribute() {
        let bag = AttributeBag::from_text([("longname", vec!["longvalue"])]);
        let (limited, log) = AttributeLimiter::new(4, 4).limit(bag);

        assert_eq!(limited.first_text("long"), Some("long"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn name_identifier_values_are_truncated() {
        let mut bag = AttributeBag::new();
        bag.insert("eduPersonTargetedID", vec![NameId::new("abcdef").into()]);

        let (limited, _) = AttributeLimiter::new(127, 3).limit(bag);

        assert_eq!(
            limited.get("eduPersonTargetedID"),
            Some(&[AttributeValue::NameId(NameId::new("abc"))][..])
        );
    }

    #[test]
    fn multibyte_values_are_cut_on_char_boundary() {
        let bag = AttributeBag::from_text([("cn", vec!["ééé"])]);
        let (limited, _) = AttributeLimiter::new(10, 5).limit(bag);

        assert_eq!(limited.first_text("cn"), Some("éé"));
    }

    #[test]
    fn config_with_zero_limit_is_rejected() {
        let config = LimitConfig {
            max_name_length: 0,
            max_value_length: 383,
        };
        assert!(matches!(
            AttributeLimiter::try_from_config(&config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    #[should_panic(expected = "max_value_len must be greater than 0")]
    fn zero_value_limit_panics() {
        let _limiter = AttributeLimiter::new(127, 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: nothing longer than the limits survives
            #[test]
            fn proptest_output_respects_limits(
                bag in arb_attribute_bag(),
                max_name in 1usize..40,
                max_value in 1usize..60,
            ) {
                let (limited, _) = AttributeLimiter::new(max_name, max_value).limit(bag);

                for (name, values) in limited.iter() {
                    prop_assert!(name.len() <= max_name);
                    for value in values {
                        prop_assert!(value.len() <= max_value);
                    }
                }
            }

            /// Property: a second pass changes nothing and logs nothing
            #[test]
            fn proptest_limit_is_idempotent(
                bag in arb_attribute_bag(),
                max_name in 1usize..40,
                max_value in 1usize..60,
            ) {
                let limiter = AttributeLimiter::new(max_name, max_value);
                let (once, _) = limiter.limit(bag);
                let (twice, log) = limiter.limit(once.clone());

                prop_assert_eq!(once, twice);
                prop_assert!(log.is_empty());
            }
        }
    }
}
