//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

use crate::AttributeBag;

/// Attribute names, occasionally long and occasionally multi-byte.
pub(crate) fn arb_attribute_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z:.é]{1,60}").unwrap()
}

/// Attribute values of mixed length, including multi-byte characters.
pub(crate) fn arb_attribute_value() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9@. éü]{0,80}").unwrap()
}

/// Bags of up to eight plain-text attributes with one to three values each.
pub(crate) fn arb_attribute_bag() -> impl Strategy<Value = AttributeBag> {
    prop::collection::vec(
        (
            arb_attribute_name(),
            prop::collection::vec(arb_attribute_value(), 1..4),
        ),
        0..8,
    )
    .prop_map(|pairs| AttributeBag::from_text(pairs))
}
