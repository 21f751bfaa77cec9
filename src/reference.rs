//! Static reference tables, built once and shared read-only.

use std::collections::HashSet;
use std::sync::LazyLock;

/// ISO 3166-1 alpha-2 codes recognized as countries.
const COUNTRY_CODES: &[&str] = &[
    "AF", "AX", "AL", "DZ", "AS", "AD", "AO", "AI", "AQ", "AG", "AR",
    "AM", "AW", "AU", "AT", "AZ", "BS", "BH", "BD", "BB", "BY", "BE",
    "BZ", "BJ", "BM", "BT", "BO", "BA", "BW", "BV", "BR", "IO", "BN",
    "BG", "BF", "BI", "KH", "CM", "CA", "CV", "KY", "CF", "TD", "CL",
    "CN", "CX", "CC", "CO", "KM", "CG", "CD", "CK", "CR", "CI", "HR",
    "CU", "CY", "CZ", "DK", "DJ", "DM", "DO", "EC", "EG", "SV", "GQ",
    "ER", "EE", "ET", "FK", "FO", "FJ", "FI", "FR", "GF", "PF", "TF",
    "GA", "GM", "GE", "DE", "GH", "GI", "GR", "GL", "GD", "GP", "GU",
    "GT", "GG", "GN", "GW", "GY", "HT", "HM", "VA", "HN", "HK", "HU",
    "IS", "IN", "ID", "IR", "IQ", "IE", "IM", "IL", "IT", "JM", "JP",
    "JE", "JO", "KZ", "KE", "KI", "KP", "KR", "KW", "KG", "LA", "LV",
    "LB", "LS", "LR", "LY", "LI", "LT", "LU", "MO", "MK", "MG", "MW",
    "MY", "MV", "ML", "MT", "MH", "MQ", "MR", "MU", "YT", "MX", "FM",
    "MD", "MC", "MN", "ME", "MS", "MA", "MZ", "MM", "NA", "NR", "NP",
    "NL", "AN", "NC", "NZ", "NI", "NE", "NG", "NU", "NF", "MP", "NO",
    "OM", "PK", "PW", "PS", "PA", "PG", "PY", "PE", "PH", "PN", "PL",
    "PT", "PR", "QA", "RE", "RO", "RU", "RW", "BL", "SH", "KN", "LC",
    "MF", "PM", "VC", "WS", "SM", "ST", "SA", "SN", "RS", "SC", "SL",
    "SG", "SK", "SI", "SB", "SO", "ZA", "GS", "ES", "LK", "SD", "SR",
    "SJ", "SZ", "SE", "CH", "SY", "TW", "TJ", "TZ", "TH", "TL", "TG",
    "TK", "TO", "TT", "TN", "TR", "TM", "TC", "TV", "UG", "UA", "AE",
    "GB", "US", "UM", "UY", "UZ", "VU", "VE", "VN", "VG", "VI", "WF",
    "EH", "YE", "ZM", "ZW",
];

/// Providers that are social-login bridges or otherwise not tied to an
/// institution; their name says nothing about the user's organization.
const ORGANIZATION_EXCLUSIONS: &[&str] = &[
    "https://login.terena.org/bridge/facebook",
    "https://login.terena.org/bridge/google",
    "https://login.terena.org/bridge/saml2/idp/metadata.php",
    "https://login.terena.org/bridge/linkedin",
    "https://login.terena.org/bridge/twitter",
    "https://login.terena.org/bridge/yahoo",
    "https://idp.unitedid.org/idp/shibboleth",
];

static COUNTRY_CODE_TABLE: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| COUNTRY_CODES.iter().copied().collect());

static ORGANIZATION_EXCLUSION_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ORGANIZATION_EXCLUSIONS.iter().copied().collect());

/// Returns true if `code` is a recognized two-letter country code.
///
/// Matching is exact: codes are uppercase.
///
/// ```
/// use attr_synth::is_country_code;
///
/// assert!(is_country_code("NL"));
/// assert!(!is_country_code("nl"));
/// assert!(!is_country_code("XX"));
/// ```
pub fn is_country_code(code: &str) -> bool {
    COUNTRY_CODE_TABLE.contains(code)
}

/// Returns true if the provider is excluded from organization inference.
pub fn is_excluded_provider(entity_id: &str) -> bool {
    ORGANIZATION_EXCLUSION_SET.contains(entity_id)
}

/// Iterates over every recognized country code.
pub fn country_codes() -> impl Iterator<Item = &'static str> {
    COUNTRY_CODES.iter().copied()
}
