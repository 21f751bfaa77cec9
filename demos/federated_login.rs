//! Federated login demonstration.
//!
//! This example runs the standard filter chain over three releases:
//! 1. A university provider using legacy URN attribute names
//! 2. A social-login bridge that only releases an email address
//! 3. A provider that releases an over-long attribute
//!
//! Run with: `RUST_LOG=debug cargo run --example federated_login`

use attr_synth::{
    AttributeBag, AuthState, ChainConfig, FilterChain, InMemoryMetadata, ProviderMetadata,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Federated Login Example ===\n");

    let metadata: InMemoryMetadata = [
        ProviderMetadata::new("https://idp.uni.example.nl/idp/shibboleth")
            .with_name("en", "Example University"),
        ProviderMetadata::new("https://login.terena.org/bridge/google").with_name("en", "Google"),
        ProviderMetadata::new("https://idp.lab.example.org/saml"),
    ]
    .into_iter()
    .collect();

    let chain = FilterChain::from_config(&ChainConfig::default()).expect("default config is valid");
    println!("Filters: {:?}\n", chain.filter_names());

    // Scenario 1: legacy attribute names
    println!("--- Scenario 1: University provider ---");
    login(
        &chain,
        &metadata,
        "https://idp.uni.example.nl/idp/shibboleth",
        AttributeBag::from_text([
            ("urn:mace:dir:attribute-def:displayName", vec!["Anna de Vries"]),
            ("urn:mace:dir:attribute-def:mail", vec!["a.devries@uni.example.nl"]),
            ("urn:mace:terena.org:attribute-def:schacHomeOrganization", vec!["uni.example.nl"]),
        ]),
    );

    // Scenario 2: social bridge
    println!("\n--- Scenario 2: Social-login bridge ---");
    login(
        &chain,
        &metadata,
        "https://login.terena.org/bridge/google",
        AttributeBag::from_text([("mail", vec!["jdoe@gmail.com"])]),
    );

    // Scenario 3: over-long attribute
    println!("\n--- Scenario 3: Over-long attribute ---");
    let notes = "x".repeat(450);
    login(
        &chain,
        &metadata,
        "https://idp.lab.example.org/saml",
        AttributeBag::from_text([
            ("cn", vec!["Lab User"]),
            ("labNotes", vec![notes.as_str()]),
        ]),
    );
}

fn login(chain: &FilterChain, metadata: &InMemoryMetadata, idp: &str, released: AttributeBag) {
    let mut state = AuthState::new(released).with_identity_provider(idp);

    if let Err(err) = chain.run(&mut state, metadata) {
        println!("✗ Login rejected: {}", err);
        return;
    }

    println!("✓ {} diagnostics recorded", state.diagnostics().len());
    if let Some(attributes) = state.attributes() {
        for (name, values) in attributes.iter() {
            let shown: Vec<String> = values
                .iter()
                .map(|v| {
                    let text = v.to_string();
                    if text.len() > 40 {
                        let head: String = text.chars().take(40).collect();
                        format!("{}... ({} bytes)", head, text.len())
                    } else {
                        text
                    }
                })
                .collect();
            println!("  {:<24} {:?}", name, shown);
        }
    }
}
