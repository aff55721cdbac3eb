mod common;

use common::*;
use csaf_retrieval::context::DataSource;
use csaf_retrieval::retrieve::{ProviderError, ResolveOptions, RetrievedProvider};
use csaf_retrieval_common::fetcher::MemoryTransport;
use reqwest::StatusCode;

const SECURITY_TXT: &str = "https://example.com/.well-known/security.txt";
const LEGACY_SECURITY_TXT: &str = "https://example.com/security.txt";
const DNS: &str = "https://csaf.data.security.example.com";

#[test_log::test(tokio::test)]
async fn well_known() {
    let transport = MemoryTransport::new().with_text(WELL_KNOWN, PROVIDER_METADATA);
    let loader = loader(transport.clone());

    let provider = RetrievedProvider::from_domain("example.com", &loader, &Default::default())
        .await
        .unwrap();

    assert_eq!(provider.data_source, DataSource::WellKnown);
    assert_eq!(provider.url.as_str(), WELL_KNOWN);
    assert_eq!(provider.role().name, "CSAF provider");
    assert_eq!(provider.metadata.publisher.name, "Example Company");

    // no other approach is tried
    assert_eq!(transport.hits(SECURITY_TXT), 0);
    assert_eq!(transport.hits(DNS), 0);
}

#[test_log::test(tokio::test)]
async fn security_txt() {
    let transport = MemoryTransport::new()
        .with_status(WELL_KNOWN, StatusCode::NOT_FOUND)
        .with_text(
            SECURITY_TXT,
            r#"Contact: mailto:security@example.com
CSAF: https://example.com/missing/provider-metadata.json
CSAF: https://example.com/csaf/provider-metadata.json
CSAF: https://example.com/other/provider-metadata.json
"#,
        )
        .with_text(
            "https://example.com/csaf/provider-metadata.json",
            PROVIDER_METADATA,
        )
        .with_text(
            "https://example.com/other/provider-metadata.json",
            PROVIDER_METADATA,
        );
    let loader = loader(transport.clone());

    let provider = RetrievedProvider::from_domain("example.com", &loader, &Default::default())
        .await
        .unwrap();

    assert_eq!(provider.data_source, DataSource::SecurityTxt);
    assert_eq!(
        provider.url.as_str(),
        "https://example.com/csaf/provider-metadata.json"
    );

    // the first entry was tried, the last one was not
    assert_eq!(
        transport.hits("https://example.com/missing/provider-metadata.json"),
        1
    );
    assert_eq!(
        transport.hits("https://example.com/other/provider-metadata.json"),
        0
    );
    assert_eq!(transport.hits(DNS), 0);
}

#[test_log::test(tokio::test)]
async fn dns() {
    let transport = MemoryTransport::new().with_text(DNS, PROVIDER_METADATA);
    let loader = loader(transport.clone());

    let provider = RetrievedProvider::from_domain("example.com", &loader, &Default::default())
        .await
        .unwrap();

    assert_eq!(provider.data_source, DataSource::Dns);

    // both security.txt locations were tried
    assert_eq!(transport.hits(WELL_KNOWN), 1);
    assert_eq!(transport.hits(SECURITY_TXT), 1);
    assert_eq!(transport.hits(LEGACY_SECURITY_TXT), 1);
}

#[test_log::test(tokio::test)]
async fn exhausted() {
    let loader = loader(MemoryTransport::new().with_unreachable(DNS));

    let err = RetrievedProvider::from_domain("example.com", &loader, &Default::default())
        .await
        .unwrap_err();

    let ProviderError::Exhausted {
        domain,
        attempts,
        last,
    } = &err
    else {
        panic!("unexpected error: {err}");
    };

    assert_eq!(domain, "example.com");
    assert_eq!(
        attempts
            .iter()
            .map(|attempt| attempt.data_source)
            .collect::<Vec<_>>(),
        vec![
            DataSource::WellKnown,
            DataSource::SecurityTxt,
            DataSource::Dns
        ]
    );
    assert!(matches!(**last, ProviderError::Fetch(_)));
    assert!(
        err.to_string().starts_with(
            "Failed to resolve provider for example.com via .well-known, security.txt or DNS."
        )
    );
}

#[test_log::test(tokio::test)]
async fn invalid_json_falls_through() {
    // a document which doesn't parse is a failed fetch, not a failed validation
    let transport = MemoryTransport::new()
        .with_text(WELL_KNOWN, "{}")
        .with_text(DNS, PROVIDER_METADATA);
    let loader = loader(transport);

    let provider = RetrievedProvider::from_domain("example.com", &loader, &ResolveOptions::new())
        .await
        .unwrap();

    assert_eq!(provider.data_source, DataSource::Dns);
}

#[test_log::test(tokio::test)]
async fn from_url() {
    let transport = MemoryTransport::new()
        .with_text(WELL_KNOWN, PROVIDER_METADATA)
        .with_text(
            "https://example.com/csaf/provider-metadata.json",
            PROVIDER_METADATA,
        );
    let loader = loader(transport);

    let provider = RetrievedProvider::from_url(WELL_KNOWN.parse().unwrap(), &loader)
        .await
        .unwrap();
    assert_eq!(provider.data_source, DataSource::WellKnown);

    // a provider must be discoverable, an arbitrary location doesn't fulfill that
    let err = RetrievedProvider::from_url(
        "https://example.com/csaf/provider-metadata.json"
            .parse()
            .unwrap(),
        &loader,
    )
    .await
    .unwrap_err();

    let ProviderError::Validation { cause, .. } = err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(cause.errors.len(), 3);
}
