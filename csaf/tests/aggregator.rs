mod common;

use common::*;
use csaf_retrieval::context::DataSource;
use csaf_retrieval::retrieve::{
    AggregatorError, DocumentOptions, LoadError, ProviderError, RetrievedAggregator,
};
use csaf_retrieval_common::fetcher::{self, MemoryTransport};
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;

const AGGREGATOR_URL: &str =
    "https://aggregator.example.org/.well-known/csaf-aggregator/aggregator.json";

fn transport() -> MemoryTransport {
    MemoryTransport::new()
        .with_text(AGGREGATOR_URL, AGGREGATOR)
        .with_text(WELL_KNOWN, PROVIDER_METADATA)
        .with_json(
            "https://coordinator.example.org/csaf/provider-metadata.json",
            &publisher_metadata("https://coordinator.example.org/csaf/provider-metadata.json"),
        )
        .unwrap()
}

#[test_log::test(tokio::test)]
async fn from_domain() {
    let loader = loader(transport());

    let aggregator = RetrievedAggregator::from_domain("aggregator.example.org", &loader)
        .await
        .unwrap();

    assert_eq!(aggregator.url.as_str(), AGGREGATOR_URL);
    assert_eq!(aggregator.role().name, "CSAF lister");
    assert_eq!(aggregator.metadata.csaf_providers.len(), 2);
}

#[test_log::test(tokio::test)]
async fn fetch_all() {
    let loader = loader(transport());
    let aggregator = RetrievedAggregator::from_url(AGGREGATOR_URL.parse().unwrap(), &loader)
        .await
        .unwrap();

    let providers = aggregator
        .fetch_providers(&loader, DocumentOptions::default())
        .await;
    assert_eq!(providers.len(), 2);

    let provider = providers[0].as_ref().unwrap();
    assert_eq!(provider.data_source, DataSource::WellKnown);
    assert_eq!(provider.metadata.publisher.name, "Example Company");

    assert!(matches!(
        &providers[1],
        Err(ProviderError::Fetch(fetcher::Error::Status {
            status: StatusCode::NOT_FOUND,
            ..
        }))
    ));

    let publishers = aggregator
        .fetch_publishers(&loader, DocumentOptions::default())
        .await;
    assert_eq!(publishers.len(), 1);
    assert_eq!(
        publishers[0].as_ref().unwrap().role().name,
        "CSAF publisher"
    );

    // providers first, then publishers
    let all = aggregator
        .fetch_all(&loader, DocumentOptions::default())
        .await;
    assert_eq!(
        all.iter().map(Result::is_ok).collect::<Vec<_>>(),
        vec![true, false, true]
    );
}

#[test_log::test(tokio::test)]
async fn missing() {
    let loader = loader(MemoryTransport::new());

    let err = RetrievedAggregator::from_domain("aggregator.example.org", &loader)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("Failed to load CSAF Aggregator from {AGGREGATOR_URL}")
    );
    assert!(matches!(
        err,
        AggregatorError::Load {
            cause: LoadError::Fetch(_),
            ..
        }
    ));
}

#[test_log::test(tokio::test)]
async fn requests_in_flight_are_limited() {
    let mut metadata: serde_json::Value = serde_json::from_str(AGGREGATOR).unwrap();
    let listed = |n: usize| {
        json!({
            "metadata": {
                "last_updated": "2024-03-01T10:00:00Z",
                "publisher": {
                    "category": "vendor",
                    "name": format!("Company {n}"),
                    "namespace": format!("https://p{n}.example.com")
                },
                "role": "csaf_provider",
                "url": format!("https://p{n}.example.com/.well-known/csaf/provider-metadata.json")
            }
        })
    };
    metadata["csaf_providers"] = (0..20).map(listed).collect();
    metadata["csaf_publishers"] = (20..30).map(listed).collect();

    let transport = Delayed::new(
        MemoryTransport::new().with_json(AGGREGATOR_URL, &metadata).unwrap(),
        Duration::from_millis(20),
    );
    let loader = loader(transport.clone());

    let aggregator = RetrievedAggregator::from_url(AGGREGATOR_URL.parse().unwrap(), &loader)
        .await
        .unwrap();

    let options = DocumentOptions::default().channel_capacity(4);

    let providers = aggregator.fetch_providers(&loader, options).await;
    assert_eq!(providers.len(), 20);
    assert_eq!(transport.peak(), 4);

    let all = aggregator.fetch_all(&loader, options).await;
    assert_eq!(all.len(), 30);
    assert_eq!(transport.peak(), 4);

    // the listing order is kept, none of the listed providers exist
    for (n, result) in all.iter().enumerate() {
        match result {
            Err(ProviderError::Fetch(fetcher::Error::Status { url, .. })) => assert_eq!(
                url.as_str(),
                format!("https://p{n}.example.com/.well-known/csaf/provider-metadata.json")
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
