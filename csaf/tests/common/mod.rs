#![allow(dead_code)]

use async_trait::async_trait;
use csaf_retrieval::loader::CsafLoader;
use csaf_retrieval_common::fetcher::{
    Fetcher, MemoryTransport, RawResponse, RetryOptions, Transport, TransportError,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

pub const WELL_KNOWN: &str = "https://example.com/.well-known/csaf/provider-metadata.json";
pub const PROVIDER_METADATA: &str = include_str!("../data/provider-metadata.json");
pub const FEED: &str = include_str!("../data/feed-tlp-white.json");
pub const AGGREGATOR: &str = include_str!("../data/aggregator.json");

pub fn loader(transport: impl Transport + 'static) -> CsafLoader {
    Fetcher::with_transport(transport, RetryOptions::new().max_retries(0)).into()
}

/// Answers from a [`MemoryTransport`] after a delay, tracking the peak of requests in flight.
#[derive(Clone, Debug)]
pub struct Delayed {
    inner: MemoryTransport,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl Delayed {
    pub fn new(inner: MemoryTransport, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            in_flight: Default::default(),
            peak: Default::default(),
        }
    }

    /// The highest number of requests seen in flight at the same time.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for Delayed {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        let result = self.inner.get(url).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// A minimal TLP:WHITE advisory.
pub fn advisory(id: &str) -> Value {
    json!({
        "document": {
            "category": "csaf_security_advisory",
            "csaf_version": "2.0",
            "title": format!("Advisory {id}"),
            "publisher": {
                "category": "vendor",
                "name": "Example Company",
                "namespace": "https://example.com"
            },
            "tracking": {
                "id": id,
                "current_release_date": "2024-03-01T10:00:00Z",
                "initial_release_date": "2024-03-01T10:00:00Z",
                "status": "final",
                "version": "1"
            },
            "distribution": { "tlp": { "label": "WHITE" } }
        }
    })
}

/// A publisher's metadata, which has no role requirements.
pub fn publisher_metadata(canonical_url: &str) -> Value {
    let mut metadata: Value = serde_json::from_str(PROVIDER_METADATA).unwrap();
    metadata["canonical_url"] = json!(canonical_url);
    metadata["role"] = json!("csaf_publisher");
    metadata
}

/// The documents of the example provider.
///
/// The directory `white` lists two documents, the second one doesn't match its filename. The
/// directory `unreachable` has no index. The ROLIE feed lists a third document.
pub fn provider() -> MemoryTransport {
    MemoryTransport::new()
        .with_text(WELL_KNOWN, PROVIDER_METADATA)
        .with_text(
            "https://example.com/csaf/white/index.txt",
            "2024/esa-2024-0001.json\n2024/wrong-name.json\n",
        )
        .with_text(
            "https://example.com/csaf/white/changes.csv",
            "\"2024/esa-2024-0001.json\",\"2024-03-01T10:00:00Z\"\n\"2024/wrong-name.json\",\"2024-01-01T10:00:00Z\"\n",
        )
        .with_text("https://example.com/csaf/feed-tlp-white.json", FEED)
        .with_json(
            "https://example.com/csaf/white/2024/esa-2024-0001.json",
            &advisory("ESA-2024-0001"),
        )
        .unwrap()
        .with_json(
            "https://example.com/csaf/white/2024/wrong-name.json",
            &advisory("ESA-2024-0002"),
        )
        .unwrap()
        .with_json(
            "https://example.com/csaf/white/2024/esa-2024-0003.json",
            &advisory("ESA-2024-0003"),
        )
        .unwrap()
}
