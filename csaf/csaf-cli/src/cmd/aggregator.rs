use super::error_chain;
use csaf_retrieval::{
    loader::CsafLoader,
    retrieve::{DocumentOptions, RetrievedAggregator},
};
use csaf_retrieval_common::cli::client::ClientArguments;
use url::Url;

/// Load an aggregator, and the metadata of all providers and publishers it lists.
#[derive(clap::Args, Debug)]
pub struct Aggregator {
    #[command(flatten)]
    client: ClientArguments,

    /// The URL of the `aggregator.json`, or a domain to look up its well-known location
    source: String,

    /// Number of concurrent requests
    #[arg(short, long, default_value = "256")]
    channel_capacity: usize,
}

impl Aggregator {
    pub async fn run(self) -> anyhow::Result<()> {
        let loader = CsafLoader::new(self.client.fetcher_options())?;

        let aggregator = match Url::parse(&self.source) {
            Ok(url) => RetrievedAggregator::from_url(url, &loader).await?,
            Err(_) => RetrievedAggregator::from_domain(&self.source, &loader).await?,
        };

        println!(
            "{} ({}): {}",
            aggregator.role(),
            aggregator.metadata.aggregator.name,
            aggregator.url
        );

        let options = DocumentOptions::new().channel_capacity(self.channel_capacity);
        for result in aggregator.fetch_all(&loader, options).await {
            match result {
                Ok(provider) => println!(
                    "  OK   {} ({}): {}",
                    provider.role(),
                    provider.metadata.publisher.name,
                    provider.url
                ),
                Err(err) => println!("  FAIL {}", error_chain(&err)),
            }
        }

        Ok(())
    }
}
