use super::error_chain;
use chrono::{DateTime, Utc};
use csaf_retrieval::{
    loader::CsafLoader,
    retrieve::{DocumentOptions, ResolveOptions, RetrievalError, RetrievedProvider},
};
use csaf_retrieval_common::cli::client::ClientArguments;
use futures::StreamExt;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::pin::pin;

/// Resolve the provider of a domain and retrieve all of its documents.
#[derive(clap::Args, Debug)]
pub struct Provider {
    #[command(flatten)]
    client: ClientArguments,

    /// The domain of the provider
    domain: String,

    /// Only retrieve documents changed since this point in time (RFC 3339)
    #[arg(short, long)]
    since: Option<DateTime<Utc>>,

    /// Continue discovery when the `.well-known` metadata fails validation
    #[arg(long)]
    fall_through: bool,

    /// Number of concurrent requests, per stage
    #[arg(short, long, default_value = "256")]
    channel_capacity: usize,
}

impl Provider {
    pub async fn run(self, progress: Option<MultiProgress>) -> anyhow::Result<()> {
        let loader = CsafLoader::new(self.client.fetcher_options())?;

        let provider = RetrievedProvider::from_domain(
            &self.domain,
            &loader,
            &ResolveOptions::new().fall_through_on_invalid(self.fall_through),
        )
        .await?;

        println!(
            "Found {} ({}) via {}: {}",
            provider.role(),
            provider.metadata.publisher.name,
            provider.data_source,
            provider.url
        );

        let options = DocumentOptions::new()
            .channel_capacity(self.channel_capacity)
            .starting_from(self.since);

        let expected = provider.count_expected_documents(&loader, options).await;
        log::info!("Expecting {expected} documents");

        let bar = match &progress {
            Some(multi) => {
                let bar = multi.add(ProgressBar::new(expected.try_into().unwrap_or(u64::MAX)));
                bar.set_style(
                    ProgressStyle::default_bar().template("{msg} {wide_bar} {pos}/{len} ({eta})")?,
                );
                bar.set_message("Retrieving");
                bar
            }
            None => ProgressBar::hidden(),
        };

        let mut retrieved = 0usize;
        let mut failed = 0usize;

        let mut documents = pin!(provider.fetch_documents(&loader, options));
        while let Some(document) = documents.next().await {
            match document {
                Ok(document) => {
                    bar.inc(1);
                    retrieved += 1;
                    log::debug!("Retrieved {}: {}", document.advisory.unique_id(), document.url);
                }
                Err(err) => {
                    if matches!(err, RetrievalError::Document { .. }) {
                        bar.inc(1);
                    }
                    failed += 1;
                    bar.suspend(|| println!("Failed: {}", error_chain(&err)));
                }
            }
        }

        bar.finish_and_clear();

        println!("{retrieved} documents retrieved, {failed} failures");

        Ok(())
    }
}
