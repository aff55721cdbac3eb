use crate::fetcher::{Fetcher, FetcherOptions, RetryOptions};

#[derive(Debug, clap::Parser)]
#[command(next_help_heading = "Client")]
pub struct ClientArguments {
    /// Per-request HTTP timeout, in humantime duration format.
    #[arg(short, long, default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Number of retries on "too many requests" and server errors
    #[arg(short, long, default_value = "3")]
    pub retries: usize,

    /// Delay before the first retry, growing exponentially with each further attempt
    #[arg(long, default_value = "1s")]
    pub retry_delay: humantime::Duration,

    /// Upper bound of the delay between retries
    #[arg(long, default_value = "60s")]
    pub retry_max_delay: humantime::Duration,
}

impl ClientArguments {
    pub fn fetcher_options(&self) -> FetcherOptions {
        FetcherOptions::new().timeout(*self.timeout).retry(
            RetryOptions::new()
                .max_retries(self.retries)
                .base_delay(*self.retry_delay)
                .max_delay(*self.retry_max_delay),
        )
    }

    /// Create a new [`Fetcher`] from arguments.
    pub fn new_fetcher(&self) -> Result<Fetcher, anyhow::Error> {
        Fetcher::new(self.fetcher_options())
    }
}
