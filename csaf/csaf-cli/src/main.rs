#![forbid(unsafe_code)]

mod cmd;

use clap::Parser;
use cmd::{aggregator::Aggregator, cvss::Cvss, document::Document, provider::Provider};
use csaf_retrieval_common::{cli::log::Logging, utils::measure::MeasureTime};
use indicatif::MultiProgress;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(version, about = "CSAF retrieval tool", author, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    logging: Logging,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    Provider(Provider),
    Aggregator(Aggregator),
    Document(Document),
    Cvss(Cvss),
}

impl Command {
    /// If the command shows a progress bar.
    fn progress(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    async fn run(self, progress: Option<MultiProgress>) -> anyhow::Result<()> {
        match self {
            Self::Provider(cmd) => cmd.run(progress).await,
            Self::Aggregator(cmd) => cmd.run().await,
            Self::Document(cmd) => cmd.run().await,
            Self::Cvss(cmd) => cmd.run(),
        }
    }
}

impl Cli {
    async fn run(self) -> anyhow::Result<()> {
        let progress = self.logging.init(
            &["csaf_retrieve", "csaf_retrieval", "csaf_retrieval_cli"],
            self.command.progress(),
        );

        log::debug!("Setup complete, start processing");

        let time = MeasureTime::new();
        self.command.run(progress).await?;
        drop(time);

        Ok(())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = Cli::parse().run().await {
        log::error!("Failed to execute: {err}");
        for (n, cause) in err.chain().enumerate().skip(1) {
            log::info!("  {n}: {cause}");
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
