use env_logger::Builder;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::LevelFilter;
use std::io::Write;

#[derive(Clone, Debug, clap::Args)]
pub struct Logging {
    /// Be quiet. Conflicts with 'verbose'.
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Be more verbose. May be repeated multiple times to increase verbosity.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Add timestamps to the output messages
    #[arg(long, global = true)]
    pub log_timestamps: bool,

    /// Disable progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Provide a RUST_LOG filter, conflicts with --verbose and --quiet
    #[arg(long, global = true, conflicts_with_all(["verbose", "quiet"]), env("RUST_LOG"))]
    pub log: Option<String>,
}

impl Logging {
    /// The global level, and the level for the application's own modules.
    fn levels(&self) -> (LevelFilter, LevelFilter) {
        match (self.quiet, self.verbose) {
            (true, _) => (LevelFilter::Off, LevelFilter::Off),
            (_, 0) => (LevelFilter::Warn, LevelFilter::Warn),
            (_, 1) => (LevelFilter::Warn, LevelFilter::Info),
            (_, 2) => (LevelFilter::Warn, LevelFilter::Debug),
            (_, 3) => (LevelFilter::Info, LevelFilter::Debug),
            (_, 4) => (LevelFilter::Debug, LevelFilter::Debug),
            (_, 5) => (LevelFilter::Debug, LevelFilter::Trace),
            (_, _) => (LevelFilter::Trace, LevelFilter::Trace),
        }
    }

    /// Initialize logging, returning the progress bar container if progress should be shown.
    ///
    /// When a progress bar is active, log output is routed through it, so that log lines don't
    /// tear up the bar.
    pub fn init(self, app_modules: &[&'static str], progress: bool) -> Option<MultiProgress> {
        let mut builder = Builder::new();

        match &self.log {
            Some(log) => {
                builder.parse_filters(log);
            }
            None => {
                if !self.log_timestamps {
                    builder.format(|buf, record| writeln!(buf, "{}", record.args()));
                }

                let (global, app) = self.levels();
                builder.filter_level(global);
                if app != global {
                    builder.filter_module("csaf_retrieval_common", app);
                    for module in app_modules {
                        builder.filter_module(module, app);
                    }
                }
            }
        }

        if self.quiet || self.no_progress || !progress {
            builder.init();
            return None;
        }

        let logger = builder.build();
        let max_level = logger.filter();
        let multi = MultiProgress::new();
        let log = LogWrapper::new(multi.clone(), logger);
        // NOTE: LogWrapper::try_init messes up the log levels
        let _ = log::set_boxed_logger(Box::new(log));
        log::set_max_level(max_level);

        Some(multi)
    }
}
