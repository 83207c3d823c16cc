//! Vitrina CLI: run the portfolio end-to-end suites
//!
//! ## Usage
//!
//! ```bash
//! vitrina run                          # Every suite against BASE_URL
//! vitrina run -s smoke -s blog         # Selected suites
//! vitrina run --marker critical        # Critical cases only
//! vitrina list --marker smoke          # What would run
//! vitrina config --base-url http://... # Resolved configuration
//! ```

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vitrina::LiveDriverFactory;
use vitrina_cli::{
    check_report, list, resolve_suite_config, show_config, Cli, CliConfig, CliResult, Commands,
    LogFormat, SuiteRunner, Verbosity,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    init_tracing(verbosity, cli.log_format);

    match run(cli, verbosity).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, verbosity: Verbosity) -> CliResult<()> {
    let config = CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(cli.color.into());

    match cli.command {
        Commands::Run(args) => {
            let suite_config = resolve_suite_config(&args.settings, |k| std::env::var(k).ok())?;
            let factory = LiveDriverFactory::new();
            let mut runner = SuiteRunner::new(config);
            let report = runner.run(&args, suite_config, &factory).await?;
            check_report(&report)
        }
        Commands::List(args) => {
            print!("{}", list(&args)?);
            Ok(())
        }
        Commands::Config(args) => {
            println!("{}", show_config(&args, |k| std::env::var(k).ok())?.trim_end());
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise the level follows `-v`/`-q`
fn init_tracing(verbosity: Verbosity, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("warning: logging unavailable: {e}");
    }
}
