use clap::Parser;
use miette::Result;
use mfm::cli::{Cli, Commands};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Fancy miette handler for rich error reports
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let global = &cli.global;
    match cli.command {
        Commands::Init(args) => mfm::cli::commands::init::run(args),
        Commands::Run(args) => mfm::cli::commands::run::run(args, global),
        Commands::Graph(args) => mfm::cli::commands::graph::run(args, global),
        Commands::Report(args) => mfm::cli::commands::report::run(args),
        Commands::Stage(cmd) => mfm::cli::commands::stage::run(cmd, global),
        Commands::Classify(args) => mfm::cli::commands::classify::run(args, global),
        Commands::Completions(args) => mfm::cli::commands::completions::run(args),
    }
}

/// Logs go to stderr; MFM_LOG takes precedence over -v
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("MFM_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
