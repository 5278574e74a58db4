use anyhow::Result;
use clap::Parser;
use refactor_audit::cli::{log_level, Cli, Commands};
use refactor_audit::commands::{self, AuditOptions};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(verbose)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Audit {
            original,
            refactored,
            coverage,
            mypy,
            lint,
            docstrings,
            test_inventory,
            tests,
            config,
            format,
            output,
            top,
            exclude,
        } => commands::handle_audit(AuditOptions {
            original,
            refactored,
            coverage,
            mypy,
            lint,
            docstrings,
            test_inventory,
            tests,
            config,
            format: format.into(),
            output,
            top,
            exclude,
        }),
        Commands::Init { force } => commands::init_config(force),
    }
}
