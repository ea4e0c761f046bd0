//! DataCard CLI - statistical reports for tabular records.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            file,
            output,
            schema,
            outlier_method,
            outlier_threshold,
            top_n,
            no_correlations,
            no_distributions,
            pretty,
        } => commands::analyze::run(
            commands::analyze::AnalyzeArgs {
                file,
                output,
                schema,
                outlier_method,
                outlier_threshold,
                top_n,
                no_correlations,
                no_distributions,
                pretty,
            },
            cli.verbose,
        ),

        Commands::Schema { file } => commands::schema::run(file, cli.verbose),

        Commands::Serve { port } => commands::serve::run(port, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
