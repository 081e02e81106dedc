use clap::Parser;
use tracing_subscriber::EnvFilter;

use ref_reader::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("ref_reader=debug,info")
    } else {
        EnvFilter::new("ref_reader=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Query(args) => {
            cli::query::run(args, cli.format)?;
        }
        cli::Commands::Contigs(args) => {
            cli::contigs::run(args, cli.format)?;
        }
    }

    Ok(())
}
