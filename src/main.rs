use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod parsing;
mod qc;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("asm_qc=debug,info")
    } else {
        EnvFilter::new("asm_qc=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Evaluate(args) => {
            cli::evaluate::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::ExtractCds(args) => {
            cli::extract_cds::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
