use clap::Parser;
use tracing_subscriber::EnvFilter;
use tradebot::cli::{Cli, run};

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tradebot=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tradebot=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    run(cli)
}
