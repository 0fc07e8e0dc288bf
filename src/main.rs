use clap::Parser;
use kerfkit::{init_logging, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging()?;

    run(&cli)?;

    Ok(())
}
