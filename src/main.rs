mod app;

use anyhow::Result;
use app::{Cli, run_cli};
use clap::Parser;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    run_cli(&config)
}
