use anyhow::Result;
use clap::Parser;

use kwfreq::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
