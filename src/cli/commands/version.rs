use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct VersionArgs {
    /// Show detailed version information
    #[arg(long)]
    pub detailed: bool,
}

pub fn execute(args: VersionArgs) -> Result<()> {
    if args.detailed {
        println!("kwfreq {}", env!("CARGO_PKG_VERSION"));
        println!("Rust Edition: 2024");
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Description: {}", env!("CARGO_PKG_DESCRIPTION"));
    } else {
        println!("kwfreq {}", env!("CARGO_PKG_VERSION"));
    }
    Ok(())
}
