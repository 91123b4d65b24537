mod fetch;
mod verify;

pub use fetch::Fetch;
pub use verify::Verify;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "salvor")]
#[command(about = "Salvage a site's media from a web archive and verify the result")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download archived copies of a site's uploaded media
    Fetch(Fetch),
    /// Check files on disk against known binary signatures
    Verify(Verify),
}
