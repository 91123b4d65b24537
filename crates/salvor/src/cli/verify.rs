use std::path::PathBuf;

use anyhow::Context;
use salvor_detect::{report, scan_dir};

#[derive(Debug, clap::Args)]
pub struct Verify {
    /// Directory to scan
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
}

impl Verify {
    pub fn run(self) -> anyhow::Result<()> {
        let scan = scan_dir(&self.dir)
            .with_context(|| format!("cannot scan {}", self.dir.display()))?;
        report::emit(&scan);
        if scan.invalid_count() > 0 {
            std::process::exit(1);
        }
        Ok(())
    }
}
