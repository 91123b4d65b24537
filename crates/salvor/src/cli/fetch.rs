use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use console::style;
use salvor_fetch::{DownloadEngine, REQUEST_TIMEOUT, ReqwestTransport, USER_AGENT, query_snapshots};

#[derive(Debug, clap::Args)]
pub struct Fetch {
    /// Domain whose archived uploads should be fetched
    #[arg(short, long)]
    pub domain: String,

    /// Directory the restored files are written under
    #[arg(short, long, default_value = "restored")]
    pub output: PathBuf,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Fetch {
    pub async fn run(self) -> anyhow::Result<()> {
        let transport = ReqwestTransport::new(USER_AGENT, REQUEST_TIMEOUT)
            .context("failed to build HTTP client")?;

        let assets = query_snapshots(&transport, &self.domain)
            .await
            .context("archive index query failed")?;
        if assets.is_empty() {
            println!("no archived uploads found for {}", self.domain);
            return Ok(());
        }
        println!(
            "{} archived assets found for {}",
            assets.len(),
            self.domain
        );

        if !self.yes {
            let question = format!("download into {}?", self.output.display());
            if !confirm(&question)? {
                println!("aborted");
                return Ok(());
            }
        }

        let mut engine = DownloadEngine::new(transport, self.domain.as_str(), &self.output);
        let stats = engine.run(&assets).await;
        println!(
            "{} downloaded, {} failed, {} skipped",
            stats.succeeded, stats.failed, stats.skipped
        );
        Ok(())
    }
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} {question} [y/N] ", style("?").cyan());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
