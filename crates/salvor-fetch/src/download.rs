//! Sequential download engine for archived assets.
//!
//! One asset at a time: check the skip rules, run the attempt loop against
//! the transport, stage the body to disk, then let the pacer decide how long
//! to wait before the next asset. Console lines are the primary user-facing
//! surface; `tracing` events carry the diagnostics.

use std::path::{Path, PathBuf};
use std::time::Duration;

use console::style;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::asset::ArchivedAsset;
use crate::error::FetchError;
use crate::http::{BodyStream, Transport};
use crate::pacing::{Pacer, PacerConfig};
use crate::retry::{RetryPolicy, Verdict, backoff_delay, classify_status};

/// Fixed browser-like User-Agent sent with every snapshot request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Per-request socket timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tri-state result of one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Destination already on disk, or the snapshot URL failed the
    /// malformed-URL heuristic. No network call was made and no pacing
    /// delay follows.
    Skipped,
    Succeeded,
    /// Every attempt failed; the asset is abandoned and the loop moves on.
    FailedExhausted,
}

/// Running totals for one engine run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStats {
    pub succeeded: u64,
    pub failed: u64,
    pub skipped: u64,
}

pub struct DownloadEngine<T: Transport> {
    transport: T,
    domain: String,
    output_root: PathBuf,
    policy: RetryPolicy,
    pacer: Pacer,
    stats: DownloadStats,
}

impl<T: Transport> DownloadEngine<T> {
    pub fn new(transport: T, domain: impl Into<String>, output_root: impl Into<PathBuf>) -> Self {
        Self::with_config(
            transport,
            domain,
            output_root,
            RetryPolicy::default(),
            PacerConfig::default(),
        )
    }

    pub fn with_config(
        transport: T,
        domain: impl Into<String>,
        output_root: impl Into<PathBuf>,
        policy: RetryPolicy,
        pacing: PacerConfig,
    ) -> Self {
        Self {
            transport,
            domain: domain.into(),
            output_root: output_root.into(),
            policy,
            pacer: Pacer::new(pacing),
            stats: DownloadStats::default(),
        }
    }

    pub fn stats(&self) -> DownloadStats {
        self.stats
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// Give the transport back, for callers that want to inspect it after
    /// the run.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Run the full fetch pipeline over `assets`, in order.
    pub async fn run(&mut self, assets: &[ArchivedAsset]) -> DownloadStats {
        for asset in assets {
            let outcome = self.download_one(asset).await;
            if outcome == DownloadOutcome::Skipped {
                continue;
            }
            if outcome == DownloadOutcome::FailedExhausted {
                if let Some(cooldown) = self.pacer.cooldown_due() {
                    println!(
                        "{} too many consecutive failures, cooling down for {}s",
                        style("⚠").yellow(),
                        cooldown.as_secs()
                    );
                    tokio::time::sleep(cooldown).await;
                }
            }
            let pause = self
                .pacer
                .pause_after(outcome == DownloadOutcome::Succeeded);
            tokio::time::sleep(pause).await;
        }
        self.stats
    }

    /// Fetch one asset and return its outcome.
    pub async fn download_one(&mut self, asset: &ArchivedAsset) -> DownloadOutcome {
        let dest = asset.local_path(&self.output_root);
        if dest.exists() {
            debug!(path = %dest.display(), "already on disk, skipping");
            self.stats.skipped += 1;
            return DownloadOutcome::Skipped;
        }
        if asset.has_repeated_domain(&self.domain) {
            warn!(url = %asset.snapshot_url, "malformed snapshot URL, skipping");
            self.stats.skipped += 1;
            return DownloadOutcome::Skipped;
        }

        let mut failures = 0u32;
        for attempt in 1..=self.policy.max_retries {
            match self.attempt(asset, &dest).await {
                Verdict::Success => {
                    self.pacer.record_success();
                    self.stats.succeeded += 1;
                    println!(
                        "{} {}",
                        style("✔").green(),
                        asset.relative_path.display()
                    );
                    return DownloadOutcome::Succeeded;
                }
                Verdict::RateLimited(wait) => {
                    println!(
                        "{} rate limited, waiting {}s",
                        style("⚠").yellow(),
                        wait.as_secs()
                    );
                    debug!(url = %asset.snapshot_url, attempt, wait_secs = wait.as_secs(), "rate limited");
                    tokio::time::sleep(wait).await;
                }
                Verdict::Transient(reason) => {
                    failures += 1;
                    let delay = backoff_delay(failures, &self.policy);
                    debug!(
                        url = %asset.snapshot_url,
                        attempt,
                        %reason,
                        delay_ms = delay.as_millis() as u64,
                        "attempt failed"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        self.pacer.record_failure();
        self.stats.failed += 1;
        println!(
            "{} {} (gave up after {} attempts)",
            style("✘").red(),
            asset.relative_path.display(),
            self.policy.max_retries
        );
        DownloadOutcome::FailedExhausted
    }

    /// One network attempt: GET the snapshot and stage the body to disk.
    async fn attempt(&self, asset: &ArchivedAsset, dest: &Path) -> Verdict {
        let response = match self.transport.get(&asset.snapshot_url).await {
            Ok(response) => response,
            Err(e) => return Verdict::Transient(e.to_string()),
        };
        match classify_status(response.status, response.retry_after, &self.policy) {
            Verdict::Success => match write_staged(response.body, dest).await {
                Ok(()) => Verdict::Success,
                Err(e) => Verdict::Transient(e.to_string()),
            },
            other => other,
        }
    }
}

/// Stream a response body to `<dest>.part`, then rename into place so the
/// destination only ever appears complete. A failed stream removes the
/// partial file.
async fn write_staged(mut body: BodyStream, dest: &Path) -> Result<(), FetchError> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| FetchError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    let staged = staged_path(dest);
    let result = write_body(&mut body, &staged).await;
    match result {
        Ok(()) => tokio::fs::rename(&staged, dest)
            .await
            .map_err(|source| FetchError::Io {
                path: dest.to_path_buf(),
                source,
            }),
        Err(e) => {
            let _ = tokio::fs::remove_file(&staged).await;
            Err(e)
        }
    }
}

async fn write_body(body: &mut BodyStream, staged: &Path) -> Result<(), FetchError> {
    let io_err = |source| FetchError::Io {
        path: staged.to_path_buf(),
        source,
    };
    let mut file = tokio::fs::File::create(staged).await.map_err(io_err)?;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| FetchError::Io {
            path: staged.to_path_buf(),
            source: std::io::Error::other(e.to_string()),
        })?;
        file.write_all(&chunk).await.map_err(io_err)?;
    }
    file.flush().await.map_err(io_err)?;
    Ok(())
}

fn staged_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}
