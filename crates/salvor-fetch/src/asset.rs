//! Archived asset model: snapshot URL plus the derived local output path.

use std::path::{Path, PathBuf};

/// One archived copy of a site asset, as resolved from an index row.
///
/// Immutable once constructed; consumed exactly once by the download engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedAsset {
    /// Absolute snapshot URL, `https://web.archive.org/web/<ts>/<original>`.
    pub snapshot_url: String,
    /// Original URL with scheme and host stripped, e.g.
    /// `wp-content/uploads/2019/05/photo.jpg`.
    pub relative_path: PathBuf,
}

impl ArchivedAsset {
    /// Build an asset from one index row. Returns `None` when the original
    /// URL has no usable site-relative path.
    pub fn from_index_row(timestamp: &str, original: &str) -> Option<Self> {
        let relative_path = site_relative_path(original)?;
        Some(Self {
            snapshot_url: format!("https://web.archive.org/web/{timestamp}/{original}"),
            relative_path,
        })
    }

    /// Destination under the output root, mirroring the site layout.
    pub fn local_path(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.relative_path)
    }

    /// Known malformed-URL pattern from the archive service: the target
    /// domain appearing more than once in the snapshot URL.
    pub fn has_repeated_domain(&self, domain: &str) -> bool {
        self.snapshot_url.matches(domain).count() > 1
    }
}

/// Strip scheme and host from a capture URL, leaving the site-relative path.
fn site_relative_path(original: &str) -> Option<PathBuf> {
    let rest = original
        .strip_prefix("https://")
        .or_else(|| original.strip_prefix("http://"))?;
    let (_, path) = rest.split_once('/')?;
    if path.is_empty() {
        return None;
    }
    Some(PathBuf::from(path))
}
