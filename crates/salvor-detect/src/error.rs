use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
