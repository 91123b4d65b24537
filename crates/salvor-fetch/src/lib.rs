//! Sequential archive-snapshot downloading with retry, rate-limit honoring
//! and human-like pacing.
//!
//! # Architecture
//!
//! - [`index`] - one-shot archive index (CDX) query
//! - [`asset`] - snapshot URL and output path derivation
//! - [`retry`] - pure retry decisions (policy, verdicts, backoff)
//! - [`pacing`] - inter-download pacing and failure-streak throttling
//! - [`download`] - the sequential engine tying the above together
//! - [`http`] - transport abstraction (reqwest behind a trait)
//!
//! The engine is strictly sequential: one request in flight, pacing by
//! sleeping between operations. Everything time- or network-shaped is
//! injectable (policy durations, transport trait), so the retry contract is
//! testable without real I/O.

pub mod asset;
pub mod download;
pub mod error;
pub mod http;
pub mod index;
pub mod pacing;
pub mod retry;

pub use asset::ArchivedAsset;
pub use download::{DownloadEngine, DownloadOutcome, DownloadStats, REQUEST_TIMEOUT, USER_AGENT};
pub use error::{FetchError, TransportError};
pub use http::{BodyStream, BoxStream, ReqwestTransport, Response, Transport};
pub use index::{cdx_query_url, parse_index_rows, query_snapshots};
pub use pacing::{Pacer, PacerConfig};
pub use retry::{RetryPolicy, Verdict, backoff_delay, classify_status};
