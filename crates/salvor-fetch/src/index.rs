//! Archive index (CDX) client.
//!
//! One best-effort query against the web archive's index service. There is
//! no retry here; a failure is a fatal startup error for the fetch pipeline.

use futures_util::StreamExt;

use crate::asset::ArchivedAsset;
use crate::error::FetchError;
use crate::http::Transport;

/// Index query for every snapshot under the domain's upload directory.
///
/// `collapse=urlkey` keeps one capture per original URL; `statuscode:200`
/// drops captures of error pages.
pub fn cdx_query_url(domain: &str) -> String {
    format!(
        "https://web.archive.org/cdx/search/cdx?url={domain}/wp-content/uploads/*&output=json&fl=timestamp,original&collapse=urlkey&filter=statuscode:200"
    )
}

/// Query the index service and return the archived assets in service order.
pub async fn query_snapshots<T: Transport>(
    transport: &T,
    domain: &str,
) -> Result<Vec<ArchivedAsset>, FetchError> {
    let url = cdx_query_url(domain);
    let mut response = transport
        .get(&url)
        .await
        .map_err(|e| FetchError::Index(e.to_string()))?;
    if response.status != 200 {
        return Err(FetchError::Index(format!(
            "index service returned HTTP {}",
            response.status
        )));
    }
    let mut raw = Vec::new();
    while let Some(chunk) = response.body.next().await {
        let chunk = chunk.map_err(|e| FetchError::Index(e.to_string()))?;
        raw.extend_from_slice(&chunk);
    }
    parse_index_rows(&raw)
}

/// Parse the CDX JSON row set.
///
/// The response is an array of string arrays; the first row names the
/// columns and each following row is `[timestamp, original]`. Rows with an
/// empty original or an original that yields no site-relative path are
/// dropped. Order is preserved as returned by the service.
pub fn parse_index_rows(raw: &[u8]) -> Result<Vec<ArchivedAsset>, FetchError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<Vec<String>> = serde_json::from_slice(raw)
        .map_err(|e| FetchError::Index(format!("malformed index response: {e}")))?;
    let assets = rows
        .iter()
        .skip(1)
        .filter_map(|row| match row.as_slice() {
            [timestamp, original] if !original.is_empty() => {
                ArchivedAsset::from_index_row(timestamp, original)
            }
            _ => None,
        })
        .collect();
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_url_targets_upload_wildcard() {
        let url = cdx_query_url("example.com");
        assert!(url.starts_with("https://web.archive.org/cdx/search/cdx?"));
        assert!(url.contains("url=example.com/wp-content/uploads/*"));
        assert!(url.contains("output=json"));
    }

    #[test]
    fn parses_rows_in_service_order() {
        let raw = br#"[
            ["timestamp","original"],
            ["20190501120000","http://example.com/wp-content/uploads/b.png"],
            ["20180101000000","http://example.com/wp-content/uploads/a.jpg"]
        ]"#;
        let assets = parse_index_rows(raw).unwrap();
        assert_eq!(assets.len(), 2);
        assert!(assets[0].snapshot_url.ends_with("b.png"));
        assert!(assets[1].snapshot_url.ends_with("a.jpg"));
    }

    #[test]
    fn drops_empty_and_short_rows() {
        let raw = br#"[
            ["timestamp","original"],
            ["20190501120000",""],
            ["20190501120000"],
            ["20190501120000","http://example.com/wp-content/uploads/a.jpg"]
        ]"#;
        let assets = parse_index_rows(raw).unwrap();
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn empty_body_is_no_snapshots() {
        assert!(parse_index_rows(b"").unwrap().is_empty());
        assert!(parse_index_rows(b"[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_an_index_error() {
        let err = parse_index_rows(b"<html>busy</html>").unwrap_err();
        assert!(err.to_string().contains("malformed index response"));
    }
}
