//! URI shape checks and UUID extraction for upstream resource URLs.
//!
//! Failing fast on a malformed URI beats issuing a doomed HTTP call; these
//! errors are defect signals, not transient failures.

use url::Url;
use uuid::Uuid;

use crate::error::ProcessError;

/// Last non-empty path segment parsed as a UUID.
pub fn uuid_tail(url: &Url) -> Result<Uuid, ProcessError> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .and_then(|segment| Uuid::parse_str(segment).ok())
        .ok_or_else(|| ProcessError::Context(format!("no UUID in resource URL '{url}'")))
}

/// Reject a URL that does not address the expected API collection.
pub fn expect_collection(url: &Url, collection: &str) -> Result<(), ProcessError> {
    let matches = url
        .path_segments()
        .is_some_and(|mut segments| segments.any(|segment| segment == collection));
    if matches {
        Ok(())
    } else {
        Err(ProcessError::Context(format!(
            "URL '{url}' does not address the '{collection}' collection"
        )))
    }
}

/// Join a path and optional query onto a register base URL.
pub fn service_url(base: &Url, path: &str, query: Option<&str>) -> Result<Url, ProcessError> {
    let mut url = base.join(path).map_err(|e| {
        ProcessError::Context(format!(
            "cannot build service URL from '{base}' and '{path}': {e}"
        ))
    })?;
    url.set_query(query);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_tail_reads_last_segment() {
        let url = Url::parse(
            "https://openzaak.example.com/zaken/api/v1/zaken/91e49bc4-9024-4c1f-9a29-e5d7bd6d2a5a",
        )
        .expect("invalid test URL");
        assert_eq!(
            uuid_tail(&url).expect("should parse").to_string(),
            "91e49bc4-9024-4c1f-9a29-e5d7bd6d2a5a"
        );
    }

    #[test]
    fn uuid_tail_tolerates_trailing_slash() {
        let url = Url::parse(
            "https://openzaak.example.com/zaken/api/v1/zaken/91e49bc4-9024-4c1f-9a29-e5d7bd6d2a5a/",
        )
        .expect("invalid test URL");
        assert!(uuid_tail(&url).is_ok());
    }

    #[test]
    fn uuid_tail_rejects_non_uuid() {
        let url = Url::parse("https://openzaak.example.com/zaken/api/v1/zaken").expect("invalid test URL");
        assert!(uuid_tail(&url).is_err());
    }

    #[test]
    fn collection_check_fails_fast() {
        let url = Url::parse(
            "https://openzaak.example.com/catalogi/api/v1/statustypen/6f25b4b5-6b3f-4b8a-9d1f-6c9d0a3c2e10",
        )
        .expect("invalid test URL");
        assert!(expect_collection(&url, "statustypen").is_ok());
        assert!(expect_collection(&url, "zaken").is_err());
    }
}
