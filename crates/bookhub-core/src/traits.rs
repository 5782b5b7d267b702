use crate::error::BookhubError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Body and status of a fetched resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(path: &str, body: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BookhubError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Turn a non-success response into [`BookhubError::Status`].
    pub fn error_for_status(self) -> Result<Self, BookhubError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BookhubError::Status {
                path: self.path,
                status: self.status,
            })
        }
    }
}

/// Where static site resources come from.
///
/// A non-success status is reported as `Ok(Response)`; only transport
/// failures are errors, so callers can tell "not found" from "unreachable".
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;

    /// Fetch a resource by its site-relative path, e.g. `languages/ar.json`.
    async fn fetch(&self, path: &str) -> Result<Response, BookhubError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_for_status() {
        let resp = Response {
            path: "languages/xx.json".into(),
            status: 404,
            body: String::new(),
        };
        assert!(!resp.is_success());
        match resp.error_for_status() {
            Err(BookhubError::Status { path, status }) => {
                assert_eq!(path, "languages/xx.json");
                assert_eq!(status, 404);
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert!(Response::ok("a", "{}").error_for_status().is_ok());
    }
}
