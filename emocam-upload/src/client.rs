//! Prediction endpoint HTTP client

use crate::error::{UploadError, UploadResult};
use crate::protocol::{self, Prediction};
use emocam_media::Segment;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

/// Client for the `POST /predict` endpoint.
///
/// One request per segment: a multipart form with a single `file`
/// field carrying the WebM bytes. There is no retry and, unless a
/// timeout was configured, no request deadline.
#[derive(Debug, Clone)]
pub struct PredictClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
}

impl PredictClient {
    /// Create a client for `endpoint`. `timeout` of `None` lets a hung
    /// request stay in flight indefinitely.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> UploadResult<Self> {
        let endpoint =
            reqwest::Url::parse(endpoint).map_err(|e| UploadError::InvalidEndpoint {
                url: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, endpoint })
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    /// Upload one segment and await its prediction.
    pub async fn predict(&self, segment: &Segment) -> UploadResult<Prediction> {
        debug!(
            "uploading segment {} ({} bytes) to {}",
            segment.sequence,
            segment.len(),
            self.endpoint
        );

        let part = Part::bytes(segment.data.to_vec())
            .file_name(segment.file_name())
            .mime_str(segment.content_type())?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        protocol::decode(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparseable_endpoint() {
        let result = PredictClient::new("not a url", None);
        assert!(matches!(result, Err(UploadError::InvalidEndpoint { .. })));
    }

    #[test]
    fn test_accepts_absolute_endpoint() {
        let client = PredictClient::new("http://127.0.0.1:5000/predict", None).unwrap();
        assert_eq!(client.endpoint().path(), "/predict");
    }
}
