//! HTTP client for the classifier endpoints.

use crate::payload::SmsPayload;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// Upper bound on a single request, connect through response headers.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct SmsClient {
    http: reqwest::Client,
}

impl SmsClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// POST `payload` as JSON to `url`.
    ///
    /// Any response status counts as delivered; the body is never read.
    pub async fn post_sms(
        &self,
        url: &Url,
        payload: &SmsPayload<'_>,
    ) -> Result<StatusCode, reqwest::Error> {
        let response = self.http.post(url.clone()).json(payload).send().await?;
        Ok(response.status())
    }
}

/// What a worker does with a request that failed at the transport level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Drop the error unlogged and carry on with the next iteration.
    #[default]
    Ignore,
}

impl FailurePolicy {
    pub fn absorb<T>(self, result: Result<T, reqwest::Error>) -> Option<T> {
        match self {
            FailurePolicy::Ignore => result.ok(),
        }
    }
}
