//! Answer endpoint client: one JSON POST per question, one JSON body back.

use async_trait::async_trait;
use thiserror::Error;

use crate::messages::{AnswerResponse, AskRequest};

/// Client error. Every variant ends up as the same bot error message; the
/// distinction only matters for logs and the terminal front end.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request failed: {0}")]
    Http(String),

    #[error("response is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unusable response: {0}")]
    EmptyResponse(String),
}

/// Parse a raw response body into an answer.
pub fn parse_answer(body: &str) -> Result<AnswerResponse, ClientError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    AnswerResponse::from_json(&value).map_err(ClientError::EmptyResponse)
}

/// Something that can carry one question to the answer endpoint.
///
/// Futures are not required to be `Send`, so the browser fetch transport can
/// implement this as well.
#[async_trait(?Send)]
pub trait Transport {
    async fn ask(&self, request: &AskRequest) -> Result<AnswerResponse, ClientError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::HttpTransport;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{parse_answer, ClientError, Transport};
    use crate::messages::{AnswerResponse, AskRequest, HealthStatus};
    use async_trait::async_trait;
    use url::Url;

    impl From<reqwest::Error> for ClientError {
        fn from(e: reqwest::Error) -> Self {
            ClientError::Http(e.to_string())
        }
    }

    /// reqwest-backed transport. No timeout beyond reqwest's defaults, no retries.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        endpoint: Url,
        http: reqwest::Client,
    }

    impl HttpTransport {
        pub fn new(endpoint: &str) -> Result<Self, ClientError> {
            Self::with_client(endpoint, reqwest::Client::new())
        }

        pub fn with_client(endpoint: &str, http: reqwest::Client) -> Result<Self, ClientError> {
            let endpoint = Url::parse(endpoint).map_err(|source| ClientError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                source,
            })?;
            Ok(Self { endpoint, http })
        }

        pub fn endpoint(&self) -> &Url {
            &self.endpoint
        }

        /// Query the answer service's `/healthz` on the endpoint's origin.
        pub async fn health(&self) -> Result<HealthStatus, ClientError> {
            let url = self
                .endpoint
                .join("/healthz")
                .map_err(|source| ClientError::InvalidEndpoint {
                    endpoint: self.endpoint.to_string(),
                    source,
                })?;
            tracing::debug!(%url, "health check");
            let body = self.http.get(url).send().await?.text().await?;
            Ok(serde_json::from_str(&body)?)
        }
    }

    #[async_trait(?Send)]
    impl Transport for HttpTransport {
        async fn ask(&self, request: &AskRequest) -> Result<AnswerResponse, ClientError> {
            let response = self
                .http
                .post(self.endpoint.clone())
                .json(request)
                .send()
                .await?;
            // Status is not inspected: an error document is still a JSON body.
            tracing::debug!(status = %response.status(), endpoint = %self.endpoint, "answer received");
            let body = response.text().await?;
            parse_answer(&body)
        }
    }
}
