//! Browser fetch transport for the answer endpoint.

use async_trait::async_trait;
use gloo_net::http::Request;
use site_chat_client::{parse_answer, AnswerResponse, AskRequest, ClientError, Transport};

#[derive(Debug, Clone)]
pub struct FetchTransport {
    endpoint: String,
}

impl FetchTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

fn http_error(e: gloo_net::Error) -> ClientError {
    ClientError::Http(e.to_string())
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn ask(&self, request: &AskRequest) -> Result<AnswerResponse, ClientError> {
        // `json` sets Content-Type: application/json.
        let response = Request::post(&self.endpoint)
            .json(request)
            .map_err(http_error)?
            .send()
            .await
            .map_err(http_error)?;
        tracing::debug!(status = response.status(), endpoint = %self.endpoint, "answer received");
        let body = response.text().await.map_err(http_error)?;
        parse_answer(&body)
    }
}
