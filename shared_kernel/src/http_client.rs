use anyhow::Context;
use lazy_static::lazy_static;
use reqwest::{Response, StatusCode};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;
use thiserror::Error as ThisError;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

lazy_static! {
    static ref CLIENT: ClientWithMiddleware = {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Expected the http client to build");
        ClientBuilder::new(client)
            // Retry failed requests.
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .with(TracingMiddleware::default())
            .build()
    };
}

pub struct HttpClient;

#[derive(ThisError, Debug)]
pub enum HttpClientError {
    #[error("{url} responded with {status}")]
    UnsuccessfulStatus { url: Url, status: StatusCode },
    #[error(transparent)]
    ResponseError(#[from] anyhow::Error),
}

impl HttpClient {
    async fn get(url: Url) -> Result<Response, HttpClientError> {
        let response = CLIENT
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch request from {url}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpClientError::UnsuccessfulStatus { url, status });
        }
        Ok(response)
    }

    pub async fn get_text(url: Url) -> Result<String, HttpClientError> {
        let text = Self::get(url)
            .await?
            .text()
            .await
            .context("Failed to get text response")?;
        Ok(text)
    }
}
