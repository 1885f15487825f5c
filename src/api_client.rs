use crate::{
    args::Args,
    invitation::InvitationRequest,
    retry::{parse_retry_after, RetryPolicy},
};
use anyhow::Result;
use reqwest::{
    blocking::{Client, Response},
    header, StatusCode,
};
use serde_json::Value;
use std::{thread, time::Duration};

const API_KEY_HEADER: header::HeaderName = header::HeaderName::from_static("x-api-key");
const INVITATIONS_PATH: &str = "api/invitations";
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    UnexpectedStatus {
        status: StatusCode,
        body: String,
        retry_after: Option<Duration>,
    },
    #[error("invalid response body: {0}")]
    Decode(reqwest::Error),
}

impl ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            ApiError::Request(e) => e.is_connect(),
            ApiError::UnexpectedStatus { status, .. } => RetryPolicy::is_retryable_status(*status),
            ApiError::Decode(_) => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::UnexpectedStatus { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Anything able to create one invitation.
pub trait InvitationApi {
    fn create_invitation(&self, request: &InvitationRequest) -> Result<Value, ApiError>;
}

#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(args: &Args) -> Result<Self> {
        Self::from_parts(
            &args.base_url,
            &Args::parse_secret(&args.api_key)?,
            Duration::from_secs(args.timeout),
            RetryPolicy::new(args.max_retries),
        )
    }

    pub fn from_parts(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        Ok(Self {
            client: ApiClient::build_client(api_key, timeout)?,
            base_url: normalize_base_url(base_url),
            retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post_once(&self, request: &InvitationRequest) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, INVITATIONS_PATH))
            .json(request)
            .send()?;

        let status = response.status();
        if status.is_success() {
            return response.json::<Value>().map_err(ApiError::Decode);
        }

        Err(ApiClient::status_error(status, response))
    }

    fn status_error(status: StatusCode, response: Response) -> ApiError {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);

        let mut body = response.text().unwrap_or_default().trim().to_string();
        if let Some((cut, _)) = body.char_indices().nth(MAX_ERROR_BODY) {
            body.truncate(cut);
            body.push_str("...");
        }

        ApiError::UnexpectedStatus {
            status,
            body,
            retry_after,
        }
    }

    fn build_client(api_key: &str, timeout: Duration) -> Result<Client> {
        let mut headers = header::HeaderMap::new();
        let mut key_value = header::HeaderValue::from_str(api_key)?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(Into::into)
    }
}

impl InvitationApi for ApiClient {
    fn create_invitation(&self, request: &InvitationRequest) -> Result<Value, ApiError> {
        let mut attempt = 0;

        loop {
            log::debug!("POST {}/{} (attempt {})", self.base_url, INVITATIONS_PATH, attempt + 1);

            match self.post_once(request) {
                Err(e) if attempt < self.retry.max_retries && e.is_retryable() => {
                    let delay = self.retry.delay_for(attempt, e.retry_after());
                    log::warn!("{e}, retrying in {delay:?}");
                    thread::sleep(delay);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// Adds `https://` when no scheme is given and drops trailing slashes.
pub fn normalize_base_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
