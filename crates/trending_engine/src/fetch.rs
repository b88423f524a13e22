use std::error::Error as _;
use std::time::Duration;

use engine_logging::engine_debug;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::credentials::Login;
use crate::decode::decode_body;
use crate::error::ConfigurationError;
use crate::types::{FailureKind, FetchError, FetchResult};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: concat!("trending/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP access for the resolver and the harvest loop.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Issues a GET and returns the response whatever its status. Only
    /// transport problems are errors; period probing relies on this.
    async fn get(&self, url: &str, login: Option<&Login>) -> Result<FetchResult, FetchError>;

    /// Like [`Fetcher::get`] but a non-2xx status is an error.
    async fn fetch(&self, url: &str, login: Option<&Login>) -> Result<FetchResult, FetchError> {
        let response = self.get(url, login).await?;
        if !response.is_success() {
            return Err(FetchError::new(
                url,
                FailureKind::HttpStatus(response.status),
                format!("server answered {}", response.status),
            ));
        }
        Ok(response)
    }
}

/// One shared `reqwest::Client`, safe to use from concurrent harvests.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, ConfigurationError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| ConfigurationError::HttpClient {
                message: error_chain(&err),
            })?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    fn too_large(&self, url: &str, actual: u64) -> FetchError {
        FetchError::new(
            url,
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn get(&self, url: &str, login: Option<&Login>) -> Result<FetchResult, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(url, FailureKind::InvalidUrl, err.to_string()))?;

        let mut request = self.client.get(parsed);
        if let Some(login) = login {
            request = request.basic_auth(&login.login, Some(&login.password));
        }
        let response = request
            .send()
            .await
            .map_err(|err| map_reqwest_error(url, err))?;

        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        engine_debug!("GET {} -> {} ({:?})", url, status.as_u16(), content_type);

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(url, content_len));
            }
        }

        if status.is_success() {
            if let Some(ct) = content_type.as_deref() {
                if !self.is_content_type_allowed(ct) {
                    return Err(FetchError::new(
                        url,
                        FailureKind::UnsupportedContentType {
                            content_type: ct.to_string(),
                        },
                        "unsupported content type",
                    ));
                }
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| map_reqwest_error(url, err))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(url, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_body(&bytes, content_type.as_deref())
            .map_err(|kind| FetchError::new(url, kind, "response body is not valid text"))?;

        Ok(FetchResult {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            content_type,
            encoding: decoded.encoding_label,
            text: decoded.text,
        })
    }
}

fn map_reqwest_error(url: &str, err: reqwest::Error) -> FetchError {
    let message = error_chain(&err);
    if err.is_timeout() {
        return FetchError::new(url, FailureKind::Timeout, message);
    }
    if err.is_redirect() {
        return FetchError::new(url, FailureKind::RedirectLimitExceeded, message);
    }
    FetchError::new(url, FailureKind::Network, message)
}

/// `reqwest::Error`'s display hides the underlying cause (DNS, refused, TLS);
/// spell the whole chain out.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
