use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;

use crate::backend::ChatBackend;
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_MODEL_LIST_PAGES, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};
use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, Model, ModelInfo, ModelListParams,
    ModelListResponse,
};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const MODEL_LIST_PAGE_SIZE: u32 = 100;

/// Environment variable consulted when no API key is passed explicitly.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Client for the Gemini API.
#[derive(Clone)]
pub struct Gemini {
    api_key: HeaderValue,
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The API key can be provided directly or read from the GEMINI_API_KEY
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                Error::remote_init(format!(
                    "API key not provided and {API_KEY_ENV} environment variable not set"
                ))
            })?,
        };
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::remote_init("API key is empty"));
        }
        let mut api_key = HeaderValue::from_str(api_key)
            .map_err(|_| Error::remote_init("API key contains characters not valid in a header"))?;
        api_key.set_sensitive(true);

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::remote_init(format!("Failed to build HTTP client: {}", e)))?;

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that sees every request, response and error.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", self.api_key.clone());
        headers
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        // Google wraps errors as {"error": {"code": 400, "message": "...", "status": "..."}}
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error);
        let status = detail.as_ref().and_then(|d| d.status.clone());
        let message = detail
            .and_then(|d| d.message)
            .unwrap_or_else(|| error_body.clone());

        match status_code {
            401 | 403 => Error::authentication(message),
            408 => Error::timeout(message, None),
            _ => Error::api(status_code, status, message),
        }
    }

    /// Answer a conversation with `models/{model}:generateContent`.
    pub async fn generate_content(
        &self,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}{}:generateContent", self.base_url, model.resource_name());
        if let Some(logger) = &self.logger {
            logger.log_request(model, &request);
        }

        let result = self
            .timed(async {
                let response = self
                    .client
                    .post(&url)
                    .headers(self.default_headers())
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| self.map_send_error(e))?;

                if !response.status().is_success() {
                    return Err(Self::process_error_response(response).await);
                }

                response
                    .json::<GenerateContentResponse>()
                    .await
                    .map_err(|e| {
                        Error::serialization(
                            format!("Failed to parse response: {}", e),
                            Some(Box::new(e)),
                        )
                    })
            })
            .await;

        match &result {
            Ok(response) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(model, response);
                }
            }
            Err(err) => self.log_error("generateContent", err),
        }
        result
    }

    /// Fetch one page of the model catalog.
    pub async fn list_models_page(&self, params: &ModelListParams) -> Result<ModelListResponse> {
        let url = format!("{}models", self.base_url);

        let result = self
            .timed(async {
                let response = self
                    .client
                    .get(&url)
                    .headers(self.default_headers())
                    .query(&params.to_query())
                    .send()
                    .await
                    .map_err(|e| self.map_send_error(e))?;

                if !response.status().is_success() {
                    return Err(Self::process_error_response(response).await);
                }

                response.json::<ModelListResponse>().await.map_err(|e| {
                    Error::serialization(
                        format!("Failed to parse model list: {}", e),
                        Some(Box::new(e)),
                    )
                })
            })
            .await;

        match &result {
            Ok(page) => {
                CLIENT_MODEL_LIST_PAGES.click();
                if let Some(logger) = &self.logger {
                    logger.log_model_page(page);
                }
            }
            Err(err) => self.log_error("models.list", err),
        }
        result
    }

    /// Fetch the whole model catalog, following page tokens.
    pub async fn list_all_models(&self) -> Result<Vec<ModelInfo>> {
        let mut models = Vec::new();
        let mut params = ModelListParams::new().with_page_size(MODEL_LIST_PAGE_SIZE);
        loop {
            let page = self.list_models_page(&params).await?;
            let has_more = page.has_more();
            let next = page.next_page_token;
            models.extend(page.models);
            match next {
                Some(token) if has_more => params = params.with_page_token(token),
                _ => return Ok(models),
            }
        }
    }

    async fn timed<T>(&self, request: impl Future<Output = Result<T>>) -> Result<T> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = request.await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            CLIENT_REQUEST_ERRORS.click();
        }
        result
    }

    fn log_error(&self, operation: &str, err: &Error) {
        if let Some(logger) = &self.logger {
            logger.log_error(operation, err);
        }
    }
}

#[async_trait::async_trait]
impl ChatBackend for Gemini {
    async fn generate(&self, model: &Model, contents: Vec<Content>) -> Result<String> {
        let response = self
            .generate_content(model, GenerateContentRequest::new(contents))
            .await?;
        response.text().ok_or_else(|| {
            Error::api(200, None, response.missing_text_reason())
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.list_all_models().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        assert_eq!(client.base_url, DEFAULT_API_URL);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
        assert!(client.api_key.is_sensitive());

        let client = Gemini::with_options(
            Some("test-key".to_string()),
            Some("http://localhost:8080/v1beta".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:8080/v1beta/");
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_bad_keys() {
        let err = Gemini::new(Some("   ".to_string())).unwrap_err();
        assert!(err.is_remote_init());
        let err = Gemini::new(Some("bad\nkey".to_string())).unwrap_err();
        assert!(err.is_remote_init());
    }

    #[test]
    fn test_debug_hides_key() {
        let client = Gemini::new(Some("secret-key".to_string())).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let client = Gemini::with_options(
            Some("test-key".to_string()),
            Some("http://127.0.0.1:9/".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        let err = client
            .generate(&Model::default(), vec![Content::user("hello")])
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::Connection { .. } | Error::HttpClient { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    #[ignore] // Ignore by default as this requires a real API key
    async fn test_generate_live() {
        let api_key = env::var(API_KEY_ENV).ok();
        if api_key.is_none() {
            println!("Skipping test_generate_live: {API_KEY_ENV} not set");
            return;
        }
        let client = Gemini::new(api_key).unwrap();
        let reply = client
            .generate(
                &Model::default(),
                vec![Content::user("Reply with the single word: pong")],
            )
            .await
            .unwrap();
        assert!(!reply.is_empty());
    }
}
