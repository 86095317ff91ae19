use async_trait::async_trait;
use log::{debug, error};
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Translator;

/// Opening, closing or self-closing markup tag; placeholder tokens (`<_>`) never match
static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z][\w:.-]*(\s[^<>]*)?/?>").expect("Invalid markup tag regex")
});

/// True when `text` carries real markup the service must preserve
pub fn contains_markup(text: &str) -> bool {
    MARKUP_TAG.is_match(text)
}

/// Google Cloud Translation client (v2 REST API)
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
    /// `auto`, `html` or `text`
    format: String,
    /// Source language; detected by the service when absent
    source_language: Option<String>,
}

/// Translate request body
#[derive(Debug, Serialize)]
pub struct GoogleRequest<'a> {
    q: Vec<&'a str>,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
}

/// Translate response body
#[derive(Debug, Deserialize)]
pub struct GoogleResponse {
    pub data: GoogleResponseData,
}

#[derive(Debug, Deserialize)]
pub struct GoogleResponseData {
    pub translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleTranslation {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: String,
}

impl GoogleTranslate {
    /// Create a new client with default settings
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new_with_config(api_key, endpoint, 30, "auto", None)
    }

    /// Create a new client
    ///
    /// A `timeout_secs` of 0 leaves requests without a client-side timeout.
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
        format: impl Into<String>,
        source_language: Option<String>,
    ) -> Self {
        let mut builder = Client::builder();
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        Self {
            client: builder.build().unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            format: format.into(),
            source_language: source_language.filter(|s| !s.is_empty()),
        }
    }

    fn api_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            "https://translation.googleapis.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/language/translate/v2", base)
    }

    /// Format for one request; `auto` sends `html` only when markup is left after masking
    pub fn format_for<'a>(&'a self, text: &str) -> &'a str {
        match self.format.as_str() {
            "auto" if contains_markup(text) => "html",
            "auto" => "text",
            format => format,
        }
    }

    /// Classify a non-success response
    pub fn error_from_response(
        status: StatusCode,
        body: &str,
        target_language: &str,
    ) -> ProviderError {
        let message = serde_json::from_str::<GoogleErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status {
            StatusCode::BAD_REQUEST => ProviderError::InvalidLanguage {
                code: target_language.to_string(),
                message,
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::AuthenticationError(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            },
        }
    }

    /// Pull the translations out of a response body
    pub fn extract_translations(response: GoogleResponse) -> Result<Vec<String>, ProviderError> {
        let translations: Vec<String> = response
            .data
            .translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect();
        if translations.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(translations)
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let request = GoogleRequest {
            q: vec![text],
            target: target_language,
            format: self.format_for(text),
            source: self.source_language.as_deref(),
        };

        debug!("Google Translate request to {} ({} chars)", target_language, text.len());

        let response = self
            .client
            .post(self.api_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let error = Self::error_from_response(status, &error_text, target_language);
            if !error.is_invalid_language() {
                error!("Google Translate API error ({}): {}", status, error_text);
            }
            return Err(error);
        }

        let google_response = response
            .json::<GoogleResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Self::extract_translations(google_response)
    }

    fn name(&self) -> &str {
        "Google Translate"
    }
}
