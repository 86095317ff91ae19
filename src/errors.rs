/*!
 * Error types for the xlifftranslate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when calling the translation service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The service rejected the requested target language
    #[error("Invalid target language '{code}': {message}")]
    InvalidLanguage {
        /// Language code sent to the service
        code: String,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The service answered without any translation
    #[error("Translation service returned no translation")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether this failure means the target language code was refused
    pub fn is_invalid_language(&self) -> bool {
        matches!(
            self,
            Self::InvalidLanguage { .. } | Self::ApiError { status_code: 400, .. }
        )
    }
}

/// Errors that can occur while translating a single unit
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The service does not accept the locale's language code
    #[error("{locale} is not a valid locale")]
    InvalidLocale {
        locale: String,
        #[source]
        source: ProviderError,
    },

    /// Any other failure from the provider
    #[error("Provider error: {0}")]
    Service(#[from] ProviderError),

    /// The provider did not answer in time
    #[error("Translation to {locale} timed out after {limit:?}")]
    Timeout {
        locale: String,
        limit: std::time::Duration,
    },
}

/// Errors raised by the XML document model
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Malformed XML
    #[error("XML parse error at byte {position}: {message}")]
    Parse { position: u64, message: String },

    /// A required element is absent
    #[error("Missing <{0}> element")]
    MissingElement(String),

    /// Non UTF-8 content inside a tag
    #[error("Invalid UTF-8 in document: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Errors that can occur when deriving a locale from a file name
#[derive(Error, Debug, PartialEq)]
pub enum LocaleError {
    /// The file name does not follow `name.locale.ext`
    #[error("Unrecognized filename pattern '{0}', expecting something like messages.en.xlf")]
    UnrecognizedFileName(String),
}
