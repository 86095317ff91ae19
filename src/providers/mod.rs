/*!
 * Translation service clients.
 *
 * - Google: Google Cloud Translation (v2 REST API)
 * - Mock: deterministic in-process translator for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation services
///
/// Implementations translate one text into the target language and return one or
/// more candidate renderings, best first.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` into `target_language`
    ///
    /// # Arguments
    /// * `text` - Masked source text, possibly containing inline markup
    /// * `target_language` - Language code accepted by the service
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - Candidate translations or an error
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;

    /// Human readable service name for logs
    fn name(&self) -> &str;
}

pub mod google;
pub mod mock;
