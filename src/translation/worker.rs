/*!
 * Unit translation worker.
 *
 * Runs the decision policy for one unit and, when needed, the masked round trip
 * through the translation service. Failures are logged and reported as an
 * outcome; they never escape to the file or the run.
 */

use log::{debug, error, warn};
use std::time::Duration;

use crate::errors::{ProviderError, TranslationError};
use crate::providers::Translator;
use crate::xliff::TranslationUnit;

use super::masking::{IgnoreRules, unescape_tokens};
use super::policy::{Decision, DecisionPolicy};
use super::stats::UnitOutcome;

/// Locale a file is being translated into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLocale {
    /// Code written to `xml:lang` (e.g. `en-GB`)
    pub locale: String,
    /// Code sent to the translation service (e.g. `en`)
    pub service_language: String,
}

impl TargetLocale {
    pub fn new(locale: impl Into<String>, service_language: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            service_language: service_language.into(),
        }
    }
}

/// Translates single units
#[derive(Debug)]
pub struct UnitWorker<T: Translator> {
    translator: T,
    policy: DecisionPolicy,
    rules: IgnoreRules,
    /// Per-call timeout; `None` waits as long as the service does
    call_timeout: Option<Duration>,
}

impl<T: Translator> UnitWorker<T> {
    pub fn new(
        translator: T,
        policy: DecisionPolicy,
        rules: IgnoreRules,
        call_timeout: Option<Duration>,
    ) -> Self {
        Self {
            translator,
            policy,
            rules,
            call_timeout: call_timeout.filter(|t| !t.is_zero()),
        }
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Decide on and, if needed, translate one unit in place
    pub async fn process(&self, unit: &mut TranslationUnit, target: &TargetLocale) -> UnitOutcome {
        let table = self.rules.table_for(&unit.source_text);

        match self.policy.decide(unit, &table) {
            Decision::PassThrough(text) => {
                debug!("{}: copying placeholder-only source of '{}'", target.locale, unit.id);
                unit.target_text = text;
                UnitOutcome::PassedThrough
            }
            Decision::Translate { masked } => match self.request(&masked, target).await {
                Ok(translation) => {
                    let unescaped = unescape_tokens(&translation);
                    let restored = table.unmask(&unescaped).trim().to_string();
                    debug!("{}: {} => {}", target.locale, masked, restored);
                    unit.set_translated(restored, &target.locale);
                    UnitOutcome::Translated
                }
                Err(e) => {
                    match &e {
                        TranslationError::InvalidLocale { locale, .. } => {
                            error!("Error: {} is not a valid locale", locale)
                        }
                        other => warn!(
                            "Failed to translate '{}' to {}: {}",
                            unit.id, target.locale, other
                        ),
                    }
                    UnitOutcome::Failed(e)
                }
            },
            Decision::SkipAlreadyTranslated => UnitOutcome::SkippedAlreadyTranslated,
            Decision::SkipKeyLikeSource => {
                debug!("{}: '{}' looks like a key, leaving it alone", target.locale, unit.id);
                UnitOutcome::SkippedKeyLike
            }
            Decision::SkipDifferFlag => UnitOutcome::SkippedDifferFlag,
        }
    }

    /// One call to the service, with the configured timeout and error classification
    async fn request(
        &self,
        masked: &str,
        target: &TargetLocale,
    ) -> Result<String, TranslationError> {
        let call = self.translator.translate(masked, &target.service_language);

        let result = match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| TranslationError::Timeout {
                    locale: target.locale.clone(),
                    limit,
                })?,
            None => call.await,
        };

        match result {
            Ok(translations) => translations
                .into_iter()
                .next()
                .ok_or(TranslationError::Service(ProviderError::EmptyResponse)),
            Err(e) if e.is_invalid_language() => Err(TranslationError::InvalidLocale {
                locale: target.locale.clone(),
                source: e,
            }),
            Err(e) => Err(TranslationError::Service(e)),
        }
    }
}
