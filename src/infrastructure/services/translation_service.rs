//! Language gate for insight delivery

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::domain::insight::Insight;
use crate::domain::translation::Translator;

const ENGLISH: &str = "en";

/// Decides whether and how an insight gets translated.
///
/// Delivery language is best-effort: any reason the requested language cannot
/// be served (no translator configured, unsupported code, backend failure)
/// silently downgrades to English rather than failing the request.
#[derive(Debug)]
pub struct TranslationService {
    translator: Option<Arc<dyn Translator>>,
    call_timeout: Duration,
}

impl TranslationService {
    pub fn new(translator: Option<Arc<dyn Translator>>, call_timeout: Duration) -> Self {
        Self {
            translator,
            call_timeout,
        }
    }

    pub fn supported_languages(&self) -> BTreeMap<String, String> {
        self.translator
            .as_ref()
            .map(|t| t.supported_languages())
            .unwrap_or_default()
    }

    /// Applies the language gate to a freshly synthesized English insight
    pub async fn maybe_translate(&self, insight: Insight, requested: Option<&str>) -> Insight {
        let target = match requested.map(str::trim).filter(|r| !r.is_empty()) {
            Some(target) => target.to_lowercase(),
            None => return insight,
        };

        if target == ENGLISH {
            return insight;
        }

        let Some(translator) = self.translator.as_ref() else {
            warn!(
                requested = %target,
                "No translator configured, delivering in English"
            );
            return Insight {
                language: ENGLISH.to_string(),
                ..insight
            };
        };

        if !translator.supports(&target) {
            warn!(
                requested = %target,
                "Requested language unsupported, delivering in English"
            );
            return Insight {
                language: ENGLISH.to_string(),
                ..insight
            };
        }

        match timeout(
            self.call_timeout,
            translator.translate(&insight.insight, &target),
        )
        .await
        {
            Ok(Ok(translated)) => Insight {
                insight: translated,
                language: target,
                ..insight
            },
            Ok(Err(e)) => {
                warn!(
                    requested = %target,
                    error = %e,
                    "Translation failed, delivering in English"
                );
                Insight {
                    language: ENGLISH.to_string(),
                    ..insight
                }
            }
            Err(_) => {
                warn!(
                    requested = %target,
                    timeout_secs = self.call_timeout.as_secs(),
                    "Translation timed out, delivering in English"
                );
                Insight {
                    language: ENGLISH.to_string(),
                    ..insight
                }
            }
        }
    }
}
