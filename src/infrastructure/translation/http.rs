//! HTTP client for an IndicTrans-style translation service

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::translation::Translator;
use crate::domain::DomainError;

const ENGLISH_SOURCE_TAG: &str = "eng_Latn";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The Indic language set the translation backend serves, short code to
/// language tag.
fn default_languages() -> BTreeMap<String, String> {
    [
        ("hi", "hin_Deva"),
        ("bn", "ben_Beng"),
        ("ta", "tam_Taml"),
        ("te", "tel_Telu"),
        ("mr", "mar_Deva"),
        ("gu", "guj_Gujr"),
        ("kn", "kan_Knda"),
        ("ml", "mal_Mlym"),
        ("pa", "pan_Guru"),
        ("or", "ory_Orya"),
        ("as", "asm_Beng"),
        ("ur", "urd_Arab"),
    ]
    .into_iter()
    .map(|(code, tag)| (code.to_string(), tag.to_string()))
    .collect()
}

/// Translation backed by a self-hosted HTTP translation service
#[derive(Debug)]
pub struct HttpTranslator {
    client: reqwest::Client,
    base_url: String,
    languages: BTreeMap<String, String>,
    request_timeout: Duration,
}

impl HttpTranslator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            languages: default_languages(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, DomainError> {
        let target_tag = self.languages.get(&target.to_lowercase()).ok_or_else(|| {
            DomainError::provider(
                "translator",
                format!("Unsupported target language '{}'", target),
            )
        })?;

        let request = TranslateRequest {
            text,
            source_lang: ENGLISH_SOURCE_TAG,
            target_lang: target_tag,
        };

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::provider("translator", format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::provider(
                "translator",
                format!("Service returned status {}", status),
            ));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| DomainError::provider("translator", format!("Invalid response: {}", e)))?;

        Ok(parsed.translated_text)
    }

    fn supported_languages(&self) -> BTreeMap<String, String> {
        self.languages.clone()
    }
}
