//! Translation collaborator trait

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Machine translation backend for non-English insight delivery.
///
/// Source language is always English; targets are identified by short codes
/// mapped to the backend's full language tags.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translates English text into the target language
    async fn translate(&self, text: &str, target: &str) -> Result<String, DomainError>;

    /// Short code to full language tag, e.g. "hi" -> "hin_Deva"
    fn supported_languages(&self) -> BTreeMap<String, String>;

    fn supports(&self, code: &str) -> bool {
        self.supported_languages().contains_key(&code.to_lowercase())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock translator wrapping text in a language marker
    #[derive(Debug)]
    pub struct MockTranslator {
        languages: BTreeMap<String, String>,
        error: Mutex<Option<String>>,
        delay: Mutex<Option<Duration>>,
        call_count: AtomicUsize,
    }

    impl Default for MockTranslator {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockTranslator {
        pub fn new() -> Self {
            let mut languages = BTreeMap::new();
            languages.insert("hi".to_string(), "hin_Deva".to_string());
            languages.insert("ta".to_string(), "tam_Taml".to_string());

            Self {
                languages,
                error: Mutex::new(None),
                delay: Mutex::new(None),
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn with_delay(self, delay: Duration) -> Self {
            *self.delay.lock().unwrap() = Some(delay);
            self
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn translate(&self, text: &str, target: &str) -> Result<String, DomainError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::provider("mock-translator", error));
            }

            Ok(format!("[{}] {}", target, text))
        }

        fn supported_languages(&self) -> BTreeMap<String, String> {
            self.languages.clone()
        }
    }
}
