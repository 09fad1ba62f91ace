//! HTTP client for a daily Panchang almanac API

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::domain::almanac::{AlmanacProvider, DailyContext};
use crate::domain::DomainError;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Almanac enrichment from an external Panchang API.
///
/// Construction without an API key yields a disabled provider; callers then
/// skip the lookup entirely instead of sending doomed requests.
#[derive(Debug)]
pub struct HttpAlmanac {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    request_timeout: Duration,
}

impl HttpAlmanac {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct PanchangResponse {
    #[serde(default)]
    nakshatra: Option<String>,
    #[serde(default)]
    tithi: Option<String>,
    #[serde(default)]
    yoga: Option<String>,
}

#[async_trait]
impl AlmanacProvider for HttpAlmanac {
    async fn daily_context(&self, date: NaiveDate) -> Result<Option<DailyContext>, DomainError> {
        let Some(api_key) = &self.api_key else {
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/panchang", self.base_url))
            .timeout(self.request_timeout)
            .query(&[("date", date.format("%Y-%m-%d").to_string())])
            .header("x-api-key", api_key)
            .send()
            .await
            .map_err(|e| DomainError::provider("almanac", format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::provider(
                "almanac",
                format!("API returned status {}", status),
            ));
        }

        let parsed: PanchangResponse = response
            .json()
            .await
            .map_err(|e| DomainError::provider("almanac", format!("Invalid response: {}", e)))?;

        let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];

        Ok(Some(DailyContext {
            nakshatra: parsed.nakshatra,
            tithi: parsed.tithi,
            yoga: parsed.yoga,
            weekday: Some(weekday.to_string()),
        }))
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}
