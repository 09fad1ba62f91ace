//! Request identity - the birth details a request is keyed on

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// The identity attributes of one insight request.
///
/// Exists only for the duration of a single orchestration call and is never
/// persisted in cleartext; the cache key is a digest derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestIdentity {
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
}

impl RequestIdentity {
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            birth_date,
            birth_time: None,
            birth_place: None,
        }
    }

    pub fn with_birth_time(mut self, time: impl Into<String>) -> Self {
        self.birth_time = Some(time.into());
        self
    }

    pub fn with_birth_place(mut self, place: impl Into<String>) -> Self {
        self.birth_place = Some(place.into());
        self
    }

    /// Validates the identity fields.
    ///
    /// A malformed identity is a fatal input error; the pipeline never runs
    /// on one.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Name must not be empty"));
        }

        if let Some(time) = &self.birth_time {
            if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
                return Err(DomainError::validation(format!(
                    "Birth time '{}' is not in HH:MM format",
                    time
                )));
            }
        }

        Ok(())
    }

    /// Birth date in the canonical `YYYY-MM-DD` form used for fingerprinting
    pub fn birth_date_str(&self) -> String {
        self.birth_date.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birth_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1995, 8, 20).unwrap()
    }

    #[test]
    fn test_valid_identity() {
        let identity = RequestIdentity::new("Priya", birth_date())
            .with_birth_time("06:30")
            .with_birth_place("Mumbai");

        assert!(identity.validate().is_ok());
        assert_eq!(identity.birth_date_str(), "1995-08-20");
    }

    #[test]
    fn test_empty_name_rejected() {
        let identity = RequestIdentity::new("   ", birth_date());
        assert!(matches!(
            identity.validate(),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_malformed_birth_time_rejected() {
        let identity = RequestIdentity::new("Priya", birth_date()).with_birth_time("6.30am");
        assert!(identity.validate().is_err());
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let identity = RequestIdentity::new("Priya", birth_date());
        assert!(identity.validate().is_ok());
    }
}
