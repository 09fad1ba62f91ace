//! Retrieved corpus items and the fixed topic list

use serde::{Deserialize, Serialize};

/// The topical categories the corpus is organized by, in the fixed order
/// used for fan-out and evidence rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    General,
    Love,
    Career,
    Health,
    Money,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Self::General,
        Self::Love,
        Self::Career,
        Self::Health,
        Self::Money,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Love => "love",
            Self::Career => "career",
            Self::Health => "health",
            Self::Money => "money",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One result from the similarity search collaborator.
///
/// Ephemeral - lives only for the duration of one orchestration call and is
/// discarded after prompt composition.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedItem {
    pub id: String,
    /// Corpus category this item came from
    pub topic: String,
    /// Date tag carried in the corpus metadata
    pub date_tag: String,
    /// The horoscope text itself
    pub text: String,
    /// Cosine distance in [0, 2]; lower is more relevant
    pub distance: f32,
}

impl RetrievedItem {
    pub fn new(
        id: impl Into<String>,
        topic: impl Into<String>,
        text: impl Into<String>,
        distance: f32,
    ) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            date_tag: String::new(),
            text: text.into(),
            distance,
        }
    }

    pub fn with_date_tag(mut self, date_tag: impl Into<String>) -> Self {
        self.date_tag = date_tag.into();
        self
    }

    /// Complement of the cosine distance
    pub fn relevance_score(&self) -> f32 {
        1.0 - self.distance
    }
}

/// A document in the horoscope corpus, as ingested into the search backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub id: String,
    pub sign: String,
    pub topic: String,
    pub date_tag: String,
    pub text: String,
}
