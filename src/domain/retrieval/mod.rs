//! Similarity retrieval over the horoscope corpus

pub mod item;
pub mod provider;

pub use item::{CorpusDocument, RetrievedItem, Topic};
pub use provider::{SearchQuery, VectorSearch};

#[cfg(test)]
pub use provider::mock::MockVectorSearch;
