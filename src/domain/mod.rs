//! Domain layer - Core business logic and entities

pub mod almanac;
pub mod cache;
pub mod clock;
pub mod error;
pub mod generation;
pub mod identity;
pub mod insight;
pub mod retrieval;
pub mod translation;
pub mod user;
pub mod zodiac;

pub use almanac::{AlmanacProvider, DailyContext};
pub use cache::{Cache, CacheExt, FingerprintGenerator, FINGERPRINT_NAMESPACE};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::DomainError;
pub use generation::TextGenerator;
pub use identity::RequestIdentity;
pub use insight::{CachedInsight, Insight};
pub use retrieval::{CorpusDocument, RetrievedItem, SearchQuery, Topic, VectorSearch};
pub use translation::Translator;
pub use user::{InMemoryUserRepository, NewUser, User, UserRepository};
pub use zodiac::ZodiacSign;
