//! Cache abstractions: fingerprint derivation and the backing store trait

pub mod key;
pub mod repository;

pub use key::{FingerprintGenerator, FINGERPRINT_NAMESPACE};
pub use repository::{Cache, CacheExt};

#[cfg(test)]
pub use repository::mock::MockCache;
