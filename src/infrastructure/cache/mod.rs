//! Cache backend implementations

pub mod in_memory;
pub mod redis;

pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use redis::{RedisCache, RedisCacheConfig};
