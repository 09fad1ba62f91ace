//! Infrastructure layer - External service implementations

pub mod almanac;
pub mod cache;
pub mod generation;
pub mod logging;
pub mod retrieval;
pub mod services;
pub mod translation;
