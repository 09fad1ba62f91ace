//! Almanac backends

pub mod http;

pub use http::HttpAlmanac;
