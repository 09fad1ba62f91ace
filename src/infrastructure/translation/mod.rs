//! Translation backends

pub mod http;

pub use http::HttpTranslator;
