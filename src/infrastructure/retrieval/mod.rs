//! Vector search backends

pub mod chroma;
pub mod in_memory;

pub use chroma::ChromaSearch;
pub use in_memory::InMemorySearch;
