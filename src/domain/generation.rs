//! Text generation collaborator trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Generative text backend used for insight synthesis
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Completes a single prompt into generated text
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;

    /// Provider name, for diagnostics
    fn provider_name(&self) -> &'static str;
}
