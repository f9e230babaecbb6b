use async_trait::async_trait;

use crate::error::Result;

/// The seam between callers and whichever hosted model answers them.
///
/// Implementations hold no mutable state: every call is one independent
/// request/response cycle, so a single instance can be shared across tasks.
#[async_trait]
pub trait CompletionRequester: Send + Sync {
    /// Sends `prompt` as a single user message and returns the completion
    /// text verbatim. Any network, credential or remote failure surfaces as
    /// [`GoalsError::Upstream`](crate::error::GoalsError::Upstream).
    async fn request_completion(&self, prompt: &str) -> Result<String>;
}
