mod api;
mod provider;
mod requester;

pub use api::LlmApiClient;
pub use provider::{GoalRequester, LlmBackend};
pub use requester::CompletionRequester;
