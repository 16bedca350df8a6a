//! Chat model provider implementations

mod factory;
mod http_client;
mod offline;
mod openai;

pub use factory::{LlmProviderConfig, LlmProviderFactory, ProviderKind};
pub use http_client::{HttpClient, HttpClientTrait, HttpError};
pub use offline::OfflineChatProvider;
pub use openai::OpenAiChatProvider;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
