// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod catalog;
mod gemini;
mod traits;
mod types;

// Public re-exports - the ONLY way to access model functionality
pub use catalog::{default_entries, CatalogEntry, ModelCatalog};
pub use gemini::GeminiProvider;
#[cfg(test)]
pub use traits::MockProvider;
pub use traits::{Generation, Provider, ProviderError};
pub use types::{
    ChatRequest, ChatResponse, ErrorBody, HealthState, HealthStatus, Message, MessageRole,
    ModelInfo, ModelsResponse, Usage,
};
