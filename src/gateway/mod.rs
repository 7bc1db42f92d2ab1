// Gateway module for the chat relay - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod errors;
mod service;

// Public re-exports - the ONLY way to access gateway functionality
pub use errors::GatewayError;
pub use service::Gateway;
