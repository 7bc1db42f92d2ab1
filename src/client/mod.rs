// Gateway module for the chat client - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod http;
mod repl;
mod transcript;

// Public re-exports - the ONLY way to access client functionality
pub use http::{ClientError, GatewayClient};
pub use repl::{parse_input, print_models, run_chat, Input};
pub use transcript::Transcript;
