pub mod app;
pub mod cli;
pub mod client;
pub mod constants;
pub mod gateway;
pub mod models;
pub mod server;
pub mod utils;

pub use app::{load_config, Config};
pub use gateway::{Gateway, GatewayError};
pub use models::{ChatRequest, ChatResponse, Message, MessageRole, ModelCatalog, Provider};
pub use utils::init_logger;
