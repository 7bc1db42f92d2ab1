/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8000";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// Environment
pub const ENV_PREFIX: &str = "GATEWAY_";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

// Timeouts
pub const UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const CLIENT_TIMEOUT_SECS: u64 = 60;

// Reported in /health
pub const GATEWAY_VERSION: &str = "1.0.0";

// Default Model Configuration
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Built-in catalog: (identifier, display name, description), in listing order
pub const DEFAULT_CATALOG: &[(&str, &str, &str)] = &[
    (
        "gemini-1.5-flash",
        "Gemini 1.5 Flash",
        "Fast, versatile multimodal model for everyday chat",
    ),
    (
        "gemini-1.5-pro",
        "Gemini 1.5 Pro",
        "Higher quality reasoning over long contexts",
    ),
    (
        "gemini-2.0-flash-lite",
        "Gemini 2.0 Flash-Lite",
        "Cost-efficient, low latency responses",
    ),
    (
        "gemini-2.0-flash",
        "Gemini 2.0 Flash",
        "Next-generation speed with improved capabilities",
    ),
];

// Token estimation fallback when no BPE encoding is available
pub const CHARS_PER_TOKEN: usize = 4;
