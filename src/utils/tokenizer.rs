use once_cell::sync::Lazy;
use tiktoken_rs::CoreBPE;

use crate::constants::CHARS_PER_TOKEN;
use crate::models::Message;

/// Shared cl100k encoding, built on first use
static CL100K: Lazy<Option<CoreBPE>> = Lazy::new(|| tiktoken_rs::cl100k_base().ok());

/// Estimate the number of tokens in a text.
///
/// Used only when the upstream provider does not report usage itself.
pub fn count_tokens(text: &str) -> u64 {
    if text.is_empty() {
        return 0;
    }

    match CL100K.as_ref() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len() as u64,
        // Last resort: simple approximation
        None => text.len().div_ceil(CHARS_PER_TOKEN) as u64,
    }
}

/// Estimate prompt tokens for a conversation (all contents, space joined)
pub fn count_message_tokens(messages: &[Message]) -> u64 {
    let joined = messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    count_tokens(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_counting() {
        let text = "Hello, world! This is a test message.";
        let count = count_tokens(text);
        assert!(count > 0);
        assert!(count < text.len() as u64); // Tokens should be less than characters
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(count_tokens(""), 0);
        assert_eq!(count_message_tokens(&[]), 0);
    }

    #[test]
    fn test_message_tokens_grow_with_history() {
        let short = vec![Message::user("Hello")];
        let long = vec![
            Message::user("Hello"),
            Message::assistant("Hi! How can I help you today?"),
            Message::user("Tell me about Rust lifetimes."),
        ];
        assert!(count_message_tokens(&long) > count_message_tokens(&short));
    }
}
