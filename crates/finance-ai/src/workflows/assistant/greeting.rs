//! Greeting detection for the scripted assistant.

pub const GREETING_TOKENS: [&str; 4] = ["hi", "hello", "hey", "hii"];

pub const GREETING_REPLY: &str = "I'm your Finance AI Automation Assistant. I help automate the loan processing workflow.\n\nPlease select a loan type.";

/// Canned reply used whenever the chat backend cannot be reached.
pub const FALLBACK_REPLY: &str = "Demo AI response: backend not connected.";

/// Case-insensitive prefix match, so "heyyy" and "HELLO there" both count.
pub fn is_greeting(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    GREETING_TOKENS
        .iter()
        .any(|token| normalized.starts_with(token))
}
