/// Locale requested from the recognizer.
pub const RECOGNITION_LANGUAGE: &str = "en-IN";

/// Optional speech-to-text capability supplied by the host environment.
pub trait SpeechToText: Send + Sync {
    fn recognize(&self, language: &str) -> Result<String, VoiceInputError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceInputError {
    #[error("Voice not supported in this browser")]
    Unsupported,
    #[error("speech recognition failed: {0}")]
    Recognition(String),
}
