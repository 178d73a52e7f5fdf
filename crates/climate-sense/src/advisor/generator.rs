use async_trait::async_trait;

/// Hosted text model turning a prompt into prose. Single request/response.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Generation failure, split so callers can tell users to retry shortly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation rate limited: {0}")]
    RateLimited(String),
    #[error("text generation is not configured")]
    NotConfigured,
    #[error("text generation failed: {0}")]
    Failed(String),
}

const RATE_LIMIT_MARKERS: [&str; 5] = [
    "quota",
    "rate limit",
    "rate_limit",
    "resource_exhausted",
    "too many requests",
];

impl GenerationError {
    /// Map an upstream status and error text onto the retryable/opaque split.
    pub fn classify(status: Option<u16>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let lowered = detail.to_ascii_lowercase();
        let limited = status == Some(429)
            || RATE_LIMIT_MARKERS
                .iter()
                .any(|marker| lowered.contains(marker));

        if limited {
            Self::RateLimited(detail)
        } else {
            Self::Failed(detail)
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}
