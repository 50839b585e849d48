use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "policy.similarity_threshold")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected dimensions, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "fingerprinter", "similarity_index")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the caching engine.
///
/// Resolution-side errors are split into recoverable ones (the arbiter
/// degrades toward a `Miss`, which only costs a fresh generation) and fatal
/// ones (the commit must not be half-applied). See [`Error::is_recoverable`].
#[derive(Debug, Error)]
pub enum Error {
    /// Prompt is empty or whitespace-only after normalization. Nothing is cached.
    #[error("invalid prompt: {message}{}", format_context(.context))]
    InvalidPrompt {
        message: String,
        context: ErrorContext,
    },

    /// Requested duration is zero or outside the configured bounds. Nothing is cached.
    #[error("invalid duration: {message}{}", format_context(.context))]
    InvalidDuration {
        message: String,
        context: ErrorContext,
    },

    /// The embedding provider failed, timed out, or returned a wrong-dimension
    /// vector. Recoverable: resolution continues with exact-match only.
    #[error("embedding unavailable: {message}{}", format_context(.context))]
    EmbeddingUnavailable {
        message: String,
        context: ErrorContext,
    },

    /// A record for this canonical key already exists. Recoverable: the
    /// existing record is the answer (treated as a hit, never a second insert).
    #[error("duplicate canonical key: {canonical_key}")]
    DuplicateKey { canonical_key: String },

    /// An index could not be updated during commit. Fatal for the commit; the
    /// canonical key is carried so the caller can retry the commit idempotently.
    #[error("index write failed for key {canonical_key}: {message}")]
    IndexWriteFailure {
        canonical_key: String,
        message: String,
    },

    /// The similarity search itself failed. Recoverable: resolution degrades
    /// to a `Miss` (never to a false hit).
    #[error("similarity search failed: {message}{}", format_context(.context))]
    SimilaritySearchFailure {
        message: String,
        context: ErrorContext,
    },

    /// Invalid builder/policy input or malformed data at a component seam.
    #[error("configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Generic validation error (dimension mismatches and the like).
    #[error("validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn invalid_prompt(msg: impl Into<String>) -> Self {
        Error::InvalidPrompt {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn invalid_duration(msg: impl Into<String>) -> Self {
        Error::InvalidDuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn embedding_unavailable(msg: impl Into<String>) -> Self {
        Error::EmbeddingUnavailable {
            message: msg.into(),
            context: ErrorContext::new().with_source("embedder"),
        }
    }

    pub fn embedding_unavailable_with_context(
        msg: impl Into<String>,
        context: ErrorContext,
    ) -> Self {
        Error::EmbeddingUnavailable {
            message: msg.into(),
            context,
        }
    }

    pub fn duplicate_key(canonical_key: impl Into<String>) -> Self {
        Error::DuplicateKey {
            canonical_key: canonical_key.into(),
        }
    }

    pub fn index_write_failure(canonical_key: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::IndexWriteFailure {
            canonical_key: canonical_key.into(),
            message: msg.into(),
        }
    }

    pub fn similarity_failure(msg: impl Into<String>) -> Self {
        Error::SimilaritySearchFailure {
            message: msg.into(),
            context: ErrorContext::new().with_source("similarity_index"),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Whether resolution may continue after this error by degrading toward a
    /// `Miss` (or, for [`Error::DuplicateKey`], toward the existing record).
    ///
    /// Fatal errors must be surfaced; degrading past them would hide an
    /// inconsistency between the registry and the indexes.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::EmbeddingUnavailable { .. }
                | Error::DuplicateKey { .. }
                | Error::SimilaritySearchFailure { .. }
        )
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::InvalidPrompt { context, .. }
            | Error::InvalidDuration { context, .. }
            | Error::EmbeddingUnavailable { context, .. }
            | Error::SimilaritySearchFailure { context, .. }
            | Error::Configuration { context, .. }
            | Error::Validation { context, .. } => Some(context),
            _ => None,
        }
    }
}
