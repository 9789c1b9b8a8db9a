use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribeError {
    #[error("`{program} {args}` failed: {stderr}")]
    CommandFailed {
        program: String,
        args: String,
        stderr: String,
    },

    #[error("Failed to run {program}: {source}. Is it installed and on PATH?")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid version format: {0}")]
    InvalidVersion(String),

    #[error("Invalid bump type: {0}")]
    InvalidBumpType(String),

    #[error("Clipboard not supported on platform: {0}")]
    ClipboardUnsupported(String),

    #[error("Configuration error at {path}: {message}")]
    Config { path: String, message: String },

    #[error("No API key for the text generation service. Set ANTHROPIC_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("Prompt template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Prompt rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Failures of the hosted text-generation call, classified so the operator
/// can be told what to do about them.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("AI service is overloaded (HTTP {status})")]
    Overloaded { status: u16 },

    #[error("AI service rate limit reached")]
    RateLimited,

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("AI service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service returned no text content")]
    EmptyResponse,
}

impl GenerationError {
    /// Whether the transport should spend another attempt on this failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Overloaded { .. } | GenerationError::RateLimited => true,
            GenerationError::Api { status, .. } => *status >= 500,
            GenerationError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            GenerationError::Timeout { .. } | GenerationError::EmptyResponse => false,
        }
    }

    /// Overload and rate limiting share the same operator advice.
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            GenerationError::Overloaded { .. } | GenerationError::RateLimited
        )
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            GenerationError::Timeout { .. } => true,
            GenerationError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

impl ScribeError {
    pub fn command_failed(program: &str, args: &[String], stderr: impl Into<String>) -> Self {
        ScribeError::CommandFailed {
            program: program.to_string(),
            args: args.join(" "),
            stderr: stderr.into(),
        }
    }

    pub fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        ScribeError::Decode {
            what: what.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScribeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display() {
        let err = ScribeError::command_failed(
            "gh",
            &["pr".to_string(), "view".to_string(), "12".to_string()],
            "no pull requests found",
        );
        assert_eq!(
            err.to_string(),
            "`gh pr view 12` failed: no pull requests found"
        );
    }

    #[test]
    fn test_generation_classification() {
        assert!(GenerationError::Overloaded { status: 529 }.is_capacity());
        assert!(GenerationError::RateLimited.is_capacity());
        assert!(GenerationError::Timeout { secs: 30 }.is_timeout());
        assert!(!GenerationError::Timeout { secs: 30 }.is_capacity());

        let bad_request = GenerationError::Api {
            status: 400,
            message: "bad".to_string(),
        };
        assert!(!bad_request.is_retryable());
        assert!(!bad_request.is_capacity());

        let server = GenerationError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert!(server.is_retryable());
        assert!(GenerationError::Overloaded { status: 529 }.is_retryable());
        assert!(!GenerationError::Timeout { secs: 30 }.is_retryable());
    }

    #[test]
    fn test_generation_error_is_transparent() {
        let err: ScribeError = GenerationError::RateLimited.into();
        assert_eq!(err.to_string(), "AI service rate limit reached");
    }
}
