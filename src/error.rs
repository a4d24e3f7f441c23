//! Typed error taxonomy for the receipt-extraction subsystem.
//!
//! Every component (LLM client, retry runner, pipeline steps) speaks this one
//! closed set of kinds. A raw failure is classified exactly once, at the
//! boundary where it enters the subsystem; nothing downstream re-wraps an
//! `AiError` into another `AiError`.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Domain codes
// ---------------------------------------------------------------------------

/// Stable machine-readable codes for business-rule violations.
///
/// Surfaced to the frontend so it can pick the right user messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainErrorCode {
    /// The user has not granted AI processing consent.
    ConsentRequired,
    /// The storage path belongs to a different user.
    Forbidden,
    /// An extracted item's category label matched nothing in the taxonomy.
    UnmappedCategory,
}

impl DomainErrorCode {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConsentRequired => "AI_CONSENT_REQUIRED",
            Self::Forbidden => "FORBIDDEN",
            Self::UnmappedCategory => "UNMAPPED_CATEGORY",
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced by the receipt-extraction subsystem.
#[derive(Debug, Error)]
pub enum AiError {
    /// Missing or invalid setup (API key, model, pipeline prerequisites).
    /// Fatal, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure (DNS, connect, TLS). Retryable.
    #[error("network error: {0}")]
    Network(String),

    /// A hard deadline elapsed. Not retried by default.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Credentials rejected by the provider. Needs operator action.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Provider throttling. Retryable under the default policy.
    #[error("rate limited: {0}")]
    RateLimit(String),

    /// Malformed request or unparsable response.
    #[error("validation error: {0}")]
    Validation(String),

    /// Business-rule violation, fatal to the run and surfaced for user
    /// messaging.
    #[error("{message}")]
    Domain {
        code: DomainErrorCode,
        message: String,
    },

    /// Provider returned a non-2xx status not covered by a dedicated kind.
    #[error("provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Anything that escaped classification.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

/// Field-free kind discriminant, fixed at construction.
///
/// Retry policy and callers match on kinds instead of inspecting error
/// payloads or type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Network,
    Timeout,
    Authentication,
    RateLimit,
    Validation,
    Domain,
    Api,
    Unknown,
}

impl AiError {
    /// Construct a domain error with its stable code.
    pub fn domain(code: DomainErrorCode, message: impl Into<String>) -> Self {
        Self::Domain {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Network(_) => ErrorKind::Network,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::RateLimit(_) => ErrorKind::RateLimit,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Domain { .. } => ErrorKind::Domain,
            Self::Api { .. } => ErrorKind::Api,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// One actionable message per failure class, shown as-is in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain {
                code: DomainErrorCode::ConsentRequired,
                ..
            } => "AI consent required",
            Self::Domain {
                code: DomainErrorCode::Forbidden,
                ..
            } => "You do not have access to this file",
            Self::Domain {
                code: DomainErrorCode::UnmappedCategory,
                ..
            } => "Some items could not be matched to a category",
            Self::Timeout(_) => "Processing timed out, try again",
            Self::RateLimit(_) => "Rate limit exceeded, try again later",
            Self::Authentication(_) => "AI provider rejected the credentials",
            Self::Network(_) => "Network problem, check your connection",
            Self::Validation(_) => "The receipt could not be read, try a clearer photo",
            Self::Configuration(_) => "AI processing is not configured",
            Self::Api { .. } | Self::Unknown(_) => "Receipt processing failed, try again",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_fixed_at_construction() {
        assert_eq!(
            AiError::Configuration("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(AiError::Network("x".into()).kind(), ErrorKind::Network);
        assert_eq!(AiError::Timeout("x".into()).kind(), ErrorKind::Timeout);
        assert_eq!(
            AiError::Authentication("x".into()).kind(),
            ErrorKind::Authentication
        );
        assert_eq!(AiError::RateLimit("x".into()).kind(), ErrorKind::RateLimit);
        assert_eq!(AiError::Validation("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(
            AiError::domain(DomainErrorCode::Forbidden, "x").kind(),
            ErrorKind::Domain
        );
        assert_eq!(
            AiError::Api {
                status: 502,
                message: "x".into()
            }
            .kind(),
            ErrorKind::Api
        );
        assert_eq!(AiError::Unknown("x".into()).kind(), ErrorKind::Unknown);
    }

    #[test]
    fn domain_codes_are_stable() {
        assert_eq!(
            DomainErrorCode::ConsentRequired.as_str(),
            "AI_CONSENT_REQUIRED"
        );
        assert_eq!(DomainErrorCode::Forbidden.as_str(), "FORBIDDEN");
        assert_eq!(
            DomainErrorCode::UnmappedCategory.as_str(),
            "UNMAPPED_CATEGORY"
        );
    }

    #[test]
    fn api_error_display_carries_status() {
        let error = AiError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(
            error.to_string(),
            "provider returned HTTP 503: Service Unavailable"
        );
    }

    #[test]
    fn domain_error_displays_its_message_unwrapped() {
        let error = AiError::domain(DomainErrorCode::ConsentRequired, "AI consent required");
        assert_eq!(error.to_string(), "AI consent required");
    }

    #[test]
    fn every_failure_maps_to_one_user_message() {
        assert_eq!(
            AiError::domain(DomainErrorCode::ConsentRequired, "no consent").user_message(),
            "AI consent required"
        );
        assert_eq!(
            AiError::Timeout("20s".into()).user_message(),
            "Processing timed out, try again"
        );
        assert_eq!(
            AiError::RateLimit("429".into()).user_message(),
            "Rate limit exceeded, try again later"
        );
    }
}
