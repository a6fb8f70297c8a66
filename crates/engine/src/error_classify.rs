// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classify free-form backend error strings into the retry taxonomy.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    RateLimit,
    AuthError,
    Timeout,
    ModelUnavailable,
    NetworkError,
    InvalidRequest,
    ContextTooLong,
    ReasoningError,
    OutputError,
    ContextError,
    SandboxError,
    Unknown,
}

impl ErrorClass {
    /// Retryable: {RATE_LIMIT, TIMEOUT, NETWORK_ERROR, MODEL_UNAVAILABLE,
    /// reasoning_error, output_error}. Everything else, including
    /// `Unknown`, is treated as non-retryable — an unrecognized failure
    /// mode should surface rather than silently retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorClass::RateLimit
                | ErrorClass::Timeout
                | ErrorClass::NetworkError
                | ErrorClass::ModelUnavailable
                | ErrorClass::ReasoningError
                | ErrorClass::OutputError
        )
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorClass::RateLimit => "RATE_LIMIT",
            ErrorClass::AuthError => "AUTH_ERROR",
            ErrorClass::Timeout => "TIMEOUT",
            ErrorClass::ModelUnavailable => "MODEL_UNAVAILABLE",
            ErrorClass::NetworkError => "NETWORK_ERROR",
            ErrorClass::InvalidRequest => "INVALID_REQUEST",
            ErrorClass::ContextTooLong => "CONTEXT_TOO_LONG",
            ErrorClass::ReasoningError => "reasoning_error",
            ErrorClass::OutputError => "output_error",
            ErrorClass::ContextError => "context_error",
            ErrorClass::SandboxError => "sandbox_error",
            ErrorClass::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Classify a free-form error string by keyword match, most specific
/// first. Case-insensitive so callers don't need to normalize upstream
/// error text.
pub fn classify(message: &str) -> ErrorClass {
    let lower = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["rate limit", "rate-limit", "429", "too many requests"]) {
        ErrorClass::RateLimit
    } else if has(&["unauthorized", "auth", "401", "403", "invalid api key", "credential"]) {
        ErrorClass::AuthError
    } else if has(&["context too long", "context length", "maximum context", "token limit"]) {
        ErrorClass::ContextTooLong
    } else if has(&["timed out", "timeout", "deadline exceeded"]) {
        ErrorClass::Timeout
    } else if has(&["model unavailable", "model not found", "no capacity", "overloaded"]) {
        ErrorClass::ModelUnavailable
    } else if has(&["connection reset", "connection refused", "network", "dns", "broken pipe"]) {
        ErrorClass::NetworkError
    } else if has(&["sandbox"]) {
        ErrorClass::SandboxError
    } else if has(&["reasoning"]) {
        ErrorClass::ReasoningError
    } else if has(&["malformed output", "parse error", "output_error"]) {
        ErrorClass::OutputError
    } else if has(&["invalid request", "bad request", "400", "malformed request"]) {
        ErrorClass::InvalidRequest
    } else if has(&["context_error", "context window"]) {
        ErrorClass::ContextError
    } else {
        ErrorClass::Unknown
    }
}

#[cfg(test)]
#[path = "error_classify_tests.rs"]
mod tests;
