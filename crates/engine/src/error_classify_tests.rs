// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    rate_limit = { "429 Too Many Requests", ErrorClass::RateLimit },
    auth = { "401 Unauthorized: invalid api key", ErrorClass::AuthError },
    timeout = { "request timed out after 30s", ErrorClass::Timeout },
    model_unavailable = { "model overloaded, try again later", ErrorClass::ModelUnavailable },
    network = { "connection reset by peer", ErrorClass::NetworkError },
    invalid_request = { "400 bad request: missing field", ErrorClass::InvalidRequest },
    context_too_long = { "maximum context length exceeded", ErrorClass::ContextTooLong },
    sandbox = { "sandbox execution denied", ErrorClass::SandboxError },
    unknown = { "the backend exploded in an unprecedented way", ErrorClass::Unknown },
)]
fn classifies_error_strings(message: &str, expected: ErrorClass) {
    assert_eq!(classify(message), expected);
}

#[test]
fn retryable_set_matches_taxonomy() {
    assert!(ErrorClass::RateLimit.is_retryable());
    assert!(ErrorClass::Timeout.is_retryable());
    assert!(ErrorClass::NetworkError.is_retryable());
    assert!(ErrorClass::ModelUnavailable.is_retryable());
    assert!(ErrorClass::ReasoningError.is_retryable());
    assert!(ErrorClass::OutputError.is_retryable());

    assert!(!ErrorClass::AuthError.is_retryable());
    assert!(!ErrorClass::InvalidRequest.is_retryable());
    assert!(!ErrorClass::ContextTooLong.is_retryable());
    assert!(!ErrorClass::ContextError.is_retryable());
    assert!(!ErrorClass::SandboxError.is_retryable());
}
