//! Error definitions
//!
//! This module provides the failure taxonomy of the rejection matchers.
//! Every failure is terminal to its matcher invocation and surfaces exactly
//! once, through the `Err` channel of the matcher's returned future.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::rejection::Rejection;

/// A structured report of a failed assertion.
///
/// Distinct from a propagated original failure: an `AssertionFailure` is
/// synthesized by a matcher to describe what was missing or mismatched.
#[derive(Clone, Debug, PartialEq)]
pub struct AssertionFailure {
    /// Projection of the actual settlement; absent when the block never
    /// rejected.
    pub actual: Option<Value>,
    /// Projection of the expectation descriptor; absent when none was given.
    pub expected: Option<Value>,
    /// Public name of the matcher that produced this report.
    pub operator: &'static str,
    /// The composed, human-readable failure text.
    pub message: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AssertionFailure {}

/// Main error type for the rejection matchers.
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// An argument slot received a value of the wrong kind.
    #[error("The \"{arg}\" argument must be one of type {expected}. Received type {received}")]
    InvalidArgType {
        /// The argument slot that was misused.
        arg: &'static str,
        /// The kinds the slot accepts.
        expected: &'static str,
        /// The kind that arrived instead.
        received: String,
    },

    /// A block callable returned something other than a pending operation.
    #[error("Expected an Operation to be returned from the \"{matcher}\" block but got type {received}.")]
    InvalidReturnValue {
        /// Public name of the invoking matcher.
        matcher: &'static str,
        /// The kind of value the callable returned.
        received: String,
    },

    /// A string expectation collided with the actual failure's identity.
    #[error("The \"error/message\" argument is ambiguous. The error {detail} is identical to the message.")]
    AmbiguousArgument {
        /// Which identity collided, quoted for the diagnostic.
        detail: String,
    },

    /// A synthetic mismatch report.
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    /// The original failure value, surfaced as-is.
    #[error("{0}")]
    Rejected(Rejection),
}

impl Error {
    /// Wrong-kind argument failure for the given slot.
    #[must_use]
    pub fn invalid_arg_type(
        arg: &'static str,
        expected: &'static str,
        received: impl Into<String>,
    ) -> Self {
        Self::InvalidArgType {
            arg,
            expected,
            received: received.into(),
        }
    }

    /// Wrong-return-value failure attributed to `matcher`.
    #[must_use]
    pub fn invalid_return_value(matcher: &'static str, received: impl Into<String>) -> Self {
        Self::InvalidReturnValue {
            matcher,
            received: received.into(),
        }
    }

    /// Ambiguous error/message argument failure.
    #[must_use]
    pub fn ambiguous_argument(detail: impl Into<String>) -> Self {
        Self::AmbiguousArgument {
            detail: detail.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
