//! Settlement matchers.
//!
//! Both matchers follow the same shape: normalize the block to one pending
//! operation, await its settlement, then classify the outcome against the
//! expectation descriptor. Classification is synchronous; the await is the
//! only suspend point, so the returned future settles exactly when the
//! inner operation does.
//!
//! On a non-matching pattern, class, or predicate expectation the original
//! failure value is propagated unchanged: callers inspect the real
//! failure, never a synthetic wrapper. Synthetic [`AssertionFailure`]
//! reports are reserved for missing rejections, unwanted rejections, and
//! structural mismatches.
//!
//! [`AssertionFailure`]: crate::error::AssertionFailure

use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use crate::block::{self, Block};
use crate::diagnostic;
use crate::error::{Error, Result};
use crate::expected::{Expected, Predicate};
use crate::rejection::Rejection;

/// Public name of the "must reject" matcher, used in diagnostics.
const REJECTS: &str = "rejects";

/// Public name of the "must not reject" matcher, used in diagnostics.
const DOES_NOT_REJECT: &str = "does_not_reject";

/// Assert that the block settles with a failure matching `expected`.
///
/// Succeeds only if the block's operation settles with a failure and that
/// failure matches the expectation (any failure, when none is given).
/// A block that settles successfully produces a missing-rejection report;
/// a failure that does not match propagates unchanged.
///
/// A literal-string expectation stands in for an omitted `message`;
/// supplying both is reported as a programmer error.
///
/// # Errors
///
/// See the [error taxonomy](crate::error::Error): invalid argument or
/// return value, ambiguous string argument, assertion failure, or the
/// propagated original failure.
///
/// # Example
///
/// ```rust
/// use assert_rejects::prelude::*;
///
/// futures::executor::block_on(async {
///     let boom = ErrorValue::new(ErrorClass::type_error(), "bad");
///     let block = Block::thunk(move || rejected(boom));
///     rejects(block, Some(Expected::class(ErrorClass::type_error())), None)
///         .await
///         .unwrap();
/// });
/// ```
pub async fn rejects(
    block: Block,
    mut expected: Option<Expected>,
    mut message: Option<String>,
) -> Result<()> {
    if matches!(expected, Some(Expected::Text(_))) && message.is_some() {
        // A string can never be both the expectation and be accompanied by
        // a separate message.
        return Err(Error::invalid_arg_type(
            "error",
            "Shape, ErrorValue, ErrorClass, predicate, or Regex",
            "string",
        ));
    }
    let operation = block::normalize(block, REJECTS)?;
    match operation.await {
        Ok(_) => {
            // A bare string in the expectation slot stands in for the
            // omitted message.
            if message.is_none() && matches!(expected, Some(Expected::Text(_))) {
                if let Some(Expected::Text(text)) = expected.take() {
                    message = Some(text);
                }
            }
            Err(diagnostic::missing_rejection(REJECTS, expected.as_ref(), message.as_deref())
                .into())
        }
        Err(actual) => classify(actual, expected, message),
    }
}

/// Assert that the block does not settle with a failure matching
/// `expected`.
///
/// Succeeds if the block's operation settles successfully, or settles with
/// a failure the expectation does not match (the non-matching failure still
/// surfaces, unchanged; it was unexpected, just not the one being guarded
/// against). A matching failure produces an unwanted-rejection report.
///
/// This matcher never treats a string as an expectation: a literal string
/// is the message, and any separately supplied message is discarded. Shape
/// expectations are not supported here.
///
/// # Errors
///
/// See the [error taxonomy](crate::error::Error).
///
/// # Example
///
/// ```rust
/// use assert_rejects::prelude::*;
///
/// futures::executor::block_on(async {
///     let block = Block::operation(fulfilled("GOOD!"));
///     does_not_reject(block, None, None).await.unwrap();
/// });
/// ```
pub async fn does_not_reject(
    block: Block,
    mut expected: Option<Expected>,
    mut message: Option<String>,
) -> Result<()> {
    if matches!(expected, Some(Expected::Text(_))) {
        if let Some(Expected::Text(text)) = expected.take() {
            message = Some(text);
        }
    }
    let operation = block::normalize(block, DOES_NOT_REJECT)?;
    match operation.await {
        Ok(_) => Ok(()),
        Err(actual) => {
            let Some(expected) = expected else {
                return Err(diagnostic::unwanted_rejection(
                    DOES_NOT_REJECT,
                    &actual,
                    None,
                    message.as_deref(),
                )
                .into());
            };
            match &expected {
                Expected::Pattern(pattern) => {
                    if pattern.is_match(&actual.to_string()) {
                        Err(diagnostic::unwanted_rejection(
                            DOES_NOT_REJECT,
                            &actual,
                            Some(&expected),
                            message.as_deref(),
                        )
                        .into())
                    } else {
                        Err(Error::Rejected(actual))
                    }
                }
                Expected::Class(class) => {
                    if class.is_match(&actual) {
                        Err(diagnostic::unwanted_rejection(
                            DOES_NOT_REJECT,
                            &actual,
                            Some(&expected),
                            message.as_deref(),
                        )
                        .into())
                    } else {
                        Err(Error::Rejected(actual))
                    }
                }
                Expected::Predicate(predicate) => match invoke(predicate, &actual) {
                    Err(thrown) => Err(Error::Rejected(thrown)),
                    Ok(true) => Err(diagnostic::unwanted_rejection(
                        DOES_NOT_REJECT,
                        &actual,
                        Some(&expected),
                        message.as_deref(),
                    )
                    .into()),
                    Ok(false) => Err(Error::Rejected(actual)),
                },
                Expected::Shape(_) | Expected::Text(_) => Err(Error::invalid_arg_type(
                    "expected",
                    "ErrorClass, predicate, or Regex",
                    expected.type_name(),
                )),
            }
        }
    }
}

/// Classify a settled failure against the expectation: the "must reject"
/// branch of the expectation evaluator.
fn classify(actual: Rejection, expected: Option<Expected>, message: Option<String>) -> Result<()> {
    let Some(expected) = expected else {
        return Ok(());
    };
    match expected {
        Expected::Text(text) => match &actual {
            // Ambiguity guard: a string that equals the actual failure's
            // identity is a latent caller mistake, not a match.
            Rejection::Error(err) if err.message() == text => {
                Err(Error::ambiguous_argument(format!("message \"{text}\"")))
            }
            Rejection::Value(Value::Object(map))
                if map.get("message").and_then(Value::as_str) == Some(text.as_str()) =>
            {
                Err(Error::ambiguous_argument(format!("message \"{text}\"")))
            }
            Rejection::Value(Value::String(actual_text)) if *actual_text == text => {
                Err(Error::ambiguous_argument(format!("\"{text}\"")))
            }
            // A bare string expectation never legitimately matches.
            _ => Err(Error::Rejected(actual)),
        },
        Expected::Pattern(pattern) => {
            if pattern.is_match(&actual.to_string()) {
                Ok(())
            } else {
                Err(Error::Rejected(actual))
            }
        }
        Expected::Class(class) => {
            if class.is_match(&actual) {
                Ok(())
            } else {
                // Identity misses inside the Error lineage (a re-declared
                // subclass) are real non-matches, not probe failures; the
                // actual failure surfaces unchanged either way.
                Err(Error::Rejected(actual))
            }
        }
        Expected::Predicate(predicate) => match invoke(&predicate, &actual) {
            Err(thrown) => Err(Error::Rejected(thrown)),
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::Rejected(actual)),
        },
        Expected::Shape(shape) => {
            if shape.matches(&actual) {
                Ok(())
            } else {
                Err(diagnostic::structural_mismatch(
                    REJECTS,
                    &actual,
                    &shape,
                    message.as_deref(),
                )
                .into())
            }
        }
    }
}

/// Run a predicate inside a panic guard.
///
/// A panic propagates as the matcher's own failure, verbatim.
fn invoke(predicate: &Predicate, actual: &Rejection) -> std::result::Result<bool, Rejection> {
    panic::catch_unwind(AssertUnwindSafe(|| predicate.call(actual)))
        .map_err(Rejection::from_panic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{fulfilled, rejected};
    use crate::error::AssertionFailure;
    use crate::rejection::{ErrorClass, ErrorValue};
    use regex::Regex;
    use serde_json::json;

    fn type_error(message: &str) -> ErrorValue {
        ErrorValue::new(ErrorClass::type_error(), message)
    }

    #[tokio::test]
    async fn test_rejects_resolves_on_any_failure_without_expectation() {
        rejects(Block::operation(rejected("BOMB!")), None, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejects_reports_a_missing_rejection() {
        let err = rejects(Block::operation(fulfilled("GOOD!")), None, None)
            .await
            .unwrap_err();
        match err {
            Error::Assertion(AssertionFailure { message, operator, .. }) => {
                assert_eq!(message, "Missing expected rejection.");
                assert_eq!(operator, "rejects");
            }
            other => panic!("expected an assertion failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_match_policy_is_propagate_verbatim_for_all_three_kinds() {
        let boom = type_error("the original error message");

        for expected in [
            Expected::pattern(Regex::new("^will not match$").unwrap()),
            Expected::class(ErrorClass::range_error()),
            Expected::predicate(|_| false),
        ] {
            let err = rejects(
                Block::operation(rejected(boom.clone())),
                Some(expected),
                None,
            )
            .await
            .unwrap_err();
            assert_eq!(err, Error::Rejected(Rejection::Error(boom.clone())));
        }
    }

    #[tokio::test]
    async fn test_rejects_string_with_message_is_a_programmer_error() {
        let err = rejects(
            Block::operation(fulfilled("GOOD!")),
            Some(Expected::text("boom")),
            Some(String::from("a message too")),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err,
            Error::invalid_arg_type(
                "error",
                "Shape, ErrorValue, ErrorClass, predicate, or Regex",
                "string"
            )
        );
    }

    #[tokio::test]
    async fn test_rejects_string_collision_with_an_object_message_property() {
        let err = rejects(
            Block::operation(rejected(json!({ "message": "Wrong type" }))),
            Some(Expected::text("Wrong type")),
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(err, Error::ambiguous_argument("message \"Wrong type\""));
    }

    #[tokio::test]
    async fn test_rejects_non_colliding_string_propagates_the_failure() {
        let boom = type_error("some other message");
        let err = rejects(
            Block::operation(rejected(boom.clone())),
            Some(Expected::text("Wrong type")),
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(err, Error::Rejected(Rejection::Error(boom)));
    }

    #[tokio::test]
    async fn test_does_not_reject_ignores_the_expectation_on_success() {
        does_not_reject(
            Block::operation(fulfilled("GOOD!")),
            Some(Expected::class(ErrorClass::base())),
            None,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_does_not_reject_shape_is_an_invalid_expectation() {
        let entries = match json!({ "name": "TypeError" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let err = does_not_reject(
            Block::operation(rejected(type_error("Wrong type"))),
            Some(Expected::shape(entries)),
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err,
            Error::invalid_arg_type("expected", "ErrorClass, predicate, or Regex", "object")
        );
    }

    #[tokio::test]
    async fn test_predicate_panic_propagates_verbatim_in_both_matchers() {
        let boom = type_error("the original error message");

        let err = rejects(
            Block::operation(rejected(boom.clone())),
            Some(Expected::predicate(|_| panic!("some programming error"))),
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err,
            Error::Rejected(Rejection::from("some programming error"))
        );

        let err = does_not_reject(
            Block::operation(rejected(boom)),
            Some(Expected::predicate(|_| panic!("some programming error"))),
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err,
            Error::Rejected(Rejection::from("some programming error"))
        );
    }
}
