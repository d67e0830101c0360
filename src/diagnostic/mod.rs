//! Diagnostic builders for synthetic assertion failures.
//!
//! Formatting is self-contained: comparison text is composed from
//! key-restricted projections serialized by `serde_json`, and no global
//! state is touched while building a message.

use std::fmt::Write;

use serde_json::Value;

use crate::error::AssertionFailure;
use crate::expected::{Expected, Shape};
use crate::rejection::Rejection;

/// Report for a block that settled successfully when a rejection was
/// required.
pub(crate) fn missing_rejection(
    operator: &'static str,
    expected: Option<&Expected>,
    message: Option<&str>,
) -> AssertionFailure {
    let mut text = String::from("Missing expected rejection");
    if let Some(name) = expected.and_then(Expected::name) {
        let _ = write!(text, " ({name})");
    }
    match message {
        Some(message) => {
            let _ = write!(text, ": {message}");
        }
        None => text.push('.'),
    }
    AssertionFailure {
        actual: None,
        expected: expected.map(Expected::to_value),
        operator,
        message: text,
    }
}

/// Report for a rejection that should not have happened.
pub(crate) fn unwanted_rejection(
    operator: &'static str,
    actual: &Rejection,
    expected: Option<&Expected>,
    message: Option<&str>,
) -> AssertionFailure {
    let mut text = String::from("Got unwanted rejection");
    match message {
        Some(message) => {
            let _ = write!(text, ": {message}");
        }
        None => text.push('.'),
    }
    let actual_message = actual
        .message()
        .map_or_else(|| actual.to_string(), str::to_string);
    let _ = write!(text, "\nActual message: \"{actual_message}\"");
    AssertionFailure {
        actual: Some(actual.to_value()),
        expected: expected.map(Expected::to_value),
        operator,
        message: text,
    }
}

/// Report for a structural mismatch, restricted to the compared keys.
///
/// A supplied message wins over the generated comparison text.
pub(crate) fn structural_mismatch(
    operator: &'static str,
    actual: &Rejection,
    shape: &Shape,
    message: Option<&str>,
) -> AssertionFailure {
    let projected_actual = shape.project_actual(actual);
    let projected_expected = shape.project_expected();
    let text = message.map_or_else(
        || comparison_message(&projected_actual, &projected_expected),
        str::to_string,
    );
    AssertionFailure {
        actual: Some(projected_actual),
        expected: Some(projected_expected),
        operator,
        message: text,
    }
}

/// The strict-deep-equal comparison text for two projections.
fn comparison_message(actual: &Value, expected: &Value) -> String {
    format!("Expected values to be strictly deep-equal:\n+ actual - expected\n\n+ {actual}\n- {expected}")
}
