//! Shared scaffolding for the matcher integration tests.

use std::time::Duration;

use assert_rejects::{AssertionFailure, Error, Operation, Rejection};
use futures::FutureExt;
use serde_json::Value;

/// An operation that rejects with `rejection` a little later.
pub fn will_reject(rejection: impl Into<Rejection>) -> Operation {
    let rejection = rejection.into();
    async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Err(rejection)
    }
    .boxed()
}

/// An operation that resolves with `value` a little later.
pub fn will_resolve(value: impl Into<Value>) -> Operation {
    let value = value.into();
    async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(value)
    }
    .boxed()
}

/// Unwrap a synthetic assertion report out of a matcher failure.
pub fn assertion(err: Error) -> AssertionFailure {
    match err {
        Error::Assertion(failure) => failure,
        other => panic!("expected an assertion failure, got {other:?}"),
    }
}

/// Unwrap a propagated original failure out of a matcher failure.
pub fn propagated(err: Error) -> Rejection {
    match err {
        Error::Rejected(rejection) => rejection,
        other => panic!("expected a propagated rejection, got {other:?}"),
    }
}
