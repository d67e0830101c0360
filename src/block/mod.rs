//! Block normalization: turning the unit under test into one pending
//! operation.
//!
//! A [`Block`] is either an already-pending [`Operation`], a zero-argument
//! callable expected to return one, or any other value (which is an input
//! mistake the matchers must report, not a panic). The normalizer invokes a
//! callable at most once, with no arguments, inside a panic guard.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

use crate::error::Error;
use crate::rejection::Rejection;

/// Terminal outcome of a pending operation.
pub type Settled = std::result::Result<Value, Rejection>;

/// A pending asynchronous operation with exactly one eventual
/// success-or-failure outcome.
pub type Operation = BoxFuture<'static, Settled>;

/// A zero-argument callable supplied as a block.
pub type Thunk = Box<dyn FnOnce() -> BlockValue + Send>;

/// What a block callable may hand back.
pub enum BlockValue {
    /// A pending operation, the only valid return.
    Operation(Operation),
    /// Anything else; reported as an invalid return value.
    Value(Value),
}

/// The unit of work under test.
///
/// # Example
///
/// ```rust
/// use assert_rejects::block::{rejected, Block};
///
/// // An already-pending operation:
/// let pending = Block::operation(rejected("BOMB!"));
///
/// // A callable producing one:
/// let thunk = Block::thunk(|| rejected("BOMB!"));
///
/// // Neither: an input mistake the matchers will report:
/// let wrong = Block::value(9999);
/// # let _ = (pending, thunk, wrong);
/// ```
pub enum Block {
    /// An already-pending operation.
    Operation(Operation),
    /// A zero-argument callable expected to return an operation.
    Thunk(Thunk),
    /// A value that is neither callable nor an operation.
    Value(Value),
}

impl Block {
    /// Wrap an already-pending operation.
    pub fn operation<F>(future: F) -> Self
    where
        F: Future<Output = Settled> + Send + 'static,
    {
        Block::Operation(future.boxed())
    }

    /// Wrap a zero-argument callable.
    pub fn thunk<F, R>(f: F) -> Self
    where
        F: FnOnce() -> R + Send + 'static,
        R: Into<BlockValue>,
    {
        Block::Thunk(Box::new(move || f().into()))
    }

    /// Wrap a value that is neither callable nor an operation.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Block::Value(value.into())
    }
}

impl From<Operation> for Block {
    fn from(operation: Operation) -> Self {
        Block::Operation(operation)
    }
}

impl From<Operation> for BlockValue {
    fn from(operation: Operation) -> Self {
        BlockValue::Operation(operation)
    }
}

impl From<Value> for BlockValue {
    fn from(value: Value) -> Self {
        BlockValue::Value(value)
    }
}

impl From<&str> for BlockValue {
    fn from(text: &str) -> Self {
        BlockValue::Value(Value::String(text.to_string()))
    }
}

impl From<String> for BlockValue {
    fn from(text: String) -> Self {
        BlockValue::Value(Value::String(text))
    }
}

/// A promptly-fulfilled operation.
pub fn fulfilled(value: impl Into<Value>) -> Operation {
    future::ready(Ok(value.into())).boxed()
}

/// A promptly-rejected operation.
pub fn rejected(rejection: impl Into<Rejection>) -> Operation {
    future::ready(Err(rejection.into())).boxed()
}

/// Resolve a block to its pending operation, or fail with the reason it
/// cannot be one.
///
/// A panic raised by the callable is captured and redirected into the
/// failure channel; it never escapes to the matcher's caller.
pub(crate) fn normalize(block: Block, matcher: &'static str) -> Result<Operation, Error> {
    match block {
        Block::Operation(operation) => Ok(operation),
        Block::Thunk(thunk) => match panic::catch_unwind(AssertUnwindSafe(thunk)) {
            Ok(BlockValue::Operation(operation)) => Ok(operation),
            Ok(BlockValue::Value(value)) => {
                Err(Error::invalid_return_value(matcher, type_name(&value)))
            }
            Err(payload) => Err(Error::Rejected(Rejection::from_panic(payload))),
        },
        Block::Value(value) => Err(Error::invalid_arg_type(
            "block",
            "Fn or Operation",
            type_name(&value),
        )),
    }
}

/// JSON type name used in argument diagnostics.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
