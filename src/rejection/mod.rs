//! The rejection value model.
//!
//! A settled failure is one of:
//!
//! - [`Rejection::Error`] - an error-like value: a class lineage, a message,
//!   and extra enumerable properties
//! - [`Rejection::Value`] - any other value (a string, a number, an object, ...)
//!
//! The display form of a rejection is what pattern expectations are tested
//! against: error-like values render as `"Name: message"`, plain string
//! values render unquoted, everything else renders as JSON.

mod class;

pub use class::ErrorClass;

use std::any::Any;
use std::fmt;

use serde_json::{Map, Value};

/// An error-like failure value.
///
/// # Example
///
/// ```rust
/// use assert_rejects::rejection::{ErrorClass, ErrorValue};
///
/// let err = ErrorValue::new(ErrorClass::type_error(), "Wrong type")
///     .with_property("code", "ERR_INVALID_ARG_TYPE".into());
///
/// assert_eq!(err.name(), "TypeError");
/// assert_eq!(err.to_string(), "TypeError: Wrong type");
/// ```
#[derive(Clone, Debug)]
pub struct ErrorValue {
    class: ErrorClass,
    message: String,
    properties: Map<String, Value>,
}

impl ErrorValue {
    /// Build an error value of the given class.
    #[must_use]
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
            properties: Map::new(),
        }
    }

    /// Attach an extra enumerable property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// The class this value was constructed from.
    #[must_use]
    pub fn class(&self) -> &ErrorClass {
        &self.class
    }

    /// The class name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.class.name()
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The extra enumerable properties.
    #[must_use]
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{}: {}", self.name(), self.message)
        }
    }
}

impl PartialEq for ErrorValue {
    fn eq(&self, other: &Self) -> bool {
        self.class.same_class(&other.class)
            && self.message == other.message
            && self.properties == other.properties
    }
}

/// A settled failure value.
#[derive(Clone, Debug, PartialEq)]
pub enum Rejection {
    /// An error-like value.
    Error(ErrorValue),
    /// Any other value.
    Value(Value),
}

impl Rejection {
    /// The failure message, when the value carries one.
    ///
    /// Error values expose their own message; object values expose a string
    /// `"message"` property when present.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Rejection::Error(err) => Some(err.message()),
            Rejection::Value(Value::Object(map)) => map.get("message").and_then(Value::as_str),
            Rejection::Value(_) => None,
        }
    }

    /// Look up a named property the way the structural matcher sees it.
    ///
    /// Error values expose `name`, `message`, and their property map; object
    /// values expose their map; primitives expose nothing.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<Value> {
        match self {
            Rejection::Error(err) => match key {
                "name" => Some(Value::String(err.name().to_string())),
                "message" => Some(Value::String(err.message().to_string())),
                _ => err.properties().get(key).cloned(),
            },
            Rejection::Value(Value::Object(map)) => map.get(key).cloned(),
            Rejection::Value(_) => None,
        }
    }

    /// Project the rejection to a plain value for diagnostics.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Rejection::Error(err) => {
                let mut map = Map::new();
                map.insert("name".to_string(), Value::String(err.name().to_string()));
                map.insert(
                    "message".to_string(),
                    Value::String(err.message().to_string()),
                );
                for (key, value) in err.properties() {
                    map.insert(key.clone(), value.clone());
                }
                Value::Object(map)
            }
            Rejection::Value(value) => value.clone(),
        }
    }

    /// Convert a captured panic payload into a rejection.
    ///
    /// String payloads are preserved verbatim.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let text = match payload.downcast::<String>() {
            Ok(text) => *text,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(text) => (*text).to_string(),
                Err(_) => String::from("panic with a non-string payload"),
            },
        };
        Rejection::Value(Value::String(text))
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Error(err) => write!(f, "{err}"),
            Rejection::Value(Value::String(text)) => write!(f, "{text}"),
            Rejection::Value(value) => write!(f, "{value}"),
        }
    }
}

impl From<ErrorValue> for Rejection {
    fn from(error: ErrorValue) -> Self {
        Rejection::Error(error)
    }
}

impl From<Value> for Rejection {
    fn from(value: Value) -> Self {
        Rejection::Value(value)
    }
}

impl From<&str> for Rejection {
    fn from(text: &str) -> Self {
        Rejection::Value(Value::String(text.to_string()))
    }
}

impl From<String> for Rejection {
    fn from(text: String) -> Self {
        Rejection::Value(Value::String(text))
    }
}
