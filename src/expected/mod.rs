//! Expectation descriptors and the structural-match evaluator.
//!
//! [`Expected`] is a closed tagged union; the matchers dispatch over it
//! exhaustively, so no descriptor kind can fall through to another. The
//! shape variant carries the structural evaluator used by the "must reject"
//! path: every expected key must exist on the actual failure and compare
//! deeply equal, with the comparison delegated to `serde_json`.

use std::fmt;

use regex::Regex;
use serde_json::{Map, Value};

use crate::rejection::{ErrorClass, ErrorValue, Rejection};

/// A custom validation callable over the actual rejection.
///
/// Built through [`Expected::predicate`] or [`Expected::predicate_named`];
/// the name, when given, shows up in missing-rejection diagnostics.
pub struct Predicate {
    name: Option<String>,
    check: Box<dyn Fn(&Rejection) -> bool + Send + Sync>,
}

impl Predicate {
    /// The predicate's diagnostic name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn call(&self, actual: &Rejection) -> bool {
        (self.check)(actual)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

/// A predicate-class expectation with its lineage capability resolved once.
///
/// Whether the class belongs to the generic `Error` lineage is probed when
/// the expectation is built, not re-probed per settlement. An identity miss
/// against a class inside that lineage (a re-declared subclass) is a real
/// non-match; the matchers never retry it by name.
#[derive(Clone, Debug)]
pub struct ClassExpectation {
    class: ErrorClass,
    rooted_at_error: bool,
}

impl ClassExpectation {
    fn new(class: ErrorClass) -> Self {
        let rooted_at_error = class.extends_error();
        Self {
            class,
            rooted_at_error,
        }
    }

    /// The class being matched against.
    #[must_use]
    pub fn class(&self) -> &ErrorClass {
        &self.class
    }

    /// Whether the class belongs to the generic `Error` lineage.
    #[must_use]
    pub fn rooted_at_error(&self) -> bool {
        self.rooted_at_error
    }

    pub(crate) fn is_match(&self, actual: &Rejection) -> bool {
        match actual {
            Rejection::Error(err) => self.class.is_instance(err),
            Rejection::Value(_) => false,
        }
    }
}

/// A property map compared structurally against the actual rejection.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    entries: Map<String, Value>,
    identity: Option<Identity>,
}

#[derive(Clone, Debug, PartialEq)]
struct Identity {
    name: String,
    message: String,
}

impl Shape {
    /// Shape over the given property map.
    #[must_use]
    pub fn new(entries: Map<String, Value>) -> Self {
        Self {
            entries,
            identity: None,
        }
    }

    /// Shape taken from an error value: its enumerable properties plus the
    /// `name` and `message` identity, which an error does not enumerate.
    #[must_use]
    pub fn from_error(error: &ErrorValue) -> Self {
        Self {
            entries: error.properties().clone(),
            identity: Some(Identity {
                name: error.name().to_string(),
                message: error.message().to_string(),
            }),
        }
    }

    /// The keys the evaluator compares.
    pub(crate) fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        if self.identity.is_some() {
            for forced in ["name", "message"] {
                if !self.entries.contains_key(forced) {
                    keys.push(forced);
                }
            }
        }
        keys
    }

    pub(crate) fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.entries.get(key) {
            return Some(value.clone());
        }
        match (&self.identity, key) {
            (Some(identity), "name") => Some(Value::String(identity.name.clone())),
            (Some(identity), "message") => Some(Value::String(identity.message.clone())),
            _ => None,
        }
    }

    /// The `name` this shape exposes, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        if let Some(Value::String(name)) = self.entries.get("name") {
            return Some(name);
        }
        self.identity.as_ref().map(|identity| identity.name.as_str())
    }

    /// Deep structural match of every expected key against `actual`.
    #[must_use]
    pub fn matches(&self, actual: &Rejection) -> bool {
        self.keys().iter().all(|key| {
            match (actual.property(key), self.get(key)) {
                (Some(actual_value), Some(expected_value)) => actual_value == expected_value,
                _ => false,
            }
        })
    }

    /// Project a rejection down to exactly the compared keys.
    pub(crate) fn project_actual(&self, actual: &Rejection) -> Value {
        let mut map = Map::new();
        for key in self.keys() {
            if let Some(value) = actual.property(key) {
                map.insert(key.to_string(), value);
            }
        }
        Value::Object(map)
    }

    /// Project the shape itself down to the compared keys.
    pub(crate) fn project_expected(&self) -> Value {
        let mut map = Map::new();
        for key in self.keys() {
            if let Some(value) = self.get(key) {
                map.insert(key.to_string(), value);
            }
        }
        Value::Object(map)
    }
}

/// The expectation descriptor: what a failure must look like to match.
#[derive(Debug)]
pub enum Expected {
    /// A regular expression tested against the stringified failure.
    Pattern(Regex),
    /// A constructor-like class; matches instances of its lineage.
    Class(ClassExpectation),
    /// A custom validation callable.
    Predicate(Predicate),
    /// A property map compared via deep equality.
    Shape(Shape),
    /// A literal string: stands in for an omitted message, ambiguous
    /// anywhere else.
    Text(String),
}

impl Expected {
    /// Pattern expectation.
    #[must_use]
    pub fn pattern(regex: Regex) -> Self {
        Expected::Pattern(regex)
    }

    /// Predicate-class expectation.
    ///
    /// The lineage capability check runs here, once.
    #[must_use]
    pub fn class(class: ErrorClass) -> Self {
        Expected::Class(ClassExpectation::new(class))
    }

    /// Anonymous predicate expectation.
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&Rejection) -> bool + Send + Sync + 'static,
    {
        Expected::Predicate(Predicate {
            name: None,
            check: Box::new(check),
        })
    }

    /// Named predicate expectation.
    pub fn predicate_named<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Rejection) -> bool + Send + Sync + 'static,
    {
        Expected::Predicate(Predicate {
            name: Some(name.into()),
            check: Box::new(check),
        })
    }

    /// Shape expectation over a property map.
    #[must_use]
    pub fn shape(entries: Map<String, Value>) -> Self {
        Expected::Shape(Shape::new(entries))
    }

    /// Shape expectation taken from an error value; `name` and `message`
    /// join the compared keys.
    #[must_use]
    pub fn error(error: &ErrorValue) -> Self {
        Expected::Shape(Shape::from_error(error))
    }

    /// Literal string in the expectation slot.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Expected::Text(text.into())
    }

    /// The descriptor's name, when it carries one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Expected::Class(class) => Some(class.class().name()),
            Expected::Shape(shape) => shape.name(),
            Expected::Predicate(predicate) => predicate.name(),
            Expected::Pattern(_) | Expected::Text(_) => None,
        }
    }

    /// JSON-ish type name for argument diagnostics.
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Expected::Pattern(_) => "regexp",
            Expected::Class(_) | Expected::Predicate(_) => "function",
            Expected::Shape(_) => "object",
            Expected::Text(_) => "string",
        }
    }

    /// Diagnostic projection of the descriptor.
    pub(crate) fn to_value(&self) -> Value {
        match self {
            Expected::Pattern(regex) => Value::String(regex.as_str().to_string()),
            Expected::Class(class) => Value::String(class.class().name().to_string()),
            Expected::Predicate(predicate) => {
                Value::String(predicate.name().unwrap_or("<predicate>").to_string())
            }
            Expected::Shape(shape) => shape.project_expected(),
            Expected::Text(text) => Value::String(text.clone()),
        }
    }
}

impl From<Regex> for Expected {
    fn from(regex: Regex) -> Self {
        Expected::Pattern(regex)
    }
}

impl From<ErrorClass> for Expected {
    fn from(class: ErrorClass) -> Self {
        Expected::class(class)
    }
}

impl From<&ErrorValue> for Expected {
    fn from(error: &ErrorValue) -> Self {
        Expected::error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn type_error(message: &str) -> ErrorValue {
        ErrorValue::new(ErrorClass::type_error(), message)
    }

    fn entries(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object literal, got {other}"),
        }
    }

    #[test]
    fn test_shape_matches_a_property_subset() {
        let actual = Rejection::Error(
            type_error("Wrong type").with_property("code", json!("ERR_INVALID_ARG_TYPE")),
        );
        let shape = Shape::new(entries(json!({
            "name": "TypeError",
            "code": "ERR_INVALID_ARG_TYPE"
        })));
        assert!(shape.matches(&actual));
    }

    #[test]
    fn test_shape_rejects_a_wrong_value() {
        let actual = Rejection::Error(
            type_error("Wrong type").with_property("code", json!("ERR_INVALID_ARG_TYPE")),
        );
        let shape = Shape::new(entries(json!({ "code": "ERR_INVALID_RETURN_VALUE" })));
        assert!(!shape.matches(&actual));
    }

    #[test]
    fn test_shape_rejects_a_missing_key() {
        let actual = Rejection::Error(type_error("Wrong type"));
        let shape = Shape::new(entries(json!({ "reason": "Some reason" })));
        assert!(!shape.matches(&actual));
    }

    #[test]
    fn test_error_shape_forces_identity_keys() {
        let descriptor = type_error("Wrong type");
        let shape = Shape::from_error(&descriptor);
        assert_eq!(shape.keys(), vec!["name", "message"]);

        let matching = Rejection::Error(
            type_error("Wrong type").with_property("code", json!("ERR_INVALID_ARG_TYPE")),
        );
        assert!(shape.matches(&matching));

        let wrong_message = Rejection::Error(type_error("Another message"));
        assert!(!shape.matches(&wrong_message));
    }

    #[test]
    fn test_projections_are_restricted_to_compared_keys() {
        let actual = Rejection::Error(
            type_error("Wrong type")
                .with_property("code", json!("ERR_INVALID_ARG_TYPE"))
                .with_property("ignored", json!(true)),
        );
        let shape = Shape::new(entries(json!({ "name": "Error", "code": "other" })));

        assert_eq!(
            shape.project_actual(&actual),
            json!({ "name": "TypeError", "code": "ERR_INVALID_ARG_TYPE" })
        );
        assert_eq!(
            shape.project_expected(),
            json!({ "name": "Error", "code": "other" })
        );
    }

    #[test]
    fn test_shape_never_matches_a_primitive() {
        let shape = Shape::new(entries(json!({ "name": "Error" })));
        assert!(!shape.matches(&Rejection::Value(json!(42))));
    }

    #[test]
    fn test_descriptor_names() {
        assert_eq!(
            Expected::class(ErrorClass::type_error()).name(),
            Some("TypeError")
        );
        assert_eq!(
            Expected::shape(entries(json!({ "name": "TypeError" }))).name(),
            Some("TypeError")
        );
        assert_eq!(Expected::error(&type_error("x")).name(), Some("TypeError"));
        assert_eq!(
            Expected::predicate_named("looks_transient", |_| true).name(),
            Some("looks_transient")
        );
        assert_eq!(Expected::pattern(Regex::new("x").unwrap()).name(), None);
        assert_eq!(Expected::text("x").name(), None);
    }

    #[test]
    fn test_class_expectation_capability_is_resolved_up_front() {
        let rooted = Expected::class(ErrorClass::subclass("CustomError", &ErrorClass::base()));
        let detached = Expected::class(ErrorClass::standalone("NotAnError"));
        match (rooted, detached) {
            (Expected::Class(rooted), Expected::Class(detached)) => {
                assert!(rooted.rooted_at_error());
                assert!(!detached.rooted_at_error());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_class_expectation_only_matches_error_values() {
        let expectation = ClassExpectation::new(ErrorClass::base());
        assert!(expectation.is_match(&Rejection::Error(type_error("x"))));
        assert!(!expectation.is_match(&Rejection::Value(json!("Error: x"))));
    }
}
