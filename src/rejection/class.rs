//! Class lineage for error-like rejection values.
//!
//! [`ErrorClass`] stands in for a constructor and its ancestry chain. The
//! canonical classes are process-wide singletons compared by identity;
//! [`ErrorClass::subclass`] declares a new class parented on an existing
//! lineage, and each declaration is a distinct class even under a repeated
//! name, the same way a second realm yields distinct constructors.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::ErrorValue;

/// Name of the root of the canonical error lineage.
const BASE_NAME: &str = "Error";

static BASE: Lazy<ErrorClass> = Lazy::new(|| ErrorClass::canonical_root(BASE_NAME));
static TYPE_ERROR: Lazy<ErrorClass> = Lazy::new(|| ErrorClass::canonical("TypeError"));
static RANGE_ERROR: Lazy<ErrorClass> = Lazy::new(|| ErrorClass::canonical("RangeError"));
static SYNTAX_ERROR: Lazy<ErrorClass> = Lazy::new(|| ErrorClass::canonical("SyntaxError"));

/// A constructor-like descriptor with an ancestry chain.
///
/// Instance checks walk the ancestry comparing identity, never names; two
/// classes are the same class only if they share one allocation.
#[derive(Clone)]
pub struct ErrorClass(Arc<Inner>);

struct Inner {
    name: String,
    parent: Option<ErrorClass>,
    native: bool,
}

impl ErrorClass {
    fn canonical_root(name: &str) -> Self {
        Self(Arc::new(Inner {
            name: name.to_string(),
            parent: None,
            native: true,
        }))
    }

    fn canonical(name: &str) -> Self {
        Self(Arc::new(Inner {
            name: name.to_string(),
            parent: Some(Self::base()),
            native: true,
        }))
    }

    /// The canonical base `Error` class.
    #[must_use]
    pub fn base() -> Self {
        BASE.clone()
    }

    /// The canonical `TypeError` class.
    #[must_use]
    pub fn type_error() -> Self {
        TYPE_ERROR.clone()
    }

    /// The canonical `RangeError` class.
    #[must_use]
    pub fn range_error() -> Self {
        RANGE_ERROR.clone()
    }

    /// The canonical `SyntaxError` class.
    #[must_use]
    pub fn syntax_error() -> Self {
        SYNTAX_ERROR.clone()
    }

    /// Declare a subclass parented on `parent`.
    ///
    /// Every call creates a distinct class; re-declaring a subclass with the
    /// same name does not produce the same class.
    #[must_use]
    pub fn subclass(name: impl Into<String>, parent: &ErrorClass) -> Self {
        Self(Arc::new(Inner {
            name: name.into(),
            parent: Some(parent.clone()),
            native: false,
        }))
    }

    /// Declare a class outside the error lineage entirely.
    #[must_use]
    pub fn standalone(name: impl Into<String>) -> Self {
        Self(Arc::new(Inner {
            name: name.into(),
            parent: None,
            native: false,
        }))
    }

    /// The class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The parent class, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&ErrorClass> {
        self.0.parent.as_ref()
    }

    /// Whether this is one of the canonical classes rather than a
    /// [`subclass`](Self::subclass) declaration.
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.0.native
    }

    /// Identity comparison: same allocation, same class.
    #[must_use]
    pub fn same_class(&self, other: &ErrorClass) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Walk `value`'s ancestry looking for this class, by identity.
    #[must_use]
    pub fn is_instance(&self, value: &ErrorValue) -> bool {
        let mut current = Some(value.class().clone());
        while let Some(class) = current {
            if class.same_class(self) {
                return true;
            }
            current = class.0.parent.clone();
        }
        false
    }

    /// Membership of the generic `Error` lineage.
    ///
    /// Tested by name rather than identity so it holds for re-declared
    /// classes whose chain does not share the canonical allocations.
    #[must_use]
    pub fn extends_error(&self) -> bool {
        let mut current = Some(self.clone());
        while let Some(class) = current {
            if class.name() == BASE_NAME {
                return true;
            }
            current = class.0.parent.clone();
        }
        false
    }
}

impl fmt::Debug for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorClass")
            .field("name", &self.0.name)
            .field("native", &self.0.native)
            .finish()
    }
}

impl PartialEq for ErrorClass {
    fn eq(&self, other: &Self) -> bool {
        self.same_class(other)
    }
}

impl Eq for ErrorClass {}
