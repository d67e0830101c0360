//! # assert-rejects
//!
//! > Rejection matchers for async Rust
//!
//! **assert-rejects** settles a unit of async work and checks the outcome
//! against an expectation: [`rejects`] succeeds only when the work fails in
//! the expected way, [`does_not_reject`] only when it does not fail that
//! way.
//!
//! ## Quick Start
//!
//! ```rust
//! use assert_rejects::prelude::*;
//!
//! futures::executor::block_on(async {
//!     let boom = ErrorValue::new(ErrorClass::type_error(), "bad");
//!     let block = Block::thunk(move || rejected(boom));
//!
//!     rejects(block, Some(Expected::class(ErrorClass::type_error())), None)
//!         .await
//!         .unwrap();
//! });
//! ```
//!
//! ## How it works
//!
//! - 📦 **Block normalization** - a thunk or an already-pending operation
//!   becomes one [`Operation`]; wrong inputs become descriptive failures
//! - ⏳ **One suspend point** - the matcher awaits that operation once,
//!   then classifies the settlement synchronously
//! - 🔍 **Polymorphic expectations** - pattern, class lineage, predicate,
//!   or property shape, dispatched exhaustively
//! - 🧾 **Structured reports** - synthetic failures carry actual/expected
//!   projections and the matcher that produced them; non-matching failures
//!   propagate unchanged

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod block;
pub mod error;
pub mod expected;
pub mod matcher;
pub mod rejection;

mod diagnostic;

/// Prelude for convenient imports
///
/// ```rust
/// use assert_rejects::prelude::*;
/// ```
pub mod prelude {
    pub use crate::block::{fulfilled, rejected, Block, BlockValue, Operation, Settled};
    pub use crate::error::{AssertionFailure, Error, Result};
    pub use crate::expected::Expected;
    pub use crate::matcher::{does_not_reject, rejects};
    pub use crate::rejection::{ErrorClass, ErrorValue, Rejection};
}

// Re-exports
pub use block::{fulfilled, rejected, Block, BlockValue, Operation, Settled, Thunk};
pub use error::{AssertionFailure, Error, Result};
pub use expected::{ClassExpectation, Expected, Predicate, Shape};
pub use matcher::{does_not_reject, rejects};
pub use rejection::{ErrorClass, ErrorValue, Rejection};
