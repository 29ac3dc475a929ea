//! Buscar: predicate-matching engine for mobile UI test automation.
//!
//! A test runner describes the element it wants declaratively — by
//! identifier, label, text, type, accessibility traits, position in the
//! element tree, or any boolean combination of those — and Buscar compiles
//! that description into an executable matcher over the app's captured
//! view hierarchy.
//!
//! # Architecture
//!
//! ```text
//! structural description ──► PredicateBuilder ──► Predicate tree
//!                                                      │
//!                              Display (diagnostics) ◄─┼─► compile()
//!                                                      │
//!                                                  Matcher ──► element tree search
//! ```
//!
//! The predicate kinds form a closed set; compilation and rendering are
//! exhaustive matches over it. Construction is all-or-nothing, evaluation
//! is pure and synchronous, and nothing is shared or mutated after a tree
//! is built.
//!
//! # Example
//!
//! ```
//! use buscar::{PredicateBuilder, TypeRegistry, ViewSnapshot};
//!
//! let mut registry = TypeRegistry::new();
//! registry.register("UIView");
//! registry.register_subclass("UIButton", "UIView");
//!
//! let builder = PredicateBuilder::new(registry);
//! let predicate = builder.build(&serde_json::json!({
//!     "type": "id",
//!     "value": "submitBtn",
//! }))?;
//!
//! let button = ViewSnapshot::builder("UIButton")
//!     .identifier("submitBtn")
//!     .build();
//!
//! assert!(predicate.compile().matches(&button));
//! assert_eq!(
//!     predicate.to_string(),
//!     "accessibilityIdentifier == \"submitBtn\"",
//! );
//! # Ok::<(), buscar::BuscarError>(())
//! ```

#![warn(missing_docs)]

mod builder;
mod element;
mod matcher;
mod predicate;
mod resolver;
mod result;
mod traits;

pub use builder::PredicateBuilder;
pub use element::{Element, ViewBuilder, ViewSnapshot};
pub use matcher::Matcher;
pub use predicate::{Field, Modifiers, Predicate};
pub use resolver::{TypeHandle, TypeRegistry, TypeResolver};
pub use result::{BuscarError, BuscarResult};
pub use traits::AccessibilityTraits;
