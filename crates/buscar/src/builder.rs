//! Construction of predicate trees from structural descriptions.
//!
//! The runner's wire transport delivers a query as a nested JSON mapping:
//!
//! ```text
//! { "type": <kind>, "value": <scalar|list>, "modifiers": [string, ...]?,
//!   "predicate": <nested>?, "predicates": [<nested>, ...]? }
//! ```
//!
//! [`PredicateBuilder`] validates and expands that description into a
//! [`Predicate`] tree. Construction is all-or-nothing: children are built
//! before their parent is assembled, and any failure aborts the whole
//! build.
//!
//! Two kinds expand beyond a single leaf. A `text` query must match every
//! text-bearing element kind (text view, text field, label, and the React
//! Native text component when the app ships one), so it becomes an AND of
//! the text comparison with an OR over those types. A `label` query against
//! a React Native app must not double-count the label that the framework
//! repeats on a nested text child, so it additionally requires that no
//! descendant satisfies the same label on the framework's text type.

use serde_json::Value;
use tracing::{debug, trace};

use crate::predicate::{Field, Modifiers, Predicate};
use crate::resolver::{TypeHandle, TypeResolver};
use crate::result::{BuscarError, BuscarResult};

mod keys {
    pub const KIND: &str = "type";
    pub const VALUE: &str = "value";
    pub const MODIFIERS: &str = "modifiers";
    pub const PREDICATE: &str = "predicate";
    pub const PREDICATES: &str = "predicates";
}

mod kinds {
    pub const ID: &str = "id";
    pub const LABEL: &str = "label";
    pub const VALUE: &str = "value";
    pub const TEXT: &str = "text";
    pub const TYPE: &str = "type";
    pub const TRAITS: &str = "traits";
    pub const ANCESTOR: &str = "ancestor";
    pub const DESCENDANT: &str = "descendant";
    pub const AND: &str = "and";
}

/// Native text-bearing classes a `text` query applies to.
const TEXT_VIEW_CLASS: &str = "UITextView";
const TEXT_FIELD_CLASS: &str = "UITextField";
const LABEL_CLASS: &str = "UILabel";

/// React Native text component candidates, tried in order; which one exists
/// depends on the framework version the app ships.
const REACT_TEXT_CLASSES: [&str; 2] = ["RCTText", "RCTTextView"];

/// Builds predicate trees from structural descriptions.
///
/// Holds the type resolver and the app-capability configuration the
/// kind-specific expansion rules depend on, so building is deterministic
/// and free of process-wide state.
#[derive(Debug, Clone)]
pub struct PredicateBuilder<R> {
    resolver: R,
    react_native: bool,
}

impl<R: TypeResolver> PredicateBuilder<R> {
    /// Create a builder for an app that does not use React Native
    #[must_use]
    pub const fn new(resolver: R) -> Self {
        Self {
            resolver,
            react_native: false,
        }
    }

    /// Set whether the app under test is built with React Native
    #[must_use]
    pub const fn with_react_native(mut self, enabled: bool) -> Self {
        self.react_native = enabled;
        self
    }

    /// Build a predicate tree from a structural description.
    ///
    /// Fails on malformed descriptions, unknown kinds, unknown trait
    /// tokens, and class names the resolver cannot resolve; no partially
    /// built tree is ever returned.
    pub fn build(&self, description: &Value) -> BuscarResult<Predicate> {
        let kind = require_str(description, keys::KIND)?;
        let modifiers = parse_modifiers(description);
        trace!(kind, "building predicate node");

        match kind {
            kinds::TRAITS => {
                let tokens = require_string_array(description, keys::VALUE)?;
                Predicate::traits(tokens, modifiers)
            }
            kinds::TYPE => {
                let class_name = require_str(description, keys::VALUE)?;
                Ok(Predicate::kind_of(self.resolve(class_name)?, modifiers))
            }
            kinds::LABEL => {
                let label = require_str(description, keys::VALUE)?;
                self.build_label(label, modifiers)
            }
            kinds::TEXT => {
                let text = require_str(description, keys::VALUE)?;
                self.build_text(text, modifiers)
            }
            kinds::ID => Ok(Predicate::value(
                Field::Identifier,
                require_scalar(description, keys::VALUE)?,
                modifiers,
            )),
            kinds::VALUE => Ok(Predicate::value(
                Field::Value,
                require_scalar(description, keys::VALUE)?,
                modifiers,
            )),
            kinds::ANCESTOR => {
                let child = self.build(require_field(description, keys::PREDICATE)?)?;
                Ok(Predicate::ancestor(child, modifiers))
            }
            kinds::DESCENDANT => {
                let child = self.build(require_field(description, keys::PREDICATE)?)?;
                Ok(Predicate::descendant(child, modifiers))
            }
            kinds::AND => self.build_and(description, modifiers),
            other => Err(BuscarError::UnknownPredicateKind {
                kind: other.to_string(),
            }),
        }
    }

    /// Build a predicate from a JSON-encoded structural description, as
    /// delivered by the wire transport.
    pub fn build_from_str(&self, description: &str) -> BuscarResult<Predicate> {
        let description: Value = serde_json::from_str(description)?;
        self.build(&description)
    }

    /// A label query matches the element's accessibility label. React
    /// Native repeats a component's label on a nested text child, so there
    /// the match must also fail for any descendant carrying the same label
    /// on the framework's text type.
    fn build_label(&self, label: &str, modifiers: Modifiers) -> BuscarResult<Predicate> {
        let base = Predicate::value(Field::Label, label, modifiers.clone());
        if !self.react_native {
            return Ok(base);
        }

        debug!(label, "expanding label query for React Native text nesting");
        let text_class = self.resolve_react_text_class()?;
        let nested_label = Predicate::all_of(
            vec![
                Predicate::kind_of(text_class, Modifiers::none()),
                Predicate::value(Field::Label, label, modifiers),
            ],
            Modifiers::none(),
        );
        Ok(Predicate::all_of(
            vec![
                base,
                Predicate::descendant(nested_label, Modifiers::not()),
            ],
            Modifiers::none(),
        ))
    }

    /// A text query applies uniformly across all text-bearing element
    /// kinds: the comparison holds AND the element is one of the known
    /// text types.
    fn build_text(&self, text: &str, modifiers: Modifiers) -> BuscarResult<Predicate> {
        let mut type_predicates = vec![
            Predicate::kind_of(self.resolve(TEXT_VIEW_CLASS)?, Modifiers::none()),
            Predicate::kind_of(self.resolve(TEXT_FIELD_CLASS)?, Modifiers::none()),
            Predicate::kind_of(self.resolve(LABEL_CLASS)?, Modifiers::none()),
        ];
        if self.react_native {
            type_predicates.push(Predicate::kind_of(
                self.resolve_react_text_class()?,
                Modifiers::none(),
            ));
        }

        Ok(Predicate::all_of(
            vec![
                Predicate::value(Field::Text, text, modifiers),
                Predicate::any_of(type_predicates, Modifiers::none()),
            ],
            Modifiers::none(),
        ))
    }

    fn build_and(&self, description: &Value, modifiers: Modifiers) -> BuscarResult<Predicate> {
        let entries = require_field(description, keys::PREDICATES)?
            .as_array()
            .ok_or(BuscarError::InvalidField {
                field: keys::PREDICATES,
                expected: "an array",
            })?;
        let mut children = entries
            .iter()
            .map(|entry| self.build(entry))
            .collect::<BuscarResult<Vec<_>>>()?;

        match children.len() {
            0 => Err(BuscarError::InvalidField {
                field: keys::PREDICATES,
                expected: "a non-empty array",
            }),
            // a single-child conjunction is the child itself
            1 => Ok(children.remove(0)),
            _ => Ok(Predicate::all_of(children, modifiers)),
        }
    }

    fn resolve(&self, class_name: &str) -> BuscarResult<TypeHandle> {
        self.resolver
            .resolve(class_name)
            .ok_or_else(|| BuscarError::UnknownClass {
                class_name: class_name.to_string(),
            })
    }

    fn resolve_react_text_class(&self) -> BuscarResult<TypeHandle> {
        REACT_TEXT_CLASSES
            .iter()
            .find_map(|class_name| self.resolver.resolve(class_name))
            .ok_or_else(|| BuscarError::MissingTextClass {
                tried: REACT_TEXT_CLASSES.join(", "),
            })
    }
}

fn require_field<'a>(description: &'a Value, field: &'static str) -> BuscarResult<&'a Value> {
    description
        .get(field)
        .ok_or(BuscarError::MissingField { field })
}

fn require_str<'a>(description: &'a Value, field: &'static str) -> BuscarResult<&'a str> {
    require_field(description, field)?
        .as_str()
        .ok_or(BuscarError::InvalidField {
            field,
            expected: "a string",
        })
}

/// Scalar comparison values arrive as strings, numbers, or bools; all are
/// compared through their printable form.
fn require_scalar(description: &Value, field: &'static str) -> BuscarResult<String> {
    match require_field(description, field)? {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(BuscarError::InvalidField {
            field,
            expected: "a string, number, or bool",
        }),
    }
}

fn require_string_array(description: &Value, field: &'static str) -> BuscarResult<Vec<String>> {
    require_field(description, field)?
        .as_array()
        .and_then(|entries| {
            entries
                .iter()
                .map(|entry| entry.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or(BuscarError::InvalidField {
            field,
            expected: "an array of strings",
        })
}

/// The `modifiers` field is optional; anything other than an array of
/// strings is treated as absent.
fn parse_modifiers(description: &Value) -> Modifiers {
    description
        .get(keys::MODIFIERS)
        .and_then(Value::as_array)
        .and_then(|entries| {
            entries
                .iter()
                .map(|entry| entry.as_str().map(str::to_string))
                .collect::<Option<Modifiers>>()
        })
        .unwrap_or_default()
}
