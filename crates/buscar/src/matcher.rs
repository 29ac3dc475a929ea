//! Compilation of predicate trees into executable matchers.
//!
//! `compile` turns a [`Predicate`] into a boolean test over a single
//! element. Evaluation is pure and synchronous: leaf nodes read one element,
//! relational nodes walk the element tree around it (strictly upward for
//! ancestors, the root-excluded subtree for descendants), and compounds
//! short-circuit over their children in stored order. Nothing is cached
//! across calls; compiling the same tree twice yields independent matchers.

use crate::element::Element;
use crate::predicate::{Field, Predicate};

/// An executable boolean test over a single element.
pub struct Matcher<E> {
    test: Box<dyn Fn(&E) -> bool>,
}

impl<E: Element + 'static> Matcher<E> {
    fn new(test: impl Fn(&E) -> bool + 'static) -> Self {
        Self {
            test: Box::new(test),
        }
    }

    /// Evaluate the matcher against an element
    #[must_use]
    pub fn matches(&self, element: &E) -> bool {
        (self.test)(element)
    }
}

impl<E> std::fmt::Debug for Matcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher").finish_non_exhaustive()
    }
}

fn field_value<E: Element>(field: Field, element: &E) -> Option<String> {
    match field {
        Field::Identifier => element.identifier(),
        Field::Label => element.label(),
        Field::Text => element.text(),
        Field::TypeName => Some(element.type_name()),
        Field::Value => element.value(),
    }
}

impl Predicate {
    /// Compile this predicate into an executable matcher.
    ///
    /// The variant-specific inner test is computed first; if the node's
    /// modifiers contain the negation token, the result is inverted.
    #[must_use]
    pub fn compile<E: Element + 'static>(&self) -> Matcher<E> {
        let inner = self.compile_inner();
        if self.modifiers().negated() {
            Matcher::new(move |element: &E| !inner.matches(element))
        } else {
            inner
        }
    }

    fn compile_inner<E: Element + 'static>(&self) -> Matcher<E> {
        match self {
            Self::KindOf { handle, .. } => {
                let handle = handle.clone();
                Matcher::new(move |element: &E| handle.matches(&element.type_name()))
            }
            Self::Value { field, value, .. } => {
                let field = *field;
                let value = value.clone();
                Matcher::new(move |element: &E| {
                    field_value(field, element).is_some_and(|actual| actual == value)
                })
            }
            Self::Traits { traits, .. } => {
                let required = *traits;
                Matcher::new(move |element: &E| element.traits().contains(required))
            }
            Self::And { predicates, .. } => {
                let tests: Vec<Matcher<E>> = predicates.iter().map(|p| p.compile()).collect();
                Matcher::new(move |element: &E| tests.iter().all(|test| test.matches(element)))
            }
            Self::Or { predicates, .. } => {
                let tests: Vec<Matcher<E>> = predicates.iter().map(|p| p.compile()).collect();
                Matcher::new(move |element: &E| tests.iter().any(|test| test.matches(element)))
            }
            Self::Descendant { predicate, .. } => {
                let inner = predicate.compile();
                Matcher::new(move |element: &E| {
                    element
                        .descendants()
                        .iter()
                        .any(|descendant| inner.matches(descendant))
                })
            }
            Self::Ancestor { predicate, .. } => {
                let inner = predicate.compile();
                Matcher::new(move |element: &E| {
                    let mut current = element.parent();
                    while let Some(ancestor) = current {
                        if inner.matches(&ancestor) {
                            return true;
                        }
                        current = ancestor.parent();
                    }
                    false
                })
            }
        }
    }
}
