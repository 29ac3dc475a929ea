//! The predicate data model and its human-readable rendering.
//!
//! A query is a tree of predicate nodes: leaf tests (field equality, type
//! kind-of, trait superset), boolean compounds (and/or), and relational
//! nodes whose truth depends on the element tree around the evaluated
//! element (ancestor/descendant). Each node carries a modifier set; only
//! the `"not"` modifier has semantic effect, inverting the node's result.
//!
//! Every node is constructed once and never mutated. A compound or
//! relational node exclusively owns its children, so the tree is acyclic by
//! construction. Compilation into an executable matcher lives in
//! [`crate::matcher`]; rendering mirrors the logical structure and is meant
//! for failure messages and logs, not for parsing back.

use std::collections::BTreeSet;
use std::fmt;

use crate::resolver::TypeHandle;
use crate::result::BuscarResult;
use crate::traits::AccessibilityTraits;

/// The element field a value predicate compares against.
///
/// The mapping from query kind to field is fixed: `id` reads the
/// accessibility identifier, `label` the accessibility label, `text` the
/// text content, `type` the class name, and `value` the accessibility
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Accessibility identifier
    Identifier,
    /// Accessibility label
    Label,
    /// Text content
    Text,
    /// Dynamic type name
    TypeName,
    /// Accessibility value
    Value,
}

impl Field {
    /// The key path name used when rendering the predicate
    #[must_use]
    pub const fn key_path(self) -> &'static str {
        match self {
            Self::Identifier => "accessibilityIdentifier",
            Self::Label => "accessibilityLabel",
            Self::Text => "text",
            Self::TypeName => "className",
            Self::Value => "accessibilityValue",
        }
    }
}

/// Modifier tokens attached to a predicate node.
///
/// Tokens are opaque strings; only [`Modifiers::NOT`] changes evaluation.
/// Unrecognized tokens are stored and ignored, so a newer runner can send
/// modifiers an older engine does not know about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    tokens: BTreeSet<String>,
}

impl Modifiers {
    /// The negation modifier token
    pub const NOT: &'static str = "not";

    /// The empty modifier set
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A modifier set containing exactly the negation token
    #[must_use]
    pub fn not() -> Self {
        std::iter::once(Self::NOT.to_string()).collect()
    }

    /// Whether the negation token is present
    #[must_use]
    pub fn negated(&self) -> bool {
        self.tokens.contains(Self::NOT)
    }

    /// Whether a given token is present
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Whether no token is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<String> for Modifiers {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// A node in a predicate tree.
///
/// The set of kinds is closed; compilation and rendering are exhaustive
/// matches over it, so adding a kind is a compile-time-visible change.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// The element's dynamic type is the resolved class or a subclass of it
    KindOf {
        /// The class name the handle was resolved from, kept for rendering
        class_name: String,
        /// The resolved type handle; present iff construction succeeded
        handle: TypeHandle,
        /// Modifier tokens for this node
        modifiers: Modifiers,
    },
    /// The selected element field equals the comparison value exactly
    Value {
        /// Which element field to read
        field: Field,
        /// The comparison value; equality is exact, never substring
        value: String,
        /// Modifier tokens for this node
        modifiers: Modifiers,
    },
    /// The element's trait bitmask contains every requested trait
    Traits {
        /// The token list as it appeared in the query, kept for rendering
        tokens: Vec<String>,
        /// The resolved trait bitmask
        traits: AccessibilityTraits,
        /// Modifier tokens for this node
        modifiers: Modifiers,
    },
    /// Every child predicate holds
    And {
        /// Child predicates, at least one, in query order
        predicates: Vec<Predicate>,
        /// Modifier tokens for this node
        modifiers: Modifiers,
    },
    /// At least one child predicate holds
    Or {
        /// Child predicates, at least one, in query order
        predicates: Vec<Predicate>,
        /// Modifier tokens for this node
        modifiers: Modifiers,
    },
    /// Some strict ancestor of the element satisfies the child predicate
    Ancestor {
        /// The relational target
        predicate: Box<Predicate>,
        /// Modifier tokens for this node
        modifiers: Modifiers,
    },
    /// Some strict descendant of the element satisfies the child predicate
    Descendant {
        /// The relational target
        predicate: Box<Predicate>,
        /// Modifier tokens for this node
        modifiers: Modifiers,
    },
}

impl Predicate {
    /// A kind-of predicate for an already-resolved type handle
    #[must_use]
    pub fn kind_of(handle: TypeHandle, modifiers: Modifiers) -> Self {
        Self::KindOf {
            class_name: handle.class_name().to_string(),
            handle,
            modifiers,
        }
    }

    /// An exact-equality predicate over an element field
    #[must_use]
    pub fn value(field: Field, value: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::Value {
            field,
            value: value.into(),
            modifiers,
        }
    }

    /// A trait-superset predicate from vocabulary tokens.
    ///
    /// Fails if any token is outside the trait vocabulary.
    pub fn traits<I>(tokens: I, modifiers: Modifiers) -> BuscarResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let traits = AccessibilityTraits::from_tokens(&tokens)?;
        Ok(Self::Traits {
            tokens,
            traits,
            modifiers,
        })
    }

    /// A conjunction of child predicates. Callers pass at least one child.
    #[must_use]
    pub fn all_of(predicates: Vec<Predicate>, modifiers: Modifiers) -> Self {
        debug_assert!(!predicates.is_empty());
        Self::And {
            predicates,
            modifiers,
        }
    }

    /// A disjunction of child predicates. Callers pass at least one child.
    #[must_use]
    pub fn any_of(predicates: Vec<Predicate>, modifiers: Modifiers) -> Self {
        debug_assert!(!predicates.is_empty());
        Self::Or {
            predicates,
            modifiers,
        }
    }

    /// An ancestor predicate wrapping a relational target
    #[must_use]
    pub fn ancestor(predicate: Predicate, modifiers: Modifiers) -> Self {
        Self::Ancestor {
            predicate: Box::new(predicate),
            modifiers,
        }
    }

    /// A descendant predicate wrapping a relational target
    #[must_use]
    pub fn descendant(predicate: Predicate, modifiers: Modifiers) -> Self {
        Self::Descendant {
            predicate: Box::new(predicate),
            modifiers,
        }
    }

    /// This node's modifier set
    #[must_use]
    pub fn modifiers(&self) -> &Modifiers {
        match self {
            Self::KindOf { modifiers, .. }
            | Self::Value { modifiers, .. }
            | Self::Traits { modifiers, .. }
            | Self::And { modifiers, .. }
            | Self::Or { modifiers, .. }
            | Self::Ancestor { modifiers, .. }
            | Self::Descendant { modifiers, .. } => modifiers,
        }
    }

    /// Whether this node is a boolean compound (and/or)
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::And { .. } | Self::Or { .. })
    }

    const fn operator_label(&self) -> &'static str {
        match self {
            Self::Ancestor { .. } => "ANCESTOR",
            Self::Descendant { .. } => "DESCENDANT",
            _ => "",
        }
    }

    fn fmt_inner(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindOf { class_name, .. } => write!(f, "class ⊇ \"{class_name}\""),
            Self::Value { field, value, .. } => {
                write!(f, "{} == \"{value}\"", field.key_path())
            }
            Self::Traits { tokens, .. } => {
                write!(f, "traits ⊇ \"[{}]\"", tokens.join(", "))
            }
            Self::And { predicates, .. } => fmt_children(f, predicates, " && "),
            Self::Or { predicates, .. } => fmt_children(f, predicates, " || "),
            Self::Ancestor { predicate, .. } | Self::Descendant { predicate, .. } => {
                write!(f, "{predicate}")
            }
        }
    }
}

fn fmt_children(f: &mut fmt::Formatter<'_>, children: &[Predicate], separator: &str) -> fmt::Result {
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        if child.is_compound() {
            write!(f, "({child})")?;
        } else {
            write!(f, "{child}")?;
        }
    }
    Ok(())
}

impl fmt::Display for Predicate {
    /// Stable diagnostic rendering mirroring the tree's logical structure.
    ///
    /// A negated node is wrapped in `NOT (...)`; relational nodes prepend
    /// their operator label (`ANCESTOR`/`DESCENDANT`); inner content is
    /// parenthesized iff either of those applies.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negated = self.modifiers().negated();
        let operator = self.operator_label();
        let parenthesized = negated || !operator.is_empty();

        if negated {
            f.write_str("NOT ")?;
        }
        f.write_str(operator)?;
        if parenthesized {
            f.write_str("(")?;
        }
        self.fmt_inner(f)?;
        if parenthesized {
            f.write_str(")")?;
        }
        Ok(())
    }
}
