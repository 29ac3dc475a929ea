//! Element interface consumed by compiled matchers, plus the in-memory
//! snapshot implementation the runner matches against.
//!
//! A matcher never talks to the live app. The platform bridge captures the
//! on-screen view hierarchy into an immutable [`ViewSnapshot`] tree and the
//! search walks that. Anything exposing the same accessors can implement
//! [`Element`] instead; tests in this crate use [`ViewSnapshot`] directly.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::traits::AccessibilityTraits;

/// A node in the UI's on-screen hierarchy.
///
/// Implementations are cheap handles: `Clone` is expected to copy a
/// reference, not the subtree.
pub trait Element: Clone {
    /// The element's accessibility identifier, if set
    fn identifier(&self) -> Option<String>;

    /// The element's accessibility label, if set
    fn label(&self) -> Option<String>;

    /// The element's visible text content, if any
    fn text(&self) -> Option<String>;

    /// The element's accessibility value, if set
    fn value(&self) -> Option<String>;

    /// The element's dynamic type name (class name)
    fn type_name(&self) -> String;

    /// The element's accessibility trait bitmask
    fn traits(&self) -> AccessibilityTraits;

    /// The element's parent, or `None` at the root of the hierarchy
    fn parent(&self) -> Option<Self>;

    /// The element's direct children, in document order
    fn children(&self) -> Vec<Self>;

    /// Every element in the subtree rooted here, pre-order, excluding the
    /// receiver itself.
    ///
    /// The exclusion matters: a descendant query must never be satisfied by
    /// the element it starts from.
    fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack = self.children();
        stack.reverse();
        while let Some(node) = stack.pop() {
            let mut kids = node.children();
            kids.reverse();
            out.push(node);
            stack.append(&mut kids);
        }
        out
    }

    /// The receiver followed by [`Element::descendants`]: the enumeration a
    /// whole-tree search walks.
    fn subtree(&self) -> Vec<Self> {
        let mut out = vec![self.clone()];
        out.extend(self.descendants());
        out
    }
}

struct SnapshotNode {
    type_name: String,
    identifier: Option<String>,
    label: Option<String>,
    text: Option<String>,
    value: Option<String>,
    traits: AccessibilityTraits,
    parent: RefCell<Weak<SnapshotNode>>,
    children: Vec<Rc<SnapshotNode>>,
}

/// An immutable, in-memory capture of a view hierarchy.
///
/// Nodes are reference-counted handles; cloning a snapshot clones the
/// handle, not the tree. Parent links are weak, so dropping the root drops
/// the whole capture.
#[derive(Clone)]
pub struct ViewSnapshot {
    inner: Rc<SnapshotNode>,
}

impl ViewSnapshot {
    /// Start building a snapshot node of the given type
    #[must_use]
    pub fn builder(type_name: impl Into<String>) -> ViewBuilder {
        ViewBuilder::new(type_name)
    }
}

impl Element for ViewSnapshot {
    fn identifier(&self) -> Option<String> {
        self.inner.identifier.clone()
    }

    fn label(&self) -> Option<String> {
        self.inner.label.clone()
    }

    fn text(&self) -> Option<String> {
        self.inner.text.clone()
    }

    fn value(&self) -> Option<String> {
        self.inner.value.clone()
    }

    fn type_name(&self) -> String {
        self.inner.type_name.clone()
    }

    fn traits(&self) -> AccessibilityTraits {
        self.inner.traits
    }

    fn parent(&self) -> Option<Self> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| Self { inner })
    }

    fn children(&self) -> Vec<Self> {
        self.inner
            .children
            .iter()
            .map(|child| Self {
                inner: Rc::clone(child),
            })
            .collect()
    }
}

impl fmt::Debug for ViewSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewSnapshot")
            .field("type_name", &self.inner.type_name)
            .field("identifier", &self.inner.identifier)
            .field("children", &self.inner.children.len())
            .finish_non_exhaustive()
    }
}

/// Builder for a [`ViewSnapshot`] node.
///
/// Children are attached bottom-up: build the leaves first, then pass them
/// to their parent's builder. `build` freezes the node and wires the
/// children's parent links back to it.
#[derive(Debug)]
pub struct ViewBuilder {
    type_name: String,
    identifier: Option<String>,
    label: Option<String>,
    text: Option<String>,
    value: Option<String>,
    traits: AccessibilityTraits,
    children: Vec<ViewSnapshot>,
}

impl ViewBuilder {
    fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            identifier: None,
            label: None,
            text: None,
            value: None,
            traits: AccessibilityTraits::NONE,
            children: Vec::new(),
        }
    }

    /// Set the accessibility identifier
    #[must_use]
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the accessibility label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the text content
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the accessibility value
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the accessibility trait bitmask
    #[must_use]
    pub const fn traits(mut self, traits: AccessibilityTraits) -> Self {
        self.traits = traits;
        self
    }

    /// Append a child node. A node belongs to at most one parent; attaching
    /// it elsewhere re-points its parent link.
    #[must_use]
    pub fn child(mut self, child: ViewSnapshot) -> Self {
        self.children.push(child);
        self
    }

    /// Freeze the node and wire its children's parent links
    #[must_use]
    pub fn build(self) -> ViewSnapshot {
        let inner = Rc::new(SnapshotNode {
            type_name: self.type_name,
            identifier: self.identifier,
            label: self.label,
            text: self.text,
            value: self.value,
            traits: self.traits,
            parent: RefCell::new(Weak::new()),
            children: self
                .children
                .iter()
                .map(|child| Rc::clone(&child.inner))
                .collect(),
        });
        for child in &inner.children {
            *child.parent.borrow_mut() = Rc::downgrade(&inner);
        }
        ViewSnapshot { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ViewSnapshot {
        // root
        // ├── a
        // │   └── a1
        // └── b
        let a1 = ViewSnapshot::builder("UILabel").identifier("a1").build();
        let a = ViewSnapshot::builder("UIView")
            .identifier("a")
            .child(a1)
            .build();
        let b = ViewSnapshot::builder("UIButton").identifier("b").build();
        ViewSnapshot::builder("UIWindow")
            .identifier("root")
            .child(a)
            .child(b)
            .build()
    }

    mod snapshot_tests {
        use super::*;

        #[test]
        fn test_accessors() {
            let node = ViewSnapshot::builder("UIButton")
                .identifier("submit")
                .label("Submit")
                .text("Submit")
                .value("enabled")
                .traits(AccessibilityTraits::BUTTON)
                .build();
            assert_eq!(node.identifier().as_deref(), Some("submit"));
            assert_eq!(node.label().as_deref(), Some("Submit"));
            assert_eq!(node.text().as_deref(), Some("Submit"));
            assert_eq!(node.value().as_deref(), Some("enabled"));
            assert_eq!(node.type_name(), "UIButton");
            assert_eq!(node.traits(), AccessibilityTraits::BUTTON);
        }

        #[test]
        fn test_unset_fields_are_none() {
            let node = ViewSnapshot::builder("UIView").build();
            assert!(node.identifier().is_none());
            assert!(node.label().is_none());
            assert!(node.text().is_none());
            assert!(node.value().is_none());
            assert!(node.traits().is_empty());
        }

        #[test]
        fn test_parent_links() {
            let root = sample_tree();
            let children = root.children();
            assert_eq!(children.len(), 2);
            let parent = children[0].parent().unwrap();
            assert_eq!(parent.identifier().as_deref(), Some("root"));
            assert!(root.parent().is_none());
        }

        #[test]
        fn test_grandchild_walks_to_root() {
            let root = sample_tree();
            let a = &root.children()[0];
            let a1 = &a.children()[0];
            let back = a1.parent().unwrap().parent().unwrap();
            assert_eq!(back.identifier().as_deref(), Some("root"));
        }
    }

    mod descendants_tests {
        use super::*;

        #[test]
        fn test_preorder_excluding_root() {
            let root = sample_tree();
            let ids: Vec<Option<String>> =
                root.descendants().iter().map(Element::identifier).collect();
            assert_eq!(
                ids,
                vec![
                    Some("a".to_string()),
                    Some("a1".to_string()),
                    Some("b".to_string()),
                ]
            );
        }

        #[test]
        fn test_leaf_has_no_descendants() {
            let leaf = ViewSnapshot::builder("UILabel").build();
            assert!(leaf.descendants().is_empty());
        }

        #[test]
        fn test_subtree_includes_root_first() {
            let root = sample_tree();
            let subtree = root.subtree();
            assert_eq!(subtree.len(), 4);
            assert_eq!(subtree[0].identifier().as_deref(), Some("root"));
        }
    }
}
