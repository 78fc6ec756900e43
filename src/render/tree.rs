//! Tree model of the entities being displayed
//!
//! The tree is the left-hand side of a time graph: one row per element, with
//! grouping nodes above the rows they contain. A [`TreeRender`] is an
//! immutable snapshot of that hierarchy, valid until the backing store's
//! attribute count changes.

use crate::store::AttributeId;
use std::sync::Arc;

/// One node of the displayed hierarchy
///
/// Elements with a source attribute produce state renders; pure grouping
/// nodes carry no attribute and never produce display intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeElement {
    name: String,
    source_attribute: Option<AttributeId>,
    children: Vec<Arc<TreeElement>>,
}

impl TreeElement {
    /// Create an element with an explicit attribute binding and children
    pub fn new(
        name: impl Into<String>,
        source_attribute: Option<AttributeId>,
        children: Vec<Arc<TreeElement>>,
    ) -> Self {
        Self {
            name: name.into(),
            source_attribute,
            children,
        }
    }

    /// Leaf element backed by a store attribute
    pub fn leaf(name: impl Into<String>, source_attribute: AttributeId) -> Self {
        Self::new(name, Some(source_attribute), Vec::new())
    }

    /// Pure grouping node with no attribute of its own
    pub fn group(name: impl Into<String>, children: Vec<Arc<TreeElement>>) -> Self {
        Self::new(name, None, children)
    }

    /// Display name of this element
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The store attribute this element renders, if any
    pub fn source_attribute(&self) -> Option<AttributeId> {
        self.source_attribute
    }

    /// Child elements, in display order
    pub fn children(&self) -> &[Arc<TreeElement>] {
        &self.children
    }
}

/// Immutable snapshot of the displayed tree
///
/// Its shape is a pure function of the store identity, the store's attribute
/// count and the sort/filter configuration; it is replaced, never mutated in
/// place. Snapshots are handed out as `Arc<TreeRender>` so a cache hit is
/// reference-identical to the previous answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRender {
    root: Arc<TreeElement>,
}

impl TreeRender {
    /// Create a render rooted at the given element
    pub fn new(root: Arc<TreeElement>) -> Self {
        Self { root }
    }

    /// The designated empty render, used when no tree can be produced
    pub fn empty() -> Self {
        Self::new(Arc::new(TreeElement::group("", Vec::new())))
    }

    /// Whether this is the empty render
    pub fn is_empty(&self) -> bool {
        self.root.name().is_empty()
            && self.root.source_attribute().is_none()
            && self.root.children().is_empty()
    }

    /// Root element of the tree
    pub fn root(&self) -> &Arc<TreeElement> {
        &self.root
    }

    /// All elements of the tree in preorder, root first
    pub fn all_elements(&self) -> Vec<Arc<TreeElement>> {
        let mut out = Vec::new();
        let mut stack = vec![Arc::clone(&self.root)];
        while let Some(element) = stack.pop() {
            for child in element.children().iter().rev() {
                stack.push(Arc::clone(child));
            }
            out.push(element);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> TreeRender {
        let leaf_a = Arc::new(TreeElement::leaf("a", 0));
        let leaf_b = Arc::new(TreeElement::leaf("b", 1));
        let leaf_c = Arc::new(TreeElement::leaf("c", 2));
        let group = Arc::new(TreeElement::group("group", vec![leaf_b, leaf_c]));
        TreeRender::new(Arc::new(TreeElement::group("root", vec![leaf_a, group])))
    }

    #[test]
    fn test_flatten_is_preorder() {
        let tree = sample_tree();
        let names: Vec<String> = tree
            .all_elements()
            .iter()
            .map(|e| e.name().to_owned())
            .collect();
        assert_eq!(names, vec!["root", "a", "group", "b", "c"]);
    }

    #[test]
    fn test_group_has_no_attribute() {
        let tree = sample_tree();
        assert_eq!(tree.root().source_attribute(), None);
        assert_eq!(tree.all_elements()[1].source_attribute(), Some(0));
    }

    #[test]
    fn test_empty_render() {
        assert!(TreeRender::empty().is_empty());
        assert!(!sample_tree().is_empty());
        assert_eq!(TreeRender::empty().all_elements().len(), 1);
    }
}
