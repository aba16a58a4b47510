//! Owned element tree for rendering-service markup.
//!
//! Character data follows the element/text/tail model: `text` is the content
//! before an element's first child, `tail` is the content after its end tag
//! and before the next sibling. Text and attribute values stay in their
//! escaped markup form, so entity references pass through untouched.
//!
//! Nodes are addressed by index paths (`[2, 0, 5]` is the sixth child of the
//! first child of the root's third child). Structural edits gather paths
//! first and apply them afterwards, in reverse document order, so earlier
//! paths stay valid while later ones are removed.

/// Index path from a root node to one of its descendants.
pub type NodePath = Vec<usize>;

/// Element in a parsed markup tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    /// Element tag name (namespace prefixes already stripped).
    pub tag: String,
    /// Character data before the first child (escaped markup).
    pub text: String,
    /// Character data after this element's end tag (escaped markup).
    pub tail: String,
    /// Attributes in source order. Values are escaped markup.
    pub attrs: Vec<(String, String)>,
    /// Child elements.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new tree node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether this element has the given tag (ASCII case-insensitive).
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the attribute is present.
    #[must_use]
    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == key)
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attrs.push((key, value));
        }
    }

    /// Descendant at `path`, or `self` for an empty path.
    #[must_use]
    pub fn get(&self, path: &[usize]) -> Option<&TreeNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Mutable descendant at `path`, or `self` for an empty path.
    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut TreeNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// Path of the first descendant (document order) matching `pred`.
    ///
    /// The node itself is not considered.
    #[must_use]
    pub fn find_path(&self, pred: &impl Fn(&TreeNode) -> bool) -> Option<NodePath> {
        for (index, child) in self.children.iter().enumerate() {
            if pred(child) {
                return Some(vec![index]);
            }
            if let Some(mut path) = child.find_path(pred) {
                path.insert(0, index);
                return Some(path);
            }
        }
        None
    }

    /// Paths of all outermost descendants matching `pred`, in document order.
    ///
    /// Matching nodes are not searched further, so a match nested inside
    /// another match is not reported.
    #[must_use]
    pub fn outermost_paths(&self, pred: &impl Fn(&TreeNode) -> bool) -> Vec<NodePath> {
        let mut found = Vec::new();
        let mut prefix = Vec::new();
        self.collect_outermost(pred, &mut prefix, &mut found);
        found
    }

    fn collect_outermost(
        &self,
        pred: &impl Fn(&TreeNode) -> bool,
        prefix: &mut NodePath,
        found: &mut Vec<NodePath>,
    ) {
        for (index, child) in self.children.iter().enumerate() {
            prefix.push(index);
            if pred(child) {
                found.push(prefix.clone());
            } else {
                child.collect_outermost(pred, prefix, found);
            }
            prefix.pop();
        }
    }

    /// Index of the first direct child with the given tag.
    #[must_use]
    pub fn child_index(&self, tag: &str) -> Option<usize> {
        self.children.iter().position(|child| child.is(tag))
    }

    /// Visit this node and every descendant, parents before children.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut TreeNode)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    /// Remove the descendant at `path`, keeping its tail text in place.
    ///
    /// Returns `None` for an empty or dangling path.
    pub fn remove_at(&mut self, path: &[usize]) -> Option<TreeNode> {
        let (&index, parent_path) = path.split_last()?;
        let parent = self.get_mut(parent_path)?;
        (index < parent.children.len()).then(|| parent.remove_child(index))
    }

    /// Remove the child at `index`, keeping its tail text in place.
    ///
    /// The returned node has an empty tail.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_child(&mut self, index: usize) -> TreeNode {
        let mut removed = self.children.remove(index);
        let tail = std::mem::take(&mut removed.tail);
        self.push_text_before(index, &tail);
        removed
    }

    /// Insert a child at `index`.
    ///
    /// Text that preceded the insertion point stays before the new child.
    pub fn insert_child(&mut self, index: usize, child: TreeNode) {
        self.children.insert(index, child);
    }

    /// Replace the child at `index` with that child's own content.
    ///
    /// The wrapper's text joins the text before it, its children take its
    /// place in order, and its tail follows its last child.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn unwrap_child(&mut self, index: usize) {
        let mut wrapper = self.children.remove(index);
        let tail = std::mem::take(&mut wrapper.tail);
        self.push_text_before(index, &wrapper.text);

        let mut inner = std::mem::take(&mut wrapper.children);
        match inner.last_mut() {
            Some(last) => last.tail.push_str(&tail),
            None => self.push_text_before(index, &tail),
        }
        self.children.splice(index..index, inner);
    }

    /// Append text and children at the end of this node's content.
    pub fn append_content(&mut self, text: &str, children: Vec<TreeNode>) {
        append_text(self, text);
        self.children.extend(children);
    }

    /// Append text at the position just before child `index`.
    fn push_text_before(&mut self, index: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        match index.checked_sub(1).and_then(|i| self.children.get_mut(i)) {
            Some(prev) => prev.tail.push_str(text),
            None => self.text.push_str(text),
        }
    }
}

/// Append text to node's text or last child's tail.
pub(crate) fn append_text(node: &mut TreeNode, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}

/// A parsed markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Document type declaration content, e.g. `html`.
    pub doctype: Option<String>,
    /// Root element.
    pub root: TreeNode,
}

impl Document {
    /// Path of the first `body` element.
    #[must_use]
    pub fn body_path(&self) -> Option<NodePath> {
        self.root.find_path(&|node: &TreeNode| node.is("body"))
    }

    /// The first `body` element.
    #[must_use]
    pub fn body(&self) -> Option<&TreeNode> {
        self.root.get(&self.body_path()?)
    }

    /// Path of the first `head` element.
    #[must_use]
    pub fn head_path(&self) -> Option<NodePath> {
        self.root.find_path(&|node: &TreeNode| node.is("head"))
    }

    /// The `head` element, created as the root's first child when missing.
    pub fn head_mut(&mut self) -> &mut TreeNode {
        let path = self.head_path().unwrap_or_else(|| {
            self.root.insert_child(0, TreeNode::new("head"));
            vec![0]
        });
        path.iter()
            .fold(&mut self.root, |node, &index| &mut node.children[index])
    }
}
