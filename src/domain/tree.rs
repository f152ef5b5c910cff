// ============================================================
// Layer 3 — DOM Tree
// ============================================================
// An HTML document parsed into an arena of nodes.
//
// Nodes live in a Vec and refer to each other by NodeId
// (an index into that Vec), so the parent <-> child links
// never fight the borrow checker:
//
//   nodes: [ html, head, title, body, div, p ]
//   html.children  = [head, body]
//   body.parent    = Some(html)
//
// The PATH is the addressable index space used for sampling.
// It is a post-order walk from the root, so children come
// before their parent and the root is always the LAST entry:
//
//   html
//    ├── head
//    │    └── title          path = [title, head, div, p, body, html]
//    └── body                        0      1    2   3   4     5
//         ├── div
//         └── p
//
// Every structural mutation (add_child, detach, prune) rebuilds
// the path before returning, so a position read from path()
// always points at a node that is still attached.
//
// Detached nodes stay in the arena but become unreachable;
// only the path decides what "is in the tree".

use serde::{Deserialize, Serialize};

use crate::domain::mask::MaskKind;

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

// ─── Node ─────────────────────────────────────────────────────────────────────
/// One element of a DOM tree.
///
/// The content fields (tag, attributes, text) are public because
/// tokenizers read them. The links and the mask flags are private:
/// links only change through Tree methods, flags only change
/// through a MaskGuard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Element name, e.g. "div"
    pub tag: String,

    /// Attribute (key, value) pairs in document order
    #[serde(default)]
    pub attributes: Vec<(String, String)>,

    /// Direct text content, if any
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    parent: Option<NodeId>,

    #[serde(default)]
    children: Vec<NodeId>,

    #[serde(skip)]
    masked: bool,

    #[serde(skip)]
    affected: bool,
}

impl Node {
    /// Create a detached node with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag:        tag.into(),
            attributes: Vec::new(),
            text:       None,
            parent:     None,
            children:   Vec::new(),
            masked:     false,
            affected:   false,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True while a self-mask is held on this node
    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// True while this node is covered by an affected-mask
    /// (it is the target or one of the target's ancestors)
    pub fn is_affected(&self) -> bool {
        self.affected
    }

    /// True if either kind of mask hides this node
    pub fn is_hidden(&self) -> bool {
        self.masked || self.affected
    }

    pub(crate) fn set_mask(&mut self, kind: MaskKind, on: bool) {
        match kind {
            MaskKind::SelfOnly => self.masked   = on,
            MaskKind::Affected => self.affected = on,
        }
    }
}

// ─── Tree ─────────────────────────────────────────────────────────────────────
/// A rooted DOM tree with a post-order path over its attached nodes.
///
/// The path is not serialised; call `build_path()` after
/// deserialising (the forest loader does this).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
    root:  NodeId,

    #[serde(skip)]
    path:  Vec<NodeId>,
}

impl Tree {
    /// Create a tree holding a single root node
    pub fn new(root: Node) -> Self {
        let mut root = root;
        root.parent = None;
        root.children.clear();

        let mut tree = Self {
            nodes: vec![root],
            root:  NodeId(0),
            path:  Vec::new(),
        };
        tree.build_path();
        tree
    }

    /// Attach `node` as the last child of `parent` and return its id.
    ///
    /// # Panics
    /// Panics if `parent` is not a node of this tree.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "unknown parent node {:?}", parent);

        let id = NodeId(self.nodes.len());
        let mut node = node;
        node.parent = Some(parent);
        node.children.clear();

        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        self.build_path();
        id
    }

    /// Recompute the post-order path from the current child links.
    ///
    /// Iterative so that very deep documents cannot overflow the
    /// stack. Each stack entry is (node, index of next child to visit).
    pub fn build_path(&mut self) {
        let mut path  = Vec::with_capacity(self.path.len().max(1));
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, next_child)) = stack.pop() {
            match self.nodes[id.0].children.get(next_child) {
                Some(&child) => {
                    stack.push((id, next_child + 1));
                    stack.push((child, 0));
                }
                None => path.push(id),
            }
        }

        self.path = path;
    }

    /// Attached nodes in post-order; the root is the last entry
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Number of attached nodes (the path length)
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Resolve a path position to a node id, if the position exists
    pub fn id_at(&self, position: usize) -> Option<NodeId> {
        self.path.get(position).copied()
    }

    pub fn node_at(&self, position: usize) -> Option<&Node> {
        self.id_at(position).map(|id| self.node(id))
    }

    /// Parent chain of `id`, nearest first, root last. Excludes `id`.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out     = Vec::new();
        let mut current = self.nodes[id.0].parent;
        while let Some(p) = current {
            out.push(p);
            current = self.nodes[p.0].parent;
        }
        out
    }

    /// Distance from the root (the root has depth 0)
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Remove a single node from the tree.
    ///
    /// The node's children take its place in the parent's child
    /// list, in order, so the tree stays connected and exactly one
    /// node leaves the path. The root cannot be detached.
    ///
    /// Returns false (and changes nothing) for the root or for a
    /// node that is already detached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        let parent = match self.nodes[id.0].parent {
            Some(p) => p,
            None    => return false,
        };
        let slot = match self.nodes[parent.0].children.iter().position(|&c| c == id) {
            Some(s) => s,
            None    => return false,
        };

        let orphans = std::mem::take(&mut self.nodes[id.0].children);
        for &child in &orphans {
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[parent.0].children.splice(slot..=slot, orphans);
        self.nodes[id.0].parent = None;

        self.build_path();
        true
    }

    /// Cut every subtree hanging below `max_depth`.
    /// Returns how many nodes left the path.
    pub fn prune_deeper_than(&mut self, max_depth: usize) -> usize {
        let before = self.len();

        let mut frontier = vec![(self.root, 0usize)];
        while let Some((id, depth)) = frontier.pop() {
            if depth == max_depth {
                let cut = std::mem::take(&mut self.nodes[id.0].children);
                for child in cut {
                    self.nodes[child.0].parent = None;
                }
                continue;
            }
            for &child in &self.nodes[id.0].children {
                frontier.push((child, depth + 1));
            }
        }

        self.build_path();
        before - self.len()
    }

    /// Check that every link points inside the arena, that child and
    /// parent links agree, and that no node is reachable twice.
    /// Deserialised trees must pass this before `build_path()`.
    pub fn is_well_formed(&self) -> bool {
        if self.root.0 >= self.nodes.len() || self.nodes[self.root.0].parent.is_some() {
            return false;
        }

        let mut seen  = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if seen[id.0] {
                return false;
            }
            seen[id.0] = true;

            for &child in &self.nodes[id.0].children {
                if child.0 >= self.nodes.len() || self.nodes[child.0].parent != Some(id) {
                    return false;
                }
                stack.push(child);
            }
        }
        true
    }
}


// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use super::fixtures::{chain, page};

    fn tags(tree: &Tree) -> Vec<String> {
        tree.path().iter().map(|&id| tree.node(id).tag.clone()).collect()
    }

    #[test]
    fn test_path_is_post_order_with_root_last() {
        let tree = page();
        assert_eq!(tags(&tree), vec!["title", "head", "div", "p", "body", "html"]);
        assert_eq!(tree.path().last(), Some(&tree.root()));
    }

    #[test]
    fn test_detach_splices_children_into_parent() {
        let mut tree = page();
        let body     = tree.id_at(4).unwrap();
        assert!(tree.detach(body));

        // div and p now hang directly under html, in body's old slot
        assert_eq!(tags(&tree), vec!["title", "head", "div", "p", "html"]);
        let root = tree.root();
        let kids: Vec<String> = tree.node(root).children().iter()
            .map(|&c| tree.node(c).tag.clone())
            .collect();
        assert_eq!(kids, vec!["head", "div", "p"]);
        assert!(tree.is_well_formed());
    }

    #[test]
    fn test_root_cannot_be_detached() {
        let mut tree = page();
        let root     = tree.root();
        assert!(!tree.detach(root));
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_detach_twice_is_refused() {
        let mut tree = page();
        let title    = tree.id_at(0).unwrap();
        assert!(tree.detach(title));
        assert!(!tree.detach(title));
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_prune_deeper_than_keeps_shallow_nodes() {
        let mut tree = chain(6);
        let removed  = tree.prune_deeper_than(2);
        assert_eq!(removed, 3);
        assert_eq!(tree.len(), 3);
        assert!(tree.path().iter().all(|&id| tree.depth(id) <= 2));
    }

    #[test]
    fn test_prune_to_depth_zero_leaves_root() {
        let mut tree = page();
        tree.prune_deeper_than(0);
        assert_eq!(tree.path(), &[tree.root()]);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let tree  = page();
        let title = tree.id_at(0).unwrap();
        let names: Vec<&str> = tree.ancestors(title).iter()
            .map(|&id| tree.node(id).tag.as_str())
            .collect();
        assert_eq!(names, vec!["head", "html"]);
    }

    #[test]
    fn test_deserialised_tree_needs_path_rebuild() {
        let json     = serde_json::to_string(&page()).unwrap();
        let mut back: Tree = serde_json::from_str(&json).unwrap();
        assert!(back.is_empty());
        assert!(back.is_well_formed());
        back.build_path();
        assert_eq!(tags(&back), tags(&page()));
    }

    #[test]
    fn test_cycle_is_not_well_formed() {
        let json = r#"{
            "nodes": [
                {"tag": "a", "children": [1]},
                {"tag": "b", "parent": 0, "children": [0]}
            ],
            "root": 0
        }"#;
        let tree: Tree = serde_json::from_str(json).unwrap();
        assert!(!tree.is_well_formed());
    }
}
