//! Document Model
//!
//! One loaded page: its path, the immutable source text, the mutable tree
//! built from it, and the `modified` flag set by the rule engine.

pub mod tree;

pub use tree::{is_void_element, Element, NodeId, NodeKind, Tree};

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    source: String,
    tree: Tree,
    modified: bool,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, source: String, tree: Tree) -> Self {
        Self {
            path: path.into(),
            source,
            tree,
            modified: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Text exactly as it was loaded
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn mark_modified(&mut self) {
        self.modified = true;
    }

    // ===== TITLE =====

    pub fn title_node(&self) -> Option<NodeId> {
        self.tree.elements_named(self.tree.root(), "title").next()
    }

    /// Page title in its escaped source form
    pub fn title(&self) -> Option<String> {
        self.title_node().map(|id| self.tree.text(id))
    }

    /// Replace the title content with `title`, given in the same escaped
    /// form `title()` returns. Returns false when the page has no title.
    pub fn set_title(&mut self, title: &str) -> bool {
        match self.title_node() {
            Some(id) => {
                self.tree.set_text(id, title);
                true
            }
            None => false,
        }
    }

    // ===== HEADINGS =====

    /// Elements named `tag` carrying the class token `class`, in document order
    pub fn headings<'a>(
        &'a self,
        tag: &'a str,
        class: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.tree
            .elements_named(self.tree.root(), tag)
            .filter(move |&id| self.tree.element(id).is_some_and(|e| e.has_class(class)))
    }

    // ===== TABLES =====

    pub fn tables(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.tree.elements_named(self.tree.root(), "table")
    }

    /// First `<td>` inside `table`, in document order
    pub fn first_cell(&self, table: NodeId) -> Option<NodeId> {
        self.tree.elements_named(table, "td").next()
    }

    /// Row containing `cell`: its nearest `<tr>`, else its parent element
    pub fn row_of(&self, cell: NodeId) -> Option<NodeId> {
        self.tree
            .ancestor_named(cell, "tr")
            .or_else(|| self.tree.parent(cell))
            .filter(|&id| self.tree.element(id).is_some())
    }

    // ===== TEXT & MUTATION =====

    pub fn text(&self, node: NodeId) -> String {
        self.tree.text(node)
    }

    pub fn replace_text(&mut self, node: NodeId, from: &str, to: &str) -> bool {
        self.tree.replace_text(node, from, to)
    }

    pub fn remove(&mut self, node: NodeId) -> bool {
        self.tree.detach(node)
    }

    pub fn serialize(&self) -> String {
        self.tree.serialize()
    }
}
