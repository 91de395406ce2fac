//! Arena-backed markup tree.
//!
//! Nodes keep the exact source text of tags, character data and other
//! markup so that serializing an unmodified tree reproduces the input
//! structure. Text is stored in its escaped source form.

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written
    pub name: String,
    /// Attribute text following the tag name, emitted verbatim
    pub raw_attributes: String,
    /// Whitespace-separated tokens of the `class` attribute
    pub classes: Vec<String>,
    /// Written as `<name/>` rather than a start/end pair
    pub self_closing: bool,
}

impl Element {
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// HTML void element such as `<meta>` or `<br>`
    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element(Element),
    /// Character data, still escaped
    Text(String),
    /// Comments, CDATA, declarations, processing instructions, doctype
    Markup(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Pre-order walk below `id` (excluding `id` itself), in document order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.nodes[id].children.iter().rev().copied().collect(),
        }
    }

    /// Descendant elements of `id` with the given tag name
    pub fn elements_named<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(id)
            .filter(move |&node| self.element(node).is_some_and(|e| e.is(tag)))
    }

    /// Nearest ancestor element of `id` with the given tag name
    pub fn ancestor_named(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if self.element(node).is_some_and(|e| e.is(tag)) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Concatenated character data below `id`
    pub fn text(&self, id: NodeId) -> String {
        if let NodeKind::Text(text) = &self.nodes[id].kind {
            return text.clone();
        }
        self.descendants(id)
            .filter_map(|node| match &self.nodes[node].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace every occurrence of `from` in the text nodes below `id`.
    /// Returns whether any text changed.
    pub fn replace_text(&mut self, id: NodeId, from: &str, to: &str) -> bool {
        if from.is_empty() {
            return false;
        }
        let targets: Vec<NodeId> = std::iter::once(id).chain(self.descendants(id)).collect();
        let mut changed = false;
        for node in targets {
            if let NodeKind::Text(text) = &mut self.nodes[node].kind {
                if text.contains(from) {
                    *text = text.replace(from, to);
                    changed = true;
                }
            }
        }
        changed
    }

    /// Replace all children of `id` with a single text node
    pub fn set_text(&mut self, id: NodeId, escaped: &str) {
        for child in std::mem::take(&mut self.nodes[id].children) {
            self.nodes[child].parent = None;
        }
        self.append(id, NodeKind::Text(escaped.to_string()));
    }

    /// Unlink `id` from its parent. The node and its subtree become
    /// unreachable and are not serialized.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes[id].parent.take() else {
            return false;
        };
        self.nodes[parent].children.retain(|&child| child != id);
        true
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root(), &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id];
        match &node.kind {
            NodeKind::Root => self.write_children(id, out),
            NodeKind::Text(text) | NodeKind::Markup(text) => out.push_str(text),
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                out.push_str(&element.raw_attributes);
                if element.self_closing && node.children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                if element.is_void() && node.children.is_empty() {
                    return;
                }
                self.write_children(id, out);
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }

    fn write_children(&self, id: NodeId, out: &mut String) {
        for &child in &self.nodes[id].children {
            self.write_node(child, out);
        }
    }
}

pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.nodes[id].children.iter().rev().copied());
        Some(id)
    }
}

/// HTML elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, classes: &[&str]) -> NodeKind {
        let raw_attributes = if classes.is_empty() {
            String::new()
        } else {
            format!(" class=\"{}\"", classes.join(" "))
        };
        NodeKind::Element(Element {
            name: name.to_string(),
            raw_attributes,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            self_closing: false,
        })
    }

    fn sample() -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.root();
        let body = tree.append(root, element("body", &[]));
        let h1 = tree.append(body, element("h1", &["title"]));
        tree.append(h1, NodeKind::Text("Foo QML Type".to_string()));
        let p = tree.append(body, element("p", &[]));
        tree.append(p, NodeKind::Text("a &amp; b".to_string()));
        (tree, h1, p)
    }

    #[test]
    fn serializes_in_document_order() {
        let (tree, _, _) = sample();
        assert_eq!(
            tree.serialize(),
            "<body><h1 class=\"title\">Foo QML Type</h1><p>a &amp; b</p></body>"
        );
    }

    #[test]
    fn descendants_are_preorder() {
        let (tree, h1, p) = sample();
        let elements: Vec<_> = tree
            .descendants(tree.root())
            .filter(|&id| tree.element(id).is_some())
            .collect();
        assert_eq!(elements, vec![1, h1, p]);
    }

    #[test]
    fn replace_text_reports_change() {
        let (mut tree, h1, p) = sample();
        assert!(tree.replace_text(h1, " QML Type", ""));
        assert!(!tree.replace_text(p, " QML Type", ""));
        assert_eq!(tree.text(h1), "Foo");
    }

    #[test]
    fn detach_drops_subtree_from_output() {
        let (mut tree, h1, _) = sample();
        assert!(tree.detach(h1));
        assert!(!tree.detach(h1));
        assert_eq!(tree.serialize(), "<body><p>a &amp; b</p></body>");
        assert_eq!(tree.elements_named(tree.root(), "h1").count(), 0);
    }

    #[test]
    fn set_text_replaces_children() {
        let (mut tree, h1, _) = sample();
        tree.set_text(h1, "A &lt; B");
        assert_eq!(tree.text(h1), "A &lt; B");
        assert_eq!(tree.children(h1).len(), 1);
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let mut tree = Tree::new();
        let root = tree.root();
        let head = tree.append(root, element("head", &[]));
        tree.append(
            head,
            NodeKind::Element(Element {
                name: "META".to_string(),
                raw_attributes: " charset=\"utf-8\"".to_string(),
                classes: Vec::new(),
                self_closing: false,
            }),
        );
        assert_eq!(tree.serialize(), "<head><META charset=\"utf-8\"></head>");
        assert!(is_void_element("br"));
        assert!(!is_void_element("td"));
    }

    #[test]
    fn ancestor_lookup_stops_at_root() {
        let (tree, h1, _) = sample();
        let text = tree.children(h1)[0];
        assert_eq!(tree.ancestor_named(text, "body"), Some(1));
        assert_eq!(tree.ancestor_named(text, "tr"), None);
    }
}
