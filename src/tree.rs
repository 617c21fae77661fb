use std::{borrow::Cow, fmt, io};

use ego_tree::{NodeId, NodeRef};
use html5ever::{
    serialize::{HtmlSerializer, SerializeOpts, Serializer},
    tendril::{StrTendril, TendrilSink},
};

mod node;
pub use node::{Admonition, Attributes, DataType, Division, Element, Marker, Node};

mod sink;
pub use sink::HtmlTreeSink;

/// A parsed HTML document that the conversion passes rewrite in place.
///
/// Nodes are addressed by [`NodeId`]s into an arena, so parents are reached by lookup rather than
/// through owning pointers. Removing a node detaches it; detached nodes stay in the arena but are
/// no longer reachable from the root and are never serialized.
#[derive(Debug)]
pub struct Tree {
    errors: Vec<Cow<'static, str>>,
    pub tree: ego_tree::Tree<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            tree: ego_tree::Tree::new(Node::Document),
        }
    }

    pub fn parse(html: &str) -> Self {
        let tree = html5ever::parse_document(HtmlTreeSink::new(), Default::default()).one(html);
        for err in &tree.errors {
            log::trace!("HTML parsing error: {err}");
        }
        tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_, Node> {
        self.tree.get(id).unwrap()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.tree.get(id)?.value() {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Applies `f` to the element `id`, returning `None` if `id` is not an element.
    pub fn edit<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        let mut node = self.tree.get_mut(id)?;
        match node.value() {
            Node::Element(element) => Some(f(element)),
            _ => None,
        }
    }

    /// Replaces the contents of text node `id`.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<StrTendril>) {
        if let Some(mut node) = self.tree.get_mut(id) {
            *node.value() = Node::Text(text.into());
        }
    }

    /// Elements below `id` matching `predicate`, in document order.
    ///
    /// The ids are collected up front so callers may mutate the tree while walking them.
    pub fn select(&self, id: NodeId, predicate: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.node(id)
            .descendants()
            .skip(1)
            .filter(|node| matches!(node.value(), Node::Element(element) if predicate(element)))
            .map(|node| node.id())
            .collect()
    }

    /// Finds the first element below `id` with the given `id` attribute.
    pub fn find_by_id(&self, id: NodeId, target: &str) -> Option<NodeId> {
        self.node(id)
            .descendants()
            .find(|node| matches!(node.value(), Node::Element(element) if element.id() == Some(target)))
            .map(|node| node.id())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).children().map(|child| child.id()).collect()
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .children()
            .filter(|child| matches!(child.value(), Node::Element(_)))
            .map(|child| child.id())
            .collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent().map(|parent| parent.id())
    }

    /// Element ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Element)> {
        self.node(id).ancestors().filter_map(|node| match node.value() {
            Node::Element(element) => Some((node.id(), element)),
            _ => None,
        })
    }

    /// The next sibling of `id` that is not whitespace-only text.
    pub fn next_significant_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)
            .next_siblings()
            .find(|sibling| !is_blank(sibling.value()))
            .map(|sibling| sibling.id())
    }

    /// Is `id` still reachable from the document root?
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.root();
        id == root || self.node(id).ancestors().any(|ancestor| ancestor.id() == root)
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text(&self, id: NodeId) -> String {
        self.node(id)
            .descendants()
            .filter_map(|node| match node.value() {
                Node::Text(text) => Some(&**text),
                _ => None,
            })
            .collect()
    }

    /// Text nodes below `id`, in document order.
    pub fn text_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .descendants()
            .filter(|node| matches!(node.value(), Node::Text(_)))
            .map(|node| node.id())
            .collect()
    }

    pub fn remove(&mut self, id: NodeId) {
        if let Some(mut node) = self.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Removes every child of `id`.
    pub fn clear(&mut self, id: NodeId) {
        for child in self.children(id) {
            self.remove(child);
        }
    }

    /// Replaces `id` with its children.
    pub fn unwrap(&mut self, id: NodeId) {
        for child in self.children(id) {
            self.tree.get_mut(id).unwrap().insert_id_before(child);
        }
        self.remove(id);
    }

    /// Inserts `wrapper` in place of `id` and moves `id` into it.
    pub fn wrap(&mut self, id: NodeId, wrapper: Element) -> NodeId {
        let wrapper = self
            .tree
            .get_mut(id)
            .unwrap()
            .insert_before(Node::Element(wrapper))
            .id();
        self.tree.get_mut(wrapper).unwrap().append_id(id);
        wrapper
    }

    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        self.tree.get_mut(parent).unwrap().append(node).id()
    }

    pub fn prepend(&mut self, parent: NodeId, node: Node) -> NodeId {
        self.tree.get_mut(parent).unwrap().prepend(node).id()
    }

    pub fn insert_before(&mut self, sibling: NodeId, node: Node) -> NodeId {
        self.tree.get_mut(sibling).unwrap().insert_before(node).id()
    }

    pub fn insert_after(&mut self, sibling: NodeId, node: Node) -> NodeId {
        self.tree.get_mut(sibling).unwrap().insert_after(node).id()
    }

    /// Moves the existing node `child` to the end of `parent`.
    pub fn move_to_end(&mut self, parent: NodeId, child: NodeId) {
        self.tree.get_mut(parent).unwrap().append_id(child);
    }

    /// Moves all children of `from` to the end of `to`.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        self.tree.get_mut(to).unwrap().reparent_from_id_append(from);
    }

    /// Deep-copies the children of `from` to the end of `to`.
    pub fn copy_children(&mut self, from: NodeId, to: NodeId) {
        for child in self.children(from) {
            let value = self.node(child).value().clone();
            let copy = self.append(to, value);
            self.copy_children(child, copy);
        }
    }

    /// Deep-copies `source`, which may belong to another tree, to the end of `parent`.
    pub fn graft(&mut self, parent: NodeId, source: NodeRef<'_, Node>) -> NodeId {
        let id = self.append(parent, source.value().clone());
        for child in source.children() {
            self.graft(id, child);
        }
        id
    }

    pub fn serialize(&self, id: NodeId, out: impl io::Write) -> io::Result<()> {
        let mut serializer = HtmlSerializer::new(out, SerializeOpts::default());
        serialize_node(self.node(id), &mut serializer)
    }

    /// Serializes the children of `id`, without `id` itself.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut html = Vec::new();
        {
            let mut serializer = HtmlSerializer::new(&mut html, SerializeOpts::default());
            for child in self.node(id).children() {
                serialize_node(child, &mut serializer).expect("writing to a Vec cannot fail");
            }
        }
        String::from_utf8_lossy(&html).into_owned()
    }

    /// Displays the markup of `id`, for log messages.
    pub fn display(&self, id: NodeId) -> Html<'_> {
        Html { tree: self, id }
    }
}

fn serialize_node(node: NodeRef<'_, Node>, serializer: &mut impl Serializer) -> io::Result<()> {
    match node.value() {
        Node::Document => {
            for child in node.children() {
                serialize_node(child, serializer)?;
            }
            Ok(())
        }
        Node::Comment(comment) => serializer.write_comment(comment),
        Node::Text(text) => serializer.write_text(text),
        Node::Element(element) => {
            serializer.start_elem(element.name.clone(), element.attributes())?;
            for child in node.children() {
                serialize_node(child, serializer)?;
            }
            serializer.end_elem(element.name.clone())
        }
    }
}

/// Is `node` text made up entirely of whitespace?
pub fn is_blank(node: &Node) -> bool {
    matches!(node, Node::Text(text) if text.trim().is_empty())
}

pub struct Html<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl fmt::Display for Html<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut html = Vec::new();
        self.tree.serialize(self.id, &mut html).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&html))
    }
}
