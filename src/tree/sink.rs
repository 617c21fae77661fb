use ego_tree::NodeId;
use html5ever::{
    tendril::{format_tendril, StrTendril},
    tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, QualName,
};
use std::{
    borrow::Cow,
    cell::{Ref, RefCell},
};

use super::{
    node::{Element, Node},
    Tree,
};

#[derive(Debug)]
pub struct HtmlTreeSink {
    pub tree: RefCell<Tree>,
}

impl HtmlTreeSink {
    pub fn new() -> Self {
        Self {
            tree: RefCell::new(Tree::new()),
        }
    }
}

impl TreeSink for HtmlTreeSink {
    type Handle = NodeId;
    type Output = Tree;
    type ElemName<'a>
        = Ref<'a, QualName>
    where
        Self: 'a;

    fn finish(self) -> Tree {
        self.tree.into_inner()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.tree.borrow_mut().errors.push(msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.tree.borrow().tree.root().id()
    }

    fn elem_name<'a>(&'a self, target: &Self::Handle) -> Ref<'a, QualName> {
        Ref::map(self.tree.borrow(), |this| {
            let node = this.tree.get(*target).unwrap().value();
            match node {
                Node::Element(element) => &element.name,
                _ => unreachable!(),
            }
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let mut this = self.tree.borrow_mut();
        let is_template = &*name.local == "template";
        let mut node = this
            .tree
            .orphan(Node::Element(Element::parsed(name, attrs)));
        if is_template {
            // Template contents live in a fragment below the template element
            node.append(Node::Document);
        }
        node.id()
    }

    fn create_comment(&self, comment: StrTendril) -> Self::Handle {
        let mut this = self.tree.borrow_mut();
        this.tree.orphan(Node::Comment(comment)).id()
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        let mut this = self.tree.borrow_mut();
        // https://developer.mozilla.org/en-US/docs/Web/API/ProcessingInstruction
        // says processing instructions are considered comments in HTML
        let comment = format_tendril!("<?{target} {data}?>");
        this.tree.orphan(Node::Comment(comment)).id()
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut this = self.tree.borrow_mut();
        let mut parent = this.tree.get_mut(*parent).unwrap();

        match child {
            NodeOrText::AppendNode(id) => {
                parent.append_id(id);
            }
            NodeOrText::AppendText(text) => {
                if let Some(mut child) = parent.last_child() {
                    if let Node::Text(t) = child.value() {
                        t.push_tendril(&text);
                        return;
                    }
                }
                parent.append(Node::Text(text));
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = {
            let this = self.tree.borrow();
            let element = this.tree.get(*element).unwrap();
            element.parent().is_some()
        };

        if has_parent {
            self.append_before_sibling(element, child)
        } else {
            self.append(prev_element, child)
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        let this = self.tree.borrow();
        let template = this.tree.get(*target).unwrap();
        template.first_child().unwrap().id()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut this = self.tree.borrow_mut();
        let mut sibling = this.tree.get_mut(*sibling).unwrap();

        match new_node {
            NodeOrText::AppendNode(id) => {
                sibling.insert_id_before(id);
            }
            NodeOrText::AppendText(text) => {
                if let Some(mut prev) = sibling.prev_sibling() {
                    if let Node::Text(t) = prev.value() {
                        t.push_tendril(&text);
                        return;
                    }
                }
                sibling.insert_before(Node::Text(text));
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attributes: Vec<Attribute>) {
        let mut this = self.tree.borrow_mut();
        let mut node = this.tree.get_mut(*target).unwrap();
        let Node::Element(element) = node.value() else {
            unreachable!()
        };
        for attr in attributes {
            match &*attr.name.local {
                "id" => {
                    if element.id().is_none() {
                        element.attrs.id = Some(attr.value);
                    }
                }
                "class" => {
                    if element.classes().next().is_none() {
                        element.set_classes(&attr.value);
                    }
                }
                _ => {
                    element.attrs.rest.entry(attr.name).or_insert(attr.value);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        let mut this = self.tree.borrow_mut();
        let mut node = this.tree.get_mut(*target).unwrap();
        node.detach();
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut this = self.tree.borrow_mut();
        let mut new_parent = this.tree.get_mut(*new_parent).unwrap();
        new_parent.reparent_from_id_append(*node);
    }
}
