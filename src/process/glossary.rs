use ego_tree::NodeId;

use crate::tree::{DataType, Element, Marker, Node, Tree};

/// Converts the definition lists of a glossary chapter into HTMLBook glossary lists.
pub fn glossary(tree: &mut Tree) {
    let root = tree.root();
    for list in tree.select(root, |element| element.is("dl")) {
        tree.edit(list, |list| list.set_data_type(DataType::GlossaryList));
        for entry in tree.element_children(list) {
            let tag = tree.element(entry).map(|element| element.name.local.clone());
            match tag.as_deref() {
                Some("dt") => term(tree, entry),
                Some("dd") => {
                    tree.edit(entry, |definition| {
                        definition.set_data_type(DataType::GlossDef)
                    });
                }
                _ => {}
            }
        }
    }
}

fn term(tree: &mut Tree, term: NodeId) {
    for link in tree.select(term, |element| element.has(Marker::HeaderLink)) {
        tree.remove(link);
    }
    let dfn = tree.append(term, Node::Element(Element::new("dfn")));
    for child in tree.children(term) {
        if child != dfn {
            tree.move_to_end(dfn, child);
        }
    }
    tree.edit(term, |term| term.set_data_type(DataType::GlossTerm));
}
