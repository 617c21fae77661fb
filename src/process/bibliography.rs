use crate::tree::{Marker, Tree};

/// Turns citation definition lists into `<ul class="author-date">` with one item per entry.
pub fn citation_lists(tree: &mut Tree) {
    let root = tree.root();
    for list in tree.select(root, |element| element.is("dl") && element.has(Marker::CitationList)) {
        tree.edit(list, |list| {
            list.rename("ul");
            list.set_classes("author-date");
        });
        for entry in tree.element_children(list) {
            let tag = tree.element(entry).map(|element| element.name.local.clone());
            match tag.as_deref() {
                Some("dt") => tree.remove(entry),
                Some("dd") => {
                    tree.edit(entry, |item| item.rename("li"));
                }
                _ => {}
            }
        }
    }
}
