use crate::tree::{Admonition, DataType, Marker, Tree};

/// Tags admonitions with their kind, defaulting to `note`.
///
/// A title that only repeats the kind ("Note", "Warning", ...) is dropped; any other title
/// becomes an `<h1>`.
pub fn admonitions(tree: &mut Tree) {
    let root = tree.root();
    for admonition in tree.select(root, |element| element.has(Marker::Admonition)) {
        tree.edit(admonition, |admonition| {
            let kind = admonition
                .classes()
                .find_map(Admonition::from_name)
                .unwrap_or(Admonition::Note);
            admonition.clear_classes();
            admonition.set_data_type(DataType::Admonition(kind));
        });

        let title = tree.element_children(admonition).into_iter().find(|&child| {
            tree.element(child)
                .is_some_and(|child| child.has(Marker::AdmonitionTitle))
        });
        let Some(title) = title else {
            continue;
        };
        if Admonition::from_name(tree.text(title).trim()).is_some() {
            tree.remove(title);
        } else {
            tree.edit(title, |title| title.rename("h1"));
        }
    }
}
