use crate::tree::{DataType, Tree};

/// Moves the id of an empty label span, `<span id="label"></span>` directly before a section's
/// heading, onto the section itself.
pub fn move_span_ids_to_sections(tree: &mut Tree) {
    let root = tree.root();
    for span in tree.select(root, |element| element.is("span") && element.id().is_some()) {
        if tree.node(span).first_child().is_some() {
            continue;
        }
        let Some(section) = tree.parent(span) else {
            continue;
        };
        if !tree.element(section).is_some_and(|parent| parent.is("section")) {
            continue;
        }
        let followed_by_heading = (tree.next_significant_sibling(span))
            .and_then(|sibling| tree.element(sibling))
            .is_some_and(|sibling| sibling.heading_level().is_some());
        if !followed_by_heading {
            continue;
        }
        let Some(id) = tree.element(span).and_then(|span| span.attrs.id.clone()) else {
            continue;
        };
        tree.edit(section, |section| section.attrs.id = Some(id));
        tree.remove(span);
    }
}

/// Tags each section `sect1` to `sect5` by the level of its first heading.
///
/// Chapter-level sections keep their division.
pub fn subsections(tree: &mut Tree) {
    let root = tree.root();
    for section in tree.select(root, |element| element.is("section")) {
        if matches!(
            tree.element(section).and_then(|section| section.data_type),
            Some(DataType::Division(_))
        ) {
            continue;
        }
        let level = (tree.element_children(section).into_iter())
            .find_map(|child| tree.element(child)?.heading_level());
        if let Some(level) = level.filter(|&level| level <= 5) {
            tree.edit(section, |section| {
                section.set_data_type(DataType::Section(level))
            });
        }
    }
}
