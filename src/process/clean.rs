use ego_tree::NodeId;

use crate::tree::{Element, Marker, Tree};

/// Attributes that only affect presentation in the Jupyter Book theme.
const PRESENTATIONAL_ATTRIBUTES: [&str; 4] = ["style", "valign", "halign", "width"];

/// Strips markup that only exists for the Jupyter Book website.
///
/// Section numbers are removed unless `keep_section_numbers` is set.
pub fn clean(tree: &mut Tree, keep_section_numbers: bool) {
    let root = tree.root();

    for node in tree.select(root, |element| element.is("style") || element.is("script")) {
        tree.remove(node);
    }

    for table in tree.select(root, |element| element.is("table")) {
        tree.edit(table, |table| table.remove_attr("border"));
        for number in tree.select(table, |element| {
            element.is("span") && element.has(Marker::CaptionNumber)
        }) {
            tree.remove(number);
        }
    }

    for node in tree.select(root, |_| true) {
        if in_svg(tree, node) {
            continue;
        }
        tree.edit(node, |element| {
            for attr in PRESENTATIONAL_ATTRIBUTES {
                element.remove_attr(attr);
            }
        });
    }

    if !keep_section_numbers {
        for number in tree.select(root, |element| element.has(Marker::SectionNumber)) {
            tree.remove(number);
        }
    }

    for hidden in tree.select(root, |element| {
        element.has(Marker::HideCell)
            || element.has(Marker::ToggleDetails)
            || element.has(Marker::HeaderLink)
    }) {
        tree.remove(hidden);
    }
    for hidden in tree.select(root, |element| {
        element.has(Marker::Hidden) || element.has(Marker::CellInput) || element.has(Marker::CellOutput)
    }) {
        let Some(parent) = tree.parent(hidden).and_then(|parent| tree.element(parent)) else {
            continue;
        };
        let Some(element) = tree.element(hidden) else {
            continue;
        };
        if hides(parent, element) {
            tree.remove(hidden);
        }
    }
}

/// Does the cell `parent` hide its child `element`?
fn hides(parent: &Element, element: &Element) -> bool {
    let hidden_input = parent.has(Marker::HideInput)
        && (element.has(Marker::Hidden) || element.has(Marker::CellInput));
    let hidden_output = parent.has(Marker::HideOutput)
        && (element.has(Marker::Hidden) || element.has(Marker::CellOutput));
    hidden_input || hidden_output
}

fn in_svg(tree: &Tree, node: NodeId) -> bool {
    tree.element(node).is_some_and(|element| element.is("svg"))
        || tree.ancestors(node).any(|(_, element)| element.is("svg"))
}
