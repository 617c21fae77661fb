use ego_tree::NodeId;

use crate::{
    html,
    tree::{DataType, Marker, Node, Tree},
};

/// Converts internal links into HTMLBook cross-references, and bracketed citation links into
/// author-date text.
pub fn internal_refs(tree: &mut Tree) {
    let root = tree.root();
    for anchor in tree.select(root, |element| {
        element.is("a") && element.has(Marker::InternalReference)
    }) {
        // Anchors of an already converted citation are gone
        if !tree.is_attached(anchor) {
            continue;
        }
        if let Some(citation) = citation(tree, anchor) {
            cite(tree, citation);
            continue;
        }
        let Some(href) = tree.element(anchor).and_then(|a| a.attr("href")) else {
            log::warn!("Internal reference without a target: {}", tree.display(anchor));
            continue;
        };
        if html::is_external(href) {
            log::warn!("External image reference: {href}");
            continue;
        }
        let target = fragment(href).to_owned();
        make_xref(tree, anchor, &target);
    }
}

/// The target id of an internal `href`: its fragment, or else its last path segment.
fn fragment(href: &str) -> &str {
    match href.rsplit_once('#') {
        Some((_, fragment)) => fragment,
        None => href.rsplit('/').next().unwrap_or(href),
    }
}

fn make_xref(tree: &mut Tree, node: NodeId, target: &str) {
    tree.clear(node);
    tree.append(node, Node::Text(format!("#{target}").into()));
    tree.edit(node, |link| {
        link.rename("a");
        link.set_attr("href", &format!("#{target}"));
        link.set_data_type(DataType::Xref);
    });
}

/// The bracketed span around a citation link, as in `<span>[<a>Leek and Peng, 2015</a>]</span>`.
fn citation(tree: &Tree, anchor: NodeId) -> Option<NodeId> {
    let parent = tree.parent(anchor)?;
    if !tree.element(parent)?.is("span") {
        return None;
    }
    let text = tree.text(parent);
    let text = text.trim();
    (text.starts_with('[') && text.ends_with(']')).then_some(parent)
}

/// Replaces the bracketed citation `span` with `(Author Year)` text.
fn cite(tree: &mut Tree, span: NodeId) {
    let citations = tree
        .select(span, |element| element.is("a") && element.has(Marker::InternalReference))
        .into_iter()
        .map(|anchor| author_date(&tree.text(anchor)))
        .collect::<Vec<_>>();
    tree.clear(span);
    tree.append(span, Node::Text(format!("({})", citations.join("; ")).into()));
    tree.edit(span, |span| {
        span.attrs.id = None;
        span.clear_classes();
    });
}

/// Drops the comma before the year: `Leek and Peng, 2015` reads `Leek and Peng 2015`.
fn author_date(citation: &str) -> String {
    let citation = citation.split_whitespace().collect::<Vec<_>>().join(" ");
    match citation.rsplit_once(',') {
        Some((authors, year)) => format!("{authors}{year}"),
        None => citation,
    }
}

/// Converts references Sphinx could not resolve, such as references to examples, into
/// cross-references. Examples only receive their ids during code processing, so this runs late.
pub fn remaining_refs(tree: &mut Tree) {
    let root = tree.root();
    for span in tree.select(root, |element| {
        element.is("span") && element.has(Marker::PendingReference)
    }) {
        let node = tree.node(span);
        let target = match (node.first_child(), node.children().count()) {
            (Some(child), 1) => match child.value() {
                Node::Text(text) if is_identifier(text.trim()) => Some(text.trim().to_owned()),
                _ => None,
            },
            _ => None,
        };
        match target {
            Some(target) => {
                make_xref(tree, span, &target);
                tree.edit(span, |link| link.clear_classes());
            }
            None => log::warn!("Unable to resolve cross reference {}", tree.display(span)),
        }
    }
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && !text.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments() {
        assert_eq!(fragment("#figure-1"), "figure-1");
        assert_eq!(fragment("ch02.html#section-a"), "section-a");
        assert_eq!(fragment("example.html"), "example.html");
        assert_eq!(fragment("../notebooks/example.html"), "example.html");
    }

    #[test]
    fn author_dates() {
        assert_eq!(author_date("Baruch, 1993"), "Baruch 1993");
        assert_eq!(author_date("Leek and\n Peng, 2015"), "Leek and Peng 2015");
        assert_eq!(author_date("Smith, Jones, 2001"), "Smith, Jones 2001");
        assert_eq!(author_date("Anonymous"), "Anonymous");
    }
}
