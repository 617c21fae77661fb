use anyhow::Context as _;
use ego_tree::NodeId;

use crate::tree::{DataType, Marker, Tree};

/// Copies footnote bodies into their references and removes the footnote list.
pub fn footnotes(tree: &mut Tree) {
    let root = tree.root();
    for reference in tree.select(root, |element| element.has(Marker::FootnoteReference)) {
        if let Err(err) = inline(tree, reference) {
            log::warn!(
                "Error converting footnote \"{}\": {err:#}",
                tree.display(reference)
            );
        }
    }

    for node in tree.select(root, |element| {
        (element.is("hr") && element.has(Marker::FootnoteRule))
            || (element.is("dl") && element.has(Marker::FootnoteList))
    }) {
        tree.remove(node);
    }
}

/// Docutils renders a footnote as `<dt id="…">label</dt>`, blank text, then `<dd><p>body</p></dd>`.
fn inline(tree: &mut Tree, reference: NodeId) -> anyhow::Result<()> {
    let href = (tree.element(reference))
        .and_then(|reference| reference.attr("href"))
        .context("missing href")?;
    let target = href.rsplit_once('#').map_or(href, |(_, fragment)| fragment);
    let root = tree.root();
    let term = (tree.find_by_id(root, target))
        .filter(|&term| tree.element(term).is_some_and(|term| term.is("dt")))
        .with_context(|| format!("no footnote definition with id \"{target}\""))?;
    let body = (tree.node(term).next_sibling())
        .and_then(|blank| blank.next_sibling())
        .filter(|body| tree.element(body.id()).is_some_and(|body| body.is("dd")))
        .context("footnote body is not two siblings after its label")?
        .id();
    let paragraph = (tree.element_children(body).into_iter())
        .find(|&child| tree.element(child).is_some_and(|child| child.is("p")))
        .context("footnote body has no paragraph")?;

    // A footnote may be referenced more than once
    tree.clear(reference);
    tree.copy_children(paragraph, reference);
    tree.edit(reference, |footnote| {
        footnote.rename("span");
        footnote.remove_attr("href");
        footnote.clear_classes();
        footnote.attrs.id = None;
        footnote.set_data_type(DataType::Footnote);
    });
    Ok(())
}
