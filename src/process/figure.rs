use ego_tree::NodeId;

use crate::{
    html,
    tree::{self, Element, Marker, Node, Tree},
};

/// Rewrites an image source into the book's flat `images/` directory.
///
/// Returns `None` for images hosted outside the book, which are left alone.
pub fn image_path(src: &str) -> Option<String> {
    if html::is_external(src) {
        return None;
    }
    Some(format!("images/{}", basename(src)))
}

fn is_figure(element: &Element) -> bool {
    element.is("figure") || (element.is("div") && element.has(Marker::Figure))
}

/// Converts Sphinx figures into `<figure>`s with a `<figcaption>`.
pub fn figures(tree: &mut Tree) {
    let root = tree.root();
    for figure in tree.select(root, is_figure) {
        tree.edit(figure, |figure| figure.rename("figure"));

        for anchor in tree.select(figure, |element| element.is("a")) {
            if !tree.select(anchor, |element| element.is("img")).is_empty() {
                tree.unwrap(anchor);
            }
        }
        for img in tree.select(figure, |element| element.is("img")) {
            normalize_image(tree, img);
        }

        let caption = tree
            .select(figure, |element| element.has(Marker::Caption) || element.is("figcaption"))
            .first()
            .copied();
        if let Some(caption) = caption {
            normalize_caption(tree, caption);
        }
    }
}

fn normalize_image(tree: &mut Tree, img: NodeId) {
    tree.edit(img, |img| {
        for attr in ["style", "width", "height"] {
            img.remove_attr(attr);
        }
        if let Some(src) = img.attr("src").and_then(image_path) {
            img.set_attr("src", &src);
        }
    });
}

fn normalize_caption(tree: &mut Tree, caption: NodeId) {
    tree.edit(caption, |caption| caption.rename("figcaption"));
    for number in tree.select(caption, |element| element.has(Marker::CaptionNumber)) {
        tree.remove(number);
    }

    // Sphinx wraps caption text in a paragraph
    let significant = tree
        .children(caption)
        .into_iter()
        .filter(|&child| !tree::is_blank(tree.node(child).value()))
        .collect::<Vec<_>>();
    if let [paragraph] = significant[..] {
        if tree.element(paragraph).is_some_and(|element| element.is("p")) {
            tree.unwrap(paragraph);
        }
    }

    for text in tree.text_nodes(caption) {
        let Node::Text(contents) = tree.node(text).value() else {
            continue;
        };
        let trimmed = contents.trim_start();
        if trimmed.is_empty() {
            tree.remove(text);
            continue;
        }
        let trimmed = trimmed.to_owned();
        tree.set_text(text, trimmed);
        break;
    }
}

/// Converts images outside of figures into informal figures.
///
/// An image that is alone in its paragraph, or wrapped in a link to itself, has that wrapper
/// turned into `<figure class="informal">`. Links to anywhere else are left for
/// [`crate::process::xref::internal_refs`].
pub fn informal_figures(tree: &mut Tree) {
    let root = tree.root();
    for img in tree.select(root, |element| element.is("img")) {
        if tree.ancestors(img).any(|(_, element)| element.is("figure")) {
            continue;
        }
        let Some(src) = tree.element(img).and_then(|img| img.attr("src")) else {
            continue;
        };
        let Some(src) = image_path(src) else {
            log::debug!("Leaving external image in place: {}", tree.display(img));
            continue;
        };
        tree.edit(img, |img| img.set_attr("src", &src));

        let Some(parent) = tree.parent(img) else {
            continue;
        };
        let Some(wrapper) = tree.element(parent) else {
            continue;
        };
        let figure = if wrapper.is("a") {
            if !links_to_image(wrapper, &src) {
                continue;
            }
            match tree.parent(parent) {
                Some(paragraph) if is_sole_paragraph_child(tree, paragraph, parent) => {
                    tree.unwrap(parent);
                    paragraph
                }
                _ => parent,
            }
        } else if is_sole_paragraph_child(tree, parent, img) {
            parent
        } else {
            continue;
        };
        promote(tree, figure);
        tree.edit(img, |img| {
            img.clear_classes();
            for attr in ["style", "width", "height"] {
                img.remove_attr(attr);
            }
        });
    }
}

/// Is `anchor` Sphinx's link to the full-size `src` rather than a reference elsewhere?
fn links_to_image(anchor: &Element, src: &str) -> bool {
    if anchor.has(Marker::ImageReference) {
        return true;
    }
    anchor
        .attr("href")
        .filter(|href| !html::is_external(href))
        .is_some_and(|href| basename(href) == basename(src))
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Is `child` the only non-blank child of the paragraph `parent`?
fn is_sole_paragraph_child(tree: &Tree, parent: NodeId, child: NodeId) -> bool {
    tree.element(parent).is_some_and(|element| element.is("p"))
        && tree
            .node(parent)
            .children()
            .filter(|node| !tree::is_blank(node.value()))
            .all(|node| node.id() == child)
}

fn promote(tree: &mut Tree, wrapper: NodeId) {
    tree.edit(wrapper, |wrapper| {
        wrapper.rename("figure");
        wrapper.set_classes("informal");
        wrapper.remove_attr("href");
    });
}
