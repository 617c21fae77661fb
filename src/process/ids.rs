use indexmap::IndexSet;
use rand::Rng;

use crate::tree::{Node, Tree};

/// Largest random suffix appended to a duplicate id.
const MAX_SUFFIX: u32 = 123_456_789;

/// Ids emitted by the chapters converted so far.
///
/// Chapters are converted in book order, each call to [`crate::process_chapter`] taking the
/// accumulated ids and returning them with the new chapter's ids added.
#[derive(Debug, Default, Clone)]
pub struct BookIds(IndexSet<String>);

impl BookIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }
}

impl Extend<String> for BookIds {
    fn extend<T: IntoIterator<Item = String>>(&mut self, ids: T) {
        self.0.extend(ids);
    }
}

impl FromIterator<String> for BookIds {
    fn from_iter<T: IntoIterator<Item = String>>(ids: T) -> Self {
        Self(ids.into_iter().collect())
    }
}

/// Renames ids that an earlier chapter already used, returning the chapter's ids.
///
/// A duplicate id gets a random numeric suffix and every `href="#id"` link in the chapter is
/// pointed at the new id.
pub fn process_ids(tree: &mut Tree, book_ids: &BookIds) -> IndexSet<String> {
    let root = tree.root();
    let mut rng = rand::rng();
    for node in tree.select(root, |element| {
        element.id().is_some_and(|id| book_ids.contains(id))
    }) {
        let Some(id) = tree.element(node).and_then(|e| e.id()).map(str::to_owned) else {
            continue;
        };
        let renamed = loop {
            let candidate = format!("{id}_{}", rng.random_range(1..=MAX_SUFFIX));
            if !book_ids.contains(&candidate) && tree.find_by_id(root, &candidate).is_none() {
                break candidate;
            }
        };
        tree.edit(node, |element| element.set_id(&renamed));
        relink(tree, &id, &renamed);
        log::info!("Duplicate ID \"{id}\" changed to \"{renamed}\"");
    }

    let mut ids = IndexSet::new();
    for node in tree.node(root).descendants() {
        if let Node::Element(element) = node.value() {
            if let Some(id) = element.id() {
                ids.insert(id.to_owned());
            }
        }
    }
    ids
}

/// Points links to `#old` at `#new`, updating cross-reference text that shows the target.
fn relink(tree: &mut Tree, old: &str, new: &str) {
    let root = tree.root();
    let old_href = format!("#{old}");
    let new_href = format!("#{new}");
    for link in tree.select(root, |element| element.attr("href") == Some(old_href.as_str())) {
        tree.edit(link, |link| link.set_attr("href", &new_href));
        if let [child] = tree.children(link)[..] {
            if matches!(tree.node(child).value(), Node::Text(text) if **text == *old_href) {
                tree.set_text(child, new_href.as_str());
            }
        }
    }
}
