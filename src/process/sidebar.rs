use crate::tree::{DataType, Marker, Tree};

/// Tags `aside.sidebar` as an HTMLBook sidebar, with its title as the heading.
pub fn sidebars(tree: &mut Tree) {
    let root = tree.root();
    for sidebar in tree.select(root, |element| element.is("aside") && element.has(Marker::Sidebar)) {
        tree.edit(sidebar, |sidebar| sidebar.set_data_type(DataType::Sidebar));
        if let Some(&title) = tree
            .select(sidebar, |element| element.has(Marker::SidebarTitle))
            .first()
        {
            tree.edit(title, |title| title.rename("h5"));
        }
    }
}
