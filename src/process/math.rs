use crate::tree::{DataType, Element, Marker, Tree};

/// Marks math as TeX and wraps display math in an equation block.
pub fn math(tree: &mut Tree) {
    let root = tree.root();
    for math in tree.select(root, |element| element.has(Marker::Math)) {
        let block = tree.edit(math, |math| {
            math.set_data_type(DataType::Tex);
            math.is("div")
        });
        if block == Some(true) {
            let mut equation = Element::new("div");
            equation.set_data_type(DataType::Equation);
            tree.wrap(math, equation);
        }
    }
}
