use ego_tree::NodeId;

use crate::tree::{DataType, Element, Marker, Node, Tree};

/// Languages recognized in highlighted code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    Python,
    R,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::R => "r",
        }
    }
}

/// The notebook cell a code block renders.
enum Cell {
    Input,
    Output { hidden_input: bool },
    Unknown,
}

impl Cell {
    fn of(tree: &Tree, block: NodeId) -> Self {
        for (_, element) in tree.ancestors(block) {
            if element.has(Marker::CellInput) {
                return Self::Input;
            }
            if element.has(Marker::CellOutput) {
                let hidden_input = (tree.ancestors(block)).any(|(_, e)| e.has(Marker::HideInput));
                return Self::Output { hidden_input };
            }
        }
        Self::Unknown
    }
}

/// Children of `pre` that hold code, skipping blank text and empty spans.
fn tokens(tree: &Tree, pre: NodeId) -> Vec<NodeId> {
    tree.node(pre)
        .children()
        .filter(|child| match child.value() {
            Node::Text(text) => !text.trim().is_empty(),
            Node::Element(_) => !tree.text(child.id()).is_empty(),
            _ => false,
        })
        .map(|child| child.id())
        .collect()
}

fn is_token(tree: &Tree, token: NodeId, text: &str) -> bool {
    tree.element(token).is_some() && tree.text(token) == text
}

/// The `%%` and `R` tokens of an `%%R` cell magic opening `pre`.
///
/// Only the first two tokens are considered, so `%%` inside later code is ignored.
fn r_magic(tree: &Tree, pre: NodeId) -> Option<[NodeId; 2]> {
    match tokens(tree, pre)[..] {
        [percent, r, ..] if is_token(tree, percent, "%%") && is_token(tree, r, "R") => {
            Some([percent, r])
        }
        _ => None,
    }
}

fn is_comment(tree: &Tree, token: NodeId) -> bool {
    tree.element(token).is_some_and(|element| {
        element.is("span")
            && element
                .classes()
                .any(|class| matches!(class, "c" | "c1" | "ch" | "cm" | "cs"))
    }) && tree.text(token).starts_with('#')
}

/// A named example: a cell tagged `example` whose code opens with an id comment and a title
/// comment.
struct Example {
    magic: Option<[NodeId; 2]>,
    comments: [NodeId; 2],
    id: String,
    title: String,
}

impl Example {
    fn parse(tree: &Tree, pre: NodeId) -> Option<Self> {
        let tokens = tokens(tree, pre);
        let magic = r_magic(tree, pre);
        let code = if magic.is_some() {
            &tokens[2..]
        } else {
            &tokens[..]
        };
        let comments = match code {
            [id, title, ..] if is_comment(tree, *id) && is_comment(tree, *title) => [*id, *title],
            _ => return None,
        };
        let comment = |token| tree.text(token).trim_start_matches('#').trim().to_owned();
        let id = comment(comments[0]).split_whitespace().next()?.to_owned();
        let title = comment(comments[1]);
        if title.is_empty() {
            return None;
        }
        Some(Self {
            magic,
            comments,
            id,
            title,
        })
    }

    fn apply(self, tree: &mut Tree, cell: NodeId, pre: NodeId) {
        for comment in self.comments {
            tree.remove(comment);
        }
        let magic_end = self.magic.map(|[_, r]| r);
        strip_leading_blank_lines(tree, pre, magic_end);
        if let Some(r) = magic_end {
            tree.insert_after(r, Node::Text("\n".into()));
        }

        tree.edit(cell, |cell| {
            cell.set_id(&self.id);
            cell.set_data_type(DataType::Example);
        });
        let heading = tree.prepend(cell, Node::Element(Element::new("h5")));
        tree.append(heading, Node::Text(self.title.into()));
    }
}

/// Removes blank lines before the first line of code in `pre`, starting after its child `after`
/// if given. The indentation of the first line is kept.
fn strip_leading_blank_lines(tree: &mut Tree, pre: NodeId, after: Option<NodeId>) {
    let children = match after {
        Some(after) => (tree.node(after).next_siblings())
            .map(|sibling| sibling.id())
            .collect(),
        None => tree.children(pre),
    };
    let mut indent = String::new();
    for child in children {
        let text = match tree.node(child).value() {
            Node::Text(text) => Some(text.to_string()),
            Node::Element(_) if tree.text(child).is_empty() => continue,
            _ => None,
        };
        let Some(text) = text else {
            if !indent.is_empty() {
                tree.insert_before(child, Node::Text(indent.into()));
            }
            return;
        };
        let leading = text.len() - text.trim_start().len();
        if leading == text.len() {
            indent = match text.rfind('\n') {
                Some(newline) => text[newline + 1..].to_owned(),
                None => format!("{indent}{text}"),
            };
            tree.remove(child);
            continue;
        }
        let line = match text[..leading].rfind('\n') {
            Some(newline) => text[newline + 1..].to_owned(),
            None => format!("{indent}{text}"),
        };
        tree.set_text(child, line);
        return;
    }
}

/// Converts cells tagged `example` into titled HTMLBook examples.
pub fn examples(tree: &mut Tree) {
    let root = tree.root();
    for cell in tree.select(root, |element| element.has(Marker::Example)) {
        let Some(&pre) = tree.select(cell, |element| element.is("pre")).first() else {
            log::warn!("Example cell without code: {}", tree.display(cell));
            continue;
        };
        match Example::parse(tree, pre) {
            Some(example) => example.apply(tree, cell, pre),
            None => log::warn!(
                "Unable to process example; the code should start with an id comment and a \
                title comment: {}",
                tree.display(pre)
            ),
        }
    }
}

/// Marks highlighted code as program listings, detects its language, and optionally numbers
/// notebook cells `In [n]: ` / `Out[n]: ` the way Jupyter does.
pub fn code_blocks(tree: &mut Tree, number_cells: bool) {
    let root = tree.root();
    let mut counter = 0;
    for container in tree.select(root, |element| element.has(Marker::Highlight)) {
        let pre = (tree.element_children(container).into_iter())
            .find(|&child| tree.element(child).is_some_and(|child| child.is("pre")));
        let Some(pre) = pre else {
            continue;
        };
        tree.edit(pre, |pre| pre.set_data_type(DataType::ProgramListing));

        for span in tree.select(pre, |element| element.is("span")) {
            tree.edit(span, |span| span.clear_classes());
            if tree.node(span).first_child().is_none() {
                tree.remove(span);
            }
        }

        let language = if let Some(magic) = r_magic(tree, pre) {
            strip_r_magic(tree, pre, magic);
            Some(Language::R)
        } else if (tree.ancestors(pre)).any(|(_, element)| element.has(Marker::PythonHighlight)) {
            Some(Language::Python)
        } else {
            None
        };
        if let Some(language) = language {
            tree.edit(pre, |pre| pre.set_attr("data-code-language", language.as_str()));
        }

        if number_cells {
            number(tree, container, pre, &mut counter);
        }
    }
}

fn strip_r_magic(tree: &mut Tree, pre: NodeId, magic: [NodeId; 2]) {
    for token in magic {
        tree.remove(token);
    }
    let highlighted = (tree.ancestors(pre))
        .filter(|(_, element)| element.has(Marker::PythonHighlight))
        .map(|(ancestor, _)| ancestor)
        .collect::<Vec<_>>();
    for ancestor in highlighted {
        tree.edit(ancestor, |element| {
            element.remove_classes(|class| class.starts_with("highlight-") && class.contains("python"))
        });
    }
    if let Some(&first) = tree.text_nodes(pre).first() {
        let trimmed = tree.text(first).trim_start().to_owned();
        tree.set_text(first, trimmed);
    }
}

fn number(tree: &mut Tree, container: NodeId, pre: NodeId, counter: &mut usize) {
    let marker = match Cell::of(tree, pre) {
        Cell::Input => {
            *counter += 1;
            format!("In [{counter}]: ")
        }
        Cell::Output {
            hidden_input: false,
        } if *counter > 0 => format!("Out[{counter}]: "),
        Cell::Output { .. } => return,
        Cell::Unknown => {
            let classes = (tree.element(container))
                .map(|element| element.classes().collect::<Vec<_>>().join(" "))
                .unwrap_or_default();
            log::debug!("Unable to apply cell numbering to code block with classes \"{classes}\"");
            return;
        }
    };
    reindent(tree, pre, marker.chars().count());
    tree.prepend(pre, Node::Text(marker.into()));
}

/// Indents every line after the first by `width` spaces, leaving blank lines blank.
///
/// Text nodes are rewritten individually so markup inside the code survives.
fn reindent(tree: &mut Tree, pre: NodeId, width: usize) {
    let runs = (tree.text_nodes(pre).into_iter())
        .map(|text| (text, tree.text(text)))
        .collect::<Vec<_>>();
    let code = runs.iter().map(|(_, text)| text.as_str()).collect::<String>();
    let indent = " ".repeat(width);

    let mut offset = 0;
    for (node, text) in runs {
        let mut indented = String::with_capacity(text.len());
        for (i, c) in text.char_indices() {
            indented.push(c);
            if c == '\n' && !starts_blank_line(&code[offset + i + 1..]) {
                indented.push_str(&indent);
            }
        }
        offset += text.len();
        if indented != text {
            tree.set_text(node, indented);
        }
    }
}

fn starts_blank_line(rest: &str) -> bool {
    rest.split('\n')
        .next()
        .map_or(true, |line| line.trim().is_empty())
}

/// Keeps the highlighter's token classes, moving them onto `<code>` elements.
pub fn keep_highlighting(tree: &mut Tree) {
    let root = tree.root();
    for container in tree.select(root, |element| element.has(Marker::Highlight)) {
        for span in tree.select(container, |element| {
            element.is("span") && element.classes().next().is_some()
        }) {
            tree.edit(span, |span| span.rename("code"));
        }
    }
}

/// Unwraps the `span.pre` runs Sphinx puts inside inline literals.
pub fn inline_code(tree: &mut Tree) {
    let root = tree.root();
    for code in tree.select(root, |element| element.is("code") && element.has(Marker::Literal)) {
        for span in tree.select(code, |element| {
            element.is("span") && element.has(Marker::PreformattedText)
        }) {
            tree.unwrap(span);
        }
    }
}
