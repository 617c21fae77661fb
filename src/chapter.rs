use std::{
    error::Error,
    ffi::OsStr,
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use ego_tree::NodeId;

use crate::{
    html,
    tree::{DataType, Division, Element, Marker, Tree},
};

/// File names that mark front matter. Those without an HTMLBook division of the same name
/// become prefaces.
const FRONT_MATTER: &[&str] = &[
    "preface",
    "notation",
    "prereqs",
    "titlepage",
    "foreword",
    "introduction",
];

/// File names that mark back matter. Those without an HTMLBook division of the same name
/// become afterwords.
const BACK_MATTER: &[&str] = &[
    "colophon",
    "author_bio",
    "references",
    "acknowledgments",
    "conclusion",
    "afterword",
];

/// One logical chapter, assembled from one or more Jupyter Book pages.
pub struct Chapter {
    pub tree: Tree,
    /// The chapter's top-level `<section>`, the only child of the document.
    pub root: NodeId,
    /// The stem of the first source file, which names the output file.
    pub name: String,
    pub division: Division,
}

/// A source page with no content section to convert.
#[derive(Debug)]
pub struct MissingChapterRoot {
    pub path: PathBuf,
}

impl fmt::Display for MissingChapterRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to process {}: no top-level content section found",
            self.path.display()
        )
    }
}

impl Error for MissingChapterRoot {}

/// The candidate content of one source page.
struct Page {
    tree: Tree,
    sections: Vec<NodeId>,
    bibliography: Option<NodeId>,
}

impl Page {
    fn read(path: &Path) -> anyhow::Result<Self> {
        let html = fs::read_to_string(path)
            .with_context(|| format!("Unable to read {}", path.display()))?;
        let tree = Tree::parse(&html);
        let root = tree.root();

        let wrappers = tree.select(root, |element| {
            element.is("article") && element.attr("role") == Some("main")
        });
        let sections = match wrappers[..] {
            [] => tree
                .select(root, is_section)
                .into_iter()
                .filter(|&section| !tree.ancestors(section).any(|(_, e)| is_section(e)))
                .collect(),
            [main] => tree
                .element_children(main)
                .into_iter()
                .filter(|&child| tree.element(child).is_some_and(is_section))
                .collect(),
            _ => {
                log::warn!(
                    "{} has more than one main content area and will not be processed",
                    path.display()
                );
                Vec::new()
            }
        };
        let bibliography = tree.select(root, is_bibliography).first().copied();
        let sections = sections
            .into_iter()
            .filter(|&section| Some(section) != bibliography)
            .collect();
        Ok(Self {
            tree,
            sections,
            bibliography,
        })
    }

    /// Text of the page's first `<h1>`, for messages.
    fn title(&self) -> String {
        let root = self.tree.root();
        match self.tree.select(root, |element| element.is("h1")).first() {
            Some(&h1) => self.tree.text(h1).trim().to_owned(),
            None => String::new(),
        }
    }

    /// Is `bibliography` already part of one of this page's sections?
    fn nested(&self, bibliography: NodeId, sections: &[NodeId]) -> bool {
        (self.tree.ancestors(bibliography)).any(|(ancestor, _)| sections.contains(&ancestor))
    }
}

fn is_section(element: &Element) -> bool {
    element.is("section") || (element.is("div") && element.has(Marker::Section))
}

fn is_bibliography(element: &Element) -> bool {
    is_section(element) && element.id() == Some("bibliography")
}

/// Assembles the pages in `paths` into one chapter.
///
/// The first page's content section becomes the chapter and has its headings promoted one level.
/// Sections from the remaining pages become `sect1`s appended to it. Bibliographies from every
/// page are merged into the first one, which ends up as the last section of the chapter.
pub fn compile(paths: &[PathBuf]) -> anyhow::Result<Chapter> {
    let (base, rest) = paths.split_first().context("Chapter has no source files")?;
    let name = base
        .file_stem()
        .and_then(OsStr::to_str)
        .with_context(|| format!("Invalid chapter file name: {}", base.display()))?
        .to_owned();

    let page = Page::read(base)?;
    let (main, bibliography) = match (page.sections.first(), page.bibliography) {
        (Some(&main), bibliography) => (main, bibliography),
        // A page holding nothing but a bibliography is converted as is
        (None, Some(bibliography)) => (bibliography, None),
        (None, None) => {
            return Err(MissingChapterRoot {
                path: base.clone(),
            }
            .into())
        }
    };
    if page.sections.len() > 1 {
        log::warn!(
            "The chapter with title '{}' has extra sections that will not be processed. \
            Please check the notebook source files.",
            page.title()
        );
    }

    let mut tree = Tree::new();
    let document = tree.root();
    let root = tree.graft(document, page.tree.node(main));
    tree.edit(root, |section| {
        section.rename("section");
        section.clear_classes();
        section.set_attr("xmlns", html::XHTML_NAMESPACE);
    });
    promote_headings(&mut tree, root);
    if let Some(bibliography) = bibliography.filter(|&bib| !page.nested(bib, &[main])) {
        tree.graft(root, page.tree.node(bibliography));
    }

    for path in rest {
        let page = Page::read(path)?;
        for &section in &page.sections {
            let section = tree.graft(root, page.tree.node(section));
            tree.edit(section, |section| {
                section.rename("section");
                section.clear_classes();
                section.set_data_type(DataType::Section(1));
            });
        }
        if let Some(bibliography) = page.bibliography {
            if !page.nested(bibliography, &page.sections) {
                tree.graft(root, page.tree.node(bibliography));
            }
        }
    }

    for section in tree.select(root, |element| element.is("div") && element.has(Marker::Section)) {
        tree.edit(section, |section| {
            section.rename("section");
            section.clear_classes();
        });
    }
    merge_bibliographies(&mut tree, root);

    let division = division(&name);
    tree.edit(root, |section| {
        section.set_data_type(DataType::Division(division))
    });
    Ok(Chapter {
        tree,
        root,
        name,
        division,
    })
}

/// Shifts every heading below `root` up one level: `h2` becomes `h1`, ..., `h6` becomes `h5`.
pub fn promote_headings(tree: &mut Tree, root: NodeId) {
    for heading in tree.select(root, |element| element.heading_level().is_some_and(|l| l > 1)) {
        tree.edit(heading, |heading| {
            if let Some(level) = heading.heading_level() {
                heading.rename(html::heading(level - 1));
            }
        });
    }
}

/// Folds the entries of every bibliography into the first one and moves it to the end.
fn merge_bibliographies(tree: &mut Tree, root: NodeId) {
    let mut bibliographies = tree.select(root, is_bibliography).into_iter();
    let Some(carrier) = bibliographies.next() else {
        return;
    };
    let entries = |tree: &Tree, bibliography| {
        tree.select(bibliography, |element| element.is("dl"))
            .first()
            .copied()
    };
    for other in bibliographies {
        match (entries(&*tree, carrier), entries(&*tree, other)) {
            (Some(list), Some(other_list)) => tree.move_children(other_list, list),
            (None, Some(other_list)) => tree.move_to_end(carrier, other_list),
            (_, None) => {}
        }
        tree.remove(other);
    }
    tree.move_to_end(root, carrier);
}

/// Picks the HTMLBook division for a chapter from its file name.
pub fn division(name: &str) -> Division {
    let stub = name
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_lowercase();
    let name = name.to_lowercase();

    if stub.starts_with("appx") || stub.starts_with("bibliography") {
        Division::Appendix
    } else if stub.starts_with("glossary") {
        Division::Glossary
    } else if FRONT_MATTER.contains(&stub.as_str()) || FRONT_MATTER.contains(&name.as_str()) {
        Division::from_name(&stub).unwrap_or(Division::Preface)
    } else if BACK_MATTER.contains(&stub.as_str()) || BACK_MATTER.contains(&name.as_str()) {
        Division::from_name(&stub).unwrap_or(Division::Afterword)
    } else {
        Division::Chapter
    }
}
