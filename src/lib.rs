//! Converts the HTML output of a [Jupyter Book](https://jupyterbook.org) build into
//! [HTMLBook](https://oreillymedia.github.io/HTMLBook/) chapters.

use std::{
    fs::{self, File},
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

pub mod atlas;

mod book;
pub use book::Book;

pub mod chapter;
pub mod html;
pub mod jupyter_book;

pub mod process;
pub use process::BookIds;

pub mod toc;
pub use toc::Entry;

pub mod tree;
use tree::{DataType, Division, Element, Node, Tree};

#[cfg(test)]
mod tests;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Code block related configuration.
    pub code: CodeConfig,
    /// Keep the section numbers Jupyter Book puts in headings.
    pub keep_section_numbers: bool,
    /// An `atlas.json` whose file list should be updated with the converted chapters.
    pub atlas_json: Option<PathBuf>,
}

/// Configuration for tweaking how code blocks are rendered.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CodeConfig {
    /// Don't prefix code cells with `In [n]:` and `Out[n]:`.
    pub skip_numbering: bool,
    /// Keep the syntax highlighting spans, as `<code>` elements, instead of tagging blocks as
    /// program listings.
    pub keep_highlighting: bool,
}

impl Config {
    pub const FILE_NAME: &'static str = "htmlbook.toml";

    /// Loads `htmlbook.toml` from the book's source directory, if there is one.
    pub fn load(source_dir: &Path) -> anyhow::Result<Self> {
        let path = source_dir.join(Self::FILE_NAME);
        let cfg = match fs::read_to_string(&path) {
            Ok(cfg) => cfg,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("Unable to read {}", path.display()))
            }
        };
        toml::from_str(&cfg).with_context(|| format!("Unable to deserialize {}", path.display()))
    }
}

/// Converts one table of contents entry, writing the result below `build_root`.
///
/// `source_root` is the directory Jupyter Book wrote its HTML to; the output mirrors the
/// entry's directories relative to it. Returns the written file relative to `build_root`,
/// along with `book_ids` updated with the ids the file uses.
pub fn process_chapter(
    entry: &Entry,
    source_root: &Path,
    build_root: &Path,
    mut book_ids: BookIds,
    cfg: &Config,
) -> anyhow::Result<(PathBuf, BookIds)> {
    let (relative, tree, root) = match entry {
        Entry::Part { number, caption } => {
            let (tree, root) = part(*number, caption);
            (PathBuf::from(format!("part-{number}.html")), tree, root)
        }
        Entry::File(path) => chapter(std::slice::from_ref(path), source_root, cfg, &mut book_ids)?,
        Entry::Sections(paths) => chapter(paths, source_root, cfg, &mut book_ids)?,
    };
    if let Entry::Part { number, .. } = entry {
        book_ids.extend([format!("part-{number}")]);
    }

    let out = build_root.join(&relative);
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create directory {}", parent.display()))?;
    }
    let mut writer = io::BufWriter::new(
        File::create(&out).with_context(|| format!("Unable to create {}", out.display()))?,
    );
    tree.serialize(root, &mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Unable to write {}", out.display()))?;
    log::debug!("Wrote {}", out.display());
    Ok((relative, book_ids))
}

fn chapter(
    paths: &[PathBuf],
    source_root: &Path,
    cfg: &Config,
    book_ids: &mut BookIds,
) -> anyhow::Result<(PathBuf, Tree, ego_tree::NodeId)> {
    let mut chapter = chapter::compile(paths)?;
    log::info!("Processing {}...", chapter.name);
    let ids = process::run(&mut chapter, cfg, book_ids);
    book_ids.extend(ids);

    let file_name = format!("{}.html", chapter.name);
    let relative = match paths[0].strip_prefix(source_root) {
        Ok(path) => path.with_file_name(file_name),
        Err(_) => PathBuf::from(file_name),
    };
    Ok((relative, chapter.tree, chapter.root))
}

/// Builds the title page of a part.
fn part(number: usize, caption: &str) -> (Tree, ego_tree::NodeId) {
    let mut tree = Tree::new();
    let mut div = Element::new("div");
    div.set_id(&format!("part-{number}"));
    div.set_data_type(DataType::Division(Division::Part));
    div.set_attr("xmlns", html::XHTML_NAMESPACE);
    let document = tree.root();
    let root = tree.append(document, Node::Element(div));
    tree.append(root, Node::Text("\n".into()));
    let h1 = tree.append(root, Node::Element(Element::new("h1")));
    tree.append(h1, Node::Text(caption.into()));
    tree.append(root, Node::Text("\n".into()));
    (tree, root)
}

/// Converts a whole book: builds it with Jupyter Book, copies its images and converts every
/// entry of its table of contents.
pub struct Converter {
    book: Book,
    cfg: Config,
    skip_build: bool,
}

impl Converter {
    pub fn new(book: Book, cfg: Config) -> Self {
        Self {
            book,
            cfg,
            skip_build: false,
        }
    }

    /// Converts an existing `_build/html` instead of running `jupyter-book build` first.
    pub fn skip_build(mut self, skip: bool) -> Self {
        self.skip_build = skip;
        self
    }

    /// Runs the conversion, returning the written files relative to the target directory in
    /// book order.
    pub fn convert(&self) -> anyhow::Result<Vec<PathBuf>> {
        log::info!("Source: {}", self.book.source_dir.display());
        log::info!("Target: {}", self.book.destination.display());
        if !self.skip_build {
            let version = jupyter_book::check_compatibility()?;
            log::info!("Building with jupyter-book {version}");
            jupyter_book::build(&self.book.source_dir)?;
        }

        self.book.copy_images()?;

        let toc = toc::book_toc(&self.book.source_dir)?;
        let html_dir = self.book.html_dir();
        let mut book_ids = BookIds::new();
        let mut files = Vec::with_capacity(toc.len());
        for entry in &toc {
            let (file, ids) =
                process_chapter(entry, &html_dir, &self.book.destination, book_ids, &self.cfg)?;
            book_ids = ids;
            files.push(file);
        }

        if let Some(atlas_json) = &self.cfg.atlas_json {
            atlas::update(atlas_json, &files)?;
        }
        Ok(files)
    }
}
