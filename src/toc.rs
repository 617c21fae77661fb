use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context as _};
use serde::Deserialize;

/// One entry of the book's table of contents, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A chapter rendered from a single page.
    File(PathBuf),
    /// A chapter whose sections were split across several pages, first page first.
    Sections(Vec<PathBuf>),
    /// The title page of a part, numbered from 1.
    Part { number: usize, caption: String },
}

/// Source file extensions Jupyter Book renders to `.html`.
const SOURCE_EXTENSIONS: [&str; 3] = [".ipynb", ".md", ".rst"];

#[derive(Debug, Deserialize)]
struct TocFile {
    format: String,
    root: String,
    #[serde(default)]
    chapters: Vec<TocChapter>,
    #[serde(default)]
    parts: Vec<TocPart>,
}

#[derive(Debug, Deserialize)]
struct TocPart {
    caption: Option<String>,
    #[serde(default)]
    chapters: Vec<TocChapter>,
}

#[derive(Debug, Deserialize)]
struct TocChapter {
    file: String,
    #[serde(default)]
    sections: Vec<TocChapter>,
}

impl TocChapter {
    fn files<'a>(&'a self, files: &mut Vec<&'a str>) {
        files.push(&self.file);
        for section in &self.sections {
            section.files(files);
        }
    }

    fn entry(&self, html_dir: &Path) -> Entry {
        if self.sections.is_empty() {
            return Entry::File(html_path(html_dir, &self.file));
        }
        let mut files = Vec::new();
        self.files(&mut files);
        Entry::Sections(files.into_iter().map(|file| html_path(html_dir, file)).collect())
    }
}

/// Where Jupyter Book writes the page for `file`.
fn html_path(html_dir: &Path, file: &str) -> PathBuf {
    let file = file.trim_start_matches('/');
    let stem = (SOURCE_EXTENSIONS.iter())
        .find_map(|extension| file.strip_suffix(extension))
        .unwrap_or(file);
    html_dir.join(format!("{stem}.html"))
}

fn is_preface(entry: &Entry) -> bool {
    match entry {
        Entry::File(path) => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.to_lowercase().contains("preface")),
        _ => false,
    }
}

/// Reads `_toc.yml` from the book at `source_dir`.
///
/// Paths point into `<source_dir>/_build/html`. Prefaces listed inside parts are moved in
/// front of the first part.
pub fn book_toc(source_dir: &Path) -> anyhow::Result<Vec<Entry>> {
    let path = ["_toc.yml", "_toc.yaml"]
        .into_iter()
        .map(|name| source_dir.join(name))
        .find(|path| path.is_file())
        .with_context(|| format!("Can't find _toc.yml in {}", source_dir.display()))?;
    let toc = fs::read_to_string(&path)
        .with_context(|| format!("Unable to read {}", path.display()))?;
    parse(&toc, &source_dir.join("_build").join("html"))
}

fn parse(toc: &str, html_dir: &Path) -> anyhow::Result<Vec<Entry>> {
    let toc: TocFile = serde_yaml::from_str(toc).context("The _toc.yml file is malformed")?;
    if toc.format != "jb-book" {
        bail!(
            "Unsupported table of contents format '{}'; only the jb-book format is supported",
            toc.format
        );
    }

    let mut entries = vec![Entry::File(html_path(html_dir, &toc.root))];
    entries.extend(toc.chapters.iter().map(|chapter| chapter.entry(html_dir)));

    let mut prefaces = Vec::new();
    let mut parts = Vec::new();
    for (index, part) in toc.parts.iter().enumerate() {
        let caption = (part.caption.as_deref())
            .with_context(|| format!("Missing part caption for part {}", index + 1))?;
        parts.push(Entry::Part {
            number: index + 1,
            caption: caption.to_owned(),
        });
        for entry in part.chapters.iter().map(|chapter| chapter.entry(html_dir)) {
            if is_preface(&entry) {
                prefaces.push(entry);
            } else {
                parts.push(entry);
            }
        }
    }
    entries.extend(prefaces);
    entries.extend(parts);
    Ok(entries)
}
