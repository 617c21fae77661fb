use std::{
    fmt::{self, Write},
    fs::{self, File},
    io::{self, Read, Seek},
    path::{Path, PathBuf},
};

use anyhow::Context;
use normpath::PathExt;
use regex::Regex;
use tempfile::{tempfile, TempDir};
use tracing_subscriber::layer::SubscriberExt;

use crate::{process_chapter, BookIds, Config, Converter, Entry};

mod assembly;
mod xrefs;

/// A Jupyter Book project in a temporary directory, with its HTML already built.
pub struct Book {
    root: TempDir,
    entries: Vec<Entry>,
    cfg: Config,
    parts: usize,
    _logger: tracing::subscriber::DefaultGuard,
    logfile: File,
}

#[derive(Clone, Copy)]
pub struct Options {
    max_log_level: tracing::level_filters::LevelFilter,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_log_level: tracing::Level::INFO.into(),
        }
    }
}

impl Options {
    pub fn init(self) -> Book {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("book/_build/html")).unwrap();
        fs::create_dir_all(root.path().join("target")).unwrap();

        // Initialize logger to captures `log` output and redirect it to a tempfile
        let logfile = tempfile().unwrap();
        let _logger = tracing::subscriber::set_default(
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .without_time()
                        .with_ansi(false)
                        .with_writer({
                            let logfile = logfile.try_clone().unwrap();
                            move || logfile.try_clone().unwrap()
                        }),
                )
                .with(
                    tracing_subscriber::filter::Targets::new()
                        .with_default(self.max_log_level)
                        .with_target("html5ever", tracing::Level::INFO),
                ),
        );
        {
            let logger = tracing_log::LogTracer::new();
            let _ = log::set_boxed_logger(Box::new(logger));
            log::set_max_level(log::LevelFilter::Trace);
        }

        Book {
            root,
            entries: Vec::new(),
            cfg: Config::default(),
            parts: 0,
            _logger,
            logfile,
        }
    }

    pub fn max_log_level(
        mut self,
        max_level: impl Into<tracing::level_filters::LevelFilter>,
    ) -> Self {
        self.max_log_level = max_level.into();
        self
    }
}

impl Book {
    pub fn init() -> Self {
        Options::default().init()
    }

    pub fn options() -> Options {
        Options::default()
    }

    pub fn config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    fn source_dir(&self) -> PathBuf {
        self.root.path().join("book")
    }

    fn html_dir(&self) -> PathBuf {
        self.source_dir().join("_build").join("html")
    }

    fn target_dir(&self) -> PathBuf {
        self.root.path().join("target")
    }

    /// Writes a file relative to the book's source directory.
    pub fn file_in_src(self, path: impl AsRef<Path>, contents: &str) -> Self {
        write(&self.source_dir().join(path), contents);
        self
    }

    /// Writes a page exactly as given into the built HTML.
    pub fn raw_page(self, path: impl AsRef<Path>, html: &str) -> Self {
        write(&self.html_dir().join(path), html);
        self
    }

    /// Writes a page whose main content area holds `content`.
    pub fn page(self, path: impl AsRef<Path>, content: &str) -> Self {
        self.raw_page(path, &page(content))
    }

    /// Adds a single page chapter.
    pub fn chapter(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        let path = path.as_ref();
        self.entries.push(Entry::File(self.html_dir().join(path)));
        self.page(path, content)
    }

    /// Adds a chapter split across pages, first page first.
    pub fn sections(mut self, pages: &[(&str, &str)]) -> Self {
        let paths = pages.iter().map(|(path, _)| self.html_dir().join(path)).collect();
        self.entries.push(Entry::Sections(paths));
        pages
            .iter()
            .fold(self, |book, (path, content)| book.page(path, content))
    }

    /// Adds a chapter for a page written with [`Book::raw_page`].
    pub fn entry(mut self, path: impl AsRef<Path>) -> Self {
        self.entries.push(Entry::File(self.html_dir().join(path)));
        self
    }

    pub fn part(mut self, caption: impl Into<String>) -> Self {
        self.parts += 1;
        self.entries.push(Entry::Part {
            number: self.parts,
            caption: caption.into(),
        });
        self
    }

    /// Points the configuration at an `atlas.json` written into the target directory.
    pub fn atlas(mut self, json: &str) -> Self {
        let path = self.target_dir().join("atlas.json");
        write(&path, json);
        self.cfg.atlas_json = Some(path);
        self
    }

    /// Converts the added entries one at a time, threading the book's ids through.
    pub fn build(self) -> BuildOutput {
        let (html_dir, target) = (self.html_dir(), self.target_dir());
        let mut book_ids = BookIds::new();
        let mut res = Ok(());
        for entry in &self.entries {
            match process_chapter(entry, &html_dir, &target, book_ids, &self.cfg) {
                Ok((_, ids)) => book_ids = ids,
                Err(err) => {
                    res = Err(err);
                    break;
                }
            }
        }
        self.output(res)
    }

    /// Runs the whole conversion from `_toc.yml`, without invoking `jupyter-book build`.
    pub fn convert(self) -> BuildOutput {
        let res = crate::Book::new(self.source_dir(), self.target_dir()).and_then(|book| {
            Converter::new(book, self.cfg.clone())
                .skip_build(true)
                .convert()
                .map(drop)
        });
        self.output(res)
    }

    fn output(mut self, res: anyhow::Result<()>) -> BuildOutput {
        self.logfile.seek(io::SeekFrom::Start(0)).unwrap();
        let mut logs = String::new();
        self.logfile.read_to_string(&mut logs).unwrap();
        if let Err(err) = res {
            writeln!(&mut logs, "{err:#}").unwrap()
        }

        let root = self.root.path().normalize().unwrap().into_path_buf();
        let re = Regex::new(&regex::escape(&root.display().to_string())).unwrap();
        let logs = re.replace_all(&logs, "$$ROOT");
        BuildOutput {
            logs: logs.lines().map(str::trim_end).collect::<Vec<_>>().join("\n"),
            dir: self.target_dir(),
            _root: self.root,
        }
    }
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Wraps `content` the way the Sphinx book theme lays out a page.
fn page(content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
        <html><head><meta charset=\"utf-8\"><title>Book</title></head>\n\
        <body><div class=\"bd-container\"><main id=\"main-content\" role=\"main\">\
        <article class=\"bd-article\" role=\"main\">\n\
        {content}\
        </article></main></div></body></html>\n"
    )
}

fn visualize_directory(dir: impl AsRef<Path>, mut writer: impl fmt::Write) -> anyhow::Result<()> {
    fn visualize_directory(
        root: &Path,
        dir: &Path,
        writer: &mut dyn fmt::Write,
    ) -> anyhow::Result<()> {
        let mut entries = fs::read_dir(dir)
            .with_context(|| format!("Unable to read directory: {}", dir.display()))?
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|entry| entry.path());
        for entry in entries {
            let path = entry.path();
            match entry.file_type()? {
                ty if ty.is_dir() => visualize_directory(root, path.as_ref(), writer)?,
                ty if ty.is_file() => {
                    writeln!(writer, "├─ {}", path.strip_prefix(root).unwrap().display())?;
                    match fs::read_to_string(path) {
                        Ok(contents) => {
                            for line in contents.lines() {
                                writeln!(writer, "{}", format!("│ {line}").trim_end())?;
                            }
                        }
                        Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                            writeln!(writer, "│ <INVALID UTF8>")?;
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    visualize_directory(dir.as_ref(), dir.as_ref(), &mut writer)
}

pub struct BuildOutput {
    logs: String,
    dir: PathBuf,
    _root: TempDir,
}

impl fmt::Display for BuildOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.logs.is_empty() {
            writeln!(f, "├─ log output")?;
            for line in self.logs.lines() {
                writeln!(f, "│ {line}")?;
            }
        }
        visualize_directory(&self.dir, f).expect("`visualize_directory` should succeed");
        Ok(())
    }
}
