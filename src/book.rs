use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use normpath::PathExt;
use walkdir::WalkDir;

/// The directories of one conversion.
pub struct Book {
    /// The Jupyter Book project, holding `_toc.yml` and `_config.yml`.
    pub source_dir: PathBuf,
    pub destination: PathBuf,
}

impl Book {
    pub fn new(source_dir: impl AsRef<Path>, destination: impl AsRef<Path>) -> anyhow::Result<Self> {
        let source_dir = source_dir.as_ref();
        let source_dir = source_dir
            .normalize()
            .with_context(|| format!("Unable to find book source {}", source_dir.display()))?
            .into_path_buf();

        let destination = destination.as_ref();
        fs::create_dir_all(destination)
            .with_context(|| format!("Unable to create directory {}", destination.display()))?;
        let destination = destination.normalize()?.into_path_buf();

        Ok(Self {
            source_dir,
            destination,
        })
    }

    /// Where `jupyter-book build` writes the HTML pages.
    pub fn html_dir(&self) -> PathBuf {
        self.source_dir.join("_build").join("html")
    }

    /// Copies the images Jupyter Book collected into `images/` in the destination.
    pub fn copy_images(&self) -> anyhow::Result<()> {
        let images = self.html_dir().join("_images");
        if !images.try_exists()? {
            log::debug!("No images to copy from {}", images.display());
            return Ok(());
        }
        let destination = self.destination.join("images");
        for entry in WalkDir::new(&images).follow_links(true) {
            let entry = entry?;
            let src = entry.path();
            let dest = destination.join(src.strip_prefix(&images)?);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest)
                    .with_context(|| format!("Unable to create directory '{}'", dest.display()))?
            } else {
                fs::copy(src, &dest).with_context(|| {
                    format!("Unable to copy '{}' -> '{}'", src.display(), dest.display())
                })?;
            }
        }
        Ok(())
    }
}
