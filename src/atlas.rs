use std::{fs, path::Path};

use anyhow::Context as _;
use serde_json::Value;

/// Front matter files kept ahead of the converted chapters, in book order.
const FRONT_MATTER: [&str; 6] = [
    "cover.html",
    "praise.html",
    "titlepage.html",
    "copyright.html",
    "dedication.html",
    "toc.html",
];

/// Back matter files kept after the converted chapters, in book order.
const BACK_MATTER: [&str; 3] = ["ix.html", "author_bio.html", "colo.html"];

/// Rewrites the `files` list of the `atlas.json` at `path` to hold `processed` between the
/// book's standard front and back matter.
pub fn update(path: &Path, processed: &[impl AsRef<Path>]) -> anyhow::Result<()> {
    let atlas = fs::read_to_string(path)
        .with_context(|| format!("Unable to read {}", path.display()))?;
    let mut atlas: Value = serde_json::from_str(&atlas)
        .with_context(|| format!("Unable to parse {}", path.display()))?;
    update_files(&mut atlas, processed)
        .with_context(|| format!("Unable to update {}", path.display()))?;
    let atlas = serde_json::to_string_pretty(&atlas)?;
    fs::write(path, atlas + "\n").with_context(|| format!("Unable to write {}", path.display()))?;
    log::info!("Updated {}", path.display());
    Ok(())
}

fn update_files(atlas: &mut Value, processed: &[impl AsRef<Path>]) -> anyhow::Result<()> {
    let files = atlas
        .get_mut("files")
        .and_then(Value::as_array_mut)
        .context("No \"files\" list found; ensure the file is not malformed")?;
    let listed = |name: &str| files.iter().any(|file| file.as_str() == Some(name));

    let front = FRONT_MATTER.into_iter().filter(|name| listed(*name));
    let back = BACK_MATTER.into_iter().filter(|name| listed(*name));
    let processed = processed
        .iter()
        .map(|path| path.as_ref().to_string_lossy().replace('\\', "/"));
    let updated = front
        .map(str::to_owned)
        .chain(processed)
        .chain(back.map(str::to_owned))
        .map(Value::String)
        .collect();
    *files = updated;
    Ok(())
}
