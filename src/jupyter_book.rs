use std::{path::Path, process::Command};

use anyhow::{anyhow, Context as _};
use once_cell::sync::Lazy;
use regex::Regex;

/// Defines compatible versions of Jupyter Book
pub static VERSION_REQ: Lazy<semver::VersionReq> =
    // 2.0 no longer builds through Sphinx, whose HTML output this converts
    Lazy::new(|| semver::VersionReq::parse(">=0.13, <2").unwrap());

pub fn check_compatibility() -> anyhow::Result<semver::Version> {
    let output = Command::new("jupyter-book")
        .arg("--version")
        .output()
        .context("Unable to run `jupyter-book --version`")?;
    anyhow::ensure!(
        output.status.success(),
        "`jupyter-book --version` exited with error code {}",
        output.status
    );
    let output = String::from_utf8(output.stdout)
        .context("`jupyter-book --version` output is not UTF8")?;
    let version = parse_version(&output)
        .context("`jupyter-book --version` output does not contain `Jupyter Book : VERSION`")?;
    if VERSION_REQ.matches(&version) {
        Ok(version)
    } else {
        Err(anyhow!(
            "jb-htmlbook is incompatible with detected Jupyter Book version (requires version {}, but using {})",
            *VERSION_REQ, version,
        ))
    }
}

/// Extracts Jupyter Book's own version from `jupyter-book --version`, which also lists the
/// versions of its dependencies.
fn parse_version(output: &str) -> Option<semver::Version> {
    static VERSION: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?im)^\s*jupyter[ -]book\s*:?\s*v?(\d+\.\d+\.\d+)").unwrap()
    });
    let version = VERSION.captures(output)?.get(1)?;
    semver::Version::parse(version.as_str()).ok()
}

/// Runs `jupyter-book build` on the book at `source_dir`.
pub fn build(source_dir: &Path) -> anyhow::Result<()> {
    log::info!("Running jupyter-book build");
    let status = Command::new("jupyter-book")
        .arg("build")
        .arg(source_dir)
        .status()
        .context("Unable to run `jupyter-book build`")?;
    anyhow::ensure!(
        status.success(),
        "`jupyter-book build` exited with error code {status}"
    );
    Ok(())
}
