use std::{path::PathBuf, process};

use clap::Parser;
use jb_htmlbook::{Book, Config, Converter};

/// Converts a Jupyter Book project into HTMLBook.
///
/// Runs `jupyter-book build` on SOURCE (the directory holding `_toc.yml` and `_config.yml`),
/// converts and consolidates the output to HTMLBook, and places those files in TARGET.
#[derive(Parser)]
#[command(version)]
struct Cli {
    source: PathBuf,
    target: PathBuf,
    /// Update the file list of this `atlas.json` with the converted files
    #[arg(long, value_name = "PATH")]
    atlas_json: Option<PathBuf>,
    /// Convert an existing `_build/html` without running `jupyter-book build`
    #[arg(long)]
    skip_jb_build: bool,
    /// Don't number code cells
    #[arg(long)]
    skip_numbering: bool,
    /// Keep syntax highlighting spans in code blocks
    #[arg(long)]
    keep_highlighting: bool,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    init_logger();
    let cli = Cli::parse();
    log::info!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let book = Book::new(&cli.source, &cli.target)?;
    let mut cfg = Config::load(&book.source_dir)?;
    cfg.code.skip_numbering |= cli.skip_numbering;
    cfg.code.keep_highlighting |= cli.keep_highlighting;
    if cli.atlas_json.is_some() {
        cfg.atlas_json = cli.atlas_json;
    }

    let files = Converter::new(book, cfg)
        .skip_build(cli.skip_jb_build)
        .convert()?;
    let files = files
        .iter()
        .map(|file| file.display().to_string())
        .collect::<Vec<_>>();
    println!("{}", files.join(", "));
    Ok(())
}

/// Logs to stderr, filtered by `JB2HTMLBOOK_LOG` (`info` by default).
fn init_logger() {
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_env_var("JB2HTMLBOOK_LOG")
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy();
    let log_env = std::env::var("JB2HTMLBOOK_LOG");
    // Silence some particularly noisy dependencies unless the user
    // specifically asks for them.
    let silence_unless_specified = |filter: tracing_subscriber::EnvFilter, target| {
        if !log_env.as_ref().is_ok_and(|s| {
            s.split(',').any(|directive| directive.starts_with(target))
        }) {
            filter.add_directive(format!("{target}=warn").parse().unwrap())
        } else {
            filter
        }
    };
    let filter = silence_unless_specified(filter, "html5ever");

    // Don't show the target by default, since it generally isn't useful
    // unless you are overriding the level.
    let with_target = log_env.is_ok();

    tracing_subscriber::fmt()
        .without_time()
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(with_target)
        .init();
}
