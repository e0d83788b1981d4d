use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

mod error;
mod export;
mod firefox;
mod html_parser;
mod merge;
mod opera;
mod record;
mod tree;

#[derive(Parser)]
#[command(name = "bookmark-merge")]
#[command(about = "Merge browser bookmarks and HTML exports into one deduplicated Netscape bookmark file", long_about = None)]
#[command(version)]
struct Cli {
    /// Read bookmarks from the default Firefox profile
    #[arg(long)]
    firefox: bool,

    /// Read bookmarks from the Opera profile
    #[arg(long)]
    opera: bool,

    /// Bookmark HTML export file to merge (repeatable)
    #[arg(long = "html", value_name = "FILE")]
    html: Vec<PathBuf>,

    /// Output file for the merged bookmarks
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    let source_count = cli.html.len() + usize::from(cli.firefox) + usize::from(cli.opera);
    if source_count < 2 {
        eprintln!("❌ At least two sources are required (--firefox, --opera, --html FILE)");
        std::process::exit(2);
    }

    // Any source failure aborts before the output file is touched.
    let mut lists = Vec::new();

    if cli.firefox {
        info!("📖 Reading Firefox bookmarks...");
        let records = firefox::extract_firefox_bookmarks().context("Firefox")?;
        info!("✅ Read {} bookmarks from Firefox", records.len());
        lists.push(records);
    }

    if cli.opera {
        info!("📖 Reading Opera bookmarks...");
        let records = opera::extract_opera_bookmarks().context("Opera")?;
        info!("✅ Read {} bookmarks from Opera", records.len());
        lists.push(records);
    }

    for path in &cli.html {
        info!("📖 Reading bookmark export {}...", path.display());
        let records = html_parser::parse_bookmarks_file(path)
            .with_context(|| format!("HTML export {}", path.display()))?;
        info!("✅ Parsed {} bookmarks from {}", records.len(), path.display());
        lists.push(records);
    }

    let merged = merge::merge_lists(lists);
    info!("🔄 Merged result: {} unique bookmarks", merged.len());

    let count = export::write_bookmarks_file(&cli.output, merged)?;
    println!("Merged {} bookmarks into {}", count, cli.output.display());

    Ok(())
}
