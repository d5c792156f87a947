//! pdfoutline CLI - PDF heading outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use pdfoutline::{render, DocumentOutline, JsonFormat, OutlineExtractor};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(version)]
#[command(about = "Extract the title and H1-H4 headings of a PDF as JSON", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Print an indented outline instead of JSON
    #[arg(long, conflicts_with = "compact")]
    tree: bool,

    /// Ignore native bookmarks and always infer headings from typography
    #[arg(long, env = "PDFOUTLINE_NO_BOOKMARKS")]
    no_bookmarks: bool,

    /// Process pages on a single thread
    #[arg(long)]
    sequential: bool,

    /// Skip pages whose text cannot be extracted instead of failing
    #[arg(long)]
    lenient: bool,
}

impl Cli {
    fn extractor(&self) -> OutlineExtractor {
        let mut extractor = OutlineExtractor::new();
        if self.no_bookmarks {
            extractor = extractor.without_bookmarks();
        }
        if self.sequential {
            extractor = extractor.sequential();
        }
        if self.lenient {
            extractor = extractor.lenient();
        }
        extractor
    }

    fn json_format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Extracting outline of {}", cli.input.display());
    let outline = cli.extractor().extract(&cli.input)?;

    let rendered = if cli.tree {
        render::to_text(&outline)
    } else {
        render::to_json(&outline, cli.json_format())?
    };

    match cli.output.as_deref() {
        Some(path) => {
            write_output(path, &rendered)?;
            print_summary(&outline, path);
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn write_output(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn print_summary(outline: &DocumentOutline, path: &Path) {
    println!("{} {}", "Saved to".green(), path.display());
    if !outline.title.is_empty() {
        println!("  {}: {}", "Title".bold(), outline.title);
    }
    println!("  {}: {}", "Headings".bold(), outline.len());
}
