use anyhow::{Context, Result};
use bloom_markdown::{Document, ParseOptions};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

mod config;
mod output;
mod transform;
mod watch;

use config::BloomConfig;

#[derive(Parser)]
#[command(name = "bloom", version, about = "Parse, normalise and transform markdown articles")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Show debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Let unterminated code/math blocks run to the end of the file
    #[arg(long, global = true)]
    lenient: bool,

    /// Path to bloom.json (default: ./bloom.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the block structure of an article
    Show {
        /// Path to the .md file
        file: String,
    },

    /// Parse an article and write it back out in canonical form
    Render {
        /// Path to the .md file
        file: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Re-render whenever the file changes
        #[arg(long)]
        watch: bool,
    },

    /// Check that article(s) parse
    Check {
        /// Files, or directories to search for .md files
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Prepare an article for publishing
    Transform {
        /// Path to the .md file
        file: String,

        /// Point local images at the configured image host
        #[arg(long)]
        public_images: bool,

        /// Replace trailing `\\` in math blocks with the configured newline command
        #[arg(long)]
        math_newline: bool,

        /// Move leading quotes into the header
        #[arg(long)]
        header_quotes: bool,

        /// Emit only the body, without title, header or footer
        #[arg(long)]
        body_only: bool,

        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Re-run whenever the file changes
        #[arg(long)]
        watch: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = config::load_config(cli.config.as_deref(), Path::new("."))?;
    let options = if cli.lenient || config.fences.lenient {
        ParseOptions::lenient()
    } else {
        ParseOptions::default()
    };

    match cli.command {
        Commands::Show { file } => {
            let doc = parse_file(&file, options)?;
            println!("{}", doc.to_terminal());
        }
        Commands::Render { file, out, watch } => {
            let job = || handle_render(&file, out.as_deref(), options, cli.quiet);
            if watch {
                watch::watch_and_rerun(&file, job)?;
            } else {
                job()?;
            }
        }
        Commands::Check { paths } => {
            handle_check(&paths, options)?;
        }
        Commands::Transform {
            file,
            public_images,
            math_newline,
            header_quotes,
            body_only,
            out,
            dry_run,
            watch,
        } => {
            let opts = transform::TransformOpts {
                public_images,
                math_newline,
                header_quotes,
                body_only,
            };
            let job = || {
                handle_transform(&file, &opts, &config, out.as_deref(), dry_run, options, cli.quiet)
            };
            if watch {
                watch::watch_and_rerun(&file, job)?;
            } else {
                job()?;
            }
        }
    }

    Ok(())
}

fn parse_file(file: &str, options: ParseOptions) -> Result<Document> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file))?;
    let doc = bloom_markdown::parse_with(&content, options)
        .with_context(|| format!("Failed to parse '{}'", file))?;
    log::debug!("{}: {} body blocks", file, doc.len());
    Ok(doc)
}

fn handle_render(file: &str, out: Option<&Path>, options: ParseOptions, quiet: bool) -> Result<()> {
    let doc = parse_file(file, options)?;
    output::emit(&transform::render(&doc, false), out, false, quiet)
}

fn handle_transform(
    file: &str,
    opts: &transform::TransformOpts,
    config: &BloomConfig,
    out: Option<&Path>,
    dry_run: bool,
    options: ParseOptions,
    quiet: bool,
) -> Result<()> {
    let mut doc = parse_file(file, options)?;
    let article = transform::article_name(Path::new(file));
    let report = transform::apply(&mut doc, &article, opts, config)?;

    // Keep stdout clean for the document itself
    if !quiet {
        let mut parts = Vec::new();
        if opts.public_images {
            parts.push(format!("{} images rewritten", report.images));
        }
        if opts.math_newline {
            parts.push(format!("{} math lines rewritten", report.math_lines));
        }
        if opts.header_quotes {
            parts.push(format!("{} blocks moved to header", report.header_blocks));
        }
        if !parts.is_empty() {
            eprintln!("{} {}: {}", "Transformed".green().bold(), file, parts.join(", "));
        }
    }

    output::emit(&transform::render(&doc, opts.body_only), out, dry_run, quiet)
}

/// Expand directories into the .md files under them, sorted by name.
fn collect_markdown_files(paths: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let path = Path::new(path);
        if !path.is_dir() {
            files.push(path.to_path_buf());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            let is_markdown = entry.path().extension().is_some_and(|ext| ext == "md");
            if entry.file_type().is_file() && is_markdown {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

fn handle_check(paths: &[String], options: ParseOptions) -> Result<()> {
    let mut has_errors = false;

    for file in collect_markdown_files(paths)? {
        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) => {
                has_errors = true;
                println!(
                    "{}: {}: Failed to read: {}",
                    file.display(),
                    "error".red().bold(),
                    e
                );
                continue;
            }
        };

        match bloom_markdown::parse_with(&content, options) {
            Ok(_) => println!("{}: {}", file.display(), "OK".green()),
            Err(e) => {
                has_errors = true;
                println!(
                    "{}:{}: {}: {}",
                    file.display(),
                    e.line(),
                    "error".red().bold(),
                    e
                );
            }
        }
    }

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}
