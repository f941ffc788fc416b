use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use book_parser::{db, export, parser, Book, Settings};

#[derive(Parser)]
#[command(name = "book_parser", about = "Split a plain-text book into its table of contents and entries")]
struct Cli {
    /// TOC heading line (default from settings: "Poems")
    #[arg(long, global = true)]
    heading: Option<String>,
    /// Category assigned to every entry
    #[arg(long, global = true)]
    category: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one book and write book.json + poems.csv
    Parse {
        /// Input text file
        #[arg(long = "in", value_name = "FILE")]
        input: PathBuf,
        /// Output directory
        #[arg(long, default_value = "public")]
        outdir: PathBuf,
        /// Also export to <outdir>/book.sqlite
        #[arg(long)]
        sqlite: bool,
    },
    /// Show the table of contents and where each title was found
    Toc {
        /// Input text file
        input: PathBuf,
    },
    /// Parse every .txt file in a directory
    Batch {
        /// Directory of text files
        dir: PathBuf,
        /// Output directory
        #[arg(long, default_value = "public")]
        outdir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?.with_overrides(cli.heading, cli.category);
    info!(?settings, "settings loaded");

    let result = match cli.command {
        Commands::Parse { input, outdir, sqlite } => {
            let book = parse_file(&input, &settings)?;
            fs::create_dir_all(&outdir)
                .with_context(|| format!("Failed to create {}", outdir.display()))?;
            export::write_json(&book, &outdir.join("book.json"))?;
            export::write_csv(&book, &outdir.join("poems.csv"))?;
            if sqlite {
                let conn = db::connect(&outdir.join("book.sqlite"))?;
                db::init_schema(&conn)?;
                db::save_book(&conn, &input.display().to_string(), &book)?;
            }

            println!("Input: {}", input.display());
            println!("TOC entries: {}", book.toc.len());
            println!("Poems parsed: {}", book.entries.len());
            print_incomplete(&book);
            Ok(())
        }
        Commands::Toc { input } => {
            let text = read_text(&input)?;
            let lines = parser::split_lines(&text);
            print!("{}", toc_report(&lines, &settings.heading_marker));
            Ok(())
        }
        Commands::Batch { dir, outdir } => {
            let inputs = list_text_files(&dir)?;
            if inputs.is_empty() {
                println!("No .txt files in {}.", dir.display());
                return Ok(());
            }
            fs::create_dir_all(&outdir)
                .with_context(|| format!("Failed to create {}", outdir.display()))?;
            println!("Parsing {} files...", inputs.len());
            let counts = run_batch(&inputs, &outdir, &settings);
            counts.print();
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// TOC table with the 1-based line each title was located on, or `-`.
fn toc_report(lines: &[String], marker: &str) -> String {
    let Some(block) = parser::toc::find_toc(lines, marker) else {
        return format!("No TOC heading {:?} found.\n", marker);
    };
    let Some(first) = block.entries.first() else {
        return format!("TOC heading on line {} has no entries.\n", block.heading + 1);
    };
    let start = parser::locate::body_start(lines, block.end, &first.title);
    let located = parser::locate::locate_titles(lines, start, &block.entries);

    let mut out = String::new();
    let _ = writeln!(out, "{:>3} | {:<40} | {:>4} | {:>6}", "#", "Title", "Page", "Line");
    let _ = writeln!(out, "{}", "-".repeat(62));
    for (i, t) in block.entries.iter().enumerate() {
        let line = located
            .get(i)
            .map(|l| (l + 1).to_string())
            .unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "{:>3} | {:<40} | {:>4} | {:>6}",
            i + 1,
            truncate(&t.title, 40),
            t.page,
            line
        );
    }
    let _ = writeln!(
        out,
        "\n{} of {} titles located (TOC on lines {}-{})",
        located.len(),
        block.entries.len(),
        block.heading + 1,
        block.end
    );
    out
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_file(path: &Path, settings: &Settings) -> Result<Book> {
    let text = read_text(path)?;
    let book = parser::parse_book(&text, settings)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    if !book.is_complete() {
        warn!(
            file = %path.display(),
            toc = book.toc.len(),
            entries = book.entries.len(),
            "incomplete extraction"
        );
    }
    Ok(book)
}

fn print_incomplete(book: &Book) {
    if book.is_complete() {
        return;
    }
    println!("WARNING: Poems parsed != TOC entries.");
    println!("  This usually means one or more titles were not found as standalone headings in the body.");
    if let Some(first) = book.missing_titles().first() {
        println!("  First title not found: {:?} (page {})", first.title, first.page);
    }
}

fn list_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

struct BatchCounts {
    files: usize,
    failed: usize,
    incomplete: usize,
    toc: usize,
    entries: usize,
}

impl BatchCounts {
    fn print(&self) {
        println!(
            "Parsed {} files ({} failed, {} incomplete): {} TOC entries, {} poems.",
            self.files, self.failed, self.incomplete, self.toc, self.entries,
        );
    }
}

fn run_batch(inputs: &[PathBuf], outdir: &Path, settings: &Settings) -> BatchCounts {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(inputs.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let results: Vec<(&PathBuf, Result<Book>)> = inputs
        .par_iter()
        .map(|input| {
            let result = parse_file(input, settings).and_then(|book| {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "book".into());
                export::write_json(&book, &outdir.join(format!("{stem}.json")))?;
                export::write_csv(&book, &outdir.join(format!("{stem}.csv")))?;
                Ok(book)
            });
            pb.inc(1);
            (input, result)
        })
        .collect();
    pb.finish_and_clear();

    let mut counts = BatchCounts {
        files: results.len(),
        failed: 0,
        incomplete: 0,
        toc: 0,
        entries: 0,
    };
    for (input, result) in results {
        match result {
            Ok(book) => {
                counts.toc += book.toc.len();
                counts.entries += book.entries.len();
                let flag = if book.is_complete() {
                    ""
                } else {
                    counts.incomplete += 1;
                    "  (incomplete)"
                };
                println!(
                    "  {}: {}/{} poems{}",
                    input.display(),
                    book.entries.len(),
                    book.toc.len(),
                    flag
                );
            }
            Err(e) => {
                counts.failed += 1;
                println!("  {}: error: {:#}", input.display(), e);
            }
        }
    }
    counts
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_long_titles() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long title indeed", 10), "a very ...");
    }

    #[test]
    fn toc_report_marks_located_lines() {
        let lines = parser::split_lines("Front\nPoems\nDawn 3\nDusk 5\nNoon 7\n\nDawn\na\nNoon\nb");
        let report = toc_report(&lines, "Poems");
        let rows: Vec<&str> = report.lines().collect();

        assert_eq!(rows[2], format!("{:>3} | {:<40} | {:>4} | {:>6}", 1, "Dawn", 3, 7));
        assert_eq!(rows[3], format!("{:>3} | {:<40} | {:>4} | {:>6}", 2, "Dusk", 5, "-"));
        assert_eq!(rows[4], format!("{:>3} | {:<40} | {:>4} | {:>6}", 3, "Noon", 7, "-"));
        assert_eq!(rows[6], "1 of 3 titles located (TOC on lines 2-6)");
    }

    #[test]
    fn toc_report_without_toc() {
        let lines = parser::split_lines("Contents\nDawn 3");
        assert_eq!(toc_report(&lines, "Poems"), "No TOC heading \"Poems\" found.\n");
        let lines = parser::split_lines("Title\nPoems\n\nprose");
        assert_eq!(toc_report(&lines, "Poems"), "TOC heading on line 2 has no entries.\n");
    }

    #[test]
    fn batch_writes_outputs_and_reports_failures() {
        let input_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        fs::write(input_dir.path().join("good.txt"), "Poems\nDawn 3\n\nDawn\nline\n").unwrap();
        fs::write(input_dir.path().join("bad.txt"), "no toc here\n").unwrap();
        fs::write(input_dir.path().join("notes.md"), "Poems\nDawn 3\n").unwrap();

        let inputs = list_text_files(input_dir.path()).unwrap();
        assert_eq!(inputs.len(), 2);

        let counts = run_batch(&inputs, out_dir.path(), &Settings::default());
        assert_eq!(counts.files, 2);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.entries, 1);
        assert!(out_dir.path().join("good.json").exists());
        assert!(out_dir.path().join("good.csv").exists());
        assert!(!out_dir.path().join("bad.json").exists());
    }
}
