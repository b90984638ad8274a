mod db;
mod loader;
mod output;
mod parser;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cable_scraper", about = "Fiber-optic cable datasheet extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one JSON record per fiber count from every datasheet
    Parse {
        /// Directory holding .pdf / .txt datasheets
        #[arg(short, long, default_value = loader::DEFAULT_INPUT_DIR)]
        input: PathBuf,
        /// Directory for the JSON records
        #[arg(short, long, default_value = output::DEFAULT_OUTPUT_DIR)]
        output: PathBuf,
        /// SQLite database receiving the records
        #[arg(long, default_value = db::DEFAULT_DB_PATH)]
        db: PathBuf,
        /// Only write JSON files
        #[arg(long)]
        no_db: bool,
        /// Max datasheets to read (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },
    /// Extracted cables table
    Overview {
        /// Filter by fiber type (SM, MM)
        #[arg(short, long)]
        fiber_type: Option<String>,
        /// Filter by cable type (UT, MT)
        #[arg(short, long)]
        cable_type: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        #[arg(long, default_value = db::DEFAULT_DB_PATH)]
        db: PathBuf,
    },
    /// Record counts and fields that fell back to N/A
    Stats {
        #[arg(long, default_value = db::DEFAULT_DB_PATH)]
        db: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input,
            output,
            db,
            no_db,
            limit,
            no_progress,
        } => {
            let loaded = loader::load_documents(&input, limit)?;
            if loaded.documents.is_empty() {
                println!("No readable datasheets in '{}'.", input.display());
                return Ok(());
            }

            println!("Processing {} datasheets...", loaded.documents.len());
            let batch = if no_progress {
                parser::parse_all(&loaded.documents)
            } else {
                parse_documents(&loaded.documents)?
            };
            for failure in &batch.failures {
                println!("--> {}", failure);
            }
            if batch.records.is_empty() {
                println!("No cable data was extracted.");
                return Ok(());
            }

            let written = output::write_records(&output, &batch.records)?;
            let saved = if no_db {
                None
            } else {
                let conn = db::connect(&db)?;
                db::init_schema(&conn)?;
                Some(db::save_cables(&conn, &batch.records)?)
            };

            let counts = ParseCounts {
                records: batch.records.len(),
                files: written.written,
                write_errors: written.failed,
                saved,
                skipped: batch.skipped.len(),
                unreadable: loaded.failed.len(),
                failed: batch.failures.len(),
            };
            counts.print();
            println!("JSON records in: {}", output.display());
            Ok(())
        }
        Commands::Overview {
            fiber_type,
            cable_type,
            limit,
            db,
        } => {
            let conn = db::connect(&db)?;
            db::init_schema(&conn)?;
            let rows =
                db::fetch_overview(&conn, fiber_type.as_deref(), cable_type.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No cables found.");
                return Ok(());
            }

            println!(
                "{:>4} | {:<28} | {:>5} | {:<4} | {:<4} | {:<16} | {:<10} | {:<14}",
                "#", "Datasheet", "Fib", "Type", "Mode", "Diameter", "Tensile", "Crush"
            );
            println!("{}", "-".repeat(105));

            for r in &rows {
                println!(
                    "{:>4} | {:<28} | {:>5} | {:<4} | {:<4} | {:<16} | {:<10} | {:<14}",
                    r.cable_id,
                    truncate(&r.datasheet, 28),
                    r.fiber_count,
                    r.cable_type,
                    r.fiber_type,
                    truncate(&r.diameter, 16),
                    truncate(&r.tensile, 10),
                    truncate(&r.crush, 14),
                );
            }

            println!("\n{} cables", rows.len());
            Ok(())
        }
        Commands::Stats { db } => {
            let conn = db::connect(&db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Datasheets:  {}", s.datasheets);
            println!("Records:     {}", s.records);
            println!("Single-mode: {}", s.single_mode);
            println!("Multi-mode:  {}", s.multi_mode);
            println!("\n--- Fields at {} ---", parser::SENTINEL);
            for (field, n) in &s.missing {
                println!("  {:<16} {}", field, n);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct ParseCounts {
    records: usize,
    files: usize,
    write_errors: usize,
    saved: Option<usize>,
    skipped: usize,
    unreadable: usize,
    failed: usize,
}

impl ParseCounts {
    fn print(&self) {
        println!(
            "Extracted {} records, wrote {} JSON files ({} write errors).",
            self.records, self.files, self.write_errors,
        );
        if let Some(saved) = self.saved {
            println!("Saved {} rows to the database.", saved);
        }
        println!(
            "Skipped {} non-cable datasheets, {} unreadable, {} failed.",
            self.skipped, self.unreadable, self.failed,
        );
    }
}

fn parse_documents(documents: &[parser::Document]) -> anyhow::Result<parser::BatchOutput> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let batch = parser::parse_all_with_progress(documents, || pb.inc(1));
    pb.finish_and_clear();
    Ok(batch)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
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

// ── Tests ──
