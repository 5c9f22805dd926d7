//! uploadkit CLI - upload directory retention and searchable PDFs

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use uploadkit::ocr::DEFAULT_DPI;
use uploadkit::sweep::{EntryReport, DEFAULT_MAX_FILE_AGE_HOURS, DEFAULT_UPLOAD_DIR};
use uploadkit::{BuildEvent, EntryOutcome, OcrOptions, SearchablePdfBuilder, SweepConfig, Sweeper};

#[derive(Parser)]
#[command(name = "uploadkit")]
#[command(version)]
#[command(about = "Sweep old uploads and build searchable PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete files older than a threshold from the upload directory
    Sweep(SweepArgs),

    /// Convert a scanned PDF into a searchable PDF
    Ocr(OcrArgs),

    /// Show version information
    Version,
}

#[derive(clap::Args, Debug)]
struct SweepArgs {
    /// Directory to sweep (not recursive)
    #[arg(long, value_name = "DIR", env = "UPLOADKIT_DIR", default_value = DEFAULT_UPLOAD_DIR)]
    dir: PathBuf,

    /// Remove files older than this many hours
    #[arg(long, value_name = "HOURS", conflicts_with_all = ["max_age_secs", "legacy_hours"])]
    max_age_hours: Option<u64>,

    /// Remove files older than this many seconds
    #[arg(long, value_name = "SECS", conflicts_with = "legacy_hours")]
    max_age_secs: Option<u64>,

    /// Historical setting: threshold is HOURS x 60 seconds [default: 5]
    #[arg(long, value_name = "HOURS")]
    legacy_hours: Option<u64>,

    /// Report what would be removed without deleting
    #[arg(long)]
    dry_run: bool,

    /// Print the sweep report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct OcrArgs {
    /// Input PDF file
    #[arg(value_name = "INPUT", default_value = "Page1.pdf")]
    input: PathBuf,

    /// Output PDF file
    #[arg(value_name = "OUTPUT", default_value = "searchable_output.pdf")]
    output: PathBuf,

    /// Rasterization resolution
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: u32,

    /// Tesseract language(s), e.g. "eng+deu"
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Recognize pages in parallel
    #[arg(long)]
    parallel: bool,

    /// pdftoppm executable
    #[arg(long, value_name = "PATH", env = "UPLOADKIT_PDFTOPPM", default_value = "pdftoppm")]
    pdftoppm: PathBuf,

    /// tesseract executable
    #[arg(long, value_name = "PATH", env = "UPLOADKIT_TESSERACT", default_value = "tesseract")]
    tesseract: PathBuf,
}

impl SweepArgs {
    fn to_config(&self) -> SweepConfig {
        let config = SweepConfig::new()
            .with_upload_dir(&self.dir)
            .with_dry_run(self.dry_run);

        match (self.max_age_hours, self.max_age_secs, self.legacy_hours) {
            (Some(hours), _, _) => config.with_max_age_hours(hours),
            (None, Some(secs), _) => config.with_max_age(Duration::from_secs(secs)),
            (None, None, Some(hours)) => config.with_legacy_max_age_hours(hours),
            (None, None, None) => config.with_legacy_max_age_hours(DEFAULT_MAX_FILE_AGE_HOURS),
        }
    }
}

impl OcrArgs {
    fn to_options(&self) -> OcrOptions {
        OcrOptions::new()
            .with_dpi(self.dpi)
            .with_language(&self.lang)
            .with_parallel(self.parallel)
            .with_pdftoppm(&self.pdftoppm)
            .with_tesseract(&self.tesseract)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Sweep(args)) => cmd_sweep(&args),
        Some(Commands::Ocr(args)) => cmd_ocr(&args),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: uploadkit <sweep|ocr> [OPTIONS]".yellow());
            println!("       uploadkit --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_sweep(args: &SweepArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config();

    if !args.json {
        println!(
            "Starting cleanup of files older than {}...",
            describe_duration(config.max_age)
        );
    }

    let report = Sweeper::new(config).sweep()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.directory_missing {
        println!(
            "{}",
            format!("Upload folder {} does not exist.", report.directory.display()).yellow()
        );
        return Ok(());
    }

    for entry in &report.entries {
        match &entry.outcome {
            EntryOutcome::Removed => {
                println!("{} {}", "Removed old file:".green(), entry.path.display())
            }
            EntryOutcome::WouldRemove => {
                println!("{} {}", "Would remove:".cyan(), entry.path.display())
            }
            EntryOutcome::Failed { reason } => println!(
                "{} {}: {}",
                failure_label(entry).red(),
                entry.path.display(),
                reason
            ),
            EntryOutcome::Retained | EntryOutcome::SkippedDirectory => {}
        }
    }

    if report.dry_run {
        println!(
            "{} {} old files would be removed",
            "Dry run completed:".green().bold(),
            report.would_remove()
        );
    } else {
        println!(
            "{} removed {} old files",
            "Cleanup completed:".green().bold(),
            report.removed()
        );
    }

    Ok(())
}

fn cmd_ocr(args: &OcrArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.input.exists() {
        println!("{}", "Input PDF file not found!".yellow());
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Rasterizing pages...");

    let progress = pb.clone();
    let builder = SearchablePdfBuilder::new(args.to_options()).on_event(move |event| match event {
        BuildEvent::Rasterized { page_count } => {
            progress.set_length(*page_count as u64);
            progress.set_message("Recognizing text...");
        }
        BuildEvent::PageRecognized { .. } => progress.inc(1),
        BuildEvent::Saved { .. } => progress.set_message("Saved"),
    });

    let result = builder.build(&args.input, &args.output);
    match &result {
        Ok(_) => pb.finish_with_message("Done!"),
        Err(_) => pb.abandon(),
    }
    let summary = result?;

    println!(
        "{} Searchable PDF saved as: {} ({} pages)",
        "Conversion complete.".green().bold(),
        summary.output.display(),
        summary.page_count
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "uploadkit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Upload retention sweeper and searchable-PDF builder");
    println!();
    println!("License: MIT");
}

/// Entries without an age could not be inspected; the rest failed on removal.
fn failure_label(entry: &EntryReport) -> &'static str {
    if entry.age_secs.is_none() {
        "Error inspecting file"
    } else {
        "Error removing file"
    }
}

/// Human-readable threshold, in the largest unit that divides it evenly.
fn describe_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (value, unit) = if secs != 0 && secs % 3600 == 0 {
        (secs / 3600, "hour")
    } else if secs != 0 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };
    let plural = if value == 1 { "" } else { "s" };
    format!("{} {}{}", value, unit, plural)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep_args(args: &[&str]) -> SweepArgs {
        let mut argv = vec!["uploadkit", "sweep"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Sweep(args)) => args,
            _ => panic!("expected sweep command"),
        }
    }

    #[test]
    fn test_sweep_defaults_match_legacy_job() {
        let config = sweep_args(&["--dir", "uploads"]).to_config();
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.max_age, Duration::from_secs(300));
    }

    #[test]
    fn test_sweep_threshold_flags() {
        let config = sweep_args(&["--max-age-hours", "5"]).to_config();
        assert_eq!(config.max_age, Duration::from_secs(18_000));

        let config = sweep_args(&["--max-age-secs", "90"]).to_config();
        assert_eq!(config.max_age, Duration::from_secs(90));

        let config = sweep_args(&["--legacy-hours", "2", "--dry-run"]).to_config();
        assert_eq!(config.max_age, Duration::from_secs(120));
        assert!(config.dry_run);
    }

    #[test]
    fn test_sweep_threshold_flags_conflict() {
        let result = Cli::try_parse_from([
            "uploadkit",
            "sweep",
            "--max-age-hours",
            "1",
            "--legacy-hours",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_ocr_defaults() {
        let cli = Cli::try_parse_from(["uploadkit", "ocr"]).unwrap();
        let Some(Commands::Ocr(args)) = cli.command else {
            panic!("expected ocr command");
        };
        assert_eq!(args.input, PathBuf::from("Page1.pdf"));
        assert_eq!(args.output, PathBuf::from("searchable_output.pdf"));

        let options = args.to_options();
        assert_eq!(options.dpi, 200);
        assert_eq!(options.language, "eng");
        assert!(!options.parallel);
    }

    #[test]
    fn test_failure_label() {
        let unreadable = EntryReport {
            path: PathBuf::from("uploads/dangling"),
            age_secs: None,
            outcome: EntryOutcome::Failed {
                reason: "No such file or directory".into(),
            },
        };
        assert_eq!(failure_label(&unreadable), "Error inspecting file");

        let locked = EntryReport {
            age_secs: Some(7200),
            ..unreadable
        };
        assert_eq!(failure_label(&locked), "Error removing file");
    }

    #[test]
    fn test_describe_duration() {
        assert_eq!(describe_duration(Duration::from_secs(300)), "5 minutes");
        assert_eq!(describe_duration(Duration::from_secs(3600)), "1 hour");
        assert_eq!(describe_duration(Duration::from_secs(90)), "90 seconds");
        assert_eq!(describe_duration(Duration::ZERO), "0 seconds");
    }
}
