use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use gameview_patcher::{card_used_guard, PatchError, TARGET_FILE};
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gameview-patcher")]
#[command(about = "One-shot patch for the GameView card-used guard", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root to resolve the target file against
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Dry run - report what would change without modifying the file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show unified diff of the change
    #[arg(short, long)]
    diff: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let patch = card_used_guard(&cli.root)?;
    let target = patch.file.clone();

    if cli.dry_run {
        let (before, after) = match patch.preview() {
            Ok(texts) => texts,
            Err(e) => return report_failure(&target, e),
        };
        println!(
            "{} Would patch {}",
            "✓".green(),
            target.display()
        );
        if cli.diff {
            display_diff(&target, &before, &after);
        }
        return Ok(());
    }

    let before = if cli.diff {
        std::fs::read_to_string(&target).ok()
    } else {
        None
    };

    match patch.apply() {
        Ok(applied) => {
            println!(
                "{} Patched {} ({} bytes replaced)",
                "✓".green(),
                applied.file.display(),
                applied.bytes_replaced
            );
            if let (true, Some(before)) = (cli.diff, before) {
                if let Ok(after) = std::fs::read_to_string(&applied.file) {
                    if before != after {
                        display_diff(&applied.file, &before, &after);
                    }
                }
            }
            Ok(())
        }
        Err(e) => report_failure(&target, e),
    }
}

/// Print diagnostics for a failed patch and exit non-zero.
fn report_failure(target: &Path, err: PatchError) -> Result<()> {
    eprintln!("{} {}", "✗".red(), err);
    if let PatchError::MatchCount { count, .. } = &err {
        match *count {
            0 => {
                eprintln!("  {}", "CONFLICT: guard block not found".red());
                eprintln!("  Possible causes:");
                eprintln!("    - The fix was already applied and the body changed since");
                eprintln!("    - {} was refactored", TARGET_FILE);
            }
            n => {
                eprintln!(
                    "  {}",
                    format!("CONFLICT: guard block found {} times (expected 1)", n).red()
                );
                eprintln!("  Action: patch {} manually", target.display());
            }
        }
    }
    std::process::exit(1);
}

/// Show unified diff between original and patched content.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}
