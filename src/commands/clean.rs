//! Clean command implementation

use crate::cleaner::{clean, clean_in_background, CleanOptions, CleanProgress, CleanResult};
use crate::cli::CleanArgs;
use crate::config::Config;
use crate::signals;
use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Exit code when the pass completed but some directories failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 5;
/// Exit code when the pass was cancelled.
pub const EXIT_CANCELLED: i32 = 130;

#[derive(Serialize)]
struct JsonReport<'a> {
    root: &'a Path,
    dry_run: bool,
    empty_found_count: usize,
    deleted_count: usize,
    #[serde(flatten)]
    result: &'a CleanResult,
}

/// Run the clean command.
pub fn run(args: CleanArgs, config: &Config, quiet: bool) -> Result<()> {
    let options = build_options(&args, config);
    let cancel = signals::install_cancel_handler()?;
    let max_failures = config.cleaner.max_reported_failures;

    if !options.dry_run && !args.force {
        if !quiet {
            println!("Scanning for empty directories in {}...", args.path.display());
        }
        let preview_options = options.clone().with_dry_run(true);
        let preview = completed(clean(&args.path, Some(&preview_options), &cancel))?;

        if preview.empty_found_count() == 0 {
            println!("No empty directories found.");
            return Ok(());
        }

        print_paths("Empty directories:", &preview.empty_directories);
        println!("\nParents left empty by these deletions are removed as well.");
        print!(
            "Delete {} empty director{}{}? [y/N] ",
            preview.empty_found_count(),
            if preview.empty_found_count() == 1 { "y" } else { "ies" },
            if options.send_to_trash { " (to trash)" } else { "" }
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if cancel.is_cancelled() {
            exit_cancelled();
        }

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let progress = Arc::new(CleanProgress::new());
    let handle = clean_in_background(
        args.path.clone(),
        options.clone(),
        cancel,
        progress.clone(),
    )?;

    let spinner = if quiet || args.json {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    };

    while !handle.is_finished() {
        spinner.set_message(format!(
            "{} checked, {} empty, {} deleted",
            progress.visited(),
            progress.empty(),
            progress.deleted()
        ));
        spinner.tick();
        std::thread::sleep(Duration::from_millis(100));
    }
    spinner.finish_and_clear();

    let outcome = handle
        .join()
        .map_err(|_| anyhow!("clean worker thread panicked"))?;

    let code = exit_code(&outcome);
    let result = completed(outcome)?;

    if args.json {
        let report = JsonReport {
            root: &args.path,
            dry_run: options.dry_run,
            empty_found_count: result.empty_found_count(),
            deleted_count: result.deleted_count(),
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if options.dry_run {
            print_paths("[DRY RUN] Would delete:", &result.empty_directories);
        } else {
            print_paths("Deleted:", &result.deleted_directories);
        }
        println!("\n{}", format_summary(&result, options.dry_run));
    }

    if result.has_failures() {
        eprintln!("\nCompleted with {} issue(s):", result.failures.len());
        for line in result.failure_summary(max_failures) {
            eprintln!("  {}", line);
        }
    }
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

/// Process exit code for the outcome of a pass.
fn exit_code(outcome: &crate::Result<CleanResult>) -> i32 {
    match outcome {
        Ok(result) if result.has_failures() => EXIT_PARTIAL_FAILURE,
        Ok(_) => 0,
        Err(e) if e.is_cancelled() => EXIT_CANCELLED,
        Err(_) => 1,
    }
}

/// Unwrap a finished pass, leaving the process if it was cancelled.
fn completed(outcome: crate::Result<CleanResult>) -> Result<CleanResult> {
    match outcome {
        Ok(result) => Ok(result),
        Err(e) if e.is_cancelled() => exit_cancelled(),
        Err(e) => Err(e.into()),
    }
}

fn exit_cancelled() -> ! {
    eprintln!("Cancelled. Directories removed before cancellation stay removed.");
    std::process::exit(EXIT_CANCELLED)
}

/// Merge command-line flags over the configured defaults.
fn build_options(args: &CleanArgs, config: &Config) -> CleanOptions {
    let mut options = config
        .cleaner
        .to_options()
        .with_dry_run(args.dry_run)
        .with_excluded_names(args.exclude.iter().cloned())
        .with_excluded_paths(args.exclude_path.iter().cloned());

    if args.trash {
        options.send_to_trash = true;
    }
    if args.follow_reparse_points {
        options.skip_reparse_points = false;
    }
    if args.delete_root {
        options.delete_root_when_empty = true;
    }
    if args.max_depth.is_some() {
        options.max_depth = args.max_depth;
    }
    options
}

fn print_paths(title: &str, paths: &[std::path::PathBuf]) {
    if paths.is_empty() {
        return;
    }
    println!("\n{}", title);
    for path in paths {
        println!("  {}", path.display());
    }
}

fn format_summary(result: &CleanResult, dry_run: bool) -> String {
    let mut lines = vec!["Results:".to_string()];
    lines.push(format!("  Empty:   {}", result.empty_found_count()));
    if !dry_run {
        lines.push(format!("  Deleted: {}", result.deleted_count()));
    }
    if result.has_failures() {
        lines.push(format!("  Failed:  {}", result.failures.len()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use crate::cleaner::{CancellationToken, CleanFailure, FailureStage};
    use crate::error::SweeperError;
    use clap::Parser;
    use std::path::PathBuf;

    fn clean_args(argv: &[&str]) -> CleanArgs {
        let mut full = vec!["empty-sweeper", "clean"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Clean(args) => args,
            _ => panic!("Expected Clean command"),
        }
    }

    #[test]
    fn test_build_options_uses_config_defaults() {
        let options = build_options(&clean_args(&[]), &Config::default());

        assert!(!options.dry_run);
        assert!(options.skip_reparse_points);
        assert!(options.excluded_name_patterns.contains(".git"));
    }

    #[test]
    fn test_build_options_flags_override_config() {
        let mut config = Config::default();
        config.cleaner.max_depth = Some(2);

        let options = build_options(
            &clean_args(&[
                "-n",
                "--trash",
                "--follow-reparse-points",
                "--delete-root",
                "-d",
                "7",
                "-e",
                "tmp;cache",
                "-x",
                "/srv/keep",
            ]),
            &config,
        );

        assert!(options.dry_run);
        assert!(options.send_to_trash);
        assert!(!options.skip_reparse_points);
        assert!(options.delete_root_when_empty);
        assert_eq!(options.max_depth, Some(7));
        assert!(options.excluded_name_patterns.contains("tmp"));
        assert!(options.excluded_name_patterns.contains("cache"));
        assert!(options.excluded_name_patterns.contains(".git"));
        assert!(options
            .excluded_full_paths
            .contains(&PathBuf::from("/srv/keep")));
    }

    #[test]
    fn test_format_summary() {
        let result = CleanResult {
            empty_directories: vec![PathBuf::from("/a"), PathBuf::from("/b")],
            deleted_directories: vec![PathBuf::from("/a")],
            failures: vec![CleanFailure {
                path: PathBuf::from("/b"),
                stage: FailureStage::Delete,
                error: "busy".to_string(),
            }],
        };

        assert_eq!(
            format_summary(&result, false),
            "Results:\n  Empty:   2\n  Deleted: 1\n  Failed:  1"
        );
        assert_eq!(
            format_summary(&CleanResult::default(), true),
            "Results:\n  Empty:   0"
        );
    }

    #[test]
    fn test_exit_code_for_each_outcome() {
        let failed = CleanResult {
            failures: vec![CleanFailure {
                path: PathBuf::from("/b"),
                stage: FailureStage::Delete,
                error: "busy".to_string(),
            }],
            ..CleanResult::default()
        };

        assert_eq!(exit_code(&Ok(CleanResult::default())), 0);
        assert_eq!(exit_code(&Ok(failed)), EXIT_PARTIAL_FAILURE);
        assert_eq!(
            exit_code(&Err(SweeperError::PathNotFound(PathBuf::from("/x")))),
            1
        );
    }

    #[test]
    fn test_cancelled_preview_maps_to_cancel_exit_code() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("empty")).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let preview = CleanOptions::new().with_dry_run(true);

        let outcome = clean(tmp.path(), Some(&preview), &token);

        assert_eq!(exit_code(&outcome), EXIT_CANCELLED);
    }
}
