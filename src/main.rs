//! Main entry point for the `size-scanner` CLI application.
//!
//! Builds the full size tree for a directory, then prints every file and
//! directory whose aggregated size reaches the threshold, sorted by size.
//!
//! # Responsibilities
//! - Parses CLI arguments via [`clap`] using the [`Args`] struct
//! - Initialises `tracing` on stderr (`-v` for more detail)
//! - Delegates the scan to [`TreeBuilder`] with a spinner on stderr
//! - Flattens, sorts, and filters the tree, then renders rows (terminal or CSV)
//!
//! Only an inaccessible root produces a non-zero exit status; unreadable
//! entries below it are skipped.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use size_scanner::metrics::{ProfileData, print_profile_summary, rss_after_phase, save_stats_json};
use size_scanner::output::{render_csv, render_terminal};
use size_scanner::utils::prepare_rows;
use size_scanner::{Args, TreeBuilder, time_phase};
use std::path::Path;
use std::time::Duration;

fn init_logging(args: &Args) {
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"])
            .template("{spinner} Scanning... {pos} entries [{elapsed}]")
            .context("Failed to set progress template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn display_root(root: &Path) -> String {
    root.canonicalize()
        .unwrap_or_else(|_| root.to_path_buf())
        .display()
        .to_string()
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let workers = args.worker_threads()?;
    let order = args.sort_order();
    let mut profile = ProfileData::new();

    eprintln!("Building tree for {}...", display_root(&args.root));
    let pb = spinner()?;
    let builder = TreeBuilder::new()
        .workers(workers)
        .follow_links(args.follow_links)
        .progress(pb.clone());

    let (report, timing) = time_phase!("Build tree", { builder.build_report(&args.root) });
    pb.finish_and_clear();
    let report = report.with_context(|| format!("Scan of '{}' failed", args.root.display()))?;
    profile.add_phase(timing);
    profile.memory_peak = rss_after_phase();

    let (rows, timing) = time_phase!("Sort & filter", {
        prepare_rows(&report.root, args.threshold, order)
    });
    profile.add_phase(timing);

    eprintln!("Printing tree in {} order...", order.as_str());
    let (rendered, timing) = time_phase!("Render", {
        if args.output.is_some() {
            render_csv(&rows, &args)
        } else {
            render_terminal(&rows)
        }
    });
    rendered?;
    profile.add_phase(timing);

    if report.unreadable > 0 {
        tracing::warn!(count = report.unreadable, "some entries could not be read and were skipped");
    }

    if args.profile {
        profile.add_metadata("nodes", report.root.len());
        profile.add_metadata("rows", rows.len());
        profile.add_metadata("workers", report.workers);
        profile.add_metadata("unreadable", report.unreadable);
        print_profile_summary(&profile);

        if let Some(output) = &args.output {
            let stats = save_stats_json(output, &profile)?;
            eprintln!("Performance stats saved to: {}", stats.display());
        }
    }

    Ok(())
}
