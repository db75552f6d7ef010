use std::fs::{self, File};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::Context;
use colored::*;
use hostledger_common::config::{Config, Source};
use hostledger_common::constants::DEFAULT_LIVE_FRAME_COUNT;
use hostledger_core::capture;
use hostledger_core::inventory::{self, RunStats};
use hostledger_core::report::{self, ReportFormat};
use hostledger_core::table::HostTable;
use tracing::{info, warn};

use crate::terminal::{colors, print, spinner::CaptureSpinner};

pub async fn inventory(source: Source, cfg: &Config) -> anyhow::Result<()> {
    // Fail before capturing anything if the report cannot be written.
    if let Some(path) = &cfg.out_file {
        File::create(path).with_context(|| format!("cannot write report to {}", path.display()))?;
    }

    let live = matches!(source, Source::Live { .. });
    if live && !is_root::is_root() {
        warn!("live capture usually needs root privileges");
    }
    let limit: Option<usize> = frame_limit(live, cfg.frame_limit);

    let stop: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
    if live {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("stopping capture");
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    let start_time: Instant = Instant::now();
    let (table, stats) = tokio::task::spawn_blocking(move || collect(&source, stop, live, limit)).await??;

    inventory_ends(&table, stats, start_time, cfg)
}

/// A count of zero means no explicit count was given.
fn frame_limit(live: bool, requested: Option<usize>) -> Option<usize> {
    match (live, requested.filter(|&count| count > 0)) {
        (_, Some(limit)) => Some(limit),
        (true, None) => Some(DEFAULT_LIVE_FRAME_COUNT),
        (false, None) => None,
    }
}

fn collect(
    source: &Source,
    stop: Arc<AtomicBool>,
    live: bool,
    limit: Option<usize>,
) -> anyhow::Result<(HostTable, RunStats)> {
    let mut frames = capture::open(source, stop)?;
    let spinner = CaptureSpinner::start(live);
    let progress = |count: usize| spinner.report_progress(count);
    inventory::run(frames.as_mut(), limit, Some(&progress))
}

fn inventory_ends(table: &HostTable, stats: RunStats, start_time: Instant, cfg: &Config) -> anyhow::Result<()> {
    if cfg.verbose > 0 {
        print::print_status(format!(
            "{} frames read, {} skipped, {} hosts filtered out",
            stats.frames_read.to_string().color(colors::ACCENT),
            stats.frames_skipped,
            stats.hosts_removed
        ));
    }

    let format = if cfg.csv { ReportFormat::Csv } else { ReportFormat::Table };
    let text: String = report::render(table, format);

    match &cfg.out_file {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("writing report to {}", path.display()))?;
            print::print_status(format!("Report written to {}", path.display()));
        }
        None => {
            print::header("host inventory");
            print::report(&text)?;
        }
    }

    let elapsed: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    let hosts: ColoredString = format!("{} hosts", table.len()).bold().green();
    print::fat_separator();
    print::centerln(&format!("Inventory complete: {hosts} in {elapsed}"));
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_count_wins() {
        assert_eq!(frame_limit(true, Some(5)), Some(5));
        assert_eq!(frame_limit(false, Some(5)), Some(5));
    }

    #[test]
    fn zero_count_falls_back_to_defaults() {
        assert_eq!(frame_limit(true, Some(0)), Some(DEFAULT_LIVE_FRAME_COUNT));
        assert_eq!(frame_limit(false, Some(0)), None);
        assert_eq!(frame_limit(true, None), Some(DEFAULT_LIVE_FRAME_COUNT));
        assert_eq!(frame_limit(false, None), None);
    }
}
