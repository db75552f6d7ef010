//! Drives a frame source into a host table.

use hostledger_common::network::subnet::Subnet;
use tracing::{debug, info, trace};

use crate::capture::FrameSource;
use crate::decoder;
use crate::table::{HostTable, Observation};

/// Counters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub frames_read: usize,
    /// Frames too short for the fields their ether type implies.
    pub frames_skipped: usize,
    /// Endpoints that created or changed a host.
    pub hosts_observed: usize,
    pub hosts_removed: usize,
}

#[derive(Debug, Default)]
pub struct Inventory {
    table: HostTable,
    stats: RunStats,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one raw frame into the table.
    pub fn ingest(&mut self, frame: &[u8]) {
        self.stats.frames_read += 1;

        let decoded = match decoder::decode(frame) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!("skipping frame {}: {e}", self.stats.frames_read);
                self.stats.frames_skipped += 1;
                return;
            }
        };
        trace!("{decoded}");

        self.stats.hosts_observed += self
            .table
            .observe_frame(&decoded)
            .iter()
            .filter(|o| matches!(o, Observation::Inserted | Observation::Updated))
            .count();
    }

    pub fn table(&self) -> &HostTable {
        &self.table
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Filters the table and hands it back with the run counters.
    pub fn finish(mut self, subnet: Option<&Subnet>) -> (HostTable, RunStats) {
        self.stats.hosts_removed = self.table.remove_noise_and_out_of_subnet(subnet);
        info!(
            "{} frames, {} hosts kept, {} removed",
            self.stats.frames_read,
            self.table.len(),
            self.stats.hosts_removed
        );
        (self.table, self.stats)
    }
}

/// Reads frames until the source ends or `limit` frames have been seen.
///
/// `on_progress` is called with the running frame count after each frame.
pub fn run(
    source: &mut dyn FrameSource,
    limit: Option<usize>,
    on_progress: Option<&dyn Fn(usize)>,
) -> anyhow::Result<(HostTable, RunStats)> {
    let mut inventory = Inventory::new();

    while limit.is_none_or(|limit| inventory.stats.frames_read < limit) {
        let Some(frame) = source.next_frame()? else {
            break;
        };
        inventory.ingest(frame);
        if let Some(report) = on_progress {
            report(inventory.stats.frames_read);
        }
    }

    let subnet = source.subnet();
    Ok(inventory.finish(subnet.as_ref()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
