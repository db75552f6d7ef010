use std::path::PathBuf;

use crate::network::subnet::Subnet;

/// Where frames come from for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Capture on a device. `None` picks the best LAN interface.
    Live { device: Option<String> },
    /// Read a legacy pcap file. Out-of-subnet filtering only happens when
    /// the caller supplies a subnet.
    File { path: PathBuf, subnet: Option<Subnet> },
}

pub struct Config {
    /// Raises log detail; `1` for debug, `2` or more for per-frame tracing.
    pub verbose: u8,
    pub no_banner: bool,
    /// Stop after this many frames. Live captures fall back to a default.
    pub frame_limit: Option<usize>,
    /// Write the report here instead of the terminal.
    pub out_file: Option<PathBuf>,
    /// Emit comma-separated values instead of the aligned table.
    pub csv: bool,
}
