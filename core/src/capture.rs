//! Frame sources: a live datalink channel or a legacy pcap file.

pub mod live;
pub mod offline;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use hostledger_common::config::Source;
use hostledger_common::network::interface;
use hostledger_common::network::subnet::Subnet;
use thiserror::Error;
use tracing::info;

pub use live::LiveCapture;
pub use offline::PcapFile;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture is not Ethernet (link type {0})")]
    NotEthernet(i32),
    #[error("capture file ends in the middle of a record")]
    TruncatedFile,
    #[error("capture file is malformed: {0}")]
    Malformed(String),
}

/// Anything that yields raw Ethernet frames one at a time.
pub trait FrameSource {
    /// The IPv4 subnet used to filter the finished table, if known.
    fn subnet(&self) -> Option<Subnet>;

    /// The next frame, or `None` once the source is exhausted or stopped.
    fn next_frame(&mut self) -> anyhow::Result<Option<&[u8]>>;
}

/// Opens the source a run asked for.
///
/// Live sources watch `stop` between reads so a Ctrl-C handler can end the
/// capture. File sources run to the end of the file.
pub fn open(source: &Source, stop: Arc<AtomicBool>) -> anyhow::Result<Box<dyn FrameSource + Send>> {
    match source {
        Source::Live { device } => {
            let intf = match device {
                Some(name) => interface::find_interface(name)?,
                None => interface::default_interface()?,
            };
            info!("capturing on {}", intf.name);
            Ok(Box::new(LiveCapture::open(&intf, stop)?))
        }
        Source::File { path, subnet } => {
            let file = PcapFile::open(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(Box::new(file.with_subnet(*subnet)))
        }
    }
}
