use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, bail};
use hostledger_common::constants::{READ_TIMEOUT, SNAP_LENGTH};
use hostledger_common::network::interface;
use hostledger_common::network::subnet::Subnet;
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};
use tracing::debug;

use super::FrameSource;

/// Promiscuous capture on one interface.
pub struct LiveCapture {
    rx: Box<dyn DataLinkReceiver>,
    subnet: Option<Subnet>,
    stop: Arc<AtomicBool>,
    snapshot: Vec<u8>,
}

impl LiveCapture {
    pub fn open(intf: &NetworkInterface, stop: Arc<AtomicBool>) -> anyhow::Result<Self> {
        let rx = open_eth_receiver(intf, &capture_config(), datalink::channel)?;
        let subnet = interface::capture_subnet(intf);
        match &subnet {
            Some(subnet) => debug!("{} is on {subnet}", intf.name),
            None => debug!("{} has no IPv4 subnet, skipping subnet filter", intf.name),
        }

        Ok(Self {
            rx,
            subnet,
            stop,
            snapshot: Vec::with_capacity(SNAP_LENGTH),
        })
    }
}

impl FrameSource for LiveCapture {
    fn subnet(&self) -> Option<Subnet> {
        self.subnet
    }

    fn next_frame(&mut self) -> anyhow::Result<Option<&[u8]>> {
        loop {
            if self.stop.load(Ordering::Relaxed) {
                return Ok(None);
            }
            match self.rx.next() {
                Ok(frame) => {
                    let kept = frame.len().min(SNAP_LENGTH);
                    self.snapshot.clear();
                    self.snapshot.extend_from_slice(&frame[..kept]);
                    return Ok(Some(&self.snapshot));
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e).context("reading from capture device"),
            }
        }
    }
}

fn capture_config() -> Config {
    Config {
        read_timeout: Some(READ_TIMEOUT),
        promiscuous: true,
        ..Default::default()
    }
}

fn open_eth_receiver<F>(
    intf: &NetworkInterface,
    cfg: &Config,
    channel_opener: F,
) -> anyhow::Result<Box<dyn DataLinkReceiver>>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    let ch = channel_opener(intf, *cfg).with_context(|| format!("opening {}", intf.name))?;
    match ch {
        Channel::Ethernet(_, rx) => Ok(rx),
        _ => bail!("non-ethernet channel for {}", intf.name),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
