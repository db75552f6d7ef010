use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hostledger_common::constants::PCAP_BUFFER_SIZE;
use hostledger_common::network::subnet::Subnet;
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapReader, Linktype, PcapBlockOwned, PcapError};
use tracing::{debug, warn};

use super::{CaptureError, FrameSource};

/// Sequential reader over a legacy (libpcap) capture file.
///
/// The global header is checked on open, only Ethernet captures are accepted.
pub struct PcapFile {
    reader: LegacyPcapReader<Box<dyn Read + Send>>,
    subnet: Option<Subnet>,
    snapshot: Vec<u8>,
}

enum Step {
    Header(Linktype),
    Frame,
    Skip,
}

impl PcapFile {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(source: impl Read + Send + 'static) -> anyhow::Result<Self> {
        let source: Box<dyn Read + Send> = Box::new(source);
        let reader = LegacyPcapReader::new(PCAP_BUFFER_SIZE, source)
            .map_err(|e| CaptureError::Malformed(format!("{e:?}")))?;

        let mut file = Self {
            reader,
            subnet: None,
            snapshot: Vec::new(),
        };

        loop {
            match file.step()? {
                Some(Step::Header(linktype)) if linktype == Linktype::ETHERNET => break,
                Some(Step::Header(linktype)) => return Err(CaptureError::NotEthernet(linktype.0).into()),
                Some(Step::Skip) => continue,
                Some(Step::Frame) | None => {
                    return Err(CaptureError::Malformed("missing global header".into()).into());
                }
            }
        }

        Ok(file)
    }

    /// Sets the subnet used to filter the finished table.
    pub fn with_subnet(mut self, subnet: Option<Subnet>) -> Self {
        self.subnet = subnet;
        self
    }

    /// Advances one block. A packet lands in `snapshot`.
    fn step(&mut self) -> anyhow::Result<Option<Step>> {
        loop {
            match self.reader.next() {
                Ok((offset, block)) => {
                    let step = match block {
                        PcapBlockOwned::LegacyHeader(ref header) => Step::Header(header.network),
                        PcapBlockOwned::Legacy(ref packet) => {
                            self.snapshot.clear();
                            self.snapshot.extend_from_slice(packet.data);
                            Step::Frame
                        }
                        PcapBlockOwned::NG(_) => {
                            warn!("unexpected pcapng block in legacy capture, skipping");
                            Step::Skip
                        }
                    };
                    drop(block);
                    self.reader.consume(offset);
                    return Ok(Some(step));
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::UnexpectedEof) => return Err(CaptureError::TruncatedFile.into()),
                Err(PcapError::Incomplete(_)) => {
                    if let Err(e) = self.reader.refill() {
                        return Err(CaptureError::Malformed(format!("{e:?}")).into());
                    }
                }
                Err(e) => return Err(CaptureError::Malformed(format!("{e:?}")).into()),
            }
        }
    }
}

impl FrameSource for PcapFile {
    fn subnet(&self) -> Option<Subnet> {
        self.subnet
    }

    fn next_frame(&mut self) -> anyhow::Result<Option<&[u8]>> {
        loop {
            match self.step()? {
                Some(Step::Frame) => return Ok(Some(&self.snapshot)),
                Some(Step::Header(_)) => debug!("ignoring repeated global header"),
                Some(Step::Skip) => {}
                None => return Ok(None),
            }
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn global_header(linktype: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&65_535u32.to_le_bytes());
        buf.extend_from_slice(&linktype.to_le_bytes());
        buf
    }

    fn record(data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(data);
        buf
    }

    #[test]
    fn yields_records_in_order() {
        let mut bytes = global_header(1);
        bytes.extend(record(&[1u8; 60]));
        bytes.extend(record(&[2u8; 42]));

        let mut file = PcapFile::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(file.next_frame().unwrap(), Some(&[1u8; 60][..]));
        assert_eq!(file.next_frame().unwrap(), Some(&[2u8; 42][..]));
        assert_eq!(file.next_frame().unwrap(), None);
    }

    #[test]
    fn header_only_file_is_empty() {
        let mut file = PcapFile::from_reader(Cursor::new(global_header(1))).unwrap();
        assert!(file.subnet().is_none());
        assert_eq!(file.next_frame().unwrap(), None);
    }

    #[test]
    fn rejects_non_ethernet_link_type() {
        let err = PcapFile::from_reader(Cursor::new(global_header(105))).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<CaptureError>(),
            Some(CaptureError::NotEthernet(105))
        ));
    }

    #[test]
    fn truncated_record_is_an_error() {
        let mut bytes = global_header(1);
        let full = record(&[7u8; 60]);
        bytes.extend_from_slice(&full[..30]);

        let mut file = PcapFile::from_reader(Cursor::new(bytes)).unwrap();
        assert!(file.next_frame().is_err());
    }
}
