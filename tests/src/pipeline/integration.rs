#![cfg(test)]
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use hostledger_common::config::Source;
use hostledger_common::network::address::Address;
use hostledger_common::network::subnet::Subnet;
use hostledger_core::capture::{self, CaptureError, FrameSource};
use hostledger_core::inventory::{self, RunStats};
use hostledger_core::report::{self, ReportFormat, Summary};
use hostledger_core::table::HostTable;
use tempfile::TempDir;

use crate::util;

const HOST_A: [u8; 6] = [0, 0, 0, 0, 0, 0x01];
const HOST_B: [u8; 6] = [0, 0, 0, 0, 0, 0x02];
const HOST_C: [u8; 6] = [0, 0, 0, 0, 0, 0x03];
const HOST_D: [u8; 6] = [0, 0, 0, 0, 0, 0x04];
const ALL_NODES_MAC: [u8; 6] = [0x33, 0x33, 0, 0, 0, 0x01];

fn link_local(last: u8) -> [u8; 16] {
    let mut ip = [0u8; 16];
    ip[0] = 0xfe;
    ip[1] = 0x80;
    ip[15] = last;
    ip
}

fn all_nodes() -> [u8; 16] {
    let mut ip = [0u8; 16];
    ip[0] = 0xff;
    ip[1] = 0x02;
    ip[15] = 0x01;
    ip
}

/// A small LAN conversation: unicast IPv4, an ARP broadcast, IPv6 to the
/// all-nodes group and one flow leaving the subnet.
fn lan_frames() -> Vec<Vec<u8>> {
    vec![
        util::ipv4_frame(HOST_A, HOST_B, [192, 168, 1, 10], [192, 168, 1, 20]),
        util::arp_frame(HOST_C, [192, 168, 1, 30], [192, 168, 1, 1]),
        util::ipv6_frame(HOST_A, ALL_NODES_MAC, link_local(1), all_nodes()),
        util::ipv4_frame(HOST_B, HOST_D, [192, 168, 1, 20], [8, 8, 8, 8]),
    ]
}

fn write_capture(dir: &TempDir, linktype: u32, frames: &[Vec<u8>]) -> std::path::PathBuf {
    let path = dir.path().join("capture.pcap");
    let mut file = File::create(&path).expect("create capture file");
    util::write_pcap(&mut file, linktype, frames).expect("write capture file");
    path
}

fn read_file(path: &Path, subnet: Option<Subnet>, limit: Option<usize>) -> anyhow::Result<(HostTable, RunStats)> {
    let source = Source::File { path: path.to_path_buf(), subnet };
    let mut frames: Box<dyn FrameSource + Send> = capture::open(&source, Arc::new(AtomicBool::new(false)))?;
    inventory::run(frames.as_mut(), limit, None)
}

fn lan_subnet() -> Subnet {
    Subnet::new(
        Address::parse_ipv4("192.168.1.0").unwrap(),
        Address::parse_ipv4("255.255.255.0").unwrap(),
    )
    .unwrap()
}

#[test]
fn single_ipv4_frame_yields_two_hosts() {
    let frame = util::ipv4_frame(
        [0x00, 0x11, 0x22, 0x33, 0x44, 0x55],
        [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0x01],
        [192, 168, 1, 10],
        [192, 168, 1, 20],
    );
    let mut inventory = inventory::Inventory::new();
    inventory.ingest(&frame);
    let (table, _) = inventory.finish(None);

    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|h| h.ipv6().is_empty()));
    let rows: Vec<String> = table.iter().map(|h| report::table_row(h).trim_end().to_string()).collect();
    assert_eq!(
        rows,
        [
            "00:11:22:33:44:55 192.168.1.10",
            "aa:bb:cc:dd:ee:01 192.168.1.20",
        ]
    );
}

#[test]
fn pcap_file_builds_filtered_inventory() {
    let dir = TempDir::new().unwrap();
    let path = write_capture(&dir, util::LINKTYPE_ETHERNET, &lan_frames());

    let (table, stats) = read_file(&path, None, None).unwrap();

    assert_eq!(stats.frames_read, 4);
    assert_eq!(stats.frames_skipped, 0);
    // The broadcast ARP target and the all-nodes group are gone.
    assert_eq!(stats.hosts_removed, 2);

    let text = report::render(&table, ReportFormat::Csv);
    assert_eq!(
        text,
        "MAC Address,IPv4 Address,IPv6 Address\n\
         00:00:00:00:00:01,192.168.1.10,fe80::1\n\
         00:00:00:00:00:02,192.168.1.20,\n\
         00:00:00:00:00:03,192.168.1.30,\n\
         00:00:00:00:00:04,8.8.8.8,\n"
    );
    assert_eq!(
        Summary::of(&table).to_string(),
        "Hosts: 4; IPv4 only: 3; IPv6 only: 0; dual-stack: 1; migrated: 25%"
    );
}

#[test]
fn supplied_subnet_drops_remote_hosts() {
    let dir = TempDir::new().unwrap();
    let path = write_capture(&dir, util::LINKTYPE_ETHERNET, &lan_frames());

    let (table, stats) = read_file(&path, Some(lan_subnet()), None).unwrap();

    assert_eq!(stats.hosts_removed, 3);
    assert_eq!(table.len(), 3);
    assert!(table.get(&Address::Mac(HOST_D)).is_none());

    let text = report::render_table(&table);
    let last = text.lines().last().unwrap();
    assert_eq!(last, "Hosts: 3; IPv4 only: 2; IPv6 only: 0; dual-stack: 1; migrated: 33%");
}

#[test]
fn frame_limit_stops_early() {
    let dir = TempDir::new().unwrap();
    let path = write_capture(&dir, util::LINKTYPE_ETHERNET, &lan_frames());

    let (table, stats) = read_file(&path, None, Some(1)).unwrap();

    assert_eq!(stats.frames_read, 1);
    assert_eq!(table.len(), 2);
}

#[test]
fn non_ethernet_capture_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_capture(&dir, util::LINKTYPE_RAW, &lan_frames());

    let err = read_file(&path, None, None).err().expect("raw IP capture must fail");
    let cause = err.chain().find_map(|e| e.downcast_ref::<CaptureError>());
    assert!(matches!(cause, Some(CaptureError::NotEthernet(101))));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.pcap");

    let err = read_file(&path, None, None).err().expect("missing file must fail");
    assert!(err.to_string().contains("absent.pcap"));
}

#[test]
fn short_frames_are_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let mut frames = lan_frames();
    frames.insert(1, frames[0][..20].to_vec());
    let path = write_capture(&dir, util::LINKTYPE_ETHERNET, &frames);

    let (table, stats) = read_file(&path, None, None).unwrap();

    assert_eq!(stats.frames_read, 5);
    assert_eq!(stats.frames_skipped, 1);
    assert_eq!(table.len(), 4);
}
