//! Frame and capture file builders shared by the integration tests.

use std::io::Write;

pub const LINKTYPE_ETHERNET: u32 = 1;
pub const LINKTYPE_RAW: u32 = 101;

pub fn ipv4_frame(src_mac: [u8; 6], dst_mac: [u8; 6], src_ip: [u8; 4], dst_ip: [u8; 4]) -> Vec<u8> {
    let mut frame = ethernet_header(src_mac, dst_mac, 0x0800, 60);
    frame[26..30].copy_from_slice(&src_ip);
    frame[30..34].copy_from_slice(&dst_ip);
    frame
}

pub fn arp_frame(src_mac: [u8; 6], sender_ip: [u8; 4], target_ip: [u8; 4]) -> Vec<u8> {
    let mut frame = ethernet_header(src_mac, [0xff; 6], 0x0806, 42);
    frame[28..32].copy_from_slice(&sender_ip);
    frame[38..42].copy_from_slice(&target_ip);
    frame
}

pub fn ipv6_frame(src_mac: [u8; 6], dst_mac: [u8; 6], src_ip: [u8; 16], dst_ip: [u8; 16]) -> Vec<u8> {
    let mut frame = ethernet_header(src_mac, dst_mac, 0x86DD, 86);
    frame[22..38].copy_from_slice(&src_ip);
    frame[38..54].copy_from_slice(&dst_ip);
    frame
}

fn ethernet_header(src_mac: [u8; 6], dst_mac: [u8; 6], ether_type: u16, len: usize) -> Vec<u8> {
    let mut frame = vec![0u8; len];
    frame[0..6].copy_from_slice(&dst_mac);
    frame[6..12].copy_from_slice(&src_mac);
    frame[12..14].copy_from_slice(&ether_type.to_be_bytes());
    frame
}

/// Serializes frames as a little-endian legacy pcap capture.
pub fn write_pcap<W: Write>(out: &mut W, linktype: u32, frames: &[Vec<u8>]) -> std::io::Result<()> {
    out.write_all(&0xa1b2_c3d4u32.to_le_bytes())?;
    out.write_all(&2u16.to_le_bytes())?;
    out.write_all(&4u16.to_le_bytes())?;
    out.write_all(&0i32.to_le_bytes())?;
    out.write_all(&0u32.to_le_bytes())?;
    out.write_all(&65_535u32.to_le_bytes())?;
    out.write_all(&linktype.to_le_bytes())?;

    for (i, frame) in frames.iter().enumerate() {
        let len = frame.len() as u32;
        out.write_all(&(i as u32).to_le_bytes())?;
        out.write_all(&0u32.to_le_bytes())?;
        out.write_all(&len.to_le_bytes())?;
        out.write_all(&len.to_le_bytes())?;
        out.write_all(frame)?;
    }
    Ok(())
}
