//! Fixed protocol layout and classification constants.
//!
//! Frame offsets are counted from the first byte of the Ethernet header and
//! assume an untagged frame.

use std::time::Duration;

pub const MAC_LEN: usize = 6;
pub const IPV4_LEN: usize = 4;
pub const IPV6_LEN: usize = 16;

pub const MAC_DST_OFFSET: usize = 0;
pub const MAC_SRC_OFFSET: usize = 6;
pub const ETHER_TYPE_OFFSET: usize = 12;
pub const ETHER_TYPE_LEN: usize = 2;

pub const IPV4_SRC_OFFSET: usize = 26;
pub const IPV4_DST_OFFSET: usize = 30;
/// Sender protocol address inside an ARP payload.
pub const ARP_SENDER_IPV4_OFFSET: usize = 28;
pub const IPV6_SRC_OFFSET: usize = 22;
pub const IPV6_DST_OFFSET: usize = 38;

pub const BROADCAST_MAC: [u8; MAC_LEN] = [0xFF; MAC_LEN];
pub const BROADCAST_IPV4: [u8; IPV4_LEN] = [0xFF; IPV4_LEN];
/// High nibble pattern shared by 224.0.0.0/4 and the reserved block above it.
pub const MULTICAST_IPV4_NIBBLE: u8 = 0xE;
/// First byte of every address in ff00::/8.
pub const MULTICAST_IPV6_PREFIX: u8 = 0xFF;

/// Bytes kept from each live frame.
pub const SNAP_LENGTH: usize = 256;
pub const READ_TIMEOUT: Duration = Duration::from_millis(1_000);
pub const DEFAULT_LIVE_FRAME_COUNT: usize = 1_000;
pub const PCAP_BUFFER_SIZE: usize = 65_536;

pub const MAC_COLUMN_WIDTH: usize = 18;
pub const IPV4_COLUMN_WIDTH: usize = 16;
pub const IPV6_COLUMN_WIDTH: usize = 39;
