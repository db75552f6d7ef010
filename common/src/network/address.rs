//! # Address Model
//!
//! A single tagged type for the three address kinds seen on the wire:
//! * **MAC** hardware addresses (6 bytes).
//! * **IPv4** addresses (4 bytes).
//! * **IPv6** addresses (16 bytes).
//!
//! Any kind may also be *empty*, meaning the address was never observed. An
//! empty address is distinct from a populated all-zero one.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use pnet::util::MacAddr;
use thiserror::Error;

use crate::constants::{
    BROADCAST_IPV4, BROADCAST_MAC, IPV4_LEN, IPV6_LEN, MAC_LEN, MULTICAST_IPV4_NIBBLE,
    MULTICAST_IPV6_PREFIX,
};

const IPV6_GROUPS: usize = IPV6_LEN / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressKind {
    Mac,
    Ipv4,
    Ipv6,
}

impl AddressKind {
    /// Byte length of a populated address of this kind.
    pub const fn len(self) -> usize {
        match self {
            AddressKind::Mac => MAC_LEN,
            AddressKind::Ipv4 => IPV4_LEN,
            AddressKind::Ipv6 => IPV6_LEN,
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressKind::Mac => "MAC",
            AddressKind::Ipv4 => "IPv4",
            AddressKind::Ipv6 => "IPv6",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Malformed address text.
    #[error("invalid {kind} address '{input}': {reason}")]
    Format {
        kind: AddressKind,
        input: String,
        reason: String,
    },
    /// Raw bytes that do not fit the kind's fixed length.
    #[error("{kind} address needs {expected} bytes, got {actual}")]
    Length {
        kind: AddressKind,
        expected: usize,
        actual: usize,
    },
    /// An address of one kind was supplied where another was required.
    #[error("expected an {expected} address, got {actual}")]
    KindMismatch {
        expected: AddressKind,
        actual: AddressKind,
    },
}

impl AddressError {
    fn format(kind: AddressKind, input: &str, reason: impl Into<String>) -> Self {
        AddressError::Format {
            kind,
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Address {
    Mac([u8; MAC_LEN]),
    V4([u8; IPV4_LEN]),
    V6([u8; IPV6_LEN]),
    /// Not observed.
    Empty(AddressKind),
}

impl Address {
    pub const fn empty(kind: AddressKind) -> Self {
        Address::Empty(kind)
    }

    pub const fn kind(&self) -> AddressKind {
        match self {
            Address::Mac(_) => AddressKind::Mac,
            Address::V4(_) => AddressKind::Ipv4,
            Address::V6(_) => AddressKind::Ipv6,
            Address::Empty(kind) => *kind,
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Address::Empty(_))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Address::Mac(bytes) => bytes,
            Address::V4(bytes) => bytes,
            Address::V6(bytes) => bytes,
            Address::Empty(_) => &[],
        }
    }

    /// Builds an address of `kind` from raw bytes.
    ///
    /// A zero-length slice yields the empty address. Any length other than
    /// zero or the kind's fixed length is rejected.
    pub fn from_bytes(kind: AddressKind, bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.is_empty() {
            return Ok(Address::Empty(kind));
        }

        let length_error = || AddressError::Length {
            kind,
            expected: kind.len(),
            actual: bytes.len(),
        };

        let address = match kind {
            AddressKind::Mac => Address::Mac(bytes.try_into().map_err(|_| length_error())?),
            AddressKind::Ipv4 => Address::V4(bytes.try_into().map_err(|_| length_error())?),
            AddressKind::Ipv6 => Address::V6(bytes.try_into().map_err(|_| length_error())?),
        };
        Ok(address)
    }

    /// Parses six colon-separated groups of exactly two hex digits.
    pub fn parse_mac(text: &str) -> Result<Self, AddressError> {
        let groups: Vec<&str> = text.split(':').collect();
        if groups.len() != MAC_LEN {
            return Err(AddressError::format(
                AddressKind::Mac,
                text,
                format!("expected {MAC_LEN} groups, found {}", groups.len()),
            ));
        }

        let mut bytes = [0u8; MAC_LEN];
        for (byte, group) in bytes.iter_mut().zip(groups) {
            if group.len() != 2 || !group.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(AddressError::format(
                    AddressKind::Mac,
                    text,
                    format!("group '{group}' is not two hex digits"),
                ));
            }
            *byte = u8::from_str_radix(group, 16)
                .map_err(|e| AddressError::format(AddressKind::Mac, text, e.to_string()))?;
        }

        Ok(Address::Mac(bytes))
    }

    /// Parses one to four dot-separated decimal octets.
    ///
    /// Octets that are left out are taken as zero, so `10.1` reads as `10.1.0.0`.
    pub fn parse_ipv4(text: &str) -> Result<Self, AddressError> {
        let groups: Vec<&str> = text.split('.').collect();
        if groups.len() > IPV4_LEN {
            return Err(AddressError::format(
                AddressKind::Ipv4,
                text,
                format!("expected at most {IPV4_LEN} groups, found {}", groups.len()),
            ));
        }

        let mut bytes = [0u8; IPV4_LEN];
        for (byte, group) in bytes.iter_mut().zip(groups) {
            if group.is_empty() || !group.chars().all(|c| c.is_ascii_digit()) {
                return Err(AddressError::format(
                    AddressKind::Ipv4,
                    text,
                    format!("group '{group}' is not a decimal number"),
                ));
            }
            *byte = group.parse::<u8>().map_err(|_| {
                AddressError::format(AddressKind::Ipv4, text, format!("group '{group}' exceeds 255"))
            })?;
        }

        Ok(Address::V4(bytes))
    }

    /// Parses up to eight colon-separated groups of one to four hex digits.
    ///
    /// A single `::` stands for the run of zero groups needed to reach eight.
    pub fn parse_ipv6(text: &str) -> Result<Self, AddressError> {
        let mut halves = text.split("::");
        let head = parse_ipv6_groups(text, halves.next().unwrap_or_default())?;
        let tail = halves
            .next()
            .map(|tail| parse_ipv6_groups(text, tail))
            .transpose()?;

        if halves.next().is_some() {
            return Err(AddressError::format(
                AddressKind::Ipv6,
                text,
                "'::' may appear only once",
            ));
        }

        let mut groups = [0u16; IPV6_GROUPS];
        match tail {
            None => {
                if head.len() != IPV6_GROUPS {
                    return Err(AddressError::format(
                        AddressKind::Ipv6,
                        text,
                        format!("expected {IPV6_GROUPS} groups, found {}", head.len()),
                    ));
                }
                groups.copy_from_slice(&head);
            }
            Some(tail) => {
                if head.len() + tail.len() >= IPV6_GROUPS {
                    return Err(AddressError::format(
                        AddressKind::Ipv6,
                        text,
                        "too many groups around '::'",
                    ));
                }
                groups[..head.len()].copy_from_slice(&head);
                groups[IPV6_GROUPS - tail.len()..].copy_from_slice(&tail);
            }
        }

        let mut bytes = [0u8; IPV6_LEN];
        for (chunk, group) in bytes.chunks_exact_mut(2).zip(groups) {
            chunk.copy_from_slice(&group.to_be_bytes());
        }
        Ok(Address::V6(bytes))
    }

    /// Broadcast or multicast addresses that never name a real end host.
    pub fn is_noise(&self) -> bool {
        match self {
            Address::Mac(bytes) => *bytes == BROADCAST_MAC,
            Address::V4(bytes) => {
                *bytes == BROADCAST_IPV4
                    || (bytes[0] >> 4) & MULTICAST_IPV4_NIBBLE == MULTICAST_IPV4_NIBBLE
            }
            Address::V6(bytes) => bytes[0] == MULTICAST_IPV6_PREFIX,
            Address::Empty(_) => false,
        }
    }

    /// Tests `self & mask == network` for IPv4 addresses.
    ///
    /// `network` is expected to be already masked. Anything that is not a
    /// populated IPv4 triple is never inside a subnet.
    pub fn in_subnet(&self, network: &Address, mask: &Address) -> bool {
        match (self, network, mask) {
            (Address::V4(addr), Address::V4(network), Address::V4(mask)) => addr
                .iter()
                .zip(mask)
                .map(|(a, m)| a & m)
                .eq(network.iter().copied()),
            _ => false,
        }
    }
}

fn parse_ipv6_groups(text: &str, part: &str) -> Result<Vec<u16>, AddressError> {
    if part.is_empty() {
        return Ok(Vec::new());
    }

    part.split(':')
        .map(|group| {
            if group.is_empty() || group.len() > 4 || !group.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(AddressError::format(
                    AddressKind::Ipv6,
                    text,
                    format!("group '{group}' is not 1-4 hex digits"),
                ));
            }
            u16::from_str_radix(group, 16)
                .map_err(|e| AddressError::format(AddressKind::Ipv6, text, e.to_string()))
        })
        .collect()
}

/// Start and length of the longest run of zero groups, leftmost on ties.
fn longest_zero_run(groups: &[u16; IPV6_GROUPS]) -> (usize, usize) {
    let mut best = (0, 0);
    let mut run_start = 0;
    let mut run_len = 0;

    for (idx, group) in groups.iter().enumerate() {
        if *group != 0 {
            run_len = 0;
            continue;
        }
        if run_len == 0 {
            run_start = idx;
        }
        run_len += 1;
        if run_len > best.1 {
            best = (run_start, run_len);
        }
    }
    best
}

fn join_hex(groups: &[u16]) -> String {
    groups
        .iter()
        .map(|group| format!("{group:x}"))
        .collect::<Vec<String>>()
        .join(":")
}

fn format_ipv6(bytes: &[u8; IPV6_LEN]) -> String {
    let mut groups = [0u16; IPV6_GROUPS];
    for (group, chunk) in groups.iter_mut().zip(bytes.chunks_exact(2)) {
        *group = u16::from_be_bytes([chunk[0], chunk[1]]);
    }

    let (start, len) = longest_zero_run(&groups);
    if len < 2 {
        return join_hex(&groups);
    }
    format!(
        "{}::{}",
        join_hex(&groups[..start]),
        join_hex(&groups[start + len..])
    )
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Address::Mac(bytes) => bytes
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<String>>()
                .join(":"),
            Address::V4(bytes) => bytes
                .iter()
                .map(|b| b.to_string())
                .collect::<Vec<String>>()
                .join("."),
            Address::V6(bytes) => format_ipv6(bytes),
            Address::Empty(_) => String::new(),
        };
        // pad() keeps width and alignment flags working for report columns
        f.pad(&text)
    }
}

impl From<MacAddr> for Address {
    fn from(mac: MacAddr) -> Self {
        Address::Mac([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5])
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address::V4(ip.octets())
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Address::V6(ip.octets())
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
