//! Fixed-offset address extraction from raw Ethernet frames.
//!
//! Only the address fields are read. Payloads are never inspected and the
//! IP header length is assumed to be the minimum for its version.

use std::fmt;

use hostledger_common::constants::{
    ARP_SENDER_IPV4_OFFSET, ETHER_TYPE_LEN, ETHER_TYPE_OFFSET, IPV4_DST_OFFSET, IPV4_LEN,
    IPV4_SRC_OFFSET, IPV6_DST_OFFSET, IPV6_LEN, IPV6_SRC_OFFSET, MAC_DST_OFFSET, MAC_LEN,
    MAC_SRC_OFFSET,
};
use hostledger_common::network::address::{Address, AddressKind};
use pnet::packet::ethernet::{EtherType, EtherTypes};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("frame with ether type 0x{ether_type:04x} is truncated: need {needed} bytes, got {actual}")]
    Truncated {
        ether_type: u16,
        needed: usize,
        actual: usize,
    },
}

/// The addresses one side of a frame contributes to the host table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub mac: Address,
    pub ipv4: Address,
    pub ipv6: Address,
}

/// Addresses pulled from a single frame.
///
/// IPv4 and IPv6 pairs are mutually exclusive. ARP frames only carry the
/// sender's IPv4 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame {
    pub mac_src: Address,
    pub mac_dst: Address,
    pub ether_type: EtherType,
    pub ipv4_src: Address,
    pub ipv4_dst: Address,
    pub ipv6_src: Address,
    pub ipv6_dst: Address,
}

impl DecodedFrame {
    pub fn source(&self) -> Endpoint {
        Endpoint {
            mac: self.mac_src,
            ipv4: self.ipv4_src,
            ipv6: self.ipv6_src,
        }
    }

    pub fn destination(&self) -> Endpoint {
        Endpoint {
            mac: self.mac_dst,
            ipv4: self.ipv4_dst,
            ipv6: self.ipv6_dst,
        }
    }
}

impl fmt::Display for DecodedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} {:04x}", self.mac_src, self.mac_dst, self.ether_type.0)?;
        match self.ether_type {
            EtherTypes::Ipv4 => write!(f, " {} -> {}", self.ipv4_src, self.ipv4_dst),
            EtherTypes::Arp => write!(f, " {}", self.ipv4_src),
            EtherTypes::Ipv6 => write!(f, " {} -> {}", self.ipv6_src, self.ipv6_dst),
            _ => Ok(()),
        }
    }
}

/// Decodes the address fields of an Ethernet frame snapshot.
///
/// The frame must be long enough for every field its ether type implies,
/// otherwise [`DecodeError::Truncated`] is returned.
pub fn decode(frame: &[u8]) -> Result<DecodedFrame, DecodeError> {
    let ether_type_bytes: [u8; ETHER_TYPE_LEN] = field(frame, ETHER_TYPE_OFFSET, 0)?;
    let code = u16::from_be_bytes(ether_type_bytes);

    let mut decoded = DecodedFrame {
        mac_src: Address::Mac(field::<MAC_LEN>(frame, MAC_SRC_OFFSET, code)?),
        mac_dst: Address::Mac(field::<MAC_LEN>(frame, MAC_DST_OFFSET, code)?),
        ether_type: EtherType::new(code),
        ipv4_src: Address::empty(AddressKind::Ipv4),
        ipv4_dst: Address::empty(AddressKind::Ipv4),
        ipv6_src: Address::empty(AddressKind::Ipv6),
        ipv6_dst: Address::empty(AddressKind::Ipv6),
    };

    match decoded.ether_type {
        EtherTypes::Ipv4 => {
            decoded.ipv4_src = Address::V4(field::<IPV4_LEN>(frame, IPV4_SRC_OFFSET, code)?);
            decoded.ipv4_dst = Address::V4(field::<IPV4_LEN>(frame, IPV4_DST_OFFSET, code)?);
        }
        EtherTypes::Arp => {
            decoded.ipv4_src =
                Address::V4(field::<IPV4_LEN>(frame, ARP_SENDER_IPV4_OFFSET, code)?);
        }
        EtherTypes::Ipv6 => {
            decoded.ipv6_src = Address::V6(field::<IPV6_LEN>(frame, IPV6_SRC_OFFSET, code)?);
            decoded.ipv6_dst = Address::V6(field::<IPV6_LEN>(frame, IPV6_DST_OFFSET, code)?);
        }
        _ => {}
    }

    Ok(decoded)
}

fn field<const N: usize>(frame: &[u8], offset: usize, ether_type: u16) -> Result<[u8; N], DecodeError> {
    frame
        .get(offset..offset + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(DecodeError::Truncated {
            ether_type,
            needed: offset + N,
            actual: frame.len(),
        })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
