use std::fmt;

use pnet::ipnetwork::Ipv4Network;

use crate::network::address::{Address, AddressError, AddressKind};

/// IPv4 network and mask of the capturing interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    network: Address,
    mask: Address,
}

impl Subnet {
    /// Builds a subnet from an IPv4 network address and mask.
    ///
    /// The network address is masked here, so host bits in it are ignored.
    pub fn new(network: Address, mask: Address) -> Result<Self, AddressError> {
        let (network, mask) = match (network, mask) {
            (Address::V4(network), Address::V4(mask)) => (network, mask),
            (Address::V4(_), culprit) | (culprit, _) => return Err(not_ipv4(culprit)),
        };

        let mut masked = [0u8; 4];
        for (out, (n, m)) in masked.iter_mut().zip(network.iter().zip(mask.iter())) {
            *out = n & m;
        }

        Ok(Self {
            network: Address::V4(masked),
            mask: Address::V4(mask),
        })
    }

    pub fn network(&self) -> &Address {
        &self.network
    }

    pub fn mask(&self) -> &Address {
        &self.mask
    }

    /// Empty addresses are never contained.
    pub fn contains(&self, addr: &Address) -> bool {
        !addr.is_empty() && addr.in_subnet(&self.network, &self.mask)
    }
}

fn not_ipv4(addr: Address) -> AddressError {
    if addr.is_empty() {
        AddressError::Length {
            kind: AddressKind::Ipv4,
            expected: AddressKind::Ipv4.len(),
            actual: 0,
        }
    } else {
        AddressError::KindMismatch {
            expected: AddressKind::Ipv4,
            actual: addr.kind(),
        }
    }
}

impl From<Ipv4Network> for Subnet {
    fn from(net: Ipv4Network) -> Self {
        Self {
            network: Address::from(net.network()),
            mask: Address::from(net.mask()),
        }
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.mask)
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
