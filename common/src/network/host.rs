use crate::network::address::{Address, AddressKind};

/// One inventoried machine, keyed by its hardware address.
///
/// Either IP slot may stay empty. Once a slot is filled it is never replaced,
/// see [`Host::merged`]. A slot only ever holds an address of its own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Host {
    mac: Address,
    ipv4: Address,
    ipv6: Address,
}

impl Host {
    pub fn new(mac: Address) -> Self {
        debug_assert_eq!(mac.kind(), AddressKind::Mac);
        Self {
            mac,
            ipv4: Address::empty(AddressKind::Ipv4),
            ipv6: Address::empty(AddressKind::Ipv6),
        }
    }

    /// Sets the IPv4 slot. Addresses of any other kind are ignored.
    pub fn with_ipv4(mut self, ipv4: Address) -> Self {
        if ipv4.kind() == AddressKind::Ipv4 {
            self.ipv4 = ipv4;
        }
        self
    }

    /// Sets the IPv6 slot. Addresses of any other kind are ignored.
    pub fn with_ipv6(mut self, ipv6: Address) -> Self {
        if ipv6.kind() == AddressKind::Ipv6 {
            self.ipv6 = ipv6;
        }
        self
    }

    pub fn mac(&self) -> &Address {
        &self.mac
    }

    pub fn ipv4(&self) -> &Address {
        &self.ipv4
    }

    pub fn ipv6(&self) -> &Address {
        &self.ipv6
    }

    /// Returns a copy that fills whichever IP slots are still empty.
    ///
    /// The first address learned for each kind wins.
    pub fn merged(&self, ipv4: &Address, ipv6: &Address) -> Self {
        let mut updated = *self;
        if updated.ipv4.is_empty() {
            updated = updated.with_ipv4(*ipv4);
        }
        if updated.ipv6.is_empty() {
            updated = updated.with_ipv6(*ipv6);
        }
        updated
    }

    /// True when any observed address is broadcast or multicast.
    pub fn is_noise(&self) -> bool {
        self.mac.is_noise() || self.ipv4.is_noise() || self.ipv6.is_noise()
    }

    pub fn is_ipv4_only(&self) -> bool {
        !self.ipv4.is_empty() && self.ipv6.is_empty()
    }

    pub fn is_ipv6_only(&self) -> bool {
        self.ipv4.is_empty() && !self.ipv6.is_empty()
    }

    pub fn is_dual_stack(&self) -> bool {
        !self.ipv4.is_empty() && !self.ipv6.is_empty()
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
