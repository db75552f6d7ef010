//! The per-run host inventory.

use std::collections::BTreeMap;

use hostledger_common::network::address::{Address, AddressKind};
use hostledger_common::network::host::Host;
use hostledger_common::network::subnet::Subnet;
use tracing::{debug, trace};

use crate::decoder::{DecodedFrame, Endpoint};

/// What a single observation did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Inserted,
    Updated,
    Unchanged,
    /// The hardware address was empty or not a MAC, nothing was stored.
    Ignored,
}

/// Hosts keyed by hardware address, iterated in ascending MAC order.
#[derive(Debug, Default, Clone)]
pub struct HostTable {
    hosts: BTreeMap<Address, Host>,
}

impl HostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a host or merges new addresses into the one already known.
    ///
    /// Existing IPv4/IPv6 slots are never overwritten, only filled. Arguments
    /// of the wrong kind leave the table untouched.
    pub fn observe(&mut self, mac: Address, ipv4: Address, ipv6: Address) -> Observation {
        if mac.is_empty() || mac.kind() != AddressKind::Mac {
            return Observation::Ignored;
        }
        if ipv4.kind() != AddressKind::Ipv4 || ipv6.kind() != AddressKind::Ipv6 {
            debug!("ignoring {mac}: got {} and {} addresses", ipv4.kind(), ipv6.kind());
            return Observation::Ignored;
        }

        let Some(existing) = self.hosts.get(&mac) else {
            trace!("new host {mac}");
            self.hosts.insert(mac, Host::new(mac).with_ipv4(ipv4).with_ipv6(ipv6));
            return Observation::Inserted;
        };

        let updated = existing.merged(&ipv4, &ipv6);
        if updated == *existing {
            return Observation::Unchanged;
        }

        trace!("host {mac} learned {} {}", updated.ipv4(), updated.ipv6());
        self.hosts.insert(mac, updated);
        Observation::Updated
    }

    pub fn observe_endpoint(&mut self, endpoint: Endpoint) -> Observation {
        self.observe(endpoint.mac, endpoint.ipv4, endpoint.ipv6)
    }

    /// Records both ends of a frame, source first.
    pub fn observe_frame(&mut self, frame: &DecodedFrame) -> [Observation; 2] {
        [
            self.observe_endpoint(frame.source()),
            self.observe_endpoint(frame.destination()),
        ]
    }

    /// Drops broadcast/multicast hosts and, when a subnet is known, hosts
    /// whose IPv4 address lies outside it. Returns how many were removed.
    pub fn remove_noise_and_out_of_subnet(&mut self, subnet: Option<&Subnet>) -> usize {
        let before = self.hosts.len();

        self.hosts.retain(|mac, host| {
            if host.is_noise() {
                debug!("dropping noise host {mac}");
                return false;
            }
            match subnet {
                Some(subnet) if !host.ipv4().is_empty() && !subnet.contains(host.ipv4()) => {
                    debug!("dropping {mac}, {} is outside {subnet}", host.ipv4());
                    false
                }
                _ => true,
            }
        });

        before - self.hosts.len()
    }

    pub fn get(&self, mac: &Address) -> Option<&Host> {
        self.hosts.get(mac)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Host> {
        self.hosts.values()
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

    fn mac(text: &str) -> Address {
        Address::parse_mac(text).unwrap()
    }

    fn ipv4(text: &str) -> Address {
        Address::parse_ipv4(text).unwrap()
    }

    fn ipv6(text: &str) -> Address {
        Address::parse_ipv6(text).unwrap()
    }

    fn no_v4() -> Address {
        Address::empty(AddressKind::Ipv4)
    }

    fn no_v6() -> Address {
        Address::empty(AddressKind::Ipv6)
    }

    #[test]
    fn observe_is_idempotent() {
        let mut table = HostTable::new();
        let host = mac("00:11:22:33:44:55");

        assert_eq!(table.observe(host, ipv4("10.0.0.1"), no_v6()), Observation::Inserted);
        assert_eq!(table.observe(host, ipv4("10.0.0.1"), no_v6()), Observation::Unchanged);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&host).unwrap().ipv4(), &ipv4("10.0.0.1"));
    }

    #[test]
    fn first_address_per_kind_wins() {
        let mut table = HostTable::new();
        let host = mac("00:11:22:33:44:55");

        table.observe(host, ipv4("10.0.0.1"), no_v6());
        assert_eq!(table.observe(host, ipv4("10.0.0.2"), no_v6()), Observation::Unchanged);
        assert_eq!(table.get(&host).unwrap().ipv4(), &ipv4("10.0.0.1"));
    }

    #[test]
    fn empty_slots_are_filled_independently() {
        let mut table = HostTable::new();
        let host = mac("00:11:22:33:44:55");

        table.observe(host, no_v4(), no_v6());
        assert_eq!(table.observe(host, no_v4(), ipv6("fe80::1")), Observation::Updated);
        assert_eq!(table.observe(host, ipv4("10.0.0.9"), ipv6("fe80::2")), Observation::Updated);

        let stored = table.get(&host).unwrap();
        assert_eq!(stored.ipv4(), &ipv4("10.0.0.9"));
        assert_eq!(stored.ipv6(), &ipv6("fe80::1"));
    }

    #[test]
    fn observe_ignores_missing_mac() {
        let mut table = HostTable::new();
        assert_eq!(
            table.observe(Address::empty(AddressKind::Mac), ipv4("10.0.0.1"), no_v6()),
            Observation::Ignored
        );
        assert_eq!(table.observe(ipv4("10.0.0.1"), no_v4(), no_v6()), Observation::Ignored);
        assert!(table.is_empty());
    }

    #[test]
    fn observe_ignores_ip_arguments_of_the_wrong_kind() {
        let mut table = HostTable::new();
        let host = mac("00:11:22:33:44:55");

        assert_eq!(table.observe(host, ipv6("fe80::1"), no_v6()), Observation::Ignored);
        assert_eq!(table.observe(host, no_v4(), ipv4("10.0.0.1")), Observation::Ignored);
        assert!(table.is_empty());

        table.observe(host, no_v4(), no_v6());
        assert_eq!(table.observe(host, ipv6("fe80::1"), ipv4("10.0.0.1")), Observation::Ignored);
        let stored = table.get(&host).unwrap();
        assert!(stored.ipv4().is_empty() && stored.ipv6().is_empty());
        assert!(!stored.is_ipv4_only());
    }

    #[test]
    fn iteration_is_ascending_by_mac() {
        let mut table = HostTable::new();
        for text in ["c0:00:00:00:00:00", "00:00:00:00:00:0a", "0b:00:00:00:00:00"] {
            table.observe(mac(text), no_v4(), no_v6());
        }

        let order: Vec<String> = table.iter().map(|h| h.mac().to_string()).collect();
        assert_eq!(order, ["00:00:00:00:00:0a", "0b:00:00:00:00:00", "c0:00:00:00:00:00"]);
    }

    #[test]
    fn filter_removes_broadcast_mac_even_with_valid_ip() {
        let mut table = HostTable::new();
        table.observe(mac("ff:ff:ff:ff:ff:ff"), ipv4("10.0.0.1"), no_v6());
        table.observe(mac("00:11:22:33:44:55"), ipv4("10.0.0.2"), no_v6());

        assert_eq!(table.remove_noise_and_out_of_subnet(None), 1);
        assert_eq!(table.len(), 1);
        assert!(table.get(&mac("ff:ff:ff:ff:ff:ff")).is_none());
    }

    #[test]
    fn filter_removes_multicast_ips() {
        let mut table = HostTable::new();
        table.observe(mac("01:00:5e:00:00:fb"), ipv4("224.0.0.251"), no_v6());
        table.observe(mac("33:33:00:00:00:01"), no_v4(), ipv6("ff02::1"));
        table.observe(mac("00:11:22:33:44:55"), no_v4(), ipv6("fe80::1"));

        assert_eq!(table.remove_noise_and_out_of_subnet(None), 2);
        assert_eq!(table.iter().next().unwrap().mac(), &mac("00:11:22:33:44:55"));
    }

    #[test]
    fn filter_applies_subnet_only_to_known_ipv4() {
        let subnet = Subnet::new(ipv4("192.168.1.0"), ipv4("255.255.255.0")).unwrap();
        let mut table = HostTable::new();
        table.observe(mac("00:00:00:00:00:01"), ipv4("192.168.1.42"), no_v6());
        table.observe(mac("00:00:00:00:00:02"), ipv4("10.0.0.1"), no_v6());
        table.observe(mac("00:00:00:00:00:03"), no_v4(), ipv6("fe80::3"));
        table.observe(mac("00:00:00:00:00:04"), no_v4(), no_v6());

        let mut offline = table.clone();
        assert_eq!(offline.remove_noise_and_out_of_subnet(None), 0);

        assert_eq!(table.remove_noise_and_out_of_subnet(Some(&subnet)), 1);
        assert!(table.get(&mac("00:00:00:00:00:02")).is_none());
        assert_eq!(table.len(), 3);
    }
}
