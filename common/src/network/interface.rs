//! Capture device enumeration and selection.

use std::fmt;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use tracing::debug;

#[cfg(target_os = "macos")]
use macos_impl::{is_physical, is_wireless};
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use fallback_impl::{is_physical, is_wireless};
#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};

use crate::network::address::Address;
use crate::network::subnet::Subnet;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// The interface was filtered out as "not physical" by the provided logic.
    NotPhysical,
    /// The interface does not have a MAC address.
    NoMacAddress,
    /// The interface does not support broadcast, so it is not an Ethernet LAN.
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    IsPointToPoint,
    /// The interface has no private IPv4 address and no IPv6 link-local address.
    NoValidLanIp,
}

/// A capture device as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub description: String,
    pub loopback: bool,
    pub mac: Option<Address>,
    pub subnet: Option<Subnet>,
}

impl From<&NetworkInterface> for Device {
    fn from(interface: &NetworkInterface) -> Self {
        Self {
            name: interface.name.clone(),
            description: interface.description.clone(),
            loopback: interface.is_loopback(),
            mac: interface.mac.map(Address::from),
            subnet: capture_subnet(interface),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = if self.description.is_empty() {
            "No description"
        } else {
            &self.description
        };
        write!(f, "{} ({})", self.name, description)?;
        if self.loopback {
            write!(f, " LOOPBACK")?;
        }
        Ok(())
    }
}

/// Lists every capture device the system reports.
pub fn list_devices() -> Vec<Device> {
    datalink::interfaces().iter().map(Device::from).collect()
}

/// Looks up a capture device by name.
pub fn find_interface(name: &str) -> anyhow::Result<NetworkInterface> {
    datalink::interfaces()
        .into_iter()
        .find(|interface| interface.name == name)
        .ok_or_else(|| anyhow::anyhow!("no capture device named '{name}'"))
}

/// Picks the best LAN interface to capture on, preferring wired ones.
pub fn default_interface() -> anyhow::Result<NetworkInterface> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces()
        .into_iter()
        .filter(|interface| match is_viable_lan_interface(interface, is_physical) {
            Ok(()) => true,
            Err(reason) => {
                debug!("skipping {}: {reason:?}", interface.name);
                false
            }
        })
        .collect();

    match select_best_lan_interface(interfaces, is_wired) {
        Some(interface) => Ok(interface),
        None => anyhow::bail!("No interfaces available for passive capture, use -i to pick one"),
    }
}

/// The first non-loopback IPv4 network bound to the interface.
pub fn capture_subnet(interface: &NetworkInterface) -> Option<Subnet> {
    interface.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) if !v4.ip().is_loopback() => Some(Subnet::from(*v4)),
        _ => None,
    })
}

fn is_viable_lan_interface(
    interface: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if !is_physical(interface) || interface.is_loopback() {
        return Err(ViabilityError::NotPhysical);
    }
    if interface.mac.is_none() {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    let has_valid_ip = interface.ips.iter().any(|net| match net {
        IpNetwork::V4(ipv4) => ipv4.ip().is_private(),
        IpNetwork::V6(ipv6) => ipv6.ip().is_unicast_link_local(),
    });
    if !has_valid_ip {
        return Err(ViabilityError::NoValidLanIp);
    }

    Ok(())
}

fn select_best_lan_interface(
    interfaces: Vec<NetworkInterface>,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<NetworkInterface> {
    let wired = interfaces.iter().position(|interface| is_wired(interface));
    interfaces.into_iter().nth(wired.unwrap_or(0))
}

fn is_wired(interface: &NetworkInterface) -> bool {
    is_physical(interface) && !is_wireless(interface)
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }
}

#[cfg(target_os = "macos")]
mod macos_impl {
    use super::*;
    use std::collections::HashSet;
    use std::process::Command;
    use std::sync::OnceLock;

    struct HardwareInfo {
        physical_devices: HashSet<String>,
        wireless_devices: HashSet<String>,
    }

    /// Runs `networksetup` once and caches which ports are physical or wireless.
    fn get_hardware_info() -> &'static HardwareInfo {
        static HARDWARE_INFO: OnceLock<HardwareInfo> = OnceLock::new();

        HARDWARE_INFO.get_or_init(|| {
            let mut physical = HashSet::new();
            let mut wireless = HashSet::new();

            if let Ok(output) = Command::new("networksetup").arg("-listallhardwareports").output() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                for line in stdout.lines() {
                    if let Some(device) = line.strip_prefix("Device: ") {
                        physical.insert(device.trim().to_string());
                    }
                }
            }

            for device in &physical {
                let is_wifi = Command::new("networksetup")
                    .arg("-getairportnetwork")
                    .arg(device)
                    .output()
                    .map(|out| out.status.success())
                    .unwrap_or(false);

                if is_wifi {
                    wireless.insert(device.clone());
                }
            }

            HardwareInfo {
                physical_devices: physical,
                wireless_devices: wireless,
            }
        })
    }

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        get_hardware_info().physical_devices.contains(&interface.name)
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        get_hardware_info().wireless_devices.contains(&interface.name)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod fallback_impl {
    use super::*;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        !interface.is_loopback()
    }

    pub fn is_wireless(_interface: &NetworkInterface) -> bool {
        false
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
