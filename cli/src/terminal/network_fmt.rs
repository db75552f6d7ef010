use colored::*;
use hostledger_common::network::interface::Device;

use crate::terminal::{colors, print};

pub fn device_details(device: &Device) -> Vec<(String, ColoredString)> {
    let mut details: Vec<(String, ColoredString)> = Vec::new();

    if let Some(subnet) = &device.subnet {
        let network: ColoredString = subnet.network().to_string().color(colors::IPV4_ADDR);
        let mask: ColoredString = subnet.mask().to_string().color(colors::IPV4_PREFIX);
        let value: ColoredString = format!("{network}/{mask}").color(colors::SEPARATOR);
        details.push(("IPv4".to_string(), value));
    }
    if let Some(mac) = &device.mac {
        details.push(("MAC".to_string(), mac.to_string().color(colors::MAC_ADDR)));
    }

    details
}

pub fn print_device(device: &Device, idx: usize) {
    print::tree_head(idx, &device.to_string());
    print::as_tree_one_level(device_details(device));
}
