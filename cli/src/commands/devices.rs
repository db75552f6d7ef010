use hostledger_common::network::interface::{self, Device};

use crate::terminal::{network_fmt, print};

pub fn devices() -> anyhow::Result<()> {
    let devices: Vec<Device> = interface::list_devices();
    if devices.is_empty() {
        anyhow::bail!("no capture devices found, try running as root");
    }

    for (idx, device) in devices.iter().enumerate() {
        network_fmt::print_device(device, idx);
    }
    print::fat_separator();
    print::print_status(format!("{} capture devices", devices.len()));
    Ok(())
}
