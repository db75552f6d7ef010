pub mod devices;
pub mod inventory;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use hostledger_common::network::address::Address;

#[derive(Parser)]
#[command(name = "hostledger")]
#[command(version, about = "Passive host inventory from captured Ethernet traffic.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log detail (-v debug, -vv every frame)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Skip the startup banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture live traffic and build the host table
    #[command(alias = "c")]
    Capture {
        /// Device to capture on, defaults to the best LAN interface
        #[arg(short, long)]
        interface: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Build the host table from a pcap file
    #[command(alias = "r")]
    Read {
        file: PathBuf,
        /// IPv4 network used to drop out-of-subnet hosts
        #[arg(long, value_parser = Address::parse_ipv4, requires = "mask")]
        net: Option<Address>,
        /// IPv4 netmask paired with --net
        #[arg(long, value_parser = Address::parse_ipv4, requires = "net")]
        mask: Option<Address>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List capture devices
    #[command(alias = "d")]
    Devices,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Stop after this many frames
    #[arg(short, long)]
    pub count: Option<usize>,
    /// Write the report to a file instead of the terminal
    #[arg(short, long)]
    pub write: Option<PathBuf>,
    /// Emit CSV instead of the aligned table
    #[arg(long)]
    pub csv: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
