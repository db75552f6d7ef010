//! Text rendering of a finished host table.

use std::fmt;

use hostledger_common::constants::{IPV4_COLUMN_WIDTH, IPV6_COLUMN_WIDTH, MAC_COLUMN_WIDTH};
use hostledger_common::network::host::Host;

use crate::table::HostTable;

const TABLE_HEADER: &str = "MAC Address       IPv4 Address    IPv6 Address";
const CSV_HEADER: &str = "MAC Address,IPv4 Address,IPv6 Address";
const RULE: char = '=';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Csv,
}

/// Host counts by address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub ipv4_only: usize,
    pub ipv6_only: usize,
    pub dual_stack: usize,
}

impl Summary {
    pub fn of(table: &HostTable) -> Self {
        table.iter().fold(
            Summary {
                total: table.len(),
                ..Summary::default()
            },
            |mut summary, host| {
                if host.is_ipv4_only() {
                    summary.ipv4_only += 1;
                } else if host.is_ipv6_only() {
                    summary.ipv6_only += 1;
                } else if host.is_dual_stack() {
                    summary.dual_stack += 1;
                }
                summary
            },
        )
    }

    /// Share of hosts with IPv6, rounded to the nearest percent. Zero for an
    /// empty table.
    pub fn migrated_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let with_ipv6 = (self.dual_stack + self.ipv6_only) as f64;
        (with_ipv6 / self.total as f64 * 100.0).round() as u32
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hosts: {}; IPv4 only: {}; IPv6 only: {}; dual-stack: {}; migrated: {}%",
            self.total,
            self.ipv4_only,
            self.ipv6_only,
            self.dual_stack,
            self.migrated_percent()
        )
    }
}

/// One fixed-width report line for a host.
pub fn table_row(host: &Host) -> String {
    format!(
        "{:<mac_w$}{:<v4_w$}{:<v6_w$}",
        host.mac(),
        host.ipv4(),
        host.ipv6(),
        mac_w = MAC_COLUMN_WIDTH,
        v4_w = IPV4_COLUMN_WIDTH,
        v6_w = IPV6_COLUMN_WIDTH,
    )
}

pub fn csv_row(host: &Host) -> String {
    format!("{},{},{}", host.mac(), host.ipv4(), host.ipv6())
}

pub fn render(table: &HostTable, format: ReportFormat) -> String {
    match format {
        ReportFormat::Table => render_table(table),
        ReportFormat::Csv => render_csv(table),
    }
}

/// Column table, footer rule and summary line, each line newline-terminated.
pub fn render_table(table: &HostTable) -> String {
    let rule = |width: usize| RULE.to_string().repeat(width);
    let mut lines: Vec<String> = vec![
        TABLE_HEADER.to_string(),
        format!(
            "{} {} {}",
            rule(MAC_COLUMN_WIDTH - 1),
            rule(IPV4_COLUMN_WIDTH - 1),
            rule(IPV6_COLUMN_WIDTH)
        ),
    ];
    lines.extend(table.iter().map(table_row));
    lines.push(rule(MAC_COLUMN_WIDTH + IPV4_COLUMN_WIDTH + IPV6_COLUMN_WIDTH));
    lines.push(Summary::of(table).to_string());

    lines.iter().map(|line| format!("{line}\n")).collect()
}

pub fn render_csv(table: &HostTable) -> String {
    std::iter::once(CSV_HEADER.to_string())
        .chain(table.iter().map(csv_row))
        .map(|line| format!("{line}\n"))
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
