use std::io::{self, Write};

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;
use crate::terminal::logging::PRINT_TARGET;

pub const TOTAL_WIDTH: usize = 64;

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn banner(no_banner: bool) {
    if no_banner {
        return;
    }

    let text_content: String = format!("⟦ HOSTLEDGER v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2).bright_black();

    print(&format!("{sep}{text}{sep}"));
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {msg} ⟧");
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&line.to_string());
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    print(&format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT)));
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    print(&format!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

pub fn as_tree_one_level(key_value_pair: Vec<(String, ColoredString)>) {
    for (i, (key, value)) in key_value_pair.iter().enumerate() {
        let last: bool = i + 1 == key_value_pair.len();
        let branch: ColoredString = if !last { "├─".bright_black() } else { "└─".bright_black() };
        let dots: String = ".".repeat(7usize.saturating_sub(key.len()));
        print(&format!(
            " {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{space}{msg}{space}"));
}

/// Writes a finished report to stdout untouched, so it can be piped.
pub fn report(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}
