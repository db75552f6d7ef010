use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TIP: &str = "Press Ctrl-C to stop capturing";
const TICK: Duration = Duration::from_millis(100);

/// The spinner currently on screen, if any. Log output is drawn around it.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

pub struct CaptureSpinner {
    bar: ProgressBar,
}

impl CaptureSpinner {
    pub fn start(live: bool) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            bar.set_style(style.tick_strings(&[
                "▁▁▁▁▁",
                "▁▂▂▂▁",
                "▁▄▂▄▁",
                "▂▄▆▄▂",
                "▄▆█▆▄",
                "▂▄▆▄▂",
                "▁▄▂▄▁",
                "▁▂▂▂▁",
            ]));
        }
        bar.enable_steady_tick(TICK);

        let opening = if live { TIP } else { "Reading capture file" };
        bar.set_message(format!("{}", opening.italic().white()));

        if let Ok(mut active) = ACTIVE.lock() {
            *active = Some(bar.clone());
        }
        Self { bar }
    }

    pub fn report_progress(&self, frames: usize) {
        self.bar.set_message(format!(
            "Read {} frames so far...",
            frames.to_string().green().bold()
        ));
    }
}

impl Drop for CaptureSpinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
        if let Ok(mut active) = ACTIVE.lock() {
            *active = None;
        }
    }
}

/// Log sink that suspends the active spinner while writing to stderr.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let active = ACTIVE.lock().ok().and_then(|guard| guard.clone());
        match active {
            Some(bar) => bar.suspend(|| io::stderr().write_all(buf))?,
            None => io::stderr().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
