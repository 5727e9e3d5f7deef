use std::io::Write;

use linebot_core::{Display, Error, Report};

/// Prints the full report dump to a text stream every cycle.
pub struct TerminalDisplay<W> {
    out: W,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn render(&mut self, report: &Report) -> linebot_core::Result<()> {
        let mut text = report.terminal_lines().join("\n");
        text.push('\n');
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| Error::device("terminal", e.to_string()))
    }

    fn clear(&mut self) -> linebot_core::Result<()> {
        // a scrolling terminal has nothing to blank
        Ok(())
    }
}

/// Holds the latest report for the TUI to draw on its next frame.
#[derive(Debug, Default)]
pub struct PanelDisplay {
    latest: Option<Report>,
}

impl PanelDisplay {
    pub fn latest(&self) -> Option<&Report> {
        self.latest.as_ref()
    }
}

impl Display for PanelDisplay {
    fn render(&mut self, report: &Report) -> linebot_core::Result<()> {
        self.latest = Some(report.clone());
        Ok(())
    }

    fn clear(&mut self) -> linebot_core::Result<()> {
        self.latest = None;
        Ok(())
    }
}
