//! Terminal surfaces
//!
//! Draw the show list, the episode panel and failure notices as plain text on
//! any writer. A terminal cannot take back what it printed, so "replacing" a
//! surface prints it anew and hiding the panel simply stops it from being
//! printed.

use super::{EpisodePanelSurface, NoticeSurface, ShowEntry, ShowListSurface};
use crate::metadata_retrieval::ShowId;
use std::io::Write;

fn flush_lines<W: Write>(writer: &mut W, lines: &[String]) {
    let result = lines
        .iter()
        .try_for_each(|line| writeln!(writer, "{}", line))
        .and_then(|_| writer.flush());

    if let Err(e) = result {
        tracing::warn!(error = %e, "Failed to write to terminal");
    }
}

/// Converts an HTML summary into a single line of display text.
fn summary_text(summary: &str) -> String {
    nanohtml2text::html2text(summary)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Show list printed as a numbered list of entries.
pub struct TerminalShowList<W: Write> {
    writer: W,
    entries: Vec<ShowEntry>,
}

impl<W: Write> TerminalShowList<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entries: Vec::new(),
        }
    }

    fn entry_lines(position: usize, entry: &ShowEntry) -> Vec<String> {
        let mut lines = vec![format!("{:>3}. {}", position, entry.name)];
        lines.push(format!("     Image: {}", entry.image));

        let summary = summary_text(&entry.summary);
        if !summary.is_empty() {
            lines.push(format!("     {}", summary));
        }
        lines.push(format!("     [{}: e {}]", entry.action_label, position));
        lines
    }
}

impl<W: Write> ShowListSurface for TerminalShowList<W> {
    fn replace_entries(&mut self, entries: Vec<ShowEntry>) {
        self.entries = entries;

        let mut lines = vec![String::new(), "=== Shows ===".to_string()];
        if self.entries.is_empty() {
            lines.push("No shows found.".to_string());
        }
        for (index, entry) in self.entries.iter().enumerate() {
            lines.extend(Self::entry_lines(index + 1, entry));
        }

        flush_lines(&mut self.writer, &lines);
    }

    fn entry_show_id(&self, index: usize) -> Option<ShowId> {
        self.entries.get(index).map(|entry| entry.show_id)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Episode panel printed as an indented block whenever it is revealed.
pub struct TerminalEpisodePanel<W: Write> {
    writer: W,
    lines: Vec<String>,
    visible: bool,
}

impl<W: Write> TerminalEpisodePanel<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines: Vec::new(),
            visible: false,
        }
    }
}

impl<W: Write> EpisodePanelSurface for TerminalEpisodePanel<W> {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn append_line(&mut self, line: String) {
        self.lines.push(line);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            return;
        }

        let mut output = vec![String::new(), "=== Episodes ===".to_string()];
        if self.lines.is_empty() {
            output.push("No episodes listed.".to_string());
        }
        output.extend(self.lines.iter().map(|line| format!("  {}", line)));

        flush_lines(&mut self.writer, &output);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Failure notices printed one per line.
pub struct TerminalNotices<W: Write> {
    writer: W,
}

impl<W: Write> TerminalNotices<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> NoticeSurface for TerminalNotices<W> {
    fn report(&mut self, message: &str) {
        flush_lines(&mut self.writer, &[format!("Error: {}", message)]);
    }
}
