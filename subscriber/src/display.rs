use crate::error::Error;
use std::io::Write;

/// Prefix of every rendered display entry.
pub const MESSAGE_PREFIX: &str = "message: ";

/// Builds the visible text of a display entry. The payload is used verbatim.
pub fn render_entry(payload: &str) -> String {
    format!("{MESSAGE_PREFIX}{payload}")
}

/// Somewhere rendered entries are appended to.
pub trait DisplaySink {
    fn append(&mut self, text: String) -> Result<(), Error>;
}

/// Ordered, append-only list of rendered entries. Nothing is ever removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisplayList {
    entries: Vec<String>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DisplaySink for DisplayList {
    fn append(&mut self, text: String) -> Result<(), Error> {
        self.entries.push(text);
        Ok(())
    }
}

/// Prints each entry as its own line and keeps the list in memory.
///
/// Control characters in an entry are written escaped so a payload cannot move
/// the cursor or recolor the terminal; the stored entry keeps the original text.
pub struct TerminalDisplay<W: Write> {
    list: DisplayList,
    out: W,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            list: DisplayList::new(),
            out,
        }
    }

    pub fn list(&self) -> &DisplayList {
        &self.list
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn append(&mut self, text: String) -> Result<(), Error> {
        let line = escape_control(&text);
        // The entry is part of the list even if the terminal rejects it.
        self.list.append(text)?;
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }
}

fn escape_control(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() {
            escaped.extend(c.escape_default());
        } else {
            escaped.push(c);
        }
    }
    escaped
}
