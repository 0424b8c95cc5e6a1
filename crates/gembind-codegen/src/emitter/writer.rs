//! Indented line buffer for C# sources.

const INDENT: &str = "    ";

/// Accumulates source lines at the current indentation depth.
#[derive(Debug, Default)]
pub(crate) struct SourceWriter {
    lines: Vec<String>,
    depth: usize,
}

impl SourceWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a line; an empty line carries no indentation.
    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{text}", INDENT.repeat(self.depth)));
        }
    }

    /// Appends pre-formatted text, one line per input line.
    pub(crate) fn block(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    pub(crate) fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Writes `header` and an opening brace, then indents.
    pub(crate) fn open(&mut self, header: impl AsRef<str>) {
        self.line(header);
        self.line("{");
        self.depth += 1;
    }

    /// Dedents and writes a closing brace.
    pub(crate) fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Removes a trailing empty line, if any.
    pub(crate) fn trim_trailing_blank(&mut self) {
        if self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
    }

    pub(crate) fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}
