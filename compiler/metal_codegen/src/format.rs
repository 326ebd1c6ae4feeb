//! Output formatting.
//!
//! Templates mark nesting with lines holding only `$indent$` or `$dedent$`
//! instead of baking whitespace into every body. One pass over the rendered
//! unit turns the marks into indentation and tidies blank lines.

/// Opens one indentation level.
pub const INDENT_MARK: &str = "$indent$";
/// Closes one indentation level.
pub const DEDENT_MARK: &str = "$dedent$";

/// Reformat rendered text, indenting with `unit` per level.
pub fn reformat(text: &str, unit: &str) -> String {
    let mut formatter = Formatter::new(unit);
    for line in text.lines() {
        formatter.line(line);
    }
    formatter.finish()
}

/// Line-oriented formatting state.
///
/// Lines at level zero keep their own leading whitespace; lines inside a
/// level are trimmed and re-indented. Runs of blank lines collapse to one,
/// and blank lines at the start of a level, before a level closes, or at
/// either end of the output are dropped.
struct Formatter<'a> {
    unit: &'a str,
    level: usize,
    output: String,
    pending_blank: bool,
    at_level_start: bool,
}

impl<'a> Formatter<'a> {
    fn new(unit: &'a str) -> Self {
        Formatter {
            unit,
            level: 0,
            output: String::with_capacity(4096),
            pending_blank: false,
            at_level_start: false,
        }
    }

    fn line(&mut self, line: &str) {
        match line.trim() {
            INDENT_MARK => self.indent(),
            DEDENT_MARK => self.dedent(),
            "" => {
                if !self.output.is_empty() && !self.at_level_start {
                    self.pending_blank = true;
                }
            }
            trimmed => {
                if self.level == 0 {
                    self.writeln(line.trim_end());
                } else {
                    self.writeln(trimmed);
                }
            }
        }
    }

    fn indent(&mut self) {
        self.level += 1;
        self.pending_blank = false;
        self.at_level_start = true;
    }

    /// Never goes below zero.
    fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
        self.pending_blank = false;
        self.at_level_start = false;
    }

    fn writeln(&mut self, s: &str) {
        if std::mem::take(&mut self.pending_blank) {
            self.output.push('\n');
        }
        self.at_level_start = false;
        for _ in 0..self.level {
            self.output.push_str(self.unit);
        }
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn finish(self) -> String {
        self.output
    }
}
