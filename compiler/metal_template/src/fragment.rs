//! Template bodies as fragment trees.
//!
//! Body syntax:
//!
//! - `$(name)` or `$(name|filter arg|filter)`: substitution
//! - `$!if (flag) ... $!else ... $!endif`: conditional region, nestable;
//!   `flag` is a binding name or an integer literal
//! - `$!create_label NAME`: bind `NAME` to a label unique within the render
//! - `$!prefix_label NAME VAL`: prefix label `NAME` with `VAL`
//! - any other `$` is literal text
//!
//! Whether a substitution is scalar or sequence is decided here, from the
//! store's separator table, not by the value bound at render time.

use rustc_hash::FxHashMap;

use crate::error::RenderError;
use crate::filter::Filter;

/// Sequence placeholder name → separator placed between rendered elements.
pub type Separators = FxHashMap<String, String>;

/// A parsed template body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    name: String,
    fragments: Vec<Fragment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    Literal(String),
    /// Text or a single node.
    Scalar(Placeholder),
    /// A node sequence joined with `separator`.
    Sequence {
        placeholder: Placeholder,
        separator: String,
    },
    Conditional {
        condition: Condition,
        then: Vec<Fragment>,
        otherwise: Vec<Fragment>,
    },
    /// Renders nothing; binds `name` to a fresh label.
    CreateLabel(String),
    /// Renders nothing; prefixes label `name` unless it already starts
    /// with `prefix`.
    PrefixLabel { name: String, prefix: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub filters: Vec<Filter>,
}

impl Placeholder {
    pub fn apply_filters(&self, value: String) -> String {
        self.filters.iter().fold(value, |acc, f| f.apply(acc))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Evaluated against the binding context at render time.
    Flag(String),
}

impl Template {
    /// Parse `body` as template `name`.
    pub fn parse(name: &str, body: &str, separators: &Separators) -> Result<Template, RenderError> {
        let mut parser = BodyParser {
            name,
            src: body,
            pos: 0,
            separators,
        };
        let (fragments, end) = parser.parse_block()?;
        match end {
            BlockEnd::Eof => Ok(Template {
                name: name.to_string(),
                fragments,
            }),
            BlockEnd::Else(at) => Err(RenderError::malformed(name, at, "`$!else` without `$!if`")),
            BlockEnd::Endif(at) => {
                Err(RenderError::malformed(name, at, "`$!endif` without `$!if`"))
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }
}

/// What stopped a block: end of input or a branch directive at an offset.
enum BlockEnd {
    Eof,
    Else(usize),
    Endif(usize),
}

struct BodyParser<'a> {
    name: &'a str,
    src: &'a str,
    pos: usize,
    separators: &'a Separators,
}

impl BodyParser<'_> {
    fn parse_block(&mut self) -> Result<(Vec<Fragment>, BlockEnd), RenderError> {
        let src = self.src;
        let mut out = Vec::new();
        loop {
            let Some(found) = src[self.pos..].find('$') else {
                push_literal(&mut out, &src[self.pos..]);
                self.pos = src.len();
                return Ok((out, BlockEnd::Eof));
            };
            let dollar = self.pos + found;
            push_literal(&mut out, &src[self.pos..dollar]);
            let rest = &src[dollar..];

            if rest.starts_with("$(") {
                out.push(self.parse_placeholder(dollar)?);
            } else if rest.starts_with("$!if") {
                self.pos = dollar + "$!if".len();
                self.parse_conditional(dollar, &mut out)?;
            } else if rest.starts_with("$!else") {
                self.pos = dollar + "$!else".len();
                return Ok((out, BlockEnd::Else(dollar)));
            } else if rest.starts_with("$!endif") {
                self.pos = dollar + "$!endif".len();
                return Ok((out, BlockEnd::Endif(dollar)));
            } else if rest.starts_with("$!create_label") {
                self.pos = dollar + "$!create_label".len();
                let name = self.label_name(dollar)?;
                out.push(Fragment::CreateLabel(name));
            } else if rest.starts_with("$!prefix_label") {
                self.pos = dollar + "$!prefix_label".len();
                let name = self.label_name(dollar)?;
                let prefix = self.directive_word(dollar, "label prefix")?;
                out.push(Fragment::PrefixLabel { name, prefix });
            } else if rest.starts_with("$!") {
                return Err(self.error(dollar, "unknown directive"));
            } else {
                push_literal(&mut out, "$");
                self.pos = dollar + 1;
            }
        }
    }

    fn parse_placeholder(&mut self, dollar: usize) -> Result<Fragment, RenderError> {
        let src = self.src;
        let open = dollar + 2;
        let Some(len) = src[open..].find(')') else {
            return Err(self.error(dollar, "unterminated placeholder"));
        };
        let inner = &src[open..open + len];
        self.pos = open + len + 1;

        let mut parts = inner.split('|');
        let name = parts.next().unwrap_or_default().trim();
        if !is_name(name) {
            return Err(self.error(dollar, format!("invalid placeholder name `{name}`")));
        }
        let filters = parts
            .map(Filter::parse)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| self.error(dollar, reason))?;

        let placeholder = Placeholder {
            name: name.to_string(),
            filters,
        };
        Ok(match self.separators.get(name) {
            Some(separator) => Fragment::Sequence {
                placeholder,
                separator: separator.clone(),
            },
            None => Fragment::Scalar(placeholder),
        })
    }

    fn parse_conditional(&mut self, at: usize, out: &mut Vec<Fragment>) -> Result<(), RenderError> {
        let src = self.src;
        let after = &src[self.pos..];
        let trimmed = after.trim_start();
        if !trimmed.starts_with('(') {
            return Err(self.error(at, "expected `(` after `$!if`"));
        }
        let open = self.pos + (after.len() - trimmed.len()) + 1;
        let Some(len) = src[open..].find(')') else {
            return Err(self.error(at, "unterminated `$!if` condition"));
        };
        let cond = src[open..open + len].trim();
        self.pos = open + len + 1;

        let constant = if let Ok(n) = cond.parse::<i64>() {
            Some(n != 0)
        } else if is_name(cond) {
            None
        } else {
            return Err(self.error(at, format!("invalid condition `{cond}`")));
        };

        let (then, end) = self.parse_block()?;
        let otherwise = match end {
            BlockEnd::Endif(_) => Vec::new(),
            BlockEnd::Else(else_at) => match self.parse_block()? {
                (otherwise, BlockEnd::Endif(_)) => otherwise,
                (_, BlockEnd::Else(_)) => {
                    return Err(self.error(else_at, "second `$!else` in one `$!if`"))
                }
                (_, BlockEnd::Eof) => return Err(self.error(at, "`$!if` without `$!endif`")),
            },
            BlockEnd::Eof => return Err(self.error(at, "`$!if` without `$!endif`")),
        };

        match constant {
            // Integer conditions are decided now; only the taken branch survives.
            Some(taken) => {
                for frag in if taken { then } else { otherwise } {
                    match frag {
                        Fragment::Literal(text) => push_literal(out, &text),
                        other => out.push(other),
                    }
                }
            }
            None => out.push(Fragment::Conditional {
                condition: Condition::Flag(cond.to_string()),
                then,
                otherwise,
            }),
        }
        Ok(())
    }

    fn label_name(&mut self, at: usize) -> Result<String, RenderError> {
        let name = self.directive_word(at, "label name")?;
        if is_name(&name) {
            Ok(name)
        } else {
            Err(self.error(at, format!("invalid label name `{name}`")))
        }
    }

    /// Read the next word of a directive. A word ends at whitespace or `$`.
    fn directive_word(&mut self, at: usize, what: &str) -> Result<String, RenderError> {
        let src = self.src;
        let after = &src[self.pos..];
        let trimmed = after.trim_start_matches([' ', '\t']);
        let len = trimmed
            .find(|c: char| c.is_whitespace() || c == '$')
            .unwrap_or(trimmed.len());
        let word = &trimmed[..len];
        if word.is_empty() {
            return Err(self.error(at, format!("expected {what}")));
        }
        self.pos += (after.len() - trimmed.len()) + len;
        Ok(word.to_string())
    }

    fn error(&self, offset: usize, reason: impl Into<String>) -> RenderError {
        RenderError::malformed(self.name, offset, reason)
    }
}

fn push_literal(out: &mut Vec<Fragment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Fragment::Literal(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Fragment::Literal(text.to_string()));
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
