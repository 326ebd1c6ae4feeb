//! Readers for the two template source formats.
//!
//! Frame files hold named construct templates:
//!
//! ```text
//! // comment
//! struct_member
//! ${
//! $(type) $(name);
//! $}
//! ```
//!
//! Operator files hold one `category.symbol body` entry per line; a body
//! starting with `${` runs until a line ending in `$}`:
//!
//! ```text
//! string.== compare_strings(&$(left), &$(right)) == 0
//! default.+ $(left) + $(right)
//! ```

use crate::error::RenderError;
use crate::operators::OPERATOR_SYMBOLS;

/// Body marker meaning "use the `default` template for this symbol".
pub const INHERIT_MARKER: &str = "$!default";

/// A named frame body, not yet parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSource {
    pub name: String,
    pub body: String,
    /// Byte offset of the block's name line in the file.
    pub offset: usize,
}

/// One operator entry, not yet parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorSource {
    pub category: String,
    pub symbol: String,
    /// `None` for the inherit-from-default marker.
    pub body: Option<String>,
    pub offset: usize,
}

/// Split a frame file into named bodies.
///
/// `comment` lines outside a block are skipped. Lines inside a block are kept
/// verbatim, blank ones included; the finished body is trimmed.
pub fn read_frames(file: &str, source: &str, comment: &str) -> Result<Vec<FrameSource>, RenderError> {
    let mut frames = Vec::new();
    let mut pending: Option<(String, usize)> = None;
    let mut open: Option<(String, usize, Vec<&str>)> = None;

    for (offset, line) in lines_with_offsets(source) {
        let trimmed = line.trim();

        if let Some((name, at, mut lines)) = open.take() {
            if let Some(rest) = trimmed.strip_prefix("$}") {
                if !rest.trim().is_empty() {
                    return Err(RenderError::malformed(file, offset, "text after `$}`"));
                }
                frames.push(FrameSource {
                    name,
                    body: lines.join("\n").trim().to_string(),
                    offset: at,
                });
            } else {
                lines.push(line);
                open = Some((name, at, lines));
            }
            continue;
        }

        if trimmed.is_empty() || (!comment.is_empty() && trimmed.starts_with(comment)) {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("${") {
            let Some((name, at)) = pending.take() else {
                return Err(RenderError::malformed(file, offset, "`${` block without a name"));
            };
            let mut lines = Vec::new();
            if let Some(single) = rest.trim_end().strip_suffix("$}") {
                frames.push(FrameSource {
                    name,
                    body: single.trim().to_string(),
                    offset: at,
                });
                continue;
            }
            if !rest.trim().is_empty() {
                lines.push(rest);
            }
            open = Some((name, at, lines));
            continue;
        }

        if let Some((name, at)) = pending.replace((trimmed.to_string(), offset)) {
            return Err(RenderError::malformed(
                file,
                at,
                format!("template `{name}` has no `${{` block"),
            ));
        }
    }

    if let Some((name, at, _)) = open {
        return Err(RenderError::malformed(
            file,
            at,
            format!("template `{name}` is missing its closing `$}}`"),
        ));
    }
    if let Some((name, at)) = pending {
        return Err(RenderError::malformed(
            file,
            at,
            format!("template `{name}` has no `${{` block"),
        ));
    }
    Ok(frames)
}

/// Split an operator file into entries.
pub fn read_operators(file: &str, source: &str) -> Result<Vec<OperatorSource>, RenderError> {
    let mut entries = Vec::new();
    let mut continued: Option<(OperatorSource, Vec<&str>)> = None;

    for (offset, line) in lines_with_offsets(source) {
        let trimmed = line.trim();

        if let Some((mut entry, mut lines)) = continued.take() {
            if let Some(last) = trimmed.strip_suffix("$}") {
                lines.push(last);
                entry.body = Some(lines.join("\n").trim().to_string());
                entries.push(entry);
            } else {
                lines.push(trimmed);
                continued = Some((entry, lines));
            }
            continue;
        }

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((category, rest)) = trimmed.split_once('.') else {
            return Err(RenderError::malformed(file, offset, "expected `category.symbol`"));
        };
        if category.is_empty()
            || !category
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(RenderError::malformed(
                file,
                offset,
                format!("invalid category `{category}`"),
            ));
        }
        let Some(symbol) = match_symbol(rest) else {
            return Err(RenderError::malformed(
                file,
                offset,
                format!("unknown operator in `{trimmed}`"),
            ));
        };
        let body = rest[symbol.len()..].trim();

        let mut entry = OperatorSource {
            category: category.to_string(),
            symbol: symbol.to_string(),
            body: None,
            offset,
        };

        if let Some(block) = body.strip_prefix("${") {
            if let Some(single) = block.trim_end().strip_suffix("$}") {
                entry.body = Some(single.trim().to_string());
                entries.push(entry);
            } else {
                let lines = if block.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![block.trim()]
                };
                continued = Some((entry, lines));
            }
            continue;
        }

        if body.is_empty() {
            return Err(RenderError::malformed(
                file,
                offset,
                format!("`{category}.{symbol}` has an empty body"),
            ));
        }
        if body != INHERIT_MARKER {
            entry.body = Some(body.to_string());
        }
        entries.push(entry);
    }

    if let Some((entry, _)) = continued {
        return Err(RenderError::malformed(
            file,
            entry.offset,
            format!(
                "`{}.{}` is missing its closing `$}}`",
                entry.category, entry.symbol
            ),
        ));
    }
    Ok(entries)
}

/// Longest operator symbol at the start of `rest`, followed by whitespace or
/// the end of the line.
fn match_symbol(rest: &str) -> Option<&'static str> {
    OPERATOR_SYMBOLS
        .iter()
        .filter(|sym| {
            rest.strip_prefix(**sym)
                .is_some_and(|after| after.is_empty() || after.starts_with(char::is_whitespace))
        })
        .max_by_key(|sym| sym.len())
        .copied()
}

fn lines_with_offsets(source: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    source.split('\n').map(move |raw| {
        let at = offset;
        offset += raw.len() + 1;
        (at, raw.strip_suffix('\r').unwrap_or(raw))
    })
}
