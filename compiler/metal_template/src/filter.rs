//! Placeholder filters: `$(name|prefix %|strip)`.

/// A text transformation applied to a substituted value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Prepend unless the value already starts with it.
    Prefix(String),
    /// Append unless the value already ends with it.
    Postfix(String),
    Strip,
    Upper,
    Lower,
    /// Characters `start..end`; a negative bound counts from the end.
    Slice { start: i64, end: i64 },
}

impl Filter {
    /// Parse one `name arg...` filter.
    pub(crate) fn parse(text: &str) -> Result<Filter, String> {
        let mut words = text.split_whitespace();
        let Some(name) = words.next() else {
            return Err("empty filter".to_string());
        };
        let arg = words.collect::<Vec<_>>().join(" ");

        let needs_arg = |filter: fn(String) -> Filter| {
            if arg.is_empty() {
                Err(format!("filter `{name}` needs an argument"))
            } else {
                Ok(filter(arg.clone()))
            }
        };
        let no_arg = |filter: Filter| {
            if arg.is_empty() {
                Ok(filter)
            } else {
                Err(format!("filter `{name}` takes no argument"))
            }
        };

        match name {
            "prefix" => needs_arg(Filter::Prefix),
            "postfix" => needs_arg(Filter::Postfix),
            "strip" => no_arg(Filter::Strip),
            "upper" => no_arg(Filter::Upper),
            "lower" => no_arg(Filter::Lower),
            "slice" => parse_slice(&arg),
            other => Err(format!("unknown filter `{other}`")),
        }
    }

    pub fn apply(&self, value: String) -> String {
        match self {
            Filter::Prefix(p) if !value.starts_with(p.as_str()) => format!("{p}{value}"),
            Filter::Postfix(p) if !value.ends_with(p.as_str()) => value + p,
            Filter::Prefix(_) | Filter::Postfix(_) => value,
            Filter::Strip => value.trim().to_string(),
            Filter::Upper => value.to_uppercase(),
            Filter::Lower => value.to_lowercase(),
            Filter::Slice { start, end } => {
                let len = value.chars().count();
                let (start, end) = (clamp_index(*start, len), clamp_index(*end, len));
                value
                    .chars()
                    .skip(start)
                    .take(end.saturating_sub(start))
                    .collect()
            }
        }
    }
}

fn parse_slice(arg: &str) -> Result<Filter, String> {
    let bounds: Vec<_> = arg.split_whitespace().map(str::parse::<i64>).collect();
    match bounds.as_slice() {
        [Ok(start), Ok(end)] => Ok(Filter::Slice {
            start: *start,
            end: *end,
        }),
        _ => Err(format!("filter `slice` needs two integer bounds, got `{arg}`")),
    }
}

/// Resolve a possibly negative index against `len`, clamped to `0..=len`.
fn clamp_index(index: i64, len: usize) -> usize {
    let len_signed = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if index < 0 { len_signed + index } else { index };
    usize::try_from(resolved.clamp(0, len_signed)).unwrap_or(len)
}
