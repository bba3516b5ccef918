//! Expression formatting for display and comparison.
//!
//! Expressions reference other objects through `#"<uuid>"` tokens. The
//! formatter swaps resolvable tokens for display names and breaks long
//! calls one argument per line.

use crate::model::ObjectDirectory;
use regex::Regex;
use std::sync::LazyLock;

static REFERENCE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"#"([^"\s]+)""#).expect("static regex"));

/// Expressions at or below this length stay on one line.
pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// UUIDs referenced through `#"..."` tokens, in order of appearance.
pub fn reference_tokens(text: &str) -> impl Iterator<Item = &str> {
    REFERENCE_TOKEN
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Resolves references and pretty-prints expressions.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionFormatter<'a> {
    directory: &'a ObjectDirectory,
    wrap_width: usize,
}

impl<'a> ExpressionFormatter<'a> {
    #[must_use]
    pub const fn new(directory: &'a ObjectDirectory) -> Self {
        Self {
            directory,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }

    #[must_use]
    pub const fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self
    }

    /// Replace resolvable `#"uuid"` tokens with `#"Display Name"`.
    ///
    /// Tokens for objects outside the directory are kept verbatim.
    #[must_use]
    pub fn resolve_references(&self, expression: &str) -> String {
        REFERENCE_TOKEN
            .replace_all(expression, |caps: &regex::Captures<'_>| {
                let uuid = &caps[1];
                match self.directory.get(uuid) {
                    Some(object) => format!("#\"{}\"", object.name()),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Resolve references, then pretty-print.
    #[must_use]
    pub fn format(&self, expression: &str) -> String {
        pretty_print(&self.resolve_references(expression), self.wrap_width)
    }
}

/// Break a long call expression after each top-level argument.
///
/// Only the outermost bracket level is split; nested calls and string
/// literals are copied unchanged.
#[must_use]
pub fn pretty_print(expression: &str, wrap_width: usize) -> String {
    let expression = expression.trim();
    if expression.chars().count() <= wrap_width {
        return expression.to_string();
    }

    let mut out = String::with_capacity(expression.len() + 16);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut skip_whitespace = false;

    for c in expression.chars() {
        if skip_whitespace {
            if c.is_whitespace() {
                continue;
            }
            skip_whitespace = false;
        }
        if in_string {
            out.push(c);
            if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                out.push(c);
                if depth == 1 {
                    out.push_str("\n  ");
                    skip_whitespace = true;
                }
            }
            ')' | ']' | '}' => {
                if depth == 1 {
                    while out.ends_with(char::is_whitespace) {
                        out.pop();
                    }
                    out.push('\n');
                }
                depth = depth.saturating_sub(1);
                out.push(c);
            }
            ',' if depth == 1 => {
                out.push_str(",\n  ");
                skip_whitespace = true;
            }
            _ => out.push(c),
        }
    }
    out
}
