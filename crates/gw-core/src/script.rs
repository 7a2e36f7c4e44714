//! Statement-boundary parser for migration scripts
//!
//! Migration files are plain SQL: semicolon-delimited statements, optionally
//! prefixed with comment-only documentation for operators. The splitter
//! passes statement text through verbatim (no reformatting) so that the
//! engine sees exactly what the author wrote; it only needs to know enough
//! lexical structure to find semicolons that actually end statements.

use crate::error::{StoreError, StoreResult};

/// Split raw SQL into executable statements.
///
/// Handles `--` line comments, `/* */` block comments, single-quoted
/// strings, double-quoted and backquoted identifiers, and `[bracketed]`
/// identifiers. A trailing semicolon on the last statement is optional.
/// Comment-only or whitespace-only segments are dropped.
pub fn split_statements(name: &str, sql: &str) -> StoreResult<Vec<String>> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '-' if chars.peek() == Some(&'-') => {
                // Line comment: skip to end of line, keep the newline so
                // adjacent tokens stay separated.
                for c in chars.by_ref() {
                    if c == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(StoreError::MalformedScript {
                        name: name.to_string(),
                        message: "unterminated block comment".to_string(),
                    });
                }
                current.push(' ');
            }
            '\'' | '"' | '`' => {
                current.push(c);
                if !consume_quoted(&mut chars, &mut current, c) {
                    return Err(StoreError::MalformedScript {
                        name: name.to_string(),
                        message: format!("unterminated {c} quote"),
                    });
                }
            }
            '[' => {
                current.push(c);
                let mut closed = false;
                for c in chars.by_ref() {
                    current.push(c);
                    if c == ']' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(StoreError::MalformedScript {
                        name: name.to_string(),
                        message: "unterminated [bracketed] identifier".to_string(),
                    });
                }
            }
            ';' => {
                push_statement(&mut statements, &mut current);
            }
            _ => current.push(c),
        }
    }
    push_statement(&mut statements, &mut current);

    Ok(statements)
}

/// Consume a quoted region, honoring doubled-quote escapes (`''` inside a
/// `'` string). Returns false if the closing quote is missing.
fn consume_quoted(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    out: &mut String,
    quote: char,
) -> bool {
    while let Some(c) = chars.next() {
        out.push(c);
        if c == quote {
            if chars.peek() == Some(&quote) {
                out.push(quote);
                chars.next();
            } else {
                return true;
            }
        }
    }
    false
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let text = current.trim();
    if !text.is_empty() {
        statements.push(text.to_string());
    }
    current.clear();
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
