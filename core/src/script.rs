//! Turns a raw SQL script into an ordered sequence of executable statements.
//!
//! The scan is deliberately naive: a `--` marker is treated as a comment
//! wherever it appears, including inside string literals. The bundled scripts
//! are written against that behavior, so it must not be "fixed" here.

/// Splits a script into statements: comments stripped, whitespace collapsed,
/// one statement per `;`. A non-blank trailing fragment without a terminating
/// semicolon is still emitted; a blank trailing fragment is dropped.
/// Statements come back in source order — seed inserts depend on the schema
/// statements before them.
#[must_use]
pub fn tokenize(raw: &str) -> Vec<String> {
    let stripped = strip_line_comments(raw);
    let collapsed = collapse_whitespace(&stripped);
    split_statements(&collapsed)
}

/// Deletes every run from `--` through the next newline (inclusive), or to
/// the end of the text when no newline follows. Left-to-right, non-overlapping.
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("--") {
        out.push_str(&rest[..pos]);
        rest = match rest[pos..].find('\n') {
            Some(eol) => &rest[pos + eol + 1..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

/// Collapses every maximal whitespace run (newlines included) to one space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_statements(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut rest = text;
    loop {
        match rest.find(';') {
            Some(pos) => {
                statements.push(rest[..pos].trim().to_string());
                rest = &rest[pos + 1..];
            }
            None => {
                if !rest.trim().is_empty() {
                    statements.push(rest.trim().to_string());
                }
                break;
            }
        }
    }
    statements
}
