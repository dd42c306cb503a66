//! Wire text decoding and ASS text escaping
//!
//! Comment text arrives XML-escaped with the platform's `/n` newline marker.
//! Before it reaches an event line it has to be escaped for ASS: backslashes
//! and braces would otherwise start override blocks, and a raw newline would
//! split the `Dialogue:` line in two.

use std::borrow::Cow;

/// U+2007 FIGURE SPACE, used where renderers would trim an ASCII space
pub const FIGURE_SPACE: char = '\u{2007}';

/// Decode XML character references (`&amp;`, `&#38;`, `&#x26;` ...)
///
/// Unknown or malformed references are kept verbatim.
#[must_use]
pub fn decode_xml_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = name.strip_prefix('#')?;
            let hex = digits
                .strip_prefix('x')
                .or_else(|| digits.strip_prefix('X'));
            let code = match hex {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Replace the platform newline marker `/n` with a real newline
#[must_use]
pub fn decode_newlines(text: &str) -> Cow<'_, str> {
    if text.contains("/n") {
        Cow::Owned(text.replace("/n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Escape plain text for use as the text field of an ASS event
///
/// Each newline becomes one `\N` hard break. Spaces at either end of a line
/// are turned into figure spaces and an empty line becomes a single space, so
/// renderers keep the line's shape.
#[must_use]
pub fn escape_ass_text(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('{', "\\{")
        .replace('}', "\\}");

    let mut out = String::with_capacity(escaped.len() + 8);
    for (index, line) in escaped.split('\n').enumerate() {
        if index > 0 {
            out.push_str("\\N");
        }
        push_line(&mut out, line);
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    if line.is_empty() {
        out.push(' ');
        return;
    }
    let trimmed = line.trim_matches(' ');
    if trimmed.is_empty() {
        out.extend(std::iter::repeat(FIGURE_SPACE).take(line.len()));
        return;
    }
    let leading = line.len() - line.trim_start_matches(' ').len();
    let trailing = line.len() - line.trim_end_matches(' ').len();
    out.extend(std::iter::repeat(FIGURE_SPACE).take(leading));
    out.push_str(trimmed);
    out.extend(std::iter::repeat(FIGURE_SPACE).take(trailing));
}

/// Check whether escaped text would draw nothing visible
#[must_use]
pub fn is_blank(escaped: &str) -> bool {
    escaped
        .replace("\\N", "")
        .trim_matches(|c: char| c.is_whitespace() || c == FIGURE_SPACE)
        .is_empty()
}
