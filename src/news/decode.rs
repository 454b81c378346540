//! Best-effort decoding of news search response bodies.
//!
//! The search provider answers with JSON most of the time, but bodies also arrive
//! truncated, with stray escape sequences, or as a plaintext notice. Decoding tries a
//! strict parse first and then two repairs, in a fixed order. It never panics.

use serde_json::Value;
use std::fmt;
use std::fmt::Write as _;

/// Characters of an offending body kept in log messages.
const LOG_PREFIX_CHARS: usize = 200;

/// Why a body could not be turned into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undecodable {
    /// The body does not even start like JSON (plaintext notice, HTML error page, empty).
    NonJson,
    /// The body looked like JSON but neither repair made it parse.
    Unrecoverable,
}

impl fmt::Display for Undecodable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Undecodable::NonJson => f.write_str("non-JSON body"),
            Undecodable::Unrecoverable => f.write_str("unrecoverable JSON"),
        }
    }
}

/// Decode a response body. `tag` identifies the request in log messages only.
pub fn decode_body(body: &str, tag: &str) -> Result<Value, Undecodable> {
    let trimmed = body.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        tracing::warn!(tag, body = %log_prefix(trimmed), "response is not JSON");
        return Err(Undecodable::NonJson);
    }

    if let Ok(v) = serde_json::from_str(trimmed) {
        return Ok(v);
    }

    let unescaped = reinterpret_escapes(trimmed);
    if let Ok(v) = serde_json::from_str(&unescaped) {
        tracing::debug!(tag, "decoded after escape repair");
        return Ok(v);
    }

    for candidate in [close_truncated(&unescaped), close_truncated(trimmed)] {
        if let Ok(v) = serde_json::from_str(&candidate) {
            tracing::debug!(tag, "decoded after closing truncated JSON");
            return Ok(v);
        }
    }

    tracing::warn!(tag, body = %log_prefix(trimmed), "response JSON is unrecoverable");
    Err(Undecodable::Unrecoverable)
}

fn log_prefix(text: &str) -> String {
    match text.char_indices().nth(LOG_PREFIX_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn hex_at(chars: &[char], start: usize, len: usize) -> Option<u32> {
    let digits = chars.get(start..start + len)?;
    digits
        .iter()
        .try_fold(0u32, |acc, c| Some(acc * 16 + c.to_digit(16)?))
}

fn push_json_char(out: &mut String, c: char, in_string: bool) {
    match c {
        '"' if in_string => out.push_str("\\\""),
        '\\' if in_string => out.push_str("\\\\"),
        c if in_string && (c as u32) < 0x20 => {
            let _ = write!(out, "\\u{:04x}", c as u32);
        }
        c => out.push(c),
    }
}

/// Reinterpret backslash escapes the way a unicode-escape decoder would, then write the
/// result back as valid JSON.
///
/// `\uXXXX` (including surrogate pairs) and `\xHH` become the characters they name.
/// Escapes JSON does not know, such as `\'`, lose their backslash. Valid JSON escapes are
/// kept, and any character that needs escaping inside a string is escaped again. Raw
/// control characters inside strings are escaped too.
pub fn reinterpret_escapes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            if c == '"' {
                in_string = !in_string;
                out.push(c);
            } else {
                push_json_char(&mut out, c, in_string);
            }
            i += 1;
            continue;
        }

        let Some(&next) = chars.get(i + 1) else {
            // dangling backslash at the very end
            break;
        };
        match next {
            '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' => {
                out.push('\\');
                out.push(next);
                i += 2;
            }
            'u' => match hex_at(&chars, i + 2, 4) {
                Some(hi) => {
                    let (decoded, consumed) = decode_utf16_escape(&chars, i, hi);
                    push_json_char(&mut out, decoded, in_string);
                    i += consumed;
                }
                None => {
                    out.push('u');
                    i += 2;
                }
            },
            'x' => match hex_at(&chars, i + 2, 2) {
                Some(byte) => {
                    let decoded = char::from_u32(byte).unwrap_or(char::REPLACEMENT_CHARACTER);
                    push_json_char(&mut out, decoded, in_string);
                    i += 4;
                }
                None => {
                    out.push('x');
                    i += 2;
                }
            },
            other => {
                push_json_char(&mut out, other, in_string);
                i += 2;
            }
        }
    }
    out
}

/// Decode the `\uXXXX` escape starting at `chars[at]`, pairing surrogates when possible.
/// Returns the character and the number of input chars consumed.
fn decode_utf16_escape(chars: &[char], at: usize, hi: u32) -> (char, usize) {
    if (0xD800..0xDC00).contains(&hi) {
        let pair_follows = chars.get(at + 6) == Some(&'\\') && chars.get(at + 7) == Some(&'u');
        if pair_follows
            && let Some(lo) = hex_at(chars, at + 8, 4)
            && (0xDC00..0xE000).contains(&lo)
        {
            let cp = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
            return (char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER), 12);
        }
        return (char::REPLACEMENT_CHARACTER, 6);
    }
    (char::from_u32(hi).unwrap_or(char::REPLACEMENT_CHARACTER), 6)
}

/// Close a truncated JSON document.
///
/// An unterminated string is closed, trailing commas are trimmed, and the missing `}`/`]`
/// are appended in nesting order. Brackets inside strings are ignored.
pub fn close_truncated(text: &str) -> String {
    let mut open: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' => {
                if open.last() == Some(&c) {
                    open.pop();
                }
            }
            _ => {}
        }
    }

    let mut out = text.to_string();
    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }
    loop {
        let end = out.trim_end().len();
        out.truncate(end);
        if out.ends_with(',') {
            out.pop();
        } else {
            break;
        }
    }
    while let Some(closer) = open.pop() {
        out.push(closer);
    }
    out
}
