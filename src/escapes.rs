//! String-literal escape processing, shared by the lexer (which needs the
//! post-escape length to advance the address cursor correctly, per I3) and
//! the parser/emitter (which needs the actual decoded characters).
//!
//! Rules (§4.4): after a `\`, the next character is replaced: `/` → `\`,
//! `n` → newline, `b` → backspace, `r` → carriage return. Any other escaped
//! character is emitted literally, with the backslash consumed. A trailing,
//! unmatched backslash is dropped.

pub fn decode_string(payload: &str) -> String {
    let mut out = String::with_capacity(payload.len());
    let mut chars = payload.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('/') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('b') => out.push('\u{8}'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(decode_string("Hi"), "Hi");
    }

    #[test]
    fn known_escapes_decode() {
        assert_eq!(decode_string("Hi\\n"), "Hi\n");
        assert_eq!(decode_string("a\\bb"), "a\u{8}b");
        assert_eq!(decode_string("a\\rb"), "a\rb");
        assert_eq!(decode_string("a\\/b"), "a\\b");
    }

    #[test]
    fn unknown_escape_passes_through_literally() {
        assert_eq!(decode_string("a\\qb"), "aqb");
    }

    #[test]
    fn trailing_backslash_is_dropped() {
        assert_eq!(decode_string("a\\"), "a");
    }
}
