//! Numeric literal decoder (§4.1).
//!
//! Decodes the digit run of a `BINARY`/`OCTAL`/`DECIMAL`/`HEXADECIMAL`
//! literal token (the base marker and bracketing `]` are already stripped
//! by the lexer by the time text reaches here). Digits run right-to-left:
//! `value += digit * multiple; multiple *= base`. A `'` is a thousands
//! separator and contributes nothing.

use crate::error::{AsmError, ErrorKind};

const DIGIT_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn digit_value(ch: char) -> Option<u64> {
    let lower = ch.to_ascii_lowercase();
    DIGIT_CHARS
        .iter()
        .position(|&b| b as char == lower)
        .map(|p| p as u64)
}

/// Decode a digit run in the given base. On success, returns the value. On
/// the first illegal digit, returns the error but the caller is expected to
/// still treat the literal as contributing the word `0` (§4.1: "the token
/// yields 0 while the `errors` flag is raised").
pub fn decode(text: &str, base: u32, line: usize) -> Result<u64, AsmError> {
    let mut value: u64 = 0;
    let mut multiple: u64 = 1;

    for ch in text.chars().rev() {
        if ch == '\'' {
            continue;
        }

        let digit = match digit_value(ch) {
            Some(d) if (d as u32) < base => d,
            _ => {
                return Err(AsmError::new(ErrorKind::InvalidDigit { digit: ch }, line));
            }
        };

        value = value.wrapping_add(digit.wrapping_mul(multiple));
        multiple = multiple.wrapping_mul(base as u64);
    }

    Ok(value)
}

/// Base for each of the four numeric literal suffixes.
pub fn base_for_suffix(suffix: char) -> Option<u32> {
    match suffix {
        'b' => Some(2),
        'o' => Some(8),
        'd' => Some(10),
        'x' => Some(16),
        _ => None,
    }
}
