//! Label table (§4.3).
//!
//! A label's meaning comes from one of three origins: a built-in (channel
//! and register names, inserted first), an address binding (`name:`), or a
//! value binding (`name= <literal>`). Lookup is a first-match linear scan,
//! so user labels never actually overwrite a built-in of the same name —
//! they just sit later in the table and are never reached — and a
//! duplicate user label similarly leaves the first definition authoritative
//! (§4.3: "this spec permits first-match semantics matching the reference
//! behavior").

use crate::error::{AsmError, ErrorKind};
use crate::isa::BUILTIN_LABELS;
use crate::lexer::token::{Token, TokenKind};
use crate::numeric;

pub struct LabelTable {
    entries: Vec<(String, u64)>,
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelTable {
    pub fn new() -> Self {
        let entries = BUILTIN_LABELS
            .iter()
            .map(|(name, meaning)| (name.to_string(), *meaning))
            .collect();
        Self { entries }
    }

    pub fn insert(&mut self, name: String, meaning: u64) {
        self.entries.push((name, meaning));
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| *m)
    }
}

/// Run both passes of label-table construction over the token stream,
/// mutating each `LabelDefinition` token's text in place to strip its
/// trailing `:`/`=` (so later lookups in the parser match the bare
/// identifier, per §4.3's "After insertion, strip the trailing...").
#[must_use]
pub fn populate(tokens: &mut [Token]) -> (LabelTable, Vec<AsmError>) {
    let mut table = LabelTable::new();
    let mut errors = Vec::new();

    for i in 0..tokens.len() {
        if tokens[i].kind != TokenKind::LabelDefinition {
            continue;
        }

        let line = tokens[i].line;
        let address = tokens[i].address;
        let chars: Vec<char> = tokens[i].text.chars().collect();
        let marker = *chars.last().expect("label definition token is never empty");
        let name: String = chars[..chars.len() - 1].iter().collect();

        validate_identifier(&name, line, &mut errors);

        if marker == ':' {
            table.insert(name.clone(), address);
        } else {
            match tokens.get(i + 1) {
                None => errors.push(AsmError::new(ErrorKind::MissingValueAfterEquals, line)),
                Some(next) if next.kind == TokenKind::StringLiteral => errors.push(
                    AsmError::new(ErrorKind::StringAssignedLabel(name.clone()), line),
                ),
                Some(next) => {
                    let value = decode_token_value(next, &mut errors);
                    table.insert(name.clone(), value);
                }
            }
        }

        tokens[i].text = name;
    }

    (table, errors)
}

fn validate_identifier(name: &str, line: usize, errors: &mut Vec<AsmError>) {
    for ch in name.chars() {
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            errors.push(AsmError::new(ErrorKind::IllegalLabelCharacter(ch), line));
        }
    }
}

fn decode_token_value(token: &Token, errors: &mut Vec<AsmError>) -> u64 {
    let base = match token.kind {
        TokenKind::Binary => 2,
        TokenKind::Octal => 8,
        TokenKind::Decimal => 10,
        TokenKind::Hexadecimal => 16,
        _ => {
            errors.push(AsmError::new(ErrorKind::MissingValueAfterEquals, token.line));
            return 0;
        }
    };

    match numeric::decode(token.payload(), base, token.line) {
        Ok(value) => value,
        Err(err) => {
            errors.push(err);
            0
        }
    }
}
