//! # Parser / emitter
//!
//! Walks the token stream a final time and resolves it to the flat 64-bit
//! word stream that becomes the ROM (§4.4). There is no AST: every token
//! kind maps directly to zero, one, or N emitted words, so a single linear
//! pass over the (label-resolved) token stream is the whole job.

#[cfg(test)]
mod tests;

use crate::error::{AsmError, ErrorKind};
use crate::escapes::decode_string;
use crate::labels::LabelTable;
use crate::lexer::token::{Token, TokenKind};
use crate::numeric;

pub struct EmitResult {
    pub words: Vec<u64>,
    pub errors: Vec<AsmError>,
}

#[must_use]
pub fn emit(tokens: &[Token], labels: &LabelTable) -> EmitResult {
    let mut words = Vec::new();
    let mut errors = Vec::new();

    for token in tokens {
        match &token.kind {
            TokenKind::Instruction(op) => words.push(op.value()),

            TokenKind::Label => match labels.get(&token.text) {
                Some(meaning) => words.push(meaning),
                None => errors.push(AsmError::new(
                    ErrorKind::UnrecognisedLabel(token.text.clone()),
                    token.line,
                )),
            },

            TokenKind::LabelDefinition => {}

            TokenKind::StringLiteral => {
                for ch in decode_string(token.payload()).chars() {
                    words.push(ch as u64);
                }
            }

            TokenKind::Binary => emit_numeric(token, 2, &mut words, &mut errors),
            TokenKind::Octal => emit_numeric(token, 8, &mut words, &mut errors),
            TokenKind::Decimal => emit_numeric(token, 10, &mut words, &mut errors),
            TokenKind::Hexadecimal => emit_numeric(token, 16, &mut words, &mut errors),
        }
    }

    EmitResult { words, errors }
}

fn emit_numeric(token: &Token, base: u32, words: &mut Vec<u64>, errors: &mut Vec<AsmError>) {
    match numeric::decode(token.payload(), base, token.line) {
        Ok(value) => words.push(value),
        Err(err) => {
            errors.push(err);
            words.push(0);
        }
    }
}
