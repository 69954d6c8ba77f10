//! # Lexer
//!
//! Splits Fox VM assembly source into a token stream, annotating every
//! token with the source line it started on and the ROM word-address at
//! which its emission will begin (§4.2).
//!
//! ## Literal syntax
//!
//! Both string and numeric literals share one bracketed form,
//! `[<payload>]<suffix>`, where `<suffix>` is one of `s` (string), `b`
//! (binary), `o` (octal), `d` (decimal) or `x` (hex). Once `[` is seen,
//! every following byte — including whitespace and newlines — is captured
//! verbatim until an unescaped `]`, at which point the very next character
//! is read as the suffix and the token closes.
//!
//! ## Operand-slot tracking
//!
//! The most recent `INSTRUCTION` token owes its operand count in upcoming
//! tokens. While slots are owed, a following plain word is always a `LABEL`
//! operand rather than being matched against the mnemonic table — this is
//! what lets a label spelled the same as a mnemonic (`jm st`, where `st` is
//! a user label) work as an operand instead of being mistaken for the `st`
//! instruction. Bracketed literal operands also consume a slot (the 28
//! mnemonics never collide with bracket syntax, so they don't need the
//! mnemonic-table guard, but they still occupy an operand position).

pub mod cursor;
pub mod token;


use crate::error::{AsmError, ErrorKind};
use crate::escapes::decode_string;
use crate::isa::Opcode;
use cursor::Cursor;
use token::{Token, TokenKind};

pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<AsmError>,
    pub final_address: u64,
}

struct LexState {
    address: u64,
    owed: u8,
    tokens: Vec<Token>,
    errors: Vec<AsmError>,
}

impl LexState {
    /// Consume one operand slot if any are owed. Literal operands and
    /// plain-word operands both call this — only the mnemonic-vs-label
    /// decision in `close_word` cares about the distinction.
    fn consume_slot(&mut self) {
        if self.owed > 0 {
            self.owed -= 1;
        }
    }
}

#[must_use]
pub fn tokenize(source: &str) -> LexResult {
    let mut cursor = Cursor::new(source);
    let mut state = LexState {
        address: 0,
        owed: 0,
        tokens: Vec::new(),
        errors: Vec::new(),
    };

    let mut buffer = String::new();
    let mut buffer_line = 1;
    let mut in_literal = false;

    while let Some(ch) = cursor.peek() {
        if in_literal {
            let unescaped_close = ch == ']' && !buffer.ends_with('\\');
            buffer.push(ch);
            cursor.advance();
            if unescaped_close {
                in_literal = false;
            }
            continue;
        }

        match ch {
            ';' => {
                if !buffer.is_empty() {
                    close_token(&mut buffer, buffer_line, &mut state);
                }
                while let Some(c) = cursor.peek() {
                    cursor.advance();
                    if c == '\n' {
                        break;
                    }
                }
            }
            '\n' | ' ' | '\t' => {
                if !buffer.is_empty() {
                    close_token(&mut buffer, buffer_line, &mut state);
                }
                cursor.advance();
            }
            '[' => {
                if buffer.is_empty() {
                    buffer_line = cursor.line();
                }
                buffer.push(ch);
                cursor.advance();
                in_literal = true;
            }
            _ => {
                if buffer.is_empty() {
                    buffer_line = cursor.line();
                }
                buffer.push(ch);
                cursor.advance();
            }
        }
    }

    if in_literal {
        state
            .errors
            .push(AsmError::new(ErrorKind::UnterminatedString, buffer_line));
    } else if !buffer.is_empty() {
        close_token(&mut buffer, buffer_line, &mut state);
    }

    LexResult {
        tokens: state.tokens,
        errors: state.errors,
        final_address: state.address,
    }
}

fn close_token(buffer: &mut String, line: usize, state: &mut LexState) {
    let text = std::mem::take(buffer);
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    // Rule 1: literal, ends in "]<suffix>".
    if len >= 2 && chars[len - 2] == ']' {
        close_literal(text, chars[len - 1], line, state);
        return;
    }

    // Rule 2: label definition.
    if matches!(chars.last(), Some(':') | Some('=')) {
        state.tokens.push(Token {
            kind: TokenKind::LabelDefinition,
            text,
            line,
            address: state.address,
        });
        return;
    }

    // Rule 3/4: instruction vs. label, gated on owed operand slots.
    if state.owed == 0 {
        if let Some(op) = Opcode::from_mnemonic(&text) {
            state.owed = op.operand_count();
            let address = state.address;
            state.tokens.push(Token {
                kind: TokenKind::Instruction(op),
                text,
                line,
                address,
            });
            state.address += 1;
            return;
        }
    } else {
        state.consume_slot();
    }

    let address = state.address;
    state.tokens.push(Token {
        kind: TokenKind::Label,
        text,
        line,
        address,
    });
    state.address += 1;
}

fn close_literal(text: String, suffix: char, line: usize, state: &mut LexState) {
    let kind = match suffix {
        's' => TokenKind::StringLiteral,
        'b' => TokenKind::Binary,
        'x' => TokenKind::Hexadecimal,
        'o' => TokenKind::Octal,
        'd' => TokenKind::Decimal,
        other => {
            state
                .errors
                .push(AsmError::new(ErrorKind::UnrecognisedSuffix(other), line));
            state.consume_slot();
            state.address += 1;
            return;
        }
    };

    let is_string = matches!(kind, TokenKind::StringLiteral);
    let address = state.address;
    let token = Token {
        kind,
        text,
        line,
        address,
    };

    if is_string {
        state.address += decode_string(token.payload()).chars().count() as u64;
    } else {
        state.address += 1;
    }

    state.consume_slot();
    state.tokens.push(token);
}
