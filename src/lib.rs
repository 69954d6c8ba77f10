//! # Fox Virtual Machine — Assembler
//!
//! A single-pass assembler for Fox VM assembly source (`.fa` files): a
//! lexer, a label table, and a word-stream emitter that together turn
//! source text into the flat 64-bit word stream written out as a `.fb`
//! ROM image.
//!
//! ## Pipeline
//!
//! 1. **Lexer** ([`lexer`]) — tokenizes source into an address-annotated
//!    token stream.
//! 2. **Label table** ([`labels`]) — resolves every label definition to
//!    its meaning (address or literal value) in a single pass over the
//!    already-lexed tokens.
//! 3. **Parser / emitter** ([`parser`]) — walks the resolved token stream
//!    once more and produces the final word stream.
//!
//! The instruction set, register names, and channel numbers this crate
//! and the runtime share both live in [`isa`], so the two crates can
//! never drift out of sync on what a given opcode or register means.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fvma::{lexer::tokenize, labels::populate, parser::emit};
//!
//! let source = std::fs::read_to_string("program.fa").unwrap();
//! let mut lexed = tokenize(&source);
//! let (table, mut errors) = populate(&mut lexed.tokens);
//! errors.extend(lexed.errors);
//!
//! let result = emit(&lexed.tokens, &table);
//! if errors.is_empty() && result.errors.is_empty() {
//!     println!("assembled {} words", result.words.len());
//! }
//! ```

pub mod error;
pub mod escapes;
pub mod isa;
pub mod labels;
pub mod lexer;
pub mod numeric;
pub mod parser;
