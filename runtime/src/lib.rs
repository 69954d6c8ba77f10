//! # Fox Virtual Machine — Runtime
//!
//! A fetch/execute loop over 64-bit memory cells: a 7-register file, four
//! addressable memory channels (main memory, input, output, callstack),
//! and 27 executable instructions (opcode 27, `fi`, halts the loop rather
//! than executing).
//!
//! [`vm::VmContext`] owns all mutable VM state — registers, MEM, CST, and
//! the host I/O adapters — and is constructed fresh per run. [`io`]
//! defines the host adapter traits (`ByteSource`/`ByteSink`/`Disk`) so the
//! real blocking-stdin implementation used by the `fvm` binary and the
//! in-memory fakes used by this crate's own tests satisfy the same
//! contract. On any fatal error, [`traceback::render`] produces the
//! human-readable dump described in spec.md §4.7.

pub mod channels;
pub mod error;
pub mod io;
pub mod registers;
pub mod traceback;
pub mod vm;
