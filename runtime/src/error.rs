//! Runtime error taxonomy (spec.md §7: decoding, state, and resource
//! errors are all fatal and trigger a traceback).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown opcode {0} at address {1}")]
    UnknownOpcode(u64, u64),

    #[error("register index {0} is out of range (must be < 7)")]
    InvalidRegister(u64),

    #[error("unknown memory channel {0}")]
    UnknownChannel(u64),

    #[error("callstack underflow on rt")]
    CallstackUnderflow,

    #[error("division by zero in a/")]
    DivisionByZero,

    #[error("failed to grow channel buffer to {0} words")]
    AllocationFailure(usize),

    #[error("disk I/O error: {0}")]
    Disk(#[from] std::io::Error),
}
