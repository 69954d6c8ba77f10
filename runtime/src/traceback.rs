//! Traceback reporter (spec.md §4.7).
//!
//! Free-form, human-readable text written to stderr on any fatal error:
//! a header naming the error, the 7-row register dump, the callstack
//! top-first with CSP marked, and the full MEM dump with CEA (and MAR,
//! when MCH selects MEM) marked. This is a diagnostic dump, not an
//! interactive debugger — there is no stepping or breakpoint support.

use std::fmt::Write as _;

use fvma::isa::{Channel, Opcode};

use crate::channels::{CallStack, GrowableWords};
use crate::error::RuntimeError;
use crate::registers::RegisterFile;

pub fn render(error: &RuntimeError, registers: &RegisterFile, mem: &GrowableWords, cst: &CallStack) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "fvm: fatal error: {error}");
    let _ = writeln!(out);

    let _ = writeln!(out, "-- registers --");
    for (name, value) in registers.iter() {
        let _ = writeln!(out, "  {:>2} {:<4} {value}", name.index(), name.text());
    }

    let cea = registers.cea();
    if let Some(op_value) = mem.peek(cea) {
        if let Some(op) = Opcode::from_u64(op_value) {
            let _ = writeln!(out, "  at CEA={cea}: {} ({op_value})", op.mnemonic());
        } else {
            let _ = writeln!(out, "  at CEA={cea}: unknown opcode {op_value}");
        }
    } else {
        let _ = writeln!(out, "  at CEA={cea}: out of bounds");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "-- callstack (top first) --");
    let csp = registers.csp();
    let frames = cst.words();
    if frames.is_empty() {
        let _ = writeln!(out, "  <empty>");
    } else {
        for (index, value) in frames.iter().enumerate().rev() {
            let marker = if index as u64 == csp { "<- csp" } else { "" };
            let _ = writeln!(out, "  [{index}] {value} {marker}");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "-- main memory --");
    let mar_marker = Channel::from_u64(registers.mch()) == Some(Channel::Mem);
    let mar = registers.mar();
    for (index, value) in mem.words().iter().enumerate() {
        let index = index as u64;
        let mut markers = Vec::new();
        if index == cea {
            markers.push("cea");
        }
        if mar_marker && index == mar {
            markers.push("mar");
        }
        let marker = if markers.is_empty() {
            String::new()
        } else {
            format!("<- {}", markers.join(", "))
        };
        let _ = writeln!(out, "  [{index}] {value} {marker}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::CallStack;
    use fvma::isa::RegisterName;

    #[test]
    fn render_marks_cea_and_reports_the_error_header() {
        let mut registers = RegisterFile::new();
        registers.set_cea(2);
        registers.set(RegisterName::Mch, 0);
        registers.set(RegisterName::Mar, 2);
        let mem = GrowableWords::with_words(vec![0, 5, 3, 27]);
        let cst = CallStack::new(4);

        let report = render(&RuntimeError::DivisionByZero, &registers, &mem, &cst);

        assert!(report.contains("division by zero"));
        assert!(report.contains("[2] 3 <- cea, mar"));
    }

    #[test]
    fn render_reports_an_empty_callstack() {
        let registers = RegisterFile::new();
        let mem = GrowableWords::with_words(vec![27]);
        let cst = CallStack::new(4);

        let report = render(&RuntimeError::CallstackUnderflow, &registers, &mem, &cst);
        assert!(report.contains("<empty>"));
    }
}
