//! Growable word buffers backing the MEM and CST channels (spec.md §4.5).
//!
//! `store`/`load` extend the logical `length` (and the backing `Vec`'s
//! capacity, via `try_reserve` so an allocation failure surfaces as a
//! `RuntimeError` instead of an abort) to cover whatever index MAR names.

use crate::error::RuntimeError;
use crate::registers::RegisterFile;

#[derive(Debug, Clone)]
pub struct GrowableWords {
    data: Vec<u64>,
    length: usize,
}

impl Default for GrowableWords {
    fn default() -> Self {
        Self::new()
    }
}

impl GrowableWords {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            length: 0,
        }
    }

    pub fn with_capacity_hint(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            length: 0,
        }
    }

    /// Seed the buffer with an already-known word sequence (the ROM image
    /// loaded into MEM at boot); `length` starts at the full word count.
    pub fn with_words(words: Vec<u64>) -> Self {
        let length = words.len();
        Self { data: words, length }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn words(&self) -> &[u64] {
        &self.data[..self.length]
    }

    /// Read without growing — used by the traceback dump, which must not
    /// mutate state while reporting on it.
    pub fn peek(&self, index: u64) -> Option<u64> {
        let index = index as usize;
        if index < self.length {
            Some(self.data[index])
        } else {
            None
        }
    }

    fn ensure_capacity(&mut self, index: usize) -> Result<(), RuntimeError> {
        let needed = index + 1;
        if needed > self.data.len() {
            self.data
                .try_reserve(needed - self.data.len())
                .map_err(|_| RuntimeError::AllocationFailure(needed))?;
            self.data.resize(needed, 0);
        }
        if needed > self.length {
            self.length = needed;
        }
        Ok(())
    }

    pub fn load(&mut self, index: u64) -> Result<u64, RuntimeError> {
        self.ensure_capacity(index as usize)?;
        Ok(self.data[index as usize])
    }

    pub fn store(&mut self, index: u64, value: u64) -> Result<(), RuntimeError> {
        self.ensure_capacity(index as usize)?;
        self.data[index as usize] = value;
        Ok(())
    }

    /// Shrink the logical length without touching backing capacity — used
    /// by `rt` to pop the callstack's top frame.
    fn truncate(&mut self, new_length: usize) {
        self.length = new_length.min(self.data.len());
    }
}

/// The callstack, channel CST. Physically the same growable word buffer
/// that raw `st`/`ld` indexed access sees (spec.md §3: "raw indexed
/// access is allowed"), but `cl`/`rt` go through [`push`](Self::push) and
/// [`pop`](Self::pop) so the dispatcher never hand-rolls the CSP
/// bookkeeping at the call site.
#[derive(Debug, Clone)]
pub struct CallStack {
    buf: GrowableWords,
}

impl CallStack {
    pub fn new(capacity_hint: usize) -> Self {
        Self {
            buf: GrowableWords::with_capacity_hint(capacity_hint),
        }
    }

    /// `cl`: grow by one frame, record `return_address` (the address of
    /// the `cl` instruction itself) at the new top, and update CSP.
    pub fn push(
        &mut self,
        registers: &mut RegisterFile,
        return_address: u64,
    ) -> Result<(), RuntimeError> {
        let new_top = self.buf.len() as u64;
        self.buf.store(new_top, return_address)?;
        registers.set_csp(new_top);
        Ok(())
    }

    /// `rt`: pop the top frame, returning the call-site address that was
    /// recorded by `push`. Fails with `CallstackUnderflow` when CSP is the
    /// all-bits-set sentinel.
    pub fn pop(&mut self, registers: &mut RegisterFile) -> Result<u64, RuntimeError> {
        let csp = registers.csp();
        if csp == u64::MAX {
            return Err(RuntimeError::CallstackUnderflow);
        }
        let return_address = self.buf.load(csp)?;
        self.buf.truncate(csp as usize);
        registers.set_csp(csp.wrapping_sub(1));
        Ok(return_address)
    }

    pub fn load_raw(&mut self, index: u64) -> Result<u64, RuntimeError> {
        self.buf.load(index)
    }

    pub fn store_raw(&mut self, index: u64, value: u64) -> Result<(), RuntimeError> {
        self.buf.store(index, value)
    }

    pub fn words(&self) -> &[u64] {
        self.buf.words()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_load_round_trips() {
        let mut mem = GrowableWords::new();
        mem.store(3, 99).unwrap();
        assert_eq!(mem.load(3).unwrap(), 99);
        assert_eq!(mem.len(), 4);
    }

    #[test]
    fn store_grows_intervening_words_to_zero() {
        let mut mem = GrowableWords::new();
        mem.store(2, 7).unwrap();
        assert_eq!(mem.load(0).unwrap(), 0);
        assert_eq!(mem.load(1).unwrap(), 0);
    }

    #[test]
    fn call_and_return_preserve_length_csp_invariant() {
        let mut registers = RegisterFile::new();
        registers.set_csp(u64::MAX);
        let mut cst = CallStack::new(4);

        cst.push(&mut registers, 10).unwrap();
        assert_eq!(registers.csp(), 0);
        assert_eq!(cst.words().len(), 1);

        cst.push(&mut registers, 20).unwrap();
        assert_eq!(registers.csp(), 1);
        assert_eq!(cst.words().len(), 2);

        let returned = cst.pop(&mut registers).unwrap();
        assert_eq!(returned, 20);
        assert_eq!(registers.csp(), 0);
        assert_eq!(cst.words().len(), 1);

        let returned = cst.pop(&mut registers).unwrap();
        assert_eq!(returned, 10);
        assert_eq!(registers.csp(), u64::MAX);
        assert_eq!(cst.words().len(), 0);
    }

    #[test]
    fn pop_on_empty_callstack_is_underflow() {
        let mut registers = RegisterFile::new();
        registers.set_csp(u64::MAX);
        let mut cst = CallStack::new(4);
        assert!(matches!(
            cst.pop(&mut registers),
            Err(RuntimeError::CallstackUnderflow)
        ));
    }
}
