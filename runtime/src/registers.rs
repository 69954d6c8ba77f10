//! Register file (spec.md §3, §4.5).
//!
//! A fixed 7-word array indexed by [`RegisterName`]. All registers start
//! at 0; named accessors exist for the registers the dispatcher touches
//! on every cycle (MCH/MAR/MDR/ACC/DAT/CEA/CSP) so call sites read like
//! the per-opcode contracts in the spec instead of raw index juggling.

use fvma::isa::{RegisterName, REGISTER_COUNT};

#[derive(Debug, Clone)]
pub struct RegisterFile {
    words: [u64; REGISTER_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            words: [0; REGISTER_COUNT],
        }
    }

    pub fn get(&self, reg: RegisterName) -> u64 {
        self.words[reg.index()]
    }

    pub fn set(&mut self, reg: RegisterName, value: u64) {
        self.words[reg.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegisterName, u64)> + '_ {
        fvma::isa::REGISTER_NAMES
            .into_iter()
            .map(move |reg| (reg, self.get(reg)))
    }

    pub fn mch(&self) -> u64 {
        self.get(RegisterName::Mch)
    }

    pub fn mar(&self) -> u64 {
        self.get(RegisterName::Mar)
    }

    pub fn mdr(&self) -> u64 {
        self.get(RegisterName::Mdr)
    }

    pub fn set_mdr(&mut self, value: u64) {
        self.set(RegisterName::Mdr, value);
    }

    pub fn acc(&self) -> u64 {
        self.get(RegisterName::Acc)
    }

    pub fn set_acc(&mut self, value: u64) {
        self.set(RegisterName::Acc, value);
    }

    pub fn dat(&self) -> u64 {
        self.get(RegisterName::Dat)
    }

    pub fn cea(&self) -> u64 {
        self.get(RegisterName::Cea)
    }

    pub fn set_cea(&mut self, value: u64) {
        self.set(RegisterName::Cea, value);
    }

    pub fn csp(&self) -> u64 {
        self.get(RegisterName::Csp)
    }

    pub fn set_csp(&mut self, value: u64) {
        self.set(RegisterName::Csp, value);
    }
}
