//! Fetch-decode-execute loop (spec.md §4.6).
//!
//! `VmContext::run` fetches `MEM[CEA]`, halts clean on `fi` (27), fails
//! fatally on any opcode ≥ 27, and otherwise dispatches to a per-opcode
//! handler. Every handler that consumes operand words (`pl`, `mv`, the
//! jumps, `cl`, `rt`) is responsible for leaving CEA at
//! "one before the next fetch address"; the loop then applies a single
//! uniform `CEA += 1` after every successful handler, which is what
//! actually advances past a plain 0-operand opcode and what the `- 1`s
//! inside the jump/call handlers are cancelling out.

use fvma::isa::{Channel, Opcode, RegisterName};

use crate::channels::{CallStack, GrowableWords};
use crate::error::RuntimeError;
use crate::io::{ByteSink, ByteSource, Disk};
use crate::registers::RegisterFile;

const CALLSTACK_INITIAL_CAPACITY: usize = 16;

/// Unpack a `hardware/rom` byte stream into the word sequence it encodes.
/// Any trailing partial word (fewer than 8 bytes) is dropped rather than
/// padded — a ROM is only ever produced by the assembler, which always
/// emits whole words.
#[must_use]
pub fn decode_rom(bytes: &[u8]) -> Vec<u64> {
    bytes
        .chunks_exact(8)
        .map(|chunk| u64::from_ne_bytes(chunk.try_into().expect("chunk is exactly 8 bytes")))
        .collect()
}

pub struct VmContext<I, O, D> {
    pub registers: RegisterFile,
    pub mem: GrowableWords,
    pub cst: CallStack,
    pub input: I,
    pub output: O,
    pub disk: D,
}

impl<I: ByteSource, O: ByteSink, D: Disk> VmContext<I, O, D> {
    pub fn new(rom: Vec<u64>, input: I, output: O, disk: D) -> Self {
        let mut registers = RegisterFile::new();
        registers.set_csp(u64::MAX);

        Self {
            registers,
            mem: GrowableWords::with_words(rom),
            cst: CallStack::new(CALLSTACK_INITIAL_CAPACITY),
            input,
            output,
            disk,
        }
    }

    /// Runs until `fi` or a fatal error.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        loop {
            let cea = self.registers.cea();
            let op_value = self.mem.load(cea)?;

            if op_value == Opcode::Fi.value() {
                return Ok(());
            }

            let op = Opcode::from_u64(op_value)
                .ok_or(RuntimeError::UnknownOpcode(op_value, cea))?;

            self.dispatch(op, cea)?;
            let advanced = self.registers.cea();
            self.registers.set_cea(advanced + 1);
        }
    }

    fn dispatch(&mut self, op: Opcode, cea: u64) -> Result<(), RuntimeError> {
        match op {
            Opcode::Pl => self.op_pl(cea),
            Opcode::Mv => self.op_mv(cea),
            Opcode::St => self.op_st(),
            Opcode::Ld => self.op_ld(),
            Opcode::Jm => self.op_jm(cea),
            Opcode::Js => self.op_js(cea),
            Opcode::Jc => self.op_jc(cea),
            Opcode::APlus => Ok(self.op_acc(|a, d| a.wrapping_add(d))),
            Opcode::AMinus => Ok(self.op_acc(|a, d| a.wrapping_sub(d))),
            Opcode::ANot => {
                let acc = self.registers.acc();
                self.registers.set_acc(!acc);
                Ok(())
            }
            Opcode::AInc => {
                let acc = self.registers.acc();
                self.registers.set_acc(acc.wrapping_add(1));
                Ok(())
            }
            Opcode::ADec => {
                let acc = self.registers.acc();
                self.registers.set_acc(acc.wrapping_sub(1));
                Ok(())
            }
            Opcode::AMul => Ok(self.op_acc(|a, d| a.wrapping_mul(d))),
            Opcode::ADiv => {
                if self.registers.dat() == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Ok(self.op_acc(|a, d| a / d))
            }
            Opcode::AAnd => Ok(self.op_acc(|a, d| a & d)),
            Opcode::AOr => Ok(self.op_acc(|a, d| a | d)),
            Opcode::AXor => Ok(self.op_acc(|a, d| a ^ d)),
            Opcode::AShl => Ok(self.op_acc(|a, d| a.wrapping_shl(d as u32))),
            Opcode::AShr => Ok(self.op_acc(|a, d| a.wrapping_shr(d as u32))),
            Opcode::Gt => Ok(self.op_cmp(|a, d| a > d)),
            Opcode::Lt => Ok(self.op_cmp(|a, d| a < d)),
            Opcode::Ge => Ok(self.op_cmp(|a, d| a >= d)),
            Opcode::Le => Ok(self.op_cmp(|a, d| a <= d)),
            Opcode::Eq => Ok(self.op_cmp(|a, d| a == d)),
            Opcode::Ne => Ok(self.op_cmp(|a, d| a != d)),
            Opcode::Cl => self.op_cl(cea),
            Opcode::Rt => self.op_rt(),
            Opcode::Fi => unreachable!("fi halts in run() before dispatch is reached"),
        }
    }

    fn op_pl(&mut self, cea: u64) -> Result<(), RuntimeError> {
        let value = self.mem.load(cea + 1)?;
        let reg_index = self.mem.load(cea + 2)?;
        let reg = RegisterName::from_index(reg_index)
            .ok_or(RuntimeError::InvalidRegister(reg_index))?;
        self.registers.set(reg, value);
        self.registers.set_cea(cea + 2);
        Ok(())
    }

    fn op_mv(&mut self, cea: u64) -> Result<(), RuntimeError> {
        let rs_index = self.mem.load(cea + 1)?;
        let rd_index = self.mem.load(cea + 2)?;
        let rs =
            RegisterName::from_index(rs_index).ok_or(RuntimeError::InvalidRegister(rs_index))?;
        let rd =
            RegisterName::from_index(rd_index).ok_or(RuntimeError::InvalidRegister(rd_index))?;
        let value = self.registers.get(rs);
        self.registers.set(rd, value);
        self.registers.set_cea(cea + 2);
        Ok(())
    }

    fn op_jm(&mut self, cea: u64) -> Result<(), RuntimeError> {
        let target = self.mem.load(cea + 1)?;
        self.registers.set_cea(target.wrapping_sub(1));
        Ok(())
    }

    fn op_js(&mut self, cea: u64) -> Result<(), RuntimeError> {
        if self.registers.acc() != 0 {
            let target = self.mem.load(cea + 1)?;
            self.registers.set_cea(target.wrapping_sub(1));
        } else {
            self.registers.set_cea(cea + 1);
        }
        Ok(())
    }

    fn op_jc(&mut self, cea: u64) -> Result<(), RuntimeError> {
        if self.registers.acc() == 0 {
            let target = self.mem.load(cea + 1)?;
            self.registers.set_cea(target.wrapping_sub(1));
        } else {
            self.registers.set_cea(cea + 1);
        }
        Ok(())
    }

    fn op_cl(&mut self, cea: u64) -> Result<(), RuntimeError> {
        self.cst.push(&mut self.registers, cea)?;
        let target = self.mem.load(cea + 1)?;
        self.registers.set_cea(target.wrapping_sub(1));
        Ok(())
    }

    fn op_rt(&mut self) -> Result<(), RuntimeError> {
        let call_site = self.cst.pop(&mut self.registers)?;
        self.registers.set_cea(call_site + 1);
        Ok(())
    }

    fn op_acc(&mut self, f: impl FnOnce(u64, u64) -> u64) {
        let value = f(self.registers.acc(), self.registers.dat());
        self.registers.set_acc(value);
    }

    fn op_cmp(&mut self, f: impl FnOnce(u64, u64) -> bool) {
        let value = f(self.registers.acc(), self.registers.dat());
        self.registers.set_acc(u64::from(value));
    }

    fn op_st(&mut self) -> Result<(), RuntimeError> {
        let channel_value = self.registers.mch();
        let channel =
            Channel::from_u64(channel_value).ok_or(RuntimeError::UnknownChannel(channel_value))?;
        let mar = self.registers.mar();
        let mdr = self.registers.mdr();

        match channel {
            Channel::Mem => self.mem.store(mar, mdr)?,
            Channel::Cst => self.cst.store_raw(mar, mdr)?,
            Channel::Inp => match mar {
                // Pushing a byte "into stdin" has no portable host
                // meaning; the reference treats it as a no-op.
                0 => {}
                1 => self.disk.seek_to(mdr)?,
                other => log::warn!("st on INP with MAR={other} is unimplemented"),
            },
            Channel::Out => match mar {
                0 => self.output.write_byte(mdr as u8),
                1 => self.disk.write_byte(mdr as u8)?,
                other => log::warn!("st on OUT with MAR={other} is unimplemented"),
            },
        }

        Ok(())
    }

    fn op_ld(&mut self) -> Result<(), RuntimeError> {
        let channel_value = self.registers.mch();
        let channel =
            Channel::from_u64(channel_value).ok_or(RuntimeError::UnknownChannel(channel_value))?;
        let mar = self.registers.mar();

        let value = match channel {
            Channel::Mem => self.mem.load(mar)?,
            Channel::Cst => self.cst.load_raw(mar)?,
            Channel::Inp => match mar {
                // EOF yields all-bits-set *low byte*, zero-extended — not
                // the full-word u64::MAX (see DESIGN.md).
                0 => self.input.read_byte().map_or(0xFF, u64::from),
                1 => self.disk.position()?,
                other => {
                    log::warn!("ld on INP with MAR={other} is unimplemented");
                    0
                }
            },
            Channel::Out => match mar {
                // TODO: the reference reads a byte back from stdout here,
                // which isn't meaningful on a write-only host stream;
                // preserved as a documented quirk rather than faked up.
                0 => 0,
                1 => u64::from(self.disk.read_byte()?),
                other => {
                    log::warn!("ld on OUT with MAR={other} is unimplemented");
                    0
                }
            },
        };

        self.registers.set_mdr(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
