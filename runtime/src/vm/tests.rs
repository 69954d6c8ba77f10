use super::*;
use crate::io::fakes::{MemoryDisk, QueueSource, RecordingSink};

fn context(rom: Vec<u64>) -> VmContext<QueueSource, RecordingSink, MemoryDisk> {
    VmContext::new(
        rom,
        QueueSource::new([]),
        RecordingSink::default(),
        MemoryDisk::new(vec![]),
    )
}

#[test]
fn halts_cleanly_on_fi() {
    let mut vm = context(vec![27]);
    assert!(vm.run().is_ok());
    assert_eq!(vm.registers.cea(), 0);
}

#[test]
fn pl_loads_an_immediate_into_a_register() {
    // pl 9 acc(3); fi
    let mut vm = context(vec![0, 9, 3, 27]);
    vm.run().unwrap();
    assert_eq!(vm.registers.acc(), 9);
}

#[test]
fn mv_copies_between_registers() {
    // pl 9 acc; mv acc(3) dat(4); fi
    let mut vm = context(vec![0, 9, 3, 1, 3, 4, 27]);
    vm.run().unwrap();
    assert_eq!(vm.registers.dat(), 9);
}

#[test]
fn accumulator_addition_uses_acc_and_dat() {
    // pl 3 acc; pl 4 dat; a+; fi
    let mut vm = context(vec![0, 3, 3, 0, 4, 4, 7, 27]);
    vm.run().unwrap();
    assert_eq!(vm.registers.acc(), 7);
}

#[test]
fn comparison_sets_acc_to_zero_or_one() {
    // pl 5 acc; pl 3 dat; gt; fi
    let mut vm = context(vec![0, 5, 3, 0, 3, 4, 19, 27]);
    vm.run().unwrap();
    assert_eq!(vm.registers.acc(), 1);
}

#[test]
fn division_by_zero_is_a_fatal_error() {
    // pl 0 dat; a/; fi
    let mut vm = context(vec![0, 0, 4, 13, 27]);
    assert!(matches!(vm.run(), Err(RuntimeError::DivisionByZero)));
}

#[test]
fn unconditional_jump_lands_exactly_on_target() {
    // jm 3; fi (unreached); fi (target)
    let mut vm = context(vec![4, 3, 27, 27]);
    vm.run().unwrap();
    assert_eq!(vm.registers.cea(), 3);
}

#[test]
fn js_skips_the_jump_when_acc_is_zero() {
    // js 99 (not taken, ACC==0); fi
    let mut vm = context(vec![5, 99, 27]);
    vm.run().unwrap();
    assert_eq!(vm.registers.cea(), 2);
}

#[test]
fn js_jumps_when_acc_is_nonzero() {
    // pl 1 acc; js 5 (target, the fi at word index 5)
    let mut vm = context(vec![0, 1, 3, 5, 5, 27, 27]);
    vm.run().unwrap();
    assert_eq!(vm.registers.cea(), 5);
}

#[test]
fn call_and_return_round_trip_to_the_instruction_after_the_call() {
    // 0: cl 4   -> call sub at 4
    // 2: fi     -> return lands here
    // 4: rt     -> sub body
    let mut vm = context(vec![25, 4, 27, 0, 26]);
    vm.run().unwrap();
    assert_eq!(vm.registers.cea(), 2);
}

#[test]
fn rt_with_empty_callstack_is_underflow() {
    let mut vm = context(vec![26]);
    assert!(matches!(
        vm.run(),
        Err(RuntimeError::CallstackUnderflow)
    ));
}

#[test]
fn unknown_opcode_is_reported_with_its_address() {
    let mut vm = context(vec![200]);
    match vm.run() {
        Err(RuntimeError::UnknownOpcode(op, addr)) => {
            assert_eq!(op, 200);
            assert_eq!(addr, 0);
        }
        other => panic!("expected UnknownOpcode, got {other:?}"),
    }
}

#[test]
fn pl_rejects_an_out_of_range_register_index() {
    // pl 0 7 (register index 7 is out of range)
    let mut vm = context(vec![0, 0, 7, 27]);
    assert!(matches!(
        vm.run(),
        Err(RuntimeError::InvalidRegister(7))
    ));
}

#[test]
fn st_ld_on_mem_channel_round_trips_a_value() {
    // MCH defaults to 0 (MEM). pl 55 mdr(2); pl 9 mar(1); st; ld -> mdr unchanged by st
    let mut vm = context(vec![0, 55, 2, 0, 9, 1, 2, 27]);
    vm.run().unwrap();
    assert_eq!(vm.mem.peek(9), Some(55));
}

#[test]
fn st_ld_on_out_channel_writes_and_echoes_stdout_quirk() {
    // pl 2 mch; pl b'h' mdr; st -> writes 'h' to stdout sink
    let byte = b'h' as u64;
    let mut vm = context(vec![0, 2, 0, 0, byte, 2, 2, 27]);
    vm.run().unwrap();
    assert_eq!(vm.output.bytes, vec![b'h']);
}

#[test]
fn ld_on_inp_mar_zero_reads_a_queued_byte() {
    // pl 1 mch; pl 0 mar; ld
    let mut vm = VmContext::new(
        vec![0, 1, 0, 0, 0, 1, 3, 27],
        QueueSource::new([42]),
        RecordingSink::default(),
        MemoryDisk::new(vec![]),
    );
    vm.run().unwrap();
    assert_eq!(vm.registers.mdr(), 42);
}

#[test]
fn decode_rom_packs_eight_bytes_per_word() {
    let words = decode_rom(&27u64.to_ne_bytes());
    assert_eq!(words, vec![27]);
}

#[test]
fn decode_rom_drops_a_trailing_partial_word() {
    let mut bytes = 27u64.to_ne_bytes().to_vec();
    bytes.push(0xFF);
    assert_eq!(decode_rom(&bytes), vec![27]);
}
