use std::fs;
use std::path::PathBuf;

use clap::Parser;

use fvm_runtime::error::RuntimeError;
use fvm_runtime::io::{FileDisk, Stdin, Stdout};
use fvm_runtime::traceback;
use fvm_runtime::vm::{decode_rom, VmContext};

/// Runtime for the Fox Virtual Machine.
#[derive(Parser)]
#[command(name = "fvm", about = "Run a Fox VM ROM image")]
struct Cli {
    /// Packed-word ROM image to load into main memory
    #[arg(long, default_value = "hardware/rom")]
    rom: PathBuf,

    /// Seekable disk file opened read+write
    #[arg(long, default_value = "hardware/disk")]
    disk: PathBuf,
}

const EXIT_MISSING_FILE: i32 = 2;
const EXIT_ALLOC_FAILURE: i32 = 3;
const EXIT_EXECUTION_ERROR: i32 = 4;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let rom_bytes = fs::read(&cli.rom).unwrap_or_else(|err| {
        eprintln!("fvm: cannot open ROM {}: {}", cli.rom.display(), err);
        std::process::exit(EXIT_MISSING_FILE);
    });

    let disk = FileDisk::open(&cli.disk).unwrap_or_else(|err| {
        eprintln!("fvm: cannot open disk {}: {}", cli.disk.display(), err);
        std::process::exit(EXIT_MISSING_FILE);
    });

    let words = decode_rom(&rom_bytes);
    let mut vm = VmContext::new(words, Stdin, Stdout, disk);

    match vm.run() {
        Ok(()) => {
            log::info!("halted cleanly at CEA={}", vm.registers.cea());
        }
        Err(err) => {
            let exit_code = match &err {
                RuntimeError::AllocationFailure(_) => EXIT_ALLOC_FAILURE,
                _ => EXIT_EXECUTION_ERROR,
            };
            let report = traceback::render(&err, &vm.registers, &vm.mem, &vm.cst);
            eprint!("{report}");
            std::process::exit(exit_code);
        }
    }
}
