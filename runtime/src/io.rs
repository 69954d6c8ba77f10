//! Host I/O adapters (spec.md §4.6 channel rules, §9 DESIGN NOTES: "a
//! byte source / seekable disk interface so the real blocking-stdin
//! implementation and an in-memory fake satisfy the same contract").

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::RuntimeError;

/// A blocking byte-at-a-time input source. EOF is signalled by `None`,
/// never an error — the dispatcher maps that to the all-bits-set MDR
/// value the spec assigns to end-of-stream reads.
pub trait ByteSource {
    fn read_byte(&mut self) -> Option<u8>;
}

/// Fire-and-forget byte output (spec.md §5: "output writes are
/// fire-and-forget").
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8);
}

/// A seekable byte stream backing `hardware/disk`.
pub trait Disk {
    fn seek_to(&mut self, offset: u64) -> Result<(), RuntimeError>;
    fn position(&mut self) -> Result<u64, RuntimeError>;
    fn read_byte(&mut self) -> Result<u8, RuntimeError>;
    fn write_byte(&mut self, byte: u8) -> Result<(), RuntimeError>;
}

pub struct Stdin;

impl ByteSource for Stdin {
    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match io::stdin().read(&mut buf) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }
}

pub struct Stdout;

impl ByteSink for Stdout {
    fn write_byte(&mut self, byte: u8) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(&[byte]);
        let _ = stdout.flush();
    }
}

pub struct FileDisk {
    file: File,
}

impl FileDisk {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self { file })
    }
}

impl Disk for FileDisk {
    fn seek_to(&mut self, offset: u64) -> Result<(), RuntimeError> {
        self.file.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    fn position(&mut self) -> Result<u64, RuntimeError> {
        Ok(self.file.stream_position()?)
    }

    fn read_byte(&mut self) -> Result<u8, RuntimeError> {
        let mut buf = [0u8; 1];
        self.file.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), RuntimeError> {
        self.file.write_all(&[byte])?;
        Ok(())
    }
}

/// In-memory stand-ins for [`ByteSource`]/[`ByteSink`]/[`Disk`], exposed
/// (not test-gated) so both this crate's own tests and downstream
/// integration tests can drive a `VmContext` without real stdio or a real
/// file.
pub mod fakes {
    use super::{ByteSink, ByteSource, Disk, RuntimeError};
    use std::collections::VecDeque;

    #[derive(Debug, Default)]
    pub struct QueueSource {
        bytes: VecDeque<u8>,
    }

    impl QueueSource {
        pub fn new(bytes: impl IntoIterator<Item = u8>) -> Self {
            Self {
                bytes: bytes.into_iter().collect(),
            }
        }
    }

    impl ByteSource for QueueSource {
        fn read_byte(&mut self) -> Option<u8> {
            self.bytes.pop_front()
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub bytes: Vec<u8>,
    }

    impl ByteSink for RecordingSink {
        fn write_byte(&mut self, byte: u8) {
            self.bytes.push(byte);
        }
    }

    #[derive(Debug, Default)]
    pub struct MemoryDisk {
        bytes: Vec<u8>,
        position: usize,
    }

    impl MemoryDisk {
        pub fn new(bytes: Vec<u8>) -> Self {
            Self { bytes, position: 0 }
        }
    }

    impl Disk for MemoryDisk {
        fn seek_to(&mut self, offset: u64) -> Result<(), RuntimeError> {
            self.position = offset as usize;
            Ok(())
        }

        fn position(&mut self) -> Result<u64, RuntimeError> {
            Ok(self.position as u64)
        }

        fn read_byte(&mut self) -> Result<u8, RuntimeError> {
            let byte = self.bytes.get(self.position).copied().unwrap_or(0);
            self.position += 1;
            Ok(byte)
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), RuntimeError> {
            if self.position >= self.bytes.len() {
                self.bytes.resize(self.position + 1, 0);
            }
            self.bytes[self.position] = byte;
            self.position += 1;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{MemoryDisk, QueueSource, RecordingSink};
    use super::*;

    #[test]
    fn queue_source_yields_bytes_then_eof() {
        let mut source = QueueSource::new([1, 2]);
        assert_eq!(source.read_byte(), Some(1));
        assert_eq!(source.read_byte(), Some(2));
        assert_eq!(source.read_byte(), None);
    }

    #[test]
    fn recording_sink_captures_bytes_in_order() {
        let mut sink = RecordingSink::default();
        sink.write_byte(b'h');
        sink.write_byte(b'i');
        assert_eq!(sink.bytes, b"hi");
    }

    #[test]
    fn memory_disk_seek_and_round_trip() {
        let mut disk = MemoryDisk::new(vec![0; 4]);
        disk.seek_to(2).unwrap();
        disk.write_byte(42).unwrap();
        disk.seek_to(2).unwrap();
        assert_eq!(disk.read_byte().unwrap(), 42);
    }
}
